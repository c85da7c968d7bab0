//! In-memory stores
//!
//! Every store guards its state with an `RwLock`; a poisoned lock is
//! recovered since no operation leaves partially written state behind.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::{EntityStore, MetadataStore, SiteStore, StatusUpdate, apply_status_update, resolve_ref};
use crate::domain::{ApplicationEntity, ApplicationRef, Site, Status, StreamDefinition};
use crate::error::{Result, lifecycle as lifecycle_error, store as store_error};

#[derive(Debug, Default)]
pub struct MemorySiteStore {
    sites: RwLock<Vec<Site>>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(sites: impl IntoIterator<Item = Site>) -> Self {
        Self {
            sites: RwLock::new(sites.into_iter().collect()),
        }
    }
}

impl SiteStore for MemorySiteStore {
    fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>> {
        let sites = self.sites.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sites.iter().find(|site| site.site_id == site_id).cloned())
    }

    fn create(&self, site: Site) -> Result<Site> {
        let mut sites = self.sites.write().unwrap_or_else(PoisonError::into_inner);
        if sites.iter().any(|existing| existing.site_id == site.site_id) {
            return Err(store_error::site_exists(&site.site_id));
        }
        sites.push(site.clone());
        Ok(site)
    }

    fn list(&self) -> Result<Vec<Site>> {
        Ok(self
            .sites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    entities: RwLock<Vec<ApplicationEntity>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for MemoryEntityStore {
    fn find_by_site_and_type(
        &self,
        site_id: &str,
        app_type: &str,
    ) -> Result<Option<ApplicationEntity>> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entities
            .iter()
            .find(|entity| entity.site_id == site_id && entity.app_type == app_type)
            .cloned())
    }

    fn find_by_ref(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        resolve_ref(entities.iter(), reference)
    }

    fn create(&self, entity: ApplicationEntity) -> Result<ApplicationEntity> {
        let mut entities = self.entities.write().unwrap_or_else(PoisonError::into_inner);
        if entities
            .iter()
            .any(|existing| existing.app_id == entity.app_id || existing.uuid == entity.uuid)
        {
            return Err(store_error::already_installed(entity.app_id));
        }
        entities.push(entity.clone());
        Ok(entity)
    }

    fn delete(&self, entity: &ApplicationEntity) -> Result<ApplicationEntity> {
        let mut entities = self.entities.write().unwrap_or_else(PoisonError::into_inner);
        let pos = entities
            .iter()
            .position(|existing| existing.uuid == entity.uuid)
            .ok_or_else(|| lifecycle_error::application_not_found(&entity.app_id))?;
        Ok(entities.remove(pos))
    }

    fn compare_and_set_status(
        &self,
        uuid: Uuid,
        expected: Status,
        next: Status,
    ) -> Result<StatusUpdate> {
        let mut entities = self.entities.write().unwrap_or_else(PoisonError::into_inner);
        apply_status_update(&mut entities, uuid, expected, next)
    }

    fn list(&self) -> Result<Vec<ApplicationEntity>> {
        Ok(self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    streams: RwLock<BTreeMap<String, Vec<StreamDefinition>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn register_streams(&self, app_id: &str, streams: &[StreamDefinition]) -> Result<()> {
        let mut registered = self.streams.write().unwrap_or_else(PoisonError::into_inner);
        registered.insert(app_id.to_string(), streams.to_vec());
        Ok(())
    }

    fn remove_streams(&self, app_id: &str) -> Result<Vec<StreamDefinition>> {
        let mut registered = self.streams.write().unwrap_or_else(PoisonError::into_inner);
        Ok(registered.remove(app_id).unwrap_or_default())
    }

    fn streams_for(&self, app_id: &str) -> Result<Vec<StreamDefinition>> {
        let registered = self.streams.read().unwrap_or_else(PoisonError::into_inner);
        Ok(registered.get(app_id).cloned().unwrap_or_default())
    }
}

//! Persistence capabilities the lifecycle controller depends on
//!
//! The controller only sees these traits. Two implementations ship with the
//! crate: [`memory`] (thread-safe, process local) and the YAML documents in
//! [`crate::workspace`].

pub mod memory;

use std::fmt;

use uuid::Uuid;

use crate::domain::{ApplicationEntity, ApplicationRef, Site, Status, StreamDefinition};
use crate::error::{Result, lifecycle as lifecycle_error};

pub use memory::{MemoryEntityStore, MemoryMetadataStore, MemorySiteStore};

/// Result of a conditional status update
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// The persisted status matched and was replaced
    Applied(ApplicationEntity),
    /// The persisted status no longer matched the expected one
    Conflict { actual: Status },
}

/// Site lookup and registration
pub trait SiteStore: Send + Sync {
    fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>>;

    /// Register a site; fails if the site id is taken
    fn create(&self, site: Site) -> Result<Site>;

    fn list(&self) -> Result<Vec<Site>>;
}

/// Installed application records
pub trait EntityStore: Send + Sync {
    fn find_by_site_and_type(
        &self,
        site_id: &str,
        app_type: &str,
    ) -> Result<Option<ApplicationEntity>>;

    /// Resolve by uuid and/or app id; fails with `ApplicationNotFound` when
    /// nothing matches or the two identifiers name different records
    fn find_by_ref(&self, reference: &ApplicationRef) -> Result<ApplicationEntity>;

    /// Persist a new entity; fails with `AlreadyInstalled` on a duplicate app id
    fn create(&self, entity: ApplicationEntity) -> Result<ApplicationEntity>;

    /// Remove an entity, returning the deleted snapshot
    fn delete(&self, entity: &ApplicationEntity) -> Result<ApplicationEntity>;

    /// Atomically replace the status of `uuid` if it is still `expected`
    fn compare_and_set_status(
        &self,
        uuid: Uuid,
        expected: Status,
        next: Status,
    ) -> Result<StatusUpdate>;

    fn list(&self) -> Result<Vec<ApplicationEntity>>;

    fn list_by_site(&self, site_id: &str) -> Result<Vec<ApplicationEntity>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|entity| entity.site_id == site_id)
            .collect())
    }
}

/// Alert metadata: stream definitions contributed by installed applications
pub trait MetadataStore: Send + Sync + fmt::Debug {
    /// Register streams for an application, replacing any previous set
    fn register_streams(&self, app_id: &str, streams: &[StreamDefinition]) -> Result<()>;

    /// Remove and return every stream registered for an application
    fn remove_streams(&self, app_id: &str) -> Result<Vec<StreamDefinition>>;

    fn streams_for(&self, app_id: &str) -> Result<Vec<StreamDefinition>>;
}

/// Shared lookup used by every [`EntityStore`] implementation
pub(crate) fn resolve_ref<'a>(
    entities: impl IntoIterator<Item = &'a ApplicationEntity>,
    reference: &ApplicationRef,
) -> Result<ApplicationEntity> {
    if reference.is_empty() {
        return Err(lifecycle_error::invalid_argument(
            "either uuid or appId is required",
        ));
    }

    entities
        .into_iter()
        .find(|entity| reference.matches(entity))
        .cloned()
        .ok_or_else(|| lifecycle_error::application_not_found(reference.to_string()))
}

/// Shared conditional update used by every [`EntityStore`] implementation
pub(crate) fn apply_status_update(
    entities: &mut [ApplicationEntity],
    uuid: Uuid,
    expected: Status,
    next: Status,
) -> Result<StatusUpdate> {
    let entity = entities
        .iter_mut()
        .find(|entity| entity.uuid == uuid)
        .ok_or_else(|| lifecycle_error::application_not_found(uuid.to_string()))?;

    if entity.status != expected {
        return Ok(StatusUpdate::Conflict {
            actual: entity.status,
        });
    }

    entity.status = next;
    Ok(StatusUpdate::Applied(entity.clone()))
}

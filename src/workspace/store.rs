//! YAML-backed stores
//!
//! Each store is one YAML document. Every read and every read-modify-write
//! runs under the workspace lock of the directory holding the document, so a
//! conditional status update holds across processes sharing the workspace.
//! Writes go to a temporary file that is renamed over the document.

use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WorkspaceGuard;
use crate::domain::{ApplicationEntity, ApplicationRef, Site, Status, StreamDefinition};
use crate::error::{AppError, Result, lifecycle as lifecycle_error, store as store_error};
use crate::store::{
    EntityStore, MetadataStore, SiteStore, StatusUpdate, apply_status_update, resolve_ref,
};

#[derive(Debug)]
struct YamlDocument<D> {
    path: PathBuf,
    _document: PhantomData<fn() -> D>,
}

impl<D> YamlDocument<D>
where
    D: Serialize + DeserializeOwned + Default,
{
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            _document: PhantomData,
        }
    }

    fn read(&self) -> Result<D> {
        let _guard = self.lock()?;
        self.load()
    }

    /// Apply `change` and save; nothing is written when `change` fails
    fn update<T>(&self, change: impl FnOnce(&mut D) -> Result<T>) -> Result<T> {
        let _guard = self.lock()?;
        let mut document = self.load()?;
        let output = change(&mut document)?;
        self.save(&document)?;
        Ok(output)
    }

    fn lock(&self) -> Result<WorkspaceGuard> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .map_err(|e| store_error::write_failed(dir.display().to_string(), e.to_string()))?;
        WorkspaceGuard::acquire(dir)
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn load(&self) -> Result<D> {
        if !self.path.exists() {
            return Ok(D::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.read_failed(e))?;
        if content.trim().is_empty() {
            return Ok(D::default());
        }
        serde_yaml::from_str(&content).map_err(|e| self.read_failed(e))
    }

    fn save(&self, document: &D) -> Result<()> {
        let content = serde_yaml::to_string(document).map_err(|e| self.write_failed(e))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).map_err(|e| self.write_failed(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_failed(e))
    }

    fn read_failed(&self, reason: impl ToString) -> AppError {
        store_error::read_failed(self.path.display().to_string(), reason.to_string())
    }

    fn write_failed(&self, reason: impl ToString) -> AppError {
        store_error::write_failed(self.path.display().to_string(), reason.to_string())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SitesDocument {
    #[serde(default)]
    sites: Vec<Site>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApplicationsDocument {
    #[serde(default)]
    applications: Vec<ApplicationEntity>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MetadataDocument {
    /// Streams keyed by the app id that registered them
    #[serde(default)]
    streams: BTreeMap<String, Vec<StreamDefinition>>,
}

/// Sites kept in `sites.yaml`
#[derive(Debug)]
pub struct YamlSiteStore {
    document: YamlDocument<SitesDocument>,
}

impl YamlSiteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: YamlDocument::new(path.into()),
        }
    }
}

impl SiteStore for YamlSiteStore {
    fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>> {
        Ok(self
            .document
            .read()?
            .sites
            .into_iter()
            .find(|site| site.site_id == site_id))
    }

    fn create(&self, site: Site) -> Result<Site> {
        self.document.update(|document| {
            if document.sites.iter().any(|s| s.site_id == site.site_id) {
                return Err(store_error::site_exists(&site.site_id));
            }
            document.sites.push(site.clone());
            Ok(site)
        })
    }

    fn list(&self) -> Result<Vec<Site>> {
        Ok(self.document.read()?.sites)
    }
}

/// Application entities kept in `applications.yaml`
#[derive(Debug)]
pub struct YamlEntityStore {
    document: YamlDocument<ApplicationsDocument>,
}

impl YamlEntityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: YamlDocument::new(path.into()),
        }
    }
}

impl EntityStore for YamlEntityStore {
    fn find_by_site_and_type(
        &self,
        site_id: &str,
        app_type: &str,
    ) -> Result<Option<ApplicationEntity>> {
        Ok(self
            .document
            .read()?
            .applications
            .into_iter()
            .find(|entity| entity.site_id == site_id && entity.app_type == app_type))
    }

    fn find_by_ref(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        let document = self.document.read()?;
        resolve_ref(document.applications.iter(), reference)
    }

    fn create(&self, entity: ApplicationEntity) -> Result<ApplicationEntity> {
        self.document.update(|document| {
            if document
                .applications
                .iter()
                .any(|existing| existing.app_id == entity.app_id || existing.uuid == entity.uuid)
            {
                return Err(store_error::already_installed(entity.app_id));
            }
            document.applications.push(entity.clone());
            Ok(entity)
        })
    }

    fn delete(&self, entity: &ApplicationEntity) -> Result<ApplicationEntity> {
        self.document.update(|document| {
            let pos = document
                .applications
                .iter()
                .position(|existing| existing.uuid == entity.uuid)
                .ok_or_else(|| lifecycle_error::application_not_found(&entity.app_id))?;
            Ok(document.applications.remove(pos))
        })
    }

    fn compare_and_set_status(
        &self,
        uuid: Uuid,
        expected: Status,
        next: Status,
    ) -> Result<StatusUpdate> {
        self.document.update(|document| {
            apply_status_update(&mut document.applications, uuid, expected, next)
        })
    }

    fn list(&self) -> Result<Vec<ApplicationEntity>> {
        Ok(self.document.read()?.applications)
    }
}

/// Stream metadata kept in `metadata.yaml`
#[derive(Debug)]
pub struct YamlMetadataStore {
    document: YamlDocument<MetadataDocument>,
}

impl YamlMetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: YamlDocument::new(path.into()),
        }
    }
}

impl MetadataStore for YamlMetadataStore {
    fn register_streams(&self, app_id: &str, streams: &[StreamDefinition]) -> Result<()> {
        self.document.update(|document| {
            document
                .streams
                .insert(app_id.to_string(), streams.to_vec());
            Ok(())
        })
    }

    fn remove_streams(&self, app_id: &str) -> Result<Vec<StreamDefinition>> {
        self.document
            .update(|document| Ok(document.streams.remove(app_id).unwrap_or_default()))
    }

    fn streams_for(&self, app_id: &str) -> Result<Vec<StreamDefinition>> {
        Ok(self
            .document
            .read()?
            .streams
            .remove(app_id)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationDescriptor, DeployMode};
    use tempfile::TempDir;

    fn entity(app_type: &str) -> ApplicationEntity {
        ApplicationEntity::new(
            &Site::new("sandbox"),
            &ApplicationDescriptor::new(app_type),
            DeployMode::Local,
        )
    }

    #[test]
    fn test_entities_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("applications.yaml");

        let created = YamlEntityStore::new(&path).create(entity("hdfs_audit")).unwrap();

        let reopened = YamlEntityStore::new(&path);
        let found = reopened
            .find_by_ref(&ApplicationRef::by_app_id("HDFS_AUDIT_SANDBOX"))
            .unwrap();
        assert_eq!(found, created);
        assert!(
            reopened
                .find_by_site_and_type("sandbox", "hdfs_audit")
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_duplicate_create_leaves_document_unchanged() {
        let temp = TempDir::new().unwrap();
        let store = YamlEntityStore::new(temp.path().join("applications.yaml"));
        store.create(entity("hdfs_audit")).unwrap();

        let err = store.create(entity("hdfs_audit")).unwrap_err();
        assert!(matches!(err, AppError::AlreadyInstalled { .. }));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_compare_and_set_across_instances() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("applications.yaml");
        let first = YamlEntityStore::new(&path);
        let second = YamlEntityStore::new(&path);
        let created = first.create(entity("hdfs_audit")).unwrap();

        let applied = first
            .compare_and_set_status(created.uuid, Status::Initialized, Status::Starting)
            .unwrap();
        assert!(matches!(applied, StatusUpdate::Applied(ref e) if e.status == Status::Starting));

        let conflict = second
            .compare_and_set_status(created.uuid, Status::Initialized, Status::Starting)
            .unwrap();
        assert_eq!(
            conflict,
            StatusUpdate::Conflict {
                actual: Status::Starting
            }
        );
    }

    #[test]
    fn test_delete_returns_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = YamlEntityStore::new(temp.path().join("applications.yaml"));
        let created = store.create(entity("hdfs_audit")).unwrap();

        assert_eq!(store.delete(&created).unwrap(), created);
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.delete(&created),
            Err(AppError::ApplicationNotFound { .. })
        ));
    }

    #[test]
    fn test_sites_and_metadata() {
        let temp = TempDir::new().unwrap();
        let sites = YamlSiteStore::new(temp.path().join("sites.yaml"));
        sites.create(Site::new("sandbox").with_name("Sandbox")).unwrap();
        assert!(sites.create(Site::new("sandbox")).is_err());
        assert_eq!(
            sites.find_by_site_id("sandbox").unwrap().unwrap().display_name(),
            "Sandbox"
        );

        let metadata = YamlMetadataStore::new(temp.path().join("nested").join("metadata.yaml"));
        metadata
            .register_streams("A", &[StreamDefinition::new("S_SANDBOX")])
            .unwrap();
        assert_eq!(metadata.streams_for("A").unwrap().len(), 1);
        assert_eq!(metadata.remove_streams("A").unwrap().len(), 1);
        assert!(metadata.streams_for("A").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_document_is_read_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("applications.yaml");
        fs::write(&path, "applications: [unclosed").unwrap();

        let err = YamlEntityStore::new(&path).list().unwrap_err();
        assert!(matches!(err, AppError::StoreReadFailed { .. }));
    }
}

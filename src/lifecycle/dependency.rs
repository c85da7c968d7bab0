//! Install-time dependency validation

use tracing::debug;

use crate::domain::{ApplicationDescriptor, ApplicationEntity};
use crate::error::{Result, lifecycle as lifecycle_error};
use crate::store::EntityStore;

/// Check that every required dependency of `descriptor` is installed on the
/// entity's site. Optional dependencies are ignored even when absent.
pub fn validate(
    entity: &ApplicationEntity,
    descriptor: &ApplicationDescriptor,
    installed: &dyn EntityStore,
) -> Result<()> {
    for dependency in descriptor.dependencies.iter().filter(|d| d.required) {
        let peer = installed.find_by_site_and_type(&entity.site_id, &dependency.app_type)?;
        if peer.is_none() {
            return Err(lifecycle_error::missing_dependency(
                &dependency.app_type,
                &entity.app_type,
            ));
        }
        debug!(app_id = %entity.app_id, dependency = %dependency, "dependency satisfied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationDependency, DeployMode, Site};
    use crate::error::AppError;
    use crate::store::MemoryEntityStore;

    fn descriptor() -> ApplicationDescriptor {
        ApplicationDescriptor::new("HADOOP_JMX")
            .with_dependency(ApplicationDependency::required("HADOOP_METRIC"))
            .with_dependency(ApplicationDependency::optional("TOPOLOGY_HEALTH"))
    }

    #[test]
    fn test_missing_required_dependency() {
        let store = MemoryEntityStore::new();
        let descriptor = descriptor();
        let entity = ApplicationEntity::new(&Site::new("sandbox"), &descriptor, DeployMode::Local);

        let err = validate(&entity, &descriptor, &store).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingDependency { ref dependency, ref dependent }
                if dependency == "HADOOP_METRIC" && dependent == "HADOOP_JMX"
        ));
    }

    #[test]
    fn test_required_dependency_on_same_site() {
        let store = MemoryEntityStore::new();
        let site = Site::new("sandbox");
        store
            .create(ApplicationEntity::new(
                &site,
                &ApplicationDescriptor::new("HADOOP_METRIC"),
                DeployMode::Local,
            ))
            .unwrap();

        let descriptor = descriptor();
        let entity = ApplicationEntity::new(&site, &descriptor, DeployMode::Local);
        assert!(validate(&entity, &descriptor, &store).is_ok());
    }

    #[test]
    fn test_dependency_on_other_site_does_not_count() {
        let store = MemoryEntityStore::new();
        store
            .create(ApplicationEntity::new(
                &Site::new("production"),
                &ApplicationDescriptor::new("HADOOP_METRIC"),
                DeployMode::Local,
            ))
            .unwrap();

        let descriptor = descriptor();
        let entity = ApplicationEntity::new(&Site::new("sandbox"), &descriptor, DeployMode::Local);
        assert!(validate(&entity, &descriptor, &store).is_err());
    }
}

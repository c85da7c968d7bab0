//! Wiring of a workspace into a ready lifecycle controller

use std::sync::Arc;

use tracing::debug;

use crate::catalog::CatalogLoader;
use crate::config::{Config, ConfigLoader};
use crate::environment::{EnvironmentCache, PluginRegistry};
use crate::error::Result;
use crate::lifecycle::LifecycleController;
use crate::workspace::Workspace;

/// Configuration key naming the metadata store plugin
pub const METADATA_PROVIDER_KEY: &str = "metadata.provider";

/// Metadata store used when [`METADATA_PROVIDER_KEY`] is absent
pub const DEFAULT_METADATA_PROVIDER: &str = "memory-metadata";

/// Everything one CLI invocation needs, built once from a workspace
pub struct Runtime {
    workspace: Workspace,
    environments: Arc<EnvironmentCache>,
    controller: LifecycleController,
}

impl Runtime {
    pub fn open(workspace: Workspace) -> Result<Self> {
        Self::with_loader(workspace, ConfigLoader::new(), PluginRegistry::builtin())
    }

    pub fn with_loader(
        workspace: Workspace,
        loader: ConfigLoader,
        registry: PluginRegistry,
    ) -> Result<Self> {
        let config = loader.with_workspace_dir(&workspace.appctl_dir).load()?;
        let registry = Arc::new(registry);
        let environments = Arc::new(EnvironmentCache::new(Arc::clone(&registry)));

        let catalog = CatalogLoader::new(
            workspace.providers_dir(),
            Arc::clone(&environments),
            config.clone(),
        )
        .load()?;

        let metadata_id = config.get_str_or(METADATA_PROVIDER_KEY, DEFAULT_METADATA_PROVIDER);
        let metadata = registry.load_metadata_store(metadata_id, &config)?;
        debug!(metadata = metadata_id, environments = environments.len(), "runtime ready");

        let controller = LifecycleController::new(
            config.clone(),
            Arc::new(workspace.site_store()),
            Arc::new(workspace.entity_store()),
            Arc::new(catalog),
            metadata,
        );

        Ok(Self {
            workspace,
            environments,
            controller,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &Config {
        self.controller.config()
    }

    pub fn environments(&self) -> &EnvironmentCache {
        &self.environments
    }

    pub fn controller(&self) -> &LifecycleController {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationRef, Site, Status};
    use crate::lifecycle::InstallOperation;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn runtime(temp: &TempDir) -> Runtime {
        let workspace = Workspace::init(temp.path()).unwrap();
        fs::write(
            workspace.providers_dir().join("audit.yaml"),
            "type: HDFS_AUDIT\nstreams:\n  - streamId: hdfs_audit_log_stream\n",
        )
        .unwrap();
        Runtime::with_loader(
            workspace,
            ConfigLoader::new().without_global(),
            PluginRegistry::builtin(),
        )
        .unwrap()
    }

    #[test]
    #[serial]
    fn test_workspace_runtime_round_trip() {
        let temp = TempDir::new().unwrap();
        let runtime = runtime(&temp);
        let controller = runtime.controller();

        controller.sites().create(Site::new("sandbox")).unwrap();
        let entity = controller
            .install(InstallOperation::new("sandbox", "HDFS_AUDIT"))
            .unwrap();
        let reference = ApplicationRef::by_uuid(entity.uuid);

        controller.start(&reference).unwrap();
        assert_eq!(controller.status(&reference).unwrap(), Status::Running);
        assert_eq!(
            controller.refresh(&reference).unwrap().status,
            Status::Running
        );

        // streams were registered through the yaml metadata store
        let metadata = fs::read_to_string(runtime.workspace().metadata_path()).unwrap();
        assert!(metadata.contains("HDFS_AUDIT_LOG_STREAM_SANDBOX"));

        // commands went over the file stream provider
        assert!(
            runtime
                .workspace()
                .appctl_dir
                .join("streams")
                .join("application.commands.jsonl")
                .is_file()
        );
    }

    #[test]
    #[serial]
    fn test_environments_are_shared_per_kind() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::init(temp.path()).unwrap();
        for name in ["a", "b", "c"] {
            fs::write(
                workspace.providers_dir().join(format!("{name}.yaml")),
                format!("type: {name}\n"),
            )
            .unwrap();
        }
        let runtime = Runtime::with_loader(
            workspace,
            ConfigLoader::new().without_global(),
            PluginRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(runtime.environments().len(), 1);
    }
}

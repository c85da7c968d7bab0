//! Applications driven by lifecycle commands on a stream
//!
//! A [`DispatchApplication`] does not run anything itself. Each hook publishes
//! a [`LifecycleCommand`] keyed by the application id on the command topic of
//! its environment's stream provider, and the backend consuming that topic does
//! the work. The status query reads the latest command back. Hooks of an
//! application bound to a static environment publish nothing.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Application;
use crate::config::COMMAND_TOPIC_KEY;
use crate::domain::{DeployMode, Status};
use crate::environment::{Environment, StreamRecord};
use crate::error::{AppError, Result, lifecycle as lifecycle_error};
use crate::lifecycle::{OperationContext, OperationKind};

/// Topic used when the environment does not configure one
pub const DEFAULT_COMMAND_TOPIC: &str = "application.commands";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifecycleCommand {
    Install,
    Uninstall,
    Start,
    Stop,
}

impl LifecycleCommand {
    pub fn operation(self) -> OperationKind {
        match self {
            Self::Install => OperationKind::Install,
            Self::Uninstall => OperationKind::Uninstall,
            Self::Start => OperationKind::Start,
            Self::Stop => OperationKind::Stop,
        }
    }

    /// Status a backend reports once it has acted on this command
    pub fn observed_status(self) -> Status {
        match self {
            Self::Start => Status::Running,
            Self::Stop => Status::Stopped,
            Self::Install | Self::Uninstall => Status::Initialized,
        }
    }
}

impl fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "INSTALL"),
            Self::Uninstall => write!(f, "UNINSTALL"),
            Self::Start => write!(f, "START"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}

/// Record payload published for every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPayload {
    pub action: LifecycleCommand,
    pub app_id: String,
    pub site_id: String,
    pub mode: DeployMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar_path: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
}

#[derive(Debug)]
pub struct DispatchApplication {
    environment: Arc<Environment>,
    topic: String,
}

impl DispatchApplication {
    pub fn new(environment: Arc<Environment>) -> Self {
        let topic = environment
            .config()
            .get_str_or(COMMAND_TOPIC_KEY, DEFAULT_COMMAND_TOPIC)
            .to_string();
        Self { environment, topic }
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn dispatch(&self, command: LifecycleCommand, context: &OperationContext<'_>) -> Result<()> {
        let entity = context.entity();
        if !self.is_executable() {
            debug!(app_id = %entity.app_id, "static environment, {command} not dispatched");
            return Ok(());
        }

        let payload = CommandPayload {
            action: command,
            app_id: entity.app_id.clone(),
            site_id: entity.site_id.clone(),
            mode: entity.mode,
            jar_path: entity.jar_path.clone(),
            config: context.effective_config().to_value(),
        };

        let record = serde_json::to_value(&payload)
            .map(|payload| StreamRecord::new(&entity.app_id, payload))
            .map_err(|e| backend(&entity.app_id, command.operation(), e))?;

        self.environment
            .stream()
            .publish(&self.topic, record)
            .map_err(|e| backend(&entity.app_id, command.operation(), e))?;

        debug!(app_id = %entity.app_id, topic = %self.topic, "dispatched {command}");
        Ok(())
    }
}

impl Application for DispatchApplication {
    fn is_executable(&self) -> bool {
        self.environment.kind().is_executable()
    }

    fn on_install(&self, context: &OperationContext<'_>) -> Result<()> {
        self.dispatch(LifecycleCommand::Install, context)
    }

    fn on_uninstall(&self, context: &OperationContext<'_>) -> Result<()> {
        self.dispatch(LifecycleCommand::Uninstall, context)
    }

    fn on_start(&self, context: &OperationContext<'_>) -> Result<()> {
        self.dispatch(LifecycleCommand::Start, context)
    }

    fn on_stop(&self, context: &OperationContext<'_>) -> Result<()> {
        self.dispatch(LifecycleCommand::Stop, context)
    }

    fn status(&self, context: &OperationContext<'_>) -> Result<Status> {
        let app_id = &context.entity().app_id;
        let latest = self
            .environment
            .stream()
            .latest(&self.topic, app_id)
            .map_err(|e| backend(app_id, OperationKind::CheckStatus, e))?;

        let Some(record) = latest else {
            return Ok(Status::Initialized);
        };

        let payload: CommandPayload = serde_json::from_value(record.payload)
            .map_err(|e| backend(app_id, OperationKind::CheckStatus, e))?;
        Ok(payload.action.observed_status())
    }
}

fn backend(app_id: &str, operation: OperationKind, err: impl fmt::Display) -> AppError {
    lifecycle_error::backend(app_id, operation, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{ApplicationDescriptor, ApplicationEntity, Site};
    use crate::environment::{EnvironmentKind, PluginRegistry};
    use crate::store::MemoryMetadataStore;

    fn environment(kind: EnvironmentKind, config: Config) -> Arc<Environment> {
        Arc::new(Environment::new(kind, config, &PluginRegistry::builtin()).unwrap())
    }

    fn entity() -> (ApplicationDescriptor, ApplicationEntity) {
        let descriptor = ApplicationDescriptor::new("hdfs_audit").with_jar_path("audit.jar");
        let entity = ApplicationEntity::new(&Site::new("sandbox"), &descriptor, DeployMode::Local);
        (descriptor, entity)
    }

    #[test]
    fn test_status_follows_latest_command() {
        let application = DispatchApplication::new(environment(
            EnvironmentKind::Dispatch,
            Config::new(),
        ));
        let (descriptor, entity) = entity();
        let metadata = MemoryMetadataStore::new();
        let config = Config::new();
        let context = OperationContext::new(&application, &entity, &descriptor, &config, &metadata);

        assert_eq!(application.status(&context).unwrap(), Status::Initialized);
        application.on_start(&context).unwrap();
        assert_eq!(application.status(&context).unwrap(), Status::Running);
        application.on_stop(&context).unwrap();
        assert_eq!(application.status(&context).unwrap(), Status::Stopped);
    }

    #[test]
    fn test_payload_carries_entity_fields() {
        let env = environment(
            EnvironmentKind::Dispatch,
            Config::new().with(COMMAND_TOPIC_KEY, "ops.commands"),
        );
        let application = DispatchApplication::new(Arc::clone(&env));
        assert_eq!(application.topic(), "ops.commands");

        let (descriptor, entity) = entity();
        let metadata = MemoryMetadataStore::new();
        let config = Config::new();
        let context = OperationContext::new(&application, &entity, &descriptor, &config, &metadata);
        application.on_install(&context).unwrap();

        let record = env
            .stream()
            .latest("ops.commands", "HDFS_AUDIT_SANDBOX")
            .unwrap()
            .unwrap();
        assert_eq!(record.payload["action"], "INSTALL");
        assert_eq!(record.payload["siteId"], "sandbox");
        assert_eq!(record.payload["jarPath"], "audit.jar");
        assert_eq!(record.payload["config"]["appId"], "HDFS_AUDIT_SANDBOX");
    }

    #[test]
    fn test_static_environment_is_not_executable() {
        let env = environment(EnvironmentKind::Static, Config::new());
        let application = DispatchApplication::new(Arc::clone(&env));
        assert!(!application.is_executable());

        let (descriptor, entity) = entity();
        let metadata = MemoryMetadataStore::new();
        let config = Config::new();
        let context = OperationContext::new(&application, &entity, &descriptor, &config, &metadata);
        application.on_install(&context).unwrap();
        assert!(
            env.stream()
                .latest(application.topic(), "HDFS_AUDIT_SANDBOX")
                .unwrap()
                .is_none()
        );
    }
}

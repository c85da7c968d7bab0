//! Application lifecycle
//!
//! This module provides:
//! - [`LifecycleController`], the state machine gating every status transition
//! - [`OperationContext`], the per-call adapter to the execution backend
//! - [`dependency`], install-time validation of required peers
//! - [`TransitionLocks`], per-entity serialization of transitions
//!
//! ## Transitions
//!
//! | Operation  | Allowed from               | Result                  |
//! |------------|----------------------------|-------------------------|
//! | install    | (no entity)                | `INITIALIZED`           |
//! | uninstall  | `INITIALIZED`, `STOPPED`   | entity removed          |
//! | start      | `INITIALIZED`, `STOPPED`   | `STARTING`              |
//! | stop       | `RUNNING`                  | `STOPPING`              |

pub mod context;
pub mod controller;
pub mod dependency;
pub mod locks;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{ApplicationEntity, ApplicationRef, Configuration, DeployMode, Status};

pub use context::OperationContext;
pub use controller::LifecycleController;
pub use locks::{TransitionGuard, TransitionLocks};

/// Lifecycle operation a caller can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Install,
    Uninstall,
    Start,
    Stop,
    CheckStatus,
}

impl OperationKind {
    /// Statuses an existing entity must be in for this operation
    pub fn permitted_from(self) -> &'static [Status] {
        match self {
            Self::Uninstall | Self::Start => &[Status::Initialized, Status::Stopped],
            Self::Stop => &[Status::Running],
            Self::Install | Self::CheckStatus => &[],
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Uninstall => write!(f, "uninstall"),
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::CheckStatus => write!(f, "check status"),
        }
    }
}

/// Install request
#[derive(Debug, Clone, PartialEq)]
pub struct InstallOperation {
    pub site_id: String,
    pub app_type: String,
    pub mode: DeployMode,
    /// Artifact path; the descriptor default is used when absent
    pub jar_path: Option<String>,
    /// Overrides applied on top of the descriptor defaults
    pub configuration: Option<Configuration>,
}

impl InstallOperation {
    pub fn new(site_id: impl Into<String>, app_type: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            app_type: app_type.into(),
            mode: DeployMode::default(),
            jar_path: None,
            configuration: None,
        }
    }

    pub fn with_mode(mut self, mode: DeployMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_jar_path(mut self, jar_path: impl Into<String>) -> Self {
        self.jar_path = Some(jar_path.into());
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Add a single override
    pub fn with_override(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.configuration
            .get_or_insert_with(Configuration::new)
            .insert(key.into(), value.into());
        self
    }
}

/// An operation submitted to [`LifecycleController::execute`]
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Install(InstallOperation),
    Uninstall(ApplicationRef),
    Start(ApplicationRef),
    Stop(ApplicationRef),
    CheckStatus(ApplicationRef),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Install(_) => OperationKind::Install,
            Self::Uninstall(_) => OperationKind::Uninstall,
            Self::Start(_) => OperationKind::Start,
            Self::Stop(_) => OperationKind::Stop,
            Self::CheckStatus(_) => OperationKind::CheckStatus,
        }
    }
}

/// What an operation produced
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// Installed, transitioned, or deleted entity
    Entity(ApplicationEntity),
    /// Backend-reported status
    Status(Status),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_source_statuses() {
        assert_eq!(
            OperationKind::Start.permitted_from(),
            &[Status::Initialized, Status::Stopped]
        );
        assert_eq!(
            OperationKind::Uninstall.permitted_from(),
            OperationKind::Start.permitted_from()
        );
        assert_eq!(OperationKind::Stop.permitted_from(), &[Status::Running]);
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(OperationKind::Uninstall.to_string(), "uninstall");
        assert_eq!(OperationKind::CheckStatus.to_string(), "check status");
    }

    #[test]
    fn test_install_operation_overrides() {
        let op = InstallOperation::new("sandbox", "HDFS_AUDIT")
            .with_override("b", 3)
            .with_override("c", "x");
        let configuration = op.configuration.unwrap();
        assert_eq!(configuration["b"], serde_json::json!(3));
        assert_eq!(configuration.len(), 2);
    }
}

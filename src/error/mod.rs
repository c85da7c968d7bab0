//! Error types and handling for appctl
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`lifecycle`]: Lifecycle precondition and backend errors
//! - [`config`]: Configuration errors
//! - [`store`]: Persistence and workspace errors
//! - [`plugin`]: Plugin registry errors
//!
//! Callers that need to branch on the failure class use [`AppError::kind`]
//! rather than matching individual variants.

pub mod config;
pub mod lifecycle;
pub mod plugin;
pub mod store;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::Status;
use crate::lifecycle::OperationKind;

/// Coarse classification of an [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Site, descriptor, or application entity is absent
    NotFound,
    /// Operation not permitted from the current status
    IllegalStatus,
    /// Required peer application is not installed
    MissingDependency,
    /// Operation requires an executable application type
    NotExecutable,
    /// Opaque failure reported by an execution backend hook
    Backend,
    /// Malformed caller input
    InvalidArgument,
    /// Configuration or plugin resolution failure
    Config,
    /// Persistence failure
    Storage,
}

/// Main error type for appctl operations
#[derive(Error, Diagnostic, Debug)]
pub enum AppError {
    // Lifecycle errors
    #[error("Site '{site_id}' not found")]
    #[diagnostic(
        code(appctl::lifecycle::site_not_found),
        help("Register the site first with 'appctl site add <SITE_ID>'")
    )]
    SiteNotFound { site_id: String },

    #[error("Application type '{app_type}' not found")]
    #[diagnostic(
        code(appctl::lifecycle::descriptor_not_found),
        help("Check that a provider descriptor for this type exists in .appctl/providers/")
    )]
    DescriptorNotFound { app_type: String },

    #[error("Application '{reference}' not found")]
    #[diagnostic(code(appctl::lifecycle::application_not_found))]
    ApplicationNotFound { reference: String },

    #[error("Application '{app_id}' is already installed")]
    #[diagnostic(
        code(appctl::lifecycle::already_installed),
        help("Uninstall the existing application before installing it again")
    )]
    AlreadyInstalled { app_id: String },

    #[error("Application '{app_id}' status is {status}, {operation} operation is not allowed")]
    #[diagnostic(code(appctl::lifecycle::illegal_status))]
    IllegalStatus {
        app_id: String,
        status: Status,
        operation: OperationKind,
    },

    #[error(
        "Application '{app_id}' status changed from {expected} to {actual} after the backend accepted the {operation} operation"
    )]
    #[diagnostic(
        code(appctl::lifecycle::status_conflict),
        help("The backend already acted on the request; check 'appctl status' before retrying")
    )]
    StatusConflict {
        app_id: String,
        expected: Status,
        actual: Status,
        operation: OperationKind,
    },

    #[error("Required dependency '{dependency}' of '{dependent}' was not installed")]
    #[diagnostic(
        code(appctl::lifecycle::missing_dependency),
        help("Install the dependency on the same site first")
    )]
    MissingDependency {
        dependency: String,
        dependent: String,
    },

    #[error("Application type '{app_type}' is not executable")]
    #[diagnostic(code(appctl::lifecycle::not_executable))]
    NotExecutable { app_type: String },

    #[error("Backend failed to {operation} '{app_id}': {message}")]
    #[diagnostic(code(appctl::lifecycle::backend))]
    Backend {
        app_id: String,
        operation: OperationKind,
        message: String,
    },

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(appctl::lifecycle::invalid_argument))]
    InvalidArgument { message: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(appctl::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(appctl::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(appctl::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // Plugin errors
    #[error("Unknown plugin '{id}'")]
    #[diagnostic(
        code(appctl::plugin::not_found),
        help("Built-in stream providers: memory, file. Built-in metadata stores: memory-metadata, yaml")
    )]
    PluginNotFound { id: String },

    #[error("Plugin '{id}' does not provide the {capability} capability")]
    #[diagnostic(code(appctl::plugin::incompatible))]
    PluginIncompatible { id: String, capability: String },

    #[error("Failed to initialize plugin '{id}': {reason}")]
    #[diagnostic(code(appctl::plugin::init_failed))]
    PluginInitFailed { id: String, reason: String },

    // Store errors
    #[error("Failed to read store: {path}: {reason}")]
    #[diagnostic(code(appctl::store::read_failed))]
    StoreReadFailed { path: String, reason: String },

    #[error("Failed to write store: {path}: {reason}")]
    #[diagnostic(code(appctl::store::write_failed))]
    StoreWriteFailed { path: String, reason: String },

    #[error("Failed to lock store: {path}: {reason}")]
    #[diagnostic(
        code(appctl::store::locked),
        help("Another appctl process may be holding the workspace lock")
    )]
    StoreLocked { path: String, reason: String },

    #[error("Workspace not found at: {path}")]
    #[diagnostic(
        code(appctl::store::workspace_not_found),
        help("Run 'appctl init' to initialize a workspace")
    )]
    WorkspaceNotFound { path: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(appctl::fs::io_error))]
    IoError { message: String },
}

impl AppError {
    /// Classify this error for callers that branch on failure class
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SiteNotFound { .. }
            | Self::DescriptorNotFound { .. }
            | Self::ApplicationNotFound { .. } => ErrorKind::NotFound,
            Self::IllegalStatus { .. } | Self::StatusConflict { .. } => ErrorKind::IllegalStatus,
            Self::MissingDependency { .. } => ErrorKind::MissingDependency,
            Self::NotExecutable { .. } => ErrorKind::NotExecutable,
            Self::Backend { .. } => ErrorKind::Backend,
            Self::InvalidArgument { .. } | Self::AlreadyInstalled { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::ConfigParseFailed { .. }
            | Self::ConfigInvalid { .. }
            | Self::ConfigReadFailed { .. }
            | Self::PluginNotFound { .. }
            | Self::PluginIncompatible { .. }
            | Self::PluginInitFailed { .. } => ErrorKind::Config,
            Self::StoreReadFailed { .. }
            | Self::StoreWriteFailed { .. }
            | Self::StoreLocked { .. }
            | Self::WorkspaceNotFound { .. }
            | Self::IoError { .. } => ErrorKind::Storage,
        }
    }

    /// Whether this error was raised before any state mutation
    ///
    /// Precondition failures are always safe to retry once the condition is fixed.
    /// A [`AppError::StatusConflict`] shares the `IllegalStatus` kind but is
    /// raised after the backend hook ran, so it is not one.
    pub fn is_precondition(&self) -> bool {
        if matches!(self, Self::StatusConflict { .. }) {
            return false;
        }
        matches!(
            self.kind(),
            ErrorKind::NotFound
                | ErrorKind::IllegalStatus
                | ErrorKind::MissingDependency
                | ErrorKind::NotExecutable
                | ErrorKind::InvalidArgument
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = AppError::SiteNotFound {
            site_id: "sandbox".to_string(),
        };
        assert_eq!(err.to_string(), "Site 'sandbox' not found");
    }

    #[test]
    fn test_error_code() {
        let err = AppError::NotExecutable {
            app_type: "JMX_LIB".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("appctl::lifecycle::not_executable".to_string())
        );
    }

    test_error_contains!(
        test_illegal_status_names_status_and_operation,
        AppError::IllegalStatus {
            app_id: "HDFS_AUDIT_SANDBOX".to_string(),
            status: Status::Running,
            operation: OperationKind::Uninstall,
        },
        "HDFS_AUDIT_SANDBOX",
        "RUNNING",
        "uninstall"
    );

    test_error_contains!(
        test_missing_dependency_names_both_types,
        AppError::MissingDependency {
            dependency: "HADOOP_METRIC".to_string(),
            dependent: "HADOOP_JMX".to_string(),
        },
        "HADOOP_METRIC",
        "HADOOP_JMX"
    );

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            AppError::ApplicationNotFound {
                reference: "x".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::PluginIncompatible {
                id: "yaml".to_string(),
                capability: "stream provider".to_string(),
            }
            .kind(),
            ErrorKind::Config
        );
        assert_eq!(
            AppError::Backend {
                app_id: "A".to_string(),
                operation: OperationKind::Start,
                message: "boom".to_string(),
            }
            .kind(),
            ErrorKind::Backend
        );
    }

    #[test]
    fn test_precondition_errors() {
        assert!(
            AppError::NotExecutable {
                app_type: "T".to_string()
            }
            .is_precondition()
        );
        assert!(
            !AppError::Backend {
                app_id: "A".to_string(),
                operation: OperationKind::Stop,
                message: "timeout".to_string(),
            }
            .is_precondition()
        );
    }

    #[test]
    fn test_status_conflict_is_not_precondition() {
        let err = AppError::StatusConflict {
            app_id: "HDFS_AUDIT_SANDBOX".to_string(),
            expected: Status::Initialized,
            actual: Status::Stopped,
            operation: OperationKind::Start,
        };
        assert_eq!(err.kind(), ErrorKind::IllegalStatus);
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("STOPPED"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AppError = io_err.into();
        assert!(matches!(err, AppError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let err: AppError = parse_result.unwrap_err().into();
        assert!(matches!(err, AppError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let err: AppError = parse_result.unwrap_err().into();
        assert!(matches!(err, AppError::ConfigParseFailed { .. }));
    }
}

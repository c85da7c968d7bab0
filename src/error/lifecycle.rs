//! Lifecycle errors

use super::AppError;
use crate::domain::Status;
use crate::lifecycle::OperationKind;

/// Creates a site not found error
pub fn site_not_found(site_id: impl Into<String>) -> AppError {
    AppError::SiteNotFound {
        site_id: site_id.into(),
    }
}

/// Creates a descriptor not found error
pub fn descriptor_not_found(app_type: impl Into<String>) -> AppError {
    AppError::DescriptorNotFound {
        app_type: app_type.into(),
    }
}

/// Creates an application not found error
pub fn application_not_found(reference: impl Into<String>) -> AppError {
    AppError::ApplicationNotFound {
        reference: reference.into(),
    }
}

/// Creates an illegal status error
pub fn illegal_status(
    app_id: impl Into<String>,
    status: Status,
    operation: OperationKind,
) -> AppError {
    AppError::IllegalStatus {
        app_id: app_id.into(),
        status,
        operation,
    }
}

/// Creates a status conflict error for an update that lost a race after its hook ran
pub fn status_conflict(
    app_id: impl Into<String>,
    expected: Status,
    actual: Status,
    operation: OperationKind,
) -> AppError {
    AppError::StatusConflict {
        app_id: app_id.into(),
        expected,
        actual,
        operation,
    }
}

/// Creates a missing dependency error
pub fn missing_dependency(
    dependency: impl Into<String>,
    dependent: impl Into<String>,
) -> AppError {
    AppError::MissingDependency {
        dependency: dependency.into(),
        dependent: dependent.into(),
    }
}

/// Creates a not executable error
pub fn not_executable(app_type: impl Into<String>) -> AppError {
    AppError::NotExecutable {
        app_type: app_type.into(),
    }
}

/// Creates a backend error
pub fn backend(
    app_id: impl Into<String>,
    operation: OperationKind,
    message: impl Into<String>,
) -> AppError {
    AppError::Backend {
        app_id: app_id.into(),
        operation,
        message: message.into(),
    }
}

/// Creates an invalid argument error
pub fn invalid_argument(message: impl Into<String>) -> AppError {
    AppError::InvalidArgument {
        message: message.into(),
    }
}

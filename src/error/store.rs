//! Persistence errors

use super::AppError;

/// Creates an already installed error
pub fn already_installed(app_id: impl Into<String>) -> AppError {
    AppError::AlreadyInstalled {
        app_id: app_id.into(),
    }
}

/// Creates a duplicate site error
pub fn site_exists(site_id: &str) -> AppError {
    AppError::InvalidArgument {
        message: format!("site '{site_id}' already exists"),
    }
}

/// Creates a store read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppError {
    AppError::StoreReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a store write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> AppError {
    AppError::StoreWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a store lock error
pub fn locked(path: impl Into<String>, reason: impl Into<String>) -> AppError {
    AppError::StoreLocked {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a workspace not found error
pub fn workspace_not_found(path: impl Into<String>) -> AppError {
    AppError::WorkspaceNotFound { path: path.into() }
}

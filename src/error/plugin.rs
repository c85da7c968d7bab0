//! Plugin registry errors

use super::AppError;

/// Creates an unknown plugin error
pub fn not_found(id: impl Into<String>) -> AppError {
    AppError::PluginNotFound { id: id.into() }
}

/// Creates a capability mismatch error
pub fn incompatible(id: impl Into<String>, capability: impl Into<String>) -> AppError {
    AppError::PluginIncompatible {
        id: id.into(),
        capability: capability.into(),
    }
}

/// Creates a plugin constructor failure error
pub fn init_failed(id: impl Into<String>, reason: impl Into<String>) -> AppError {
    AppError::PluginInitFailed {
        id: id.into(),
        reason: reason.into(),
    }
}

//! Command helper utilities

use std::path::PathBuf;

use console::Style;

use appctl::domain::{ApplicationEntity, Status};
use appctl::error::{AppError, Result, store as store_error};
use appctl::runtime::Runtime;
use appctl::workspace::Workspace;

/// Resolve workspace path from optional argument
///
/// If a workspace path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| AppError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

/// Find the workspace enclosing the given path and open it
pub fn open_workspace(workspace: Option<PathBuf>) -> Result<Workspace> {
    let workspace_path = resolve_workspace_path(workspace)?;

    let workspace_root = Workspace::find_from(&workspace_path)
        .ok_or_else(|| store_error::workspace_not_found(workspace_path.display().to_string()))?;

    Workspace::open(&workspace_root)
}

/// Open the workspace and wire a controller for it
pub fn open_runtime(workspace: Option<PathBuf>) -> Result<Runtime> {
    Runtime::open(open_workspace(workspace)?)
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Running => Style::new().green(),
        Status::Starting | Status::Stopping => Style::new().yellow(),
        Status::Initialized => Style::new().cyan(),
        Status::Stopped => Style::new().dim(),
    }
}

/// One-line summary: `APP_ID  STATUS  type@site`
pub fn print_entity_line(entity: &ApplicationEntity) {
    println!(
        "  {}  {}  {}",
        Style::new().bold().yellow().apply_to(&entity.app_id),
        status_style(entity.status).apply_to(entity.status),
        Style::new()
            .dim()
            .apply_to(format!("{}@{}", entity.app_type, entity.site_id)),
    );
}

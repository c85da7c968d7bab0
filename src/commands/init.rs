//! Init command implementation

use std::path::PathBuf;

use console::Style;

use super::helpers::resolve_workspace_path;
use appctl::error::Result;
use appctl::workspace::Workspace;

/// Create the `.appctl` workspace, keeping any files already there
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let existed = Workspace::exists(&root);
    let workspace = Workspace::init(&root)?;

    if existed {
        println!(
            "Workspace already initialized at {}",
            workspace.appctl_dir.display()
        );
    } else {
        println!(
            "{} workspace at {}",
            Style::new().green().bold().apply_to("Initialized"),
            workspace.appctl_dir.display()
        );
        println!(
            "Add provider descriptors to {}",
            workspace.providers_dir().display()
        );
    }

    Ok(())
}

//! Install command implementation

use std::path::PathBuf;
use std::str::FromStr;

use console::Style;

use super::helpers::open_runtime;
use crate::cli::InstallArgs;
use appctl::config::resolver::parse_override;
use appctl::domain::{Configuration, DeployMode};
use appctl::error::{Result, lifecycle as lifecycle_error};
use appctl::lifecycle::InstallOperation;

pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let request = install_operation(args)?;
    let runtime = open_runtime(workspace)?;

    let entity = runtime.controller().install(request)?;
    println!(
        "{} {} on site {} ({})",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().yellow().apply_to(&entity.app_id),
        entity.site_id,
        entity.uuid
    );
    Ok(())
}

/// Turn CLI arguments into an install request
fn install_operation(args: InstallArgs) -> Result<InstallOperation> {
    let mode = DeployMode::from_str(&args.mode)
        .map_err(lifecycle_error::invalid_argument)?;

    let mut request = InstallOperation::new(args.site_id, args.app_type).with_mode(mode);
    if let Some(jar) = args.jar {
        request = request.with_jar_path(jar);
    }

    if !args.set.is_empty() {
        let overrides = args
            .set
            .iter()
            .map(|entry| parse_override(entry))
            .collect::<Result<Configuration>>()?;
        request = request.with_configuration(overrides);
    }

    Ok(request)
}

//! Uninstall, start and stop commands

use std::path::PathBuf;

use console::Style;

use super::helpers::{open_runtime, status_style};
use crate::cli::ApplicationArgs;
use appctl::domain::ApplicationRef;
use appctl::error::Result;

pub fn uninstall(workspace: Option<PathBuf>, args: ApplicationArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;
    let entity = runtime
        .controller()
        .uninstall(&ApplicationRef::parse(&args.application))?;

    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Uninstalled"),
        Style::new().bold().yellow().apply_to(&entity.app_id)
    );
    Ok(())
}

pub fn start(workspace: Option<PathBuf>, args: ApplicationArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;
    let entity = runtime
        .controller()
        .start(&ApplicationRef::parse(&args.application))?;

    println!(
        "{} {} ({})",
        Style::new().green().bold().apply_to("Starting"),
        Style::new().bold().yellow().apply_to(&entity.app_id),
        status_style(entity.status).apply_to(entity.status)
    );
    Ok(())
}

pub fn stop(workspace: Option<PathBuf>, args: ApplicationArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;
    let entity = runtime
        .controller()
        .stop(&ApplicationRef::parse(&args.application))?;

    println!(
        "{} {} ({})",
        Style::new().green().bold().apply_to("Stopping"),
        Style::new().bold().yellow().apply_to(&entity.app_id),
        status_style(entity.status).apply_to(entity.status)
    );
    Ok(())
}

//! Status command implementation
//!
//! Without `--sync` the backend is only queried. With it, the observed
//! status is written back to the stored entity.

use std::path::PathBuf;

use console::Style;

use super::helpers::{open_runtime, print_entity_line, status_style};
use crate::cli::StatusArgs;
use appctl::domain::ApplicationRef;
use appctl::error::{AppError, Result};
use appctl::lifecycle::LifecycleController;

pub fn run(workspace: Option<PathBuf>, args: StatusArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;
    let controller = runtime.controller();

    match (args.application, args.sync) {
        (Some(application), true) => {
            let entity = controller.refresh(&ApplicationRef::parse(&application))?;
            print_entity_line(&entity);
        }
        (Some(application), false) => {
            let reference = ApplicationRef::parse(&application);
            let status = controller.status(&reference)?;
            println!("{}", status_style(status).apply_to(status));
        }
        (None, true) => {
            let refreshed = controller.refresh_all()?;
            if refreshed.is_empty() {
                println!("No executable applications installed.");
            }
            for entity in &refreshed {
                print_entity_line(entity);
            }
        }
        (None, false) => query_all(controller)?,
    }

    Ok(())
}

fn query_all(controller: &LifecycleController) -> Result<()> {
    let entities = controller.entities().list()?;
    if entities.is_empty() {
        println!("No applications installed.");
        return Ok(());
    }

    for entity in &entities {
        let observed = match controller.status(&ApplicationRef::by_uuid(entity.uuid)) {
            Ok(status) => status_style(status).apply_to(status.to_string()),
            Err(AppError::NotExecutable { .. }) => Style::new().dim().apply_to("-".to_string()),
            Err(e) => Style::new().red().apply_to(format!("error: {e}")),
        };
        println!(
            "  {}  {}",
            Style::new().bold().yellow().apply_to(&entity.app_id),
            observed
        );
    }
    Ok(())
}

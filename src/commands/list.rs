//! List command implementation
//!
//! Lists installed applications, or with `--types` the application types
//! the workspace's provider descriptors make available.

use std::path::PathBuf;

use console::Style;

use super::helpers::{open_runtime, print_entity_line};
use crate::cli::ListArgs;
use appctl::error::Result;
use appctl::runtime::Runtime;

pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;

    if args.types {
        list_types(&runtime)
    } else {
        list_applications(&runtime, args.site.as_deref())
    }
}

fn list_applications(runtime: &Runtime, site: Option<&str>) -> Result<()> {
    let entities = runtime.controller().entities();
    let installed = match site {
        Some(site_id) => entities.list_by_site(site_id)?,
        None => entities.list()?,
    };

    if installed.is_empty() {
        println!("No applications installed.");
        return Ok(());
    }

    println!("Installed applications ({}):", installed.len());
    for entity in &installed {
        print_entity_line(entity);
    }
    Ok(())
}

fn list_types(runtime: &Runtime) -> Result<()> {
    let descriptors = runtime.controller().catalog().descriptors();
    if descriptors.is_empty() {
        println!(
            "No application types found in {}",
            runtime.workspace().providers_dir().display()
        );
        return Ok(());
    }

    println!("Application types ({}):", descriptors.len());
    for descriptor in descriptors {
        print!(
            "  {}",
            Style::new().bold().yellow().apply_to(&descriptor.app_type)
        );
        if let Some(version) = &descriptor.version {
            print!(" {}", Style::new().dim().apply_to(version));
        }
        if !descriptor.environment.is_executable() {
            print!(" {}", Style::new().dim().apply_to("(static)"));
        }
        println!();
        if let Some(description) = &descriptor.description {
            println!("    {}", description);
        }
    }
    Ok(())
}

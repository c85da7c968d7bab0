//! Show command implementation

use std::path::PathBuf;

use console::Style;

use super::helpers::{open_runtime, status_style};
use crate::cli::ShowArgs;
use appctl::domain::{ApplicationDescriptor, ApplicationEntity, ApplicationRef};
use appctl::error::{Result, lifecycle as lifecycle_error};

pub fn run(workspace: Option<PathBuf>, args: ShowArgs) -> Result<()> {
    let runtime = open_runtime(workspace)?;
    let controller = runtime.controller();

    if args.descriptor {
        let descriptor = controller
            .catalog()
            .descriptor_for_type(&args.name)
            .ok_or_else(|| lifecycle_error::descriptor_not_found(&args.name))?;
        show_descriptor(descriptor);
        return Ok(());
    }

    let entity = controller
        .entities()
        .find_by_ref(&ApplicationRef::parse(&args.name))?;
    let streams = controller.metadata().streams_for(&entity.app_id)?;
    show_entity(&entity);

    if !streams.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Streams:"));
        for stream in &streams {
            println!("    {}", stream.stream_id);
        }
    }
    Ok(())
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", Style::new().bold().apply_to(label), value);
}

fn show_entity(entity: &ApplicationEntity) {
    println!("{}", Style::new().bold().yellow().apply_to(&entity.app_id));
    field("UUID:", entity.uuid);
    field("Type:", &entity.app_type);
    field("Site:", &entity.site_id);
    field("Mode:", entity.mode);
    field(
        "Status:",
        status_style(entity.status).apply_to(entity.status),
    );
    if let Some(jar_path) = &entity.jar_path {
        field("Jar:", jar_path);
    }

    if !entity.configuration.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Configuration:"));
        for (key, value) in &entity.configuration {
            println!("    {} = {}", key, value);
        }
    }
}

fn show_descriptor(descriptor: &ApplicationDescriptor) {
    println!(
        "{}",
        Style::new().bold().yellow().apply_to(descriptor.display_name())
    );
    field("Type:", &descriptor.app_type);
    if let Some(version) = &descriptor.version {
        field("Version:", version);
    }
    if let Some(description) = &descriptor.description {
        field("Description:", description);
    }
    field("Environment:", descriptor.environment);
    if let Some(jar_path) = &descriptor.jar_path {
        field("Jar:", jar_path);
    }

    if !descriptor.configuration.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Defaults:"));
        for property in &descriptor.configuration {
            println!("    {} = {}", property.name, property.value);
        }
    }

    if !descriptor.dependencies.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Dependencies:"));
        for dependency in &descriptor.dependencies {
            let marker = if dependency.required {
                "required"
            } else {
                "optional"
            };
            println!("    {} ({})", dependency.app_type, marker);
        }
    }

    if !descriptor.streams.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Streams:"));
        for stream in &descriptor.streams {
            println!("    {}", stream.stream_id);
        }
    }
}

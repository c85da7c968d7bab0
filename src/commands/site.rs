//! Site command implementation

use std::path::PathBuf;

use console::Style;

use super::helpers::open_workspace;
use crate::cli::site::AddSiteArgs;
use crate::cli::{SiteArgs, SiteSubcommand};
use appctl::domain::Site;
use appctl::error::Result;
use appctl::store::SiteStore;

pub fn run(workspace: Option<PathBuf>, args: SiteArgs) -> Result<()> {
    let sites = open_workspace(workspace)?.site_store();

    match args.command {
        SiteSubcommand::Add(args) => add(&sites, args),
        SiteSubcommand::List => list(&sites),
    }
}

fn add(sites: &dyn SiteStore, args: AddSiteArgs) -> Result<()> {
    let mut site = Site::new(args.site_id);
    if let Some(name) = args.name {
        site = site.with_name(name);
    }
    if let Some(description) = args.description {
        site = site.with_description(description);
    }

    let site = sites.create(site)?;
    println!(
        "{} site {}",
        Style::new().green().bold().apply_to("Added"),
        Style::new().bold().apply_to(&site.site_id)
    );
    Ok(())
}

fn list(sites: &dyn SiteStore) -> Result<()> {
    let sites = sites.list()?;
    if sites.is_empty() {
        println!("No sites registered.");
        return Ok(());
    }

    println!("Sites ({}):", sites.len());
    for site in &sites {
        print!("  {}", Style::new().bold().yellow().apply_to(&site.site_id));
        if site.display_name() != site.site_id {
            print!("  {}", site.display_name());
        }
        println!();
        if let Some(description) = &site.description {
            println!("    {}", Style::new().dim().apply_to(description));
        }
    }
    Ok(())
}

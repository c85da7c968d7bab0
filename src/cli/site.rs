use clap::{Parser, Subcommand};

/// Arguments for site command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Register a site:\n    appctl site add sandbox --name \"Sandbox cluster\"\n\n\
                  List registered sites:\n    appctl site list")]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteSubcommand,
}

/// Site subcommands
#[derive(Subcommand, Debug)]
pub enum SiteSubcommand {
    /// Register a new site
    Add(AddSiteArgs),

    /// List registered sites
    List,
}

/// Arguments for site add command
#[derive(Parser, Debug)]
pub struct AddSiteArgs {
    /// Site identifier
    pub site_id: String,

    /// Human readable site name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

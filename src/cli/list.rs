use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed applications:\n    appctl list\n\n\
                  Only one site:\n    appctl list --site sandbox\n\n\
                  List installable application types:\n    appctl list --types")]
pub struct ListArgs {
    /// Only show applications installed on this site
    #[arg(long)]
    pub site: Option<String>,

    /// List available application types instead of installed applications
    #[arg(long, conflicts_with = "site")]
    pub types: bool,
}

//! appctl - application lifecycle controller
//!
//! Installs applications on sites from provider descriptors and drives them
//! through start, stop and uninstall over a pluggable execution environment.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "appctl=debug" } else { "appctl=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(cli.workspace),
        Commands::Site(args) => commands::site::run(cli.workspace, args),
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::Uninstall(args) => commands::lifecycle::uninstall(cli.workspace, args),
        Commands::Start(args) => commands::lifecycle::start(cli.workspace, args),
        Commands::Stop(args) => commands::lifecycle::stop(cli.workspace, args),
        Commands::Status(args) => commands::status::run(cli.workspace, args),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Show(args) => commands::show::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

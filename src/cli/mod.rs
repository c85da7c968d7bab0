//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - site: Site registration arguments
//! - install: Install command arguments
//! - lifecycle: Arguments shared by uninstall, start and stop
//! - status: Status command arguments
//! - list: List command arguments
//! - show: Show command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod lifecycle;
pub mod list;
pub mod show;
pub mod site;
pub mod status;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use lifecycle::ApplicationArgs;
pub use list::ListArgs;
pub use show::ShowArgs;
pub use site::{SiteArgs, SiteSubcommand};
pub use status::StatusArgs;

/// appctl - application lifecycle controller
///
/// Install, start, stop and uninstall site-scoped applications.
#[derive(Parser, Debug)]
#[command(
    name = "appctl",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Lifecycle controller for site-scoped applications",
    long_about = "appctl installs applications on sites from provider descriptors and drives \
                  them through start, stop and uninstall. Lifecycle commands are dispatched \
                  to an execution backend over a pluggable stream provider.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  appctl init                              \x1b[90m# Create a workspace here\x1b[0m\n   \
                  appctl site add sandbox                  \x1b[90m# Register a site\x1b[0m\n   \
                  appctl install sandbox HDFS_AUDIT        \x1b[90m# Install an application\x1b[0m\n   \
                  appctl start HDFS_AUDIT_SANDBOX          \x1b[90m# Start it\x1b[0m\n   \
                  appctl status HDFS_AUDIT_SANDBOX --sync  \x1b[90m# Pull the backend status\x1b[0m\n   \
                  appctl list                              \x1b[90m# List installed applications\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "APPCTL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace
    Init,

    /// Manage sites
    Site(SiteArgs),

    /// Install an application on a site
    Install(InstallArgs),

    /// Uninstall an application
    Uninstall(ApplicationArgs),

    /// Start an application
    Start(ApplicationArgs),

    /// Stop an application
    Stop(ApplicationArgs),

    /// Show the backend status of an application
    Status(StatusArgs),

    /// List installed applications or available types
    List(ListArgs),

    /// Show application details
    Show(ShowArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_init() {
        let cli = Cli::try_parse_from(["appctl", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_cli_parsing_site_add() {
        let cli =
            Cli::try_parse_from(["appctl", "site", "add", "sandbox", "--name", "Sandbox"]).unwrap();
        match cli.command {
            Commands::Site(SiteArgs {
                command: SiteSubcommand::Add(args),
            }) => {
                assert_eq!(args.site_id, "sandbox");
                assert_eq!(args.name.as_deref(), Some("Sandbox"));
                assert_eq!(args.description, None);
            }
            _ => panic!("Expected Site add command"),
        }
    }

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from([
            "appctl",
            "install",
            "sandbox",
            "HDFS_AUDIT",
            "--mode",
            "cluster",
            "--jar",
            "/opt/audit.jar",
            "--set",
            "workers=2",
            "--set",
            "name=audit",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.site_id, "sandbox");
                assert_eq!(args.app_type, "HDFS_AUDIT");
                assert_eq!(args.mode, "cluster");
                assert_eq!(args.jar.as_deref(), Some("/opt/audit.jar"));
                assert_eq!(args.set, vec!["workers=2", "name=audit"]);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_defaults() {
        let cli = Cli::try_parse_from(["appctl", "install", "sandbox", "HDFS_AUDIT"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.mode, "local");
                assert!(args.jar.is_none());
                assert!(args.set.is_empty());
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_lifecycle_commands() {
        for name in ["start", "stop", "uninstall"] {
            let cli = Cli::try_parse_from(["appctl", name, "HDFS_AUDIT_SANDBOX"]).unwrap();
            let args = match cli.command {
                Commands::Start(args) | Commands::Stop(args) | Commands::Uninstall(args) => args,
                _ => panic!("Expected lifecycle command"),
            };
            assert_eq!(args.application, "HDFS_AUDIT_SANDBOX");
        }
    }

    #[test]
    fn test_cli_parsing_status() {
        let cli = Cli::try_parse_from(["appctl", "status", "--sync"]).unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert!(args.sync);
                assert_eq!(args.application, None);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["appctl", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from(["appctl", "-v", "-w", "/tmp/workspace", "list"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/workspace")));
    }

    #[test]
    fn test_cli_missing_application_is_error() {
        assert!(Cli::try_parse_from(["appctl", "start"]).is_err());
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["appctl", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }
}

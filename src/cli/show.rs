use clap::Parser;

/// Arguments for show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show an installed application:\n    appctl show HDFS_AUDIT_SANDBOX\n\n\
                  Show an application type:\n    appctl show --type HDFS_AUDIT")]
pub struct ShowArgs {
    /// Application id or uuid, or an application type with --type
    pub name: String,

    /// Treat NAME as an application type and show its descriptor
    #[arg(long = "type")]
    pub descriptor: bool,
}

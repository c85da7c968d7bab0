use clap::Parser;

/// Arguments for status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Ask the backend for one application's status:\n    appctl status HDFS_AUDIT_SANDBOX\n\n\
                  Pull backend status into the workspace for every application:\n    appctl status --sync")]
pub struct StatusArgs {
    /// Application id or uuid; all applications when omitted
    pub application: Option<String>,

    /// Record the observed status on the stored entity
    #[arg(long)]
    pub sync: bool,
}

use clap::Parser;

/// Arguments naming one installed application
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  By application id:\n    appctl start HDFS_AUDIT_SANDBOX\n\n\
                  By uuid:\n    appctl stop 0b7f9c1e-3c52-4a5e-9d36-2f1c5b8e4a71")]
pub struct ApplicationArgs {
    /// Application id or uuid
    pub application: String,
}

use clap::Parser;

/// Arguments for install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install with descriptor defaults:\n    appctl install sandbox HDFS_AUDIT\n\n\
                  Install in cluster mode with a custom artifact:\n    appctl install sandbox HDFS_AUDIT --mode cluster --jar /opt/audit.jar\n\n\
                  Override configuration properties:\n    appctl install sandbox HDFS_AUDIT --set workers=2 --set topic=audit")]
pub struct InstallArgs {
    /// Site to install on
    pub site_id: String,

    /// Application type, as declared by a provider descriptor
    pub app_type: String,

    /// Deployment mode (local, cluster)
    #[arg(long, default_value = "local")]
    pub mode: String,

    /// Artifact path; defaults to the descriptor's jarPath
    #[arg(long)]
    pub jar: Option<String>,

    /// Configuration override as KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

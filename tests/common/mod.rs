//! Common test utilities for appctl integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Dispatch-backed audit monitor with defaults and one stream
pub const AUDIT_DESCRIPTOR: &str = r#"
type: HDFS_AUDIT
name: HDFS Audit Log Monitor
version: 0.5.0
jarPath: lib/hdfs-audit.jar
configuration:
  - name: workers
    value: 1
  - name: topic
    value: hdfs_audit_log
streams:
  - streamId: hdfs_audit_log_stream
"#;

/// Requires HDFS_AUDIT on the same site
pub const ALERT_DESCRIPTOR: &str = r#"
type: HDFS_AUDIT_ALERT
dependencies:
  - type: HDFS_AUDIT
"#;

/// Metadata-only application
pub const TOPOLOGY_DESCRIPTOR: &str = r#"
type: TOPOLOGY_VIEW
environment: static
streams:
  - streamId: topology_stream
"#;

/// A test workspace for integration tests
pub struct TestWorkspace {
    /// Temporary directory holding the workspace and a private config home
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    config_home: PathBuf,
}

impl TestWorkspace {
    /// Create an empty directory; nothing is initialized
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("workspace");
        let config_home = temp.path().join("config");
        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        std::fs::create_dir_all(&config_home).expect("Failed to create config directory");
        Self {
            temp,
            path,
            config_home,
        }
    }

    /// Initialized workspace with the sample descriptors and a `sandbox` site
    pub fn with_sandbox() -> Self {
        let workspace = Self::new();
        workspace.cmd().arg("init").assert().success();
        workspace.write_descriptor("audit.yaml", AUDIT_DESCRIPTOR);
        workspace.write_descriptor("alert.yaml", ALERT_DESCRIPTOR);
        workspace.write_descriptor("topology.yaml", TOPOLOGY_DESCRIPTOR);
        workspace
            .cmd()
            .args(["site", "add", "sandbox"])
            .assert()
            .success();
        workspace
    }

    /// appctl command running inside this workspace, isolated from the host
    pub fn cmd(&self) -> Command {
        let mut cmd = appctl_cmd();
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", self.temp.path())
            .env_remove("APPCTL_WORKSPACE")
            .env_remove("APPCTL_STREAM_PROVIDER")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn appctl_dir(&self) -> PathBuf {
        self.path.join(".appctl")
    }

    pub fn write_descriptor(&self, file: &str, content: &str) {
        write_file(&self.appctl_dir().join("providers").join(file), content);
    }

    /// Read a file relative to `.appctl`
    pub fn read_state(&self, file: &str) -> String {
        std::fs::read_to_string(self.appctl_dir().join(file)).expect("Failed to read file")
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn appctl_cmd() -> Command {
    Command::cargo_bin("appctl").expect("appctl binary")
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

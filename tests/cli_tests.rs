//! CLI integration tests using the real appctl binary

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_version_output() {
    common::appctl_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("appctl"))
        .stdout(predicate::str::contains("Build info"))
        .stdout(predicate::str::contains("memory, file"));
}

#[test]
fn test_init_creates_workspace() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(workspace.appctl_dir().join("providers").is_dir());
    assert!(workspace.read_state("config.yaml").contains("provider: file"));

    workspace
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn test_commands_outside_workspace_fail() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workspace not found"));
}

#[test]
fn test_site_add_and_list() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["site", "add", "prod", "--name", "Production"])
        .assert()
        .success();

    workspace
        .cmd()
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sandbox"))
        .stdout(predicate::str::contains("Production"));

    workspace
        .cmd()
        .args(["site", "add", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_full_lifecycle() {
    let workspace = TestWorkspace::with_sandbox();

    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT", "--set", "workers=4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HDFS_AUDIT_SANDBOX"));

    let applications = workspace.read_state("applications.yaml");
    assert!(applications.contains("status: INITIALIZED"));
    assert!(applications.contains("workers: 4"));
    assert!(applications.contains("topic: hdfs_audit_log"));
    assert!(
        workspace
            .read_state("metadata.yaml")
            .contains("HDFS_AUDIT_LOG_STREAM_SANDBOX")
    );

    workspace
        .cmd()
        .args(["start", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STARTING"));

    // the backend already reports the start, the stored status does not
    workspace
        .cmd()
        .args(["status", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RUNNING"));
    workspace
        .cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STARTING"));

    // stop is only allowed once RUNNING has been recorded
    workspace
        .cmd()
        .args(["stop", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stop operation is not allowed"));

    workspace
        .cmd()
        .args(["status", "--sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RUNNING"));

    workspace
        .cmd()
        .args(["stop", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STOPPING"));

    workspace
        .cmd()
        .args(["status", "HDFS_AUDIT_SANDBOX", "--sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STOPPED"));

    workspace
        .cmd()
        .args(["uninstall", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled"));

    workspace
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No applications installed."));
    assert!(
        !workspace
            .read_state("metadata.yaml")
            .contains("HDFS_AUDIT_LOG_STREAM_SANDBOX")
    );

    let commands = workspace.read_state("streams/application.commands.jsonl");
    for action in ["INSTALL", "START", "STOP", "UNINSTALL"] {
        assert!(commands.contains(action), "missing {action} command");
    }
}

#[test]
fn test_install_on_unknown_site() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "nowhere", "HDFS_AUDIT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Site 'nowhere' not found"));
}

#[test]
fn test_install_unknown_type() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "sandbox", "NOT_A_TYPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'NOT_A_TYPE' not found"));
}

#[test]
fn test_install_twice_fails() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT"])
        .assert()
        .success();
    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already installed"));
}

#[test]
fn test_install_requires_dependency() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT_ALERT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Required dependency 'HDFS_AUDIT' of 'HDFS_AUDIT_ALERT' was not installed",
        ));

    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT"])
        .assert()
        .success();
    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT_ALERT"])
        .assert()
        .success();
}

#[test]
fn test_static_application_cannot_start() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "sandbox", "TOPOLOGY_VIEW"])
        .assert()
        .success();
    workspace
        .cmd()
        .args(["start", "TOPOLOGY_VIEW_SANDBOX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not executable"));
}

#[test]
fn test_start_unknown_application() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["start", "MISSING_SANDBOX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'MISSING_SANDBOX' not found"));
}

#[test]
fn test_invalid_override() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT", "--set", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_list_types_and_show() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["list", "--types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HDFS_AUDIT"))
        .stdout(predicate::str::contains("TOPOLOGY_VIEW"))
        .stdout(predicate::str::contains("(static)"));

    workspace
        .cmd()
        .args(["show", "--type", "HDFS_AUDIT_ALERT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HDFS_AUDIT (required)"));

    workspace
        .cmd()
        .args(["install", "sandbox", "HDFS_AUDIT", "--mode", "cluster"])
        .assert()
        .success();
    workspace
        .cmd()
        .args(["show", "HDFS_AUDIT_SANDBOX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CLUSTER"))
        .stdout(predicate::str::contains("lib/hdfs-audit.jar"))
        .stdout(predicate::str::contains("HDFS_AUDIT_LOG_STREAM_SANDBOX"));
}

#[test]
fn test_list_by_site() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .args(["site", "add", "prod"])
        .assert()
        .success();
    workspace
        .cmd()
        .args(["install", "prod", "HDFS_AUDIT"])
        .assert()
        .success();

    workspace
        .cmd()
        .args(["list", "--site", "sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No applications installed."));
    workspace
        .cmd()
        .args(["list", "--site", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HDFS_AUDIT_PROD"));
}

#[test]
fn test_stream_provider_from_environment() {
    let workspace = TestWorkspace::with_sandbox();
    workspace
        .cmd()
        .env("APPCTL_STREAM_PROVIDER", "kafka")
        .args(["install", "sandbox", "HDFS_AUDIT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin 'kafka'"));
}

#[test]
fn test_completions_output() {
    common::appctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appctl"));
}

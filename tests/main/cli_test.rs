//! CLI contract tests.

use std::path::PathBuf;

use assert_cmd::Command;

fn bridge(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("telegram-bridge").expect("binary should build");
    cmd.current_dir(dir.path());
    cmd
}

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[telegram]
bot_token_env = "BRIDGE_CLI_TEST_TOKEN"
channel = "vpn"
"#,
    )
    .expect("should write config");
    path
}

#[test]
fn help_lists_subcommands() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let output = bridge(&tmp).arg("--help").output().expect("should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start"));
    assert!(stdout.contains("check"));
}

#[test]
fn check_reports_valid_config() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = write_config(&tmp);
    let output = bridge(&tmp)
        .arg("check")
        .arg("--config")
        .arg(&config)
        .env("BRIDGE_CLI_TEST_TOKEN", "123:abc")
        .output()
        .expect("should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("channel: vpn"));
    assert!(stdout.contains("BRIDGE_CLI_TEST_TOKEN"));
    assert!(!stdout.contains("123:abc"), "token must not be printed");
}

#[test]
fn check_fails_without_token() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = write_config(&tmp);
    let output = bridge(&tmp)
        .arg("check")
        .arg("--config")
        .arg(&config)
        .env_remove("BRIDGE_CLI_TEST_TOKEN")
        .output()
        .expect("should run");
    assert!(!output.status.success());
}

#[test]
fn check_fails_on_missing_config() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let output = bridge(&tmp)
        .arg("check")
        .arg("--config")
        .arg(tmp.path().join("nope.toml"))
        .output()
        .expect("should run");
    assert!(!output.status.success());
}

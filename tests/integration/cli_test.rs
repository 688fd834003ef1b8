//! End-to-end runs of the embedded-mysql binary against the fake client.

#![cfg(unix)]

use super::FakeInstallation;
use std::process::{Command, Output};

fn run_cli(fake: &FakeInstallation, args: &[&str]) -> Output {
    let config = fake.base_dir().join("no-config.toml");
    Command::new(env!("CARGO_BIN_EXE_embedded-mysql"))
        .arg("--config")
        .arg(&config)
        .arg("--base-dir")
        .arg(fake.base_dir())
        .arg("--socket")
        .arg(fake.sock_file())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_cli_prints_text_results() {
    let fake = FakeInstallation::new();

    let output = run_cli(&fake, &["--schema", "app", "select 1", "select 2"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "select 1\nselect 2\n");
    assert!(fake.args()[0].ends_with("--port=3310 app"));
}

#[test]
fn test_cli_runs_scripts_before_statements_as_json() {
    let fake = FakeInstallation::new();
    let script = fake.base_dir().join("seed.sql");
    std::fs::write(&script, "create table t (id int);").unwrap();

    let output = run_cli(
        &fake,
        &["--output", "json", "--script", script.to_str().unwrap(), "select 1"],
    );

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["source"], script.display().to_string());
    assert_eq!(entries[0]["output"], "create table t (id int);\n");
    assert_eq!(entries[1]["source"], "select 1");
    assert_eq!(fake.calls(), vec!["create table t (id int);", "select 1"]);
}

#[test]
fn test_cli_exits_nonzero_on_failure() {
    let fake = FakeInstallation::new();

    let output = run_cli(&fake, &["select invalid", "select 2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("select invalid"));
    assert_eq!(fake.calls(), vec!["select invalid"]);
}

//! Client executor tests against the fake mysql client.

#![cfg(unix)]

use super::FakeInstallation;
use embedded_mysql::config::{Charset, ServerConfig, Version};
use embedded_mysql::error::{FailureReason, MysqlError};
use embedded_mysql::script::Sources;
use embedded_mysql::server::Installation;
use embedded_mysql::{MysqlClient, Platform};
use pretty_assertions::assert_eq;
use std::fs;

fn config(fake: &FakeInstallation) -> ServerConfig {
    let config = ServerConfig::builder(Version::new(8, 0, 33))
        .with_port(3311)
        .build()
        .unwrap();
    config.assign_sock_file(fake.sock_file()).unwrap();
    config
}

#[test]
fn test_execute_returns_client_stdout() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);

    let results = client.execute_commands(&["select 1"]).unwrap();

    assert_eq!(results, vec!["select 1\n"]);
}

#[test]
fn test_unix_invocation_uses_socket_transport() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::new(&config, &server, "app", Charset::LATIN1);

    client.execute("select 1").unwrap();

    assert_eq!(
        fake.args(),
        vec![format!(
            "--protocol=socket -S {} --password= --default-character-set=latin1 --user=root --port=3311 app",
            fake.sock_file().display()
        )]
    );
}

#[test]
fn test_windows_invocation_uses_tcp_and_quotes_command() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server).with_platform(Platform::Windows);

    client.execute("select 1").unwrap();
    let err = client.execute("select invalid").unwrap_err();

    assert_eq!(
        fake.args()[0],
        "--protocol=tcp --host=localhost --password= --default-character-set=utf8mb4 --user=root --port=3311 information_schema"
    );
    assert_eq!(err.as_command_failure().unwrap().command, "\"select invalid\"");
}

#[test]
fn test_multibyte_sql_reaches_client_unchanged() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);
    let sql = "select 'Grüße', '日本語', '😀'";

    let output = client.execute(sql).unwrap();

    assert_eq!(output, format!("{sql}\n"));
    assert_eq!(fake.calls(), vec![sql]);
}

#[test]
fn test_first_failure_aborts_batch() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);

    let err = client
        .execute_commands(&["select 1", "select invalid", "select 3"])
        .unwrap_err();

    let failure = err.as_command_failure().unwrap();
    assert_eq!(failure.command, "select invalid");
    assert_eq!(failure.schema, "information_schema");
    assert_eq!(failure.exit_code(), Some(1));
    assert!(failure.output.contains("ERROR 1064"));
    assert_eq!(fake.calls(), vec!["select 1", "select invalid"]);
}

#[test]
fn test_large_input_and_output_are_captured_completely() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);
    let sql = format!("select 'bulk', '{}'", "x".repeat(3_000_000));

    let output = client.execute(&sql).unwrap();

    assert_eq!(output.len(), 5_000_000);
    assert!(output.bytes().all(|b| b == b'o'));
    assert_eq!(fake.calls(), vec![sql]);
}

#[test]
fn test_large_error_output_is_captured_completely() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);

    let err = client.execute("select 'bulk-fail'").unwrap_err();

    let failure = err.as_command_failure().unwrap();
    assert_eq!(failure.exit_code(), Some(1));
    assert_eq!(failure.output.len(), 3_000_000);
}

#[test]
fn test_exit_code_is_reported() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_schema(&config, &server, "app");

    let err = client.execute("select exit42").unwrap_err();

    let failure = err.as_command_failure().unwrap();
    assert_eq!(failure.reason, FailureReason::ExitCode(42));
    assert_eq!(failure.output, "");
    assert!(err.to_string().contains("'select exit42'"));
    assert!(err.to_string().contains("'app'"));
}

#[test]
fn test_stdout_is_used_when_stderr_is_empty() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);

    let err = client.execute("select stdout-only").unwrap_err();

    let failure = err.as_command_failure().unwrap();
    assert_eq!(failure.exit_code(), Some(2));
    assert_eq!(failure.output, "diagnostic on stdout\n");
}

#[test]
fn test_scripts_run_in_order() {
    let fake = FakeInstallation::new();
    let scripts = tempfile::tempdir().unwrap();
    fs::write(scripts.path().join("02_data.sql"), "insert into t values (1);").unwrap();
    fs::write(scripts.path().join("01_schema.sql"), "create table t (id int);").unwrap();
    fs::write(scripts.path().join("notes.txt"), "not sql").unwrap();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_schema(&config, &server, "app");

    let sources = Sources::from_dir(scripts.path()).unwrap();
    let results = client.execute_scripts(&sources).unwrap();

    assert_eq!(
        results,
        vec!["create table t (id int);\n", "insert into t values (1);\n"]
    );
}

#[test]
fn test_unreadable_script_aborts_before_invocation() {
    let fake = FakeInstallation::new();
    let config = config(&fake);
    let server = Installation::new(fake.base_dir());
    let client = MysqlClient::for_system_schema(&config, &server);

    let err = client
        .execute_scripts(&[Sources::from_file(fake.base_dir().join("missing.sql"))])
        .unwrap_err();

    assert!(matches!(err, MysqlError::Script(_)));
    assert!(err.to_string().contains("missing.sql"));
    assert!(fake.calls().is_empty());
}

#[test]
fn test_generated_sock_file_is_passed_to_client() {
    let fake = FakeInstallation::new();
    let config = ServerConfig::builder(Version::new(8, 0, 33)).build().unwrap();
    let sock_file = config.generate_sock_file().unwrap();
    let server = Installation::new(fake.base_dir());

    MysqlClient::for_system_schema(&config, &server)
        .execute("select 1")
        .unwrap();

    assert!(fake.args()[0].contains(&format!("-S {}", sock_file.display())));
}

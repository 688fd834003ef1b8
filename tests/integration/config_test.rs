//! Settings file to server configuration.

use embedded_mysql::config::{Charset, Settings, TimeUnit, TimeZone, Version};
use embedded_mysql::error::MysqlError;
use std::fs;

#[test]
fn test_settings_file_builds_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
version = "5.7.19"
port = 3320
charset = "latin1"
timezone = "Europe/Vilnius"
timeout = "1m 30s"
temp_dir = "/var/tmp/mysql-it"

[server.user]
name = "tester"
password = "secret"

[[server.variables]]
name = "max_connect_errors"
value = 666

[[server.variables]]
name = "skip_name_resolve"
value = true

[client]
base_dir = "/opt/mysql-5.7"
schema = "app"
"#,
    )
    .unwrap();

    let settings = Settings::load_from_file(&path).unwrap();
    let config = settings.server.to_builder().unwrap().build().unwrap();

    assert_eq!(config.version(), Version::new(5, 7, 19));
    assert_eq!(config.port(), 3320);
    assert_eq!(config.charset(), &Charset::LATIN1);
    assert_eq!(config.time_zone(), &TimeZone::Named(chrono_tz::Europe::Vilnius));
    assert_eq!(config.timeout_in(TimeUnit::Seconds), 90);
    assert_eq!(config.username(), "tester");
    assert_eq!(config.password(), "secret");
    let flags: Vec<_> = config
        .server_variables()
        .iter()
        .map(|v| v.to_command_line_argument())
        .collect();
    assert_eq!(
        flags,
        vec!["--max_connect_errors=666", "--skip_name_resolve=true"]
    );
    assert_eq!(settings.client.schema, "app");
}

#[test]
fn test_settings_file_with_root_user_is_rejected_at_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server.user]\nname = \"root\"\npassword = \"\"\n").unwrap();

    let settings = Settings::load_from_file(&path).unwrap();
    let err = settings.server.to_builder().unwrap().build().unwrap_err();

    assert!(matches!(err, MysqlError::InvalidConfiguration(_)));
    assert!(err
        .to_string()
        .contains("Usage of username 'root' is forbidden"));
}

#[test]
fn test_missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let settings = Settings::load_from_file(&dir.path().join("absent.toml")).unwrap();
    let config = settings.server.to_builder().unwrap().build().unwrap();

    assert_eq!(config.port(), 3310);
    assert_eq!(config.username(), "auser");
    assert_eq!(config.time_zone(), &TimeZone::Utc);
    assert_eq!(settings.client.schema, "information_schema");
}

#[test]
fn test_sock_file_is_generated_once() {
    let config = embedded_mysql::ServerConfig::builder(Version::new(8, 0, 33))
        .build()
        .unwrap();
    assert_eq!(config.sock_file(), None);

    let first = config.generate_sock_file().unwrap();
    let second = config.generate_sock_file().unwrap();

    assert_eq!(first, second);
    assert_eq!(config.sock_file(), Some(first.clone()));
    assert!(first.to_string_lossy().ends_with(".sock"));
    assert!(config.clone().sock_file().is_some());
}

//! Tests against a real MySQL distribution.
//!
//! Skipped unless EMBEDDED_MYSQL_BASE_DIR points at an extracted distribution
//! with `bin/mysqld` and `bin/mysql`.

use embedded_mysql::config::{ServerConfig, TimeUnit, Version};
use embedded_mysql::script::Sources;
use embedded_mysql::server::Installation;
use embedded_mysql::{EmbeddedMysql, MysqlClient, SchemaConfig};
use std::fs;
use tempfile::TempDir;

fn installation() -> Option<Installation> {
    let base_dir = std::env::var("EMBEDDED_MYSQL_BASE_DIR").ok()?;
    Installation::open(base_dir).ok()
}

fn start() -> Option<(TempDir, EmbeddedMysql)> {
    let installation = installation()?;
    let temp_dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::builder(Version::new(8, 0, 33))
        .with_free_port()
        .unwrap()
        .with_timeout(60, TimeUnit::Seconds)
        .with_temp_dir(temp_dir.path())
        .build()
        .unwrap();
    let mysql = EmbeddedMysql::start(config, installation).unwrap();
    Some((temp_dir, mysql))
}

#[test]
fn test_select_one_on_system_schema() {
    let Some((_dir, mysql)) = start() else {
        eprintln!("Skipping test: EMBEDDED_MYSQL_BASE_DIR not set");
        return;
    };

    let results = mysql
        .execute_commands("information_schema", &["select 1"])
        .unwrap();

    assert_eq!(results, vec!["1\n1\n"]);
    mysql.stop();
}

#[test]
fn test_schema_lifecycle() {
    let Some((_dir, mysql)) = start() else {
        eprintln!("Skipping test: EMBEDDED_MYSQL_BASE_DIR not set");
        return;
    };
    let scripts = tempfile::tempdir().unwrap();
    fs::write(
        scripts.path().join("01_schema.sql"),
        "create table users (id int primary key, name varchar(64));",
    )
    .unwrap();
    fs::write(
        scripts.path().join("02_data.sql"),
        "insert into users values (1, 'Grüße');",
    )
    .unwrap();
    let schema = SchemaConfig::new("app")
        .with_scripts(Sources::from_dir(scripts.path()).unwrap());

    mysql.add_schema(&schema).unwrap();
    mysql
        .execute_commands("app", &["insert into users values (2, 'b')"])
        .unwrap();
    mysql.reload_schema(&schema).unwrap();
    let results = mysql
        .execute_commands("app", &["select name from users order by id"])
        .unwrap();

    assert_eq!(results, vec!["name\nGrüße\n"]);

    mysql.drop_schema("app").unwrap();
    let err = mysql
        .execute_commands("app", &["select 1"])
        .unwrap_err();
    assert!(err.as_command_failure().unwrap().exit_code().is_some());
}

#[test]
fn test_failing_statement_reports_server_error() {
    let Some((_dir, mysql)) = start() else {
        eprintln!("Skipping test: EMBEDDED_MYSQL_BASE_DIR not set");
        return;
    };
    let server = Installation::new(mysql.base_dir());
    let client = MysqlClient::for_system_schema(mysql.config(), &server);

    let err = client
        .execute_commands(&["select 1", "select bogus_column", "select 3"])
        .unwrap_err();

    let failure = err.as_command_failure().unwrap();
    assert_eq!(failure.command, "select bogus_column");
    assert_eq!(failure.exit_code(), Some(1));
    assert!(failure.output.contains("bogus_column"));
}

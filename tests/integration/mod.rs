//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod cli_test;
pub mod client_test;
pub mod config_test;
pub mod mysql_test;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stands in for `bin/mysql`: logs its arguments and stdin, then echoes
/// stdin back. Inputs containing marker words fail in different ways or
/// produce several megabytes of output.
const FAKE_MYSQL: &str = r#"#!/bin/sh
base="$(dirname "$0")/.."
input="$(cat)"
printf '%s\n' "$*" >> "$base/args.log"
printf '%s\n' "$input" >> "$base/calls.log"
case "$input" in
  *bulk-fail*) head -c 3000000 /dev/zero | tr '\0' 'e' >&2; exit 1 ;;
  *bulk*)
    head -c 5000000 /dev/zero | tr '\0' 'o'
    head -c 3000000 /dev/zero | tr '\0' 'e' >&2
    exit 0 ;;
  *invalid*) echo "ERROR 1064 (42000): You have an error in your SQL syntax" >&2; exit 1 ;;
  *exit42*) exit 42 ;;
  *stdout-only*) echo "diagnostic on stdout"; exit 2 ;;
esac
printf '%s\n' "$input"
"#;

/// A temporary installation whose client is [`FAKE_MYSQL`].
pub struct FakeInstallation {
    dir: TempDir,
}

impl FakeInstallation {
    #[cfg(unix)]
    pub fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let mysql = bin.join("mysql");
        fs::write(&mysql, FAKE_MYSQL).unwrap();
        fs::set_permissions(&mysql, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir }
    }

    pub fn base_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn sock_file(&self) -> PathBuf {
        self.dir.path().join("mysql.sock")
    }

    /// Argument lines, one per client invocation.
    pub fn args(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("args.log"))
    }

    /// Everything the client received on stdin, one entry per line.
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("calls.log"))
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|text| text.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

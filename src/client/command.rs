//! Client command-line construction.
//!
//! Building the argument list is a pure function of the platform and the
//! connection coordinates, so both transports can be checked without
//! spawning anything.

use crate::config::{Charset, SystemDefaults};
use crate::platform::Platform;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Connection coordinates of one client invocation.
#[derive(Debug, Clone, Copy)]
pub struct ClientTarget<'a> {
    /// Installation directory containing `bin/mysql`.
    pub base_dir: &'a Path,
    /// Socket file; required on Unix, ignored on Windows.
    pub sock_file: Option<&'a Path>,
    pub charset: &'a Charset,
    pub port: u16,
    pub schema: &'a str,
}

/// Fully resolved mysql client command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ClientCommand {
    /// Builds the command line for `platform`.
    ///
    /// Returns `None` on Unix when no socket file is known.
    pub fn build(platform: Platform, target: &ClientTarget<'_>) -> Option<Self> {
        let mut args = match platform {
            Platform::Windows => vec![
                "--protocol=tcp".to_string(),
                "--host=localhost".to_string(),
            ],
            Platform::Unix => vec![
                "--protocol=socket".to_string(),
                "-S".to_string(),
                target.sock_file?.display().to_string(),
            ],
        };
        args.extend([
            "--password=".to_string(),
            format!("--default-character-set={}", target.charset.charset()),
            format!("--user={}", SystemDefaults::USERNAME),
            format!("--port={}", target.port),
            target.schema.to_string(),
        ]);

        Some(Self {
            program: client_program(target.base_dir),
            args,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Creates a process builder for this command line, without any redirection.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Path of the client binary inside an installation.
pub fn client_program(base_dir: &Path) -> PathBuf {
    base_dir.join("bin").join("mysql")
}

/// The SQL as it appears in failure reports: double-quoted as a whole on Windows.
pub fn reported_command(platform: Platform, sql: &str) -> String {
    match platform {
        Platform::Windows => format!("\"{sql}\""),
        Platform::Unix => sql.to_string(),
    }
}

//! Error types for embedded-mysql.
//!
//! Defines the main error enum used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Main error type for embedded-mysql operations.
#[derive(Error, Debug)]
pub enum MysqlError {
    /// A configuration invariant was violated at build time (reserved username, bad timezone).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The mysql client exited nonzero, or could not be spawned or awaited.
    #[error("{0}")]
    CommandFailed(Box<CommandFailure>),

    /// A script source could not be read.
    #[error("Script error: {0}")]
    Script(String),

    /// The mysqld process could not be initialized, started or reached.
    #[error("Server error: {0}")]
    Server(String),

    /// Settings errors (unreadable or invalid settings file, port allocation).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MysqlError {
    /// Creates an invalid configuration error with the given message.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a script error with the given message.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Creates a server error with the given message.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the command failure details, if this is a command failure.
    pub fn as_command_failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::CommandFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "Invalid Configuration",
            Self::CommandFailed(_) => "Command Failed",
            Self::Script(_) => "Script Error",
            Self::Server(_) => "Server Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

impl From<CommandFailure> for MysqlError {
    fn from(failure: CommandFailure) -> Self {
        Self::CommandFailed(Box::new(failure))
    }
}

/// Why a client invocation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The client ran and exited with this nonzero code.
    ExitCode(i32),
    /// The client could not be run to completion (spawn, wait or I/O failure).
    Message(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitCode(code) => write!(f, "exit code {code}"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

/// Everything needed to reproduce and diagnose a failed client invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// The SQL command as reported (quoted as a whole on Windows).
    pub command: String,
    /// Schema the command ran against.
    pub schema: String,
    /// Rendered client command line.
    pub invocation: String,
    /// Exit code or failure message.
    pub reason: FailureReason,
    /// Captured diagnostic text: stderr, or stdout when stderr was empty.
    pub output: String,
}

impl CommandFailure {
    /// Returns the client's exit code when it ran and exited nonzero.
    pub fn exit_code(&self) -> Option<i32> {
        match self.reason {
            FailureReason::ExitCode(code) => Some(code),
            FailureReason::Message(_) => None,
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command '{}' on schema '{}' failed with {}",
            self.command, self.schema, self.reason
        )?;
        let output = self.output.trim_end();
        if !output.is_empty() {
            write!(f, ": {output}")?;
        }
        Ok(())
    }
}

/// Result type alias using MysqlError.
pub type Result<T> = std::result::Result<T, MysqlError>;

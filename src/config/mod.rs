//! Server configuration model.
//!
//! A [`ServerConfig`] describes how mysqld is started and how clients reach
//! it. It is produced once by [`ServerConfigBuilder::build`], which is the only
//! place invariants are checked, and is read-only afterwards except for the
//! sock-file slot.

mod builder;
mod charset;
pub mod file;
mod sock_file;
mod timeout;
mod timezone;
mod variable;
mod version;

pub use builder::ServerConfigBuilder;
pub use charset::Charset;
pub use file::{ClientSettings, ServerSettings, Settings, UserSettings};
pub use sock_file::SockFileSlot;
pub use timeout::{TimeUnit, Timeout};
pub use timezone::TimeZone;
pub use variable::{ServerVariable, VariableValue};
pub use version::Version;

use crate::error::{MysqlError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Fixed names used by the server itself.
pub struct SystemDefaults;

impl SystemDefaults {
    /// Administrative user the client connects as; reserved for system use.
    pub const USERNAME: &'static str = "root";
    /// Schema that always exists on a fresh server.
    pub const SCHEMA: &'static str = "information_schema";
}

/// Application user created on the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("auser", "sa")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Immutable description of a server instance.
pub struct ServerConfig {
    version: Version,
    port: u16,
    charset: Charset,
    credentials: Credentials,
    time_zone: TimeZone,
    timeout: Timeout,
    server_variables: Vec<ServerVariable>,
    temp_dir: PathBuf,
    sock_file: Mutex<SockFileSlot>,
}

impl ServerConfig {
    /// Starts building a configuration for the given distribution version.
    pub fn builder(version: Version) -> ServerConfigBuilder {
        ServerConfigBuilder::new(version)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// Returns the startup timeout expressed in `target` units.
    pub fn timeout_in(&self, target: TimeUnit) -> u64 {
        self.timeout.to(target)
    }

    /// Server variables in the order they were added, duplicates included.
    pub fn server_variables(&self) -> &[ServerVariable] {
        &self.server_variables
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Generates the socket file on first call and returns the same path afterwards.
    ///
    /// The file is created in the system temp directory, never under
    /// [`temp_dir`](Self::temp_dir), and is removed on a best-effort basis
    /// when the process exits.
    pub fn generate_sock_file(&self) -> Result<PathBuf> {
        let path = self.slot().get_or_generate().map_err(|e| {
            MysqlError::config(format!("Failed to create socket file: {e}"))
        })?;
        debug!("Using socket file {}", path.display());
        Ok(path)
    }

    /// Returns the socket file path, if one has been generated or assigned.
    pub fn sock_file(&self) -> Option<PathBuf> {
        self.slot().path().map(Path::to_path_buf)
    }

    /// Assigns a known socket path (e.g. of an already running server).
    ///
    /// Fails if a path was already generated or assigned.
    pub fn assign_sock_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.slot().assign(path.into()).map_err(|existing| {
            MysqlError::invalid_configuration(format!(
                "Socket file already set to {}",
                existing.display()
            ))
        })
    }

    fn slot(&self) -> MutexGuard<'_, SockFileSlot> {
        // The slot holds plain data; a panic elsewhere cannot leave it half-written.
        self.sock_file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for ServerConfig {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            port: self.port,
            charset: self.charset.clone(),
            credentials: self.credentials.clone(),
            time_zone: self.time_zone.clone(),
            timeout: self.timeout,
            server_variables: self.server_variables.clone(),
            temp_dir: self.temp_dir.clone(),
            sock_file: Mutex::new(self.slot().clone()),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("version", &self.version)
            .field("port", &self.port)
            .field("charset", &self.charset)
            .field("username", &self.credentials.username())
            .field("time_zone", &self.time_zone)
            .field("timeout", &self.timeout)
            .field("server_variables", &self.server_variables)
            .field("temp_dir", &self.temp_dir)
            .field("sock_file", &*self.slot())
            .finish()
    }
}

//! TOML settings file.
//!
//! Example:
//! ```toml
//! [server]
//! version = "8.0.33"
//! port = 3310
//! charset = "utf8mb4"
//! timezone = "UTC"
//! timeout = "30s"
//!
//! [server.user]
//! name = "auser"
//! password = "sa"
//!
//! [[server.variables]]
//! name = "max_connections"
//! value = 300
//!
//! [client]
//! base_dir = "/opt/mysql-8.0"
//! schema = "information_schema"
//! ```

use super::{
    Charset, ServerConfigBuilder, ServerVariable, SystemDefaults, TimeUnit, Timeout, Version,
};
use crate::error::{MysqlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root of the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSettings,

    /// Where the client binary lives and what it talks to.
    #[serde(default)]
    pub client: ClientSettings,
}

/// `[server]` table; every key is optional and falls back to the builder default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_version")]
    pub version: Version,

    pub port: Option<u16>,

    /// Allocate a free port when the settings are turned into a builder.
    #[serde(default)]
    pub free_port: bool,

    pub charset: Option<String>,

    pub collation: Option<String>,

    pub timezone: Option<String>,

    /// Startup timeout in humantime format, e.g. `30s` or `2m`.
    pub timeout: Option<String>,

    pub temp_dir: Option<PathBuf>,

    pub user: Option<UserSettings>,

    #[serde(default)]
    pub variables: Vec<ServerVariable>,
}

fn default_version() -> Version {
    Version::new(8, 0, 33)
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            port: None,
            free_port: false,
            charset: None,
            collation: None,
            timezone: None,
            timeout: None,
            temp_dir: None,
            user: None,
            variables: Vec::new(),
        }
    }
}

/// `[server.user]` table.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for UserSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSettings")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// `[client]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Installation directory containing `bin/mysql`.
    pub base_dir: Option<PathBuf>,

    /// Schema commands run against.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Socket of an already running server.
    pub socket: Option<PathBuf>,
}

fn default_schema() -> String {
    SystemDefaults::SCHEMA.to_string()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            schema: default_schema(),
            socket: None,
        }
    }
}

impl ServerSettings {
    /// Resolves the configured charset, if any.
    pub fn resolved_charset(&self) -> Result<Option<Charset>> {
        match (&self.charset, &self.collation) {
            (Some(charset), Some(collation)) => Ok(Some(Charset::new(charset, collation))),
            (Some(charset), None) => Charset::from_name(charset).map(Some),
            (None, Some(collation)) => Err(MysqlError::config(format!(
                "Collation '{collation}' given without a charset"
            ))),
            (None, None) => Ok(None),
        }
    }

    /// Parses the configured timeout, if any.
    pub fn resolved_timeout(&self) -> Result<Option<Timeout>> {
        self.timeout
            .as_deref()
            .map(|raw| {
                humantime::parse_duration(raw)
                    .map(Timeout::from)
                    .map_err(|e| MysqlError::config(format!("Invalid timeout '{raw}': {e}")))
            })
            .transpose()
    }

    /// Converts the settings into a builder; `build()` still performs validation.
    pub fn to_builder(&self) -> Result<ServerConfigBuilder> {
        let mut builder = ServerConfigBuilder::new(self.version);

        if let Some(port) = self.port {
            builder = builder.with_port(port);
        }
        if self.free_port {
            builder = builder.with_free_port()?;
        }
        if let Some(charset) = self.resolved_charset()? {
            builder = builder.with_charset(charset);
        }
        if let Some(timezone) = &self.timezone {
            builder = builder.with_time_zone(timezone.clone());
        }
        if let Some(timeout) = self.resolved_timeout()? {
            builder = builder.with_timeout(timeout.to(TimeUnit::Milliseconds), TimeUnit::Milliseconds);
        }
        if let Some(temp_dir) = &self.temp_dir {
            builder = builder.with_temp_dir(temp_dir.clone());
        }
        if let Some(user) = &self.user {
            builder = builder.with_user(user.name.clone(), user.password.clone());
        }
        for variable in &self.variables {
            builder = builder.with_server_variable(variable.name(), variable.value().clone());
        }

        Ok(builder)
    }
}

impl Settings {
    /// Returns the default settings file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("embedded-mysql")
            .join("config.toml")
    }

    /// Loads settings from a TOML file; a missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MysqlError::config(format!("Failed to read settings file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            MysqlError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

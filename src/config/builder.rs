//! Fluent builder for [`ServerConfig`].

use super::{
    Charset, Credentials, ServerConfig, ServerVariable, SockFileSlot, SystemDefaults, TimeUnit,
    TimeZone, Timeout, VariableValue, Version,
};
use crate::error::{MysqlError, Result};
use std::net::{Ipv4Addr, TcpListener};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

const DEFAULT_PORT: u16 = 3310;
const DEFAULT_TEMP_DIR: &str = "target/";

/// Accumulates options for a [`ServerConfig`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    version: Version,
    port: u16,
    charset: Charset,
    credentials: Credentials,
    time_zone: String,
    timeout: Timeout,
    server_variables: Vec<ServerVariable>,
    temp_dir: PathBuf,
}

impl ServerConfigBuilder {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            port: DEFAULT_PORT,
            charset: Charset::defaults(),
            credentials: Credentials::default(),
            time_zone: "UTC".to_string(),
            timeout: Timeout::default(),
            server_variables: Vec::new(),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Picks a currently free port and locks it into the configuration.
    ///
    /// The port is released again before this returns, so another process may
    /// grab it before mysqld binds. That window is not guarded against.
    pub fn with_free_port(self) -> Result<Self> {
        let port = {
            let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
                .map_err(|e| MysqlError::config(format!("Failed to allocate a free port: {e}")))?;
            listener
                .local_addr()
                .map_err(|e| MysqlError::config(format!("Failed to allocate a free port: {e}")))?
                .port()
        };
        debug!("Allocated free port {port}");
        Ok(self.with_port(port))
    }

    pub fn with_timeout(mut self, length: u64, unit: TimeUnit) -> Self {
        self.timeout = Timeout::new(length, unit);
        self
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the application user. `root` is rejected by [`build`](Self::build).
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    /// Sets the server timezone from an id such as `UTC`, `+08:00` or `Asia/Shanghai`.
    pub fn with_time_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.time_zone = zone_id.into();
        self
    }

    /// Adds a mysqld option. Repeated names are kept and emitted in order.
    pub fn with_server_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<VariableValue>,
    ) -> Self {
        self.server_variables.push(ServerVariable::new(name, value));
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Validates the options and produces the immutable configuration.
    pub fn build(self) -> Result<ServerConfig> {
        if self.credentials.username() == SystemDefaults::USERNAME {
            return Err(MysqlError::invalid_configuration(format!(
                "Usage of username '{}' is forbidden as it's reserved for system use",
                SystemDefaults::USERNAME
            )));
        }
        let time_zone = TimeZone::parse(&self.time_zone)?;

        Ok(ServerConfig {
            version: self.version,
            port: self.port,
            charset: self.charset,
            credentials: self.credentials,
            time_zone,
            timeout: self.timeout,
            server_variables: self.server_variables,
            temp_dir: self.temp_dir,
            sock_file: Mutex::new(SockFileSlot::Unset),
        })
    }
}

//! mysqld command lines derived from a [`ServerConfig`].

use crate::config::ServerConfig;
use crate::platform::Platform;
use std::path::Path;

/// Renders mysqld arguments for one configuration and data directory.
#[derive(Debug, Clone)]
pub struct MysqldArgs<'a> {
    config: &'a ServerConfig,
    base_dir: &'a Path,
    data_dir: &'a Path,
    platform: Platform,
    run_as: Option<String>,
}

impl<'a> MysqldArgs<'a> {
    pub fn new(config: &'a ServerConfig, base_dir: &'a Path, data_dir: &'a Path) -> Self {
        Self {
            config,
            base_dir,
            data_dir,
            platform: Platform::detect(),
            run_as: None,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Adds `--user=<user>`; mysqld refuses to run as the OS root user without it.
    pub fn with_run_as(mut self, user: impl Into<String>) -> Self {
        self.run_as = Some(user.into());
        self
    }

    fn with_dirs(&self, mut args: Vec<String>) -> Vec<String> {
        args.extend([
            format!("--basedir={}", self.base_dir.display()),
            format!("--datadir={}", self.data_dir.display()),
        ]);
        if let Some(user) = &self.run_as {
            args.push(format!("--user={user}"));
        }
        args
    }

    /// Arguments that create an empty data directory with a password-less root.
    pub fn initialize(&self) -> Vec<String> {
        let mut args = self.with_dirs(vec!["--no-defaults".to_string()]);
        args.push("--initialize-insecure".to_string());
        args
    }

    /// Arguments that start the server.
    ///
    /// Server variables come last, in configuration order, so they can
    /// override anything rendered before them.
    pub fn startup(&self) -> Vec<String> {
        let config = self.config;
        let mut args = self.with_dirs(vec![
            "--no-defaults".to_string(),
            "--log-output=NONE".to_string(),
        ]);
        args.push(format!("--tmpdir={}", config.temp_dir().display()));
        args.push(format!("--port={}", config.port()));
        if self.platform.uses_sock_file() {
            if let Some(sock_file) = config.sock_file() {
                args.push(format!("--socket={}", sock_file.display()));
            }
        }
        args.push(format!("--character-set-server={}", config.charset().charset()));
        args.push(format!("--collation-server={}", config.charset().collate()));
        args.push(format!("--default-time-zone={}", config.time_zone().server_value()));
        args.extend(
            config
                .server_variables()
                .iter()
                .map(|variable| variable.to_command_line_argument()),
        );
        args
    }
}

//! A mysqld child process owned by this crate.

use super::{Installation, MysqldArgs, ServerHandle};
use crate::config::ServerConfig;
use crate::error::{MysqlError, Result};
use crate::platform::Platform;
use std::fs::{self, File};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running mysqld, stopped when dropped.
#[derive(Debug)]
pub struct MysqldProcess {
    installation: Installation,
    port: u16,
    work_dir: PathBuf,
    child: Option<Child>,
}

impl MysqldProcess {
    /// Initializes the data directory if needed, starts mysqld and waits
    /// until it accepts TCP connections on the configured port.
    pub fn start(config: &ServerConfig, installation: Installation) -> Result<Self> {
        let port = config.port();
        let work_dir = config.temp_dir().join(format!("mysqld-{port}"));
        let data_dir = work_dir.join("data");
        fs::create_dir_all(&work_dir).map_err(|e| {
            MysqlError::server(format!("Failed to create {}: {e}", work_dir.display()))
        })?;

        let platform = Platform::detect();
        if platform.uses_sock_file() {
            config.generate_sock_file()?;
        }

        let mut args = MysqldArgs::new(config, installation.base_dir(), &data_dir)
            .with_platform(platform);
        if running_as_root() {
            args = args.with_run_as("root");
        }

        let mysqld = installation.mysqld();
        let error_log = work_dir.join("mysqld.err");

        if !data_dir.join("mysql").is_dir() {
            initialize(&mysqld, &args.initialize(), &error_log)?;
        }

        let startup = args.startup();
        debug!(program = %mysqld.display(), args = ?startup, "Starting mysqld");
        let child = Command::new(&mysqld)
            .args(&startup)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(open_log(&error_log)?))
            .spawn()
            .map_err(|e| {
                MysqlError::server(format!("Failed to start {}: {e}", mysqld.display()))
            })?;

        let mut process = Self {
            installation,
            port,
            work_dir,
            child: Some(child),
        };
        process.wait_until_ready(config.timeout().as_duration(), &error_log)?;
        info!(port, "mysqld is accepting connections");
        Ok(process)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Directory holding the data directory and the server error log.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn installation(&self) -> &Installation {
        &self.installation
    }

    /// Kills and reaps the server. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!(port = self.port, "Failed to kill mysqld: {e}");
            }
            if let Err(e) = child.wait() {
                warn!(port = self.port, "Failed to reap mysqld: {e}");
            }
            info!(port = self.port, "mysqld stopped");
        }
    }

    fn wait_until_ready(&mut self, timeout: Duration, error_log: &Path) -> Result<()> {
        let start = Instant::now();
        loop {
            if let Some(child) = self.child.as_mut() {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        self.child = None;
                        return Err(MysqlError::server(format!(
                            "mysqld exited during startup with {status}; see {}",
                            error_log.display()
                        )));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        self.stop();
                        return Err(MysqlError::server(format!(
                            "Failed to query mysqld status: {e}"
                        )));
                    }
                }
            }

            match TcpStream::connect(("127.0.0.1", self.port)) {
                Ok(_) => return Ok(()),
                Err(_) if start.elapsed() < timeout => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    self.stop();
                    return Err(MysqlError::server(format!(
                        "mysqld did not accept connections on port {} within {}: {e}",
                        self.port,
                        humantime::format_duration(timeout)
                    )));
                }
            }
        }
    }
}

impl ServerHandle for MysqldProcess {
    fn base_dir(&self) -> &Path {
        self.installation.base_dir()
    }
}

impl Drop for MysqldProcess {
    fn drop(&mut self) {
        self.stop();
    }
}

fn initialize(mysqld: &Path, args: &[String], error_log: &Path) -> Result<()> {
    info!(program = %mysqld.display(), "Initializing mysqld data directory");
    let status = Command::new(mysqld)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(open_log(error_log)?))
        .status()
        .map_err(|e| MysqlError::server(format!("Failed to run {}: {e}", mysqld.display())))?;
    if status.success() {
        Ok(())
    } else {
        Err(MysqlError::server(format!(
            "mysqld --initialize-insecure failed with {status}; see {}",
            error_log.display()
        )))
    }
}

fn open_log(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MysqlError::server(format!("Failed to open {}: {e}", path.display())))
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

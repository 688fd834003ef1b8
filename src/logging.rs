//! Logging setup for the embedded-mysql binary.
//!
//! The library only emits `tracing` events; subscribers are installed here.
//! Query results go to stdout, so logs default to stderr or a file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging to `path`, truncated on each run.
///
/// Falls back to stderr logging when the file cannot be created.
pub fn init_file_logging(path: &Path, verbose: bool) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            init_stderr_logging(verbose);
            return;
        }
    }

    let log_file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            init_stderr_logging(verbose);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Default log file location.
///
/// Uses the XDG state directory on Linux
/// (`~/.local/state/embedded-mysql/embedded-mysql.log`), then the config
/// directory, then the temp directory.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("embedded-mysql").join("embedded-mysql.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("embedded-mysql").join("embedded-mysql.log");
    }

    std::env::temp_dir().join("embedded-mysql.log")
}

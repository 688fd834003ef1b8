//! mysqld installations and processes.
//!
//! The client only needs a [`ServerHandle`] that knows where the installation
//! lives. [`MysqldProcess`] is a minimal launcher for tests that want this
//! crate to own the server lifecycle too.

mod args;
mod process;

pub use args::MysqldArgs;
pub use process::MysqldProcess;

use crate::error::{MysqlError, Result};
use std::path::{Path, PathBuf};

/// A server whose installation directory contains `bin/mysql` and `bin/mysqld`.
pub trait ServerHandle {
    /// Installation base directory.
    fn base_dir(&self) -> &Path;
}

/// An already extracted MySQL distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    base_dir: PathBuf,
}

impl Installation {
    /// Wraps `base_dir` without checking it.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Wraps `base_dir`, checking that it has a `bin` directory.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let installation = Self::new(base_dir);
        if !installation.bin_dir().is_dir() {
            return Err(MysqlError::server(format!(
                "No MySQL installation at {}: missing bin directory",
                installation.base_dir.display()
            )));
        }
        Ok(installation)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.base_dir.join("bin")
    }

    /// Path of the server binary.
    pub fn mysqld(&self) -> PathBuf {
        self.bin_dir().join("mysqld")
    }
}

impl ServerHandle for Installation {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

//! Single-assignment slot for the Unix socket file path.
//!
//! The path is generated lazily because the process supervisor may need the
//! configuration before anything has had a chance to create it. The file
//! lives in the system temp directory rather than under the configured temp
//! dir: AppArmor profiles shipped with distribution MySQL packages only allow
//! socket files there.

use crate::cleanup;
use std::io;
use std::path::{Path, PathBuf};

/// State of the sock-file slot; moves from `Unset` to `Set` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SockFileSlot {
    #[default]
    Unset,
    Set(PathBuf),
}

impl SockFileSlot {
    /// Returns the stored path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Unset => None,
            Self::Set(path) => Some(path),
        }
    }

    /// Returns the stored path, creating a fresh temp file on first use.
    pub fn get_or_generate(&mut self) -> io::Result<PathBuf> {
        if let Self::Set(path) = self {
            return Ok(path.clone());
        }
        let path = create_sock_file()?;
        *self = Self::Set(path.clone());
        Ok(path)
    }

    /// Stores a caller-provided path. Fails with the existing path if already set.
    pub fn assign(&mut self, path: PathBuf) -> Result<(), PathBuf> {
        match self {
            Self::Set(existing) => Err(existing.clone()),
            Self::Unset => {
                *self = Self::Set(path);
                Ok(())
            }
        }
    }
}

fn create_sock_file() -> io::Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("mysql")
        .suffix(".sock")
        .tempfile_in(std::env::temp_dir())?;
    let path = file.into_temp_path().keep().map_err(|e| e.error)?;
    cleanup::delete_on_exit(&path);
    Ok(path)
}

//! Host platform tag.
//!
//! The only platform distinction this crate makes is Windows versus
//! everything else: it decides between TCP and Unix-socket transport.

use std::fmt;

/// Platform family that decides how the mysql client is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows: TCP transport against `localhost`.
    Windows,
    /// Linux, macOS and other Unix-likes: socket-file transport.
    Unix,
}

impl Platform {
    /// Detects the platform this binary was compiled for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Returns true if clients connect through a socket file.
    pub fn uses_sock_file(&self) -> bool {
        matches!(self, Self::Unix)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Unix => f.write_str("unix"),
        }
    }
}

//! Character sets and collations.

use crate::error::{MysqlError, Result};
use std::borrow::Cow;
use std::fmt;

/// A MySQL character set paired with its collation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Charset {
    charset: Cow<'static, str>,
    collate: Cow<'static, str>,
}

impl Charset {
    /// 3-byte `utf8` with its general collation.
    pub const UTF8: Charset = Charset::of_static("utf8", "utf8_general_ci");

    /// Full 4-byte `utf8mb4` with unicode collation.
    pub const UTF8MB4: Charset = Charset::of_static("utf8mb4", "utf8mb4_unicode_ci");

    /// Single-byte `latin1`.
    pub const LATIN1: Charset = Charset::of_static("latin1", "latin1_swedish_ci");

    const fn of_static(charset: &'static str, collate: &'static str) -> Self {
        Self {
            charset: Cow::Borrowed(charset),
            collate: Cow::Borrowed(collate),
        }
    }

    /// Creates a charset with an explicit collation.
    pub fn new(charset: impl Into<String>, collate: impl Into<String>) -> Self {
        Self {
            charset: Cow::Owned(charset.into()),
            collate: Cow::Owned(collate.into()),
        }
    }

    /// Default charset for servers and schemas.
    pub fn defaults() -> Self {
        Self::UTF8MB4
    }

    /// Looks up one of the predefined charsets by name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "utf8" | "utf8mb3" => Ok(Self::UTF8),
            "utf8mb4" => Ok(Self::UTF8MB4),
            "latin1" => Ok(Self::LATIN1),
            _ => Err(MysqlError::config(format!(
                "Unknown charset '{name}'. Expected: utf8, utf8mb4 or latin1, or give a collation"
            ))),
        }
    }

    /// Character set name, e.g. `utf8mb4`.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Collation name, e.g. `utf8mb4_unicode_ci`.
    pub fn collate(&self) -> &str {
        &self.collate
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charset")
            .field("charset", &self.charset())
            .field("collate", &self.collate())
            .finish()
    }
}

//! SQL script sources.
//!
//! A source supplies SQL text without interpreting it; the client sends the
//! whole text to one mysql invocation.

use crate::error::{MysqlError, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Supplier of SQL text for one client invocation.
pub trait SqlScriptSource: fmt::Debug {
    /// Reads the full SQL text.
    fn read(&self) -> io::Result<String>;

    /// Short human-readable name used in errors and logs.
    fn describe(&self) -> String;
}

impl<T: SqlScriptSource + ?Sized> SqlScriptSource for &T {
    fn read(&self) -> io::Result<String> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: SqlScriptSource + ?Sized> SqlScriptSource for Box<T> {
    fn read(&self) -> io::Result<String> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// SQL held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSource {
    sql: String,
}

impl StringSource {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }
}

impl SqlScriptSource for StringSource {
    fn read(&self) -> io::Result<String> {
        Ok(self.sql.clone())
    }

    fn describe(&self) -> String {
        const MAX: usize = 40;
        let first_line = self.sql.lines().next().unwrap_or_default().trim();
        if first_line.chars().count() > MAX {
            let truncated: String = first_line.chars().take(MAX).collect();
            format!("'{truncated}...'")
        } else {
            format!("'{first_line}'")
        }
    }
}

/// SQL read from a file each time it is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SqlScriptSource for FileSource {
    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Constructors for the common kinds of script sources.
pub struct Sources;

impl Sources {
    /// A literal SQL string.
    pub fn from_string(sql: impl Into<String>) -> StringSource {
        StringSource::new(sql)
    }

    /// A single script file.
    pub fn from_file(path: impl Into<PathBuf>) -> FileSource {
        FileSource::new(path)
    }

    /// Every `*.sql` file directly inside `dir`, ordered by file name.
    pub fn from_dir(dir: &Path) -> Result<Vec<FileSource>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            MysqlError::script(format!("Failed to list scripts in {}: {e}", dir.display()))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| {
                    MysqlError::script(format!("Failed to list scripts in {}: {e}", dir.display()))
                })?
                .path();
            let is_sql = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
            if is_sql && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths.into_iter().map(FileSource::new).collect())
    }
}

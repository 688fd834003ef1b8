//! Temp-file mediated standard streams for one client invocation.
//!
//! The SQL goes to the child through a file and its stdout/stderr come back
//! through files, never through pipes: a child blocked on a full stdout pipe
//! while we are still writing its stdin would deadlock both processes.
//! Files are left in place and only removed at process exit.

use crate::cleanup;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The input/output/error files of one invocation.
#[derive(Debug)]
pub(crate) struct CommandFiles {
    input: PathBuf,
    output: PathBuf,
    error: PathBuf,
}

/// Open handles to bind as the child's standard streams.
pub(crate) struct Redirects {
    pub stdin: File,
    pub stdout: File,
    pub stderr: File,
}

impl CommandFiles {
    /// Creates fresh files, writes `sql` as UTF-8 to the input file and opens all three.
    pub fn prepare(sql: &str) -> io::Result<(Self, Redirects)> {
        let (mut input_file, input) = kept_temp_file("input")?;
        input_file.write_all(sql.as_bytes())?;
        input_file.flush()?;
        drop(input_file);

        let (stdout, output) = kept_temp_file("output")?;
        let (stderr, error) = kept_temp_file("error")?;
        let stdin = File::open(&input)?;

        Ok((
            Self {
                input,
                output,
                error,
            },
            Redirects {
                stdin,
                stdout,
                stderr,
            },
        ))
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Full text the child wrote to stdout.
    pub fn read_output(&self) -> io::Result<String> {
        read_text(&self.output)
    }

    /// Full text the child wrote to stderr.
    pub fn read_error(&self) -> io::Result<String> {
        read_text(&self.error)
    }
}

fn kept_temp_file(suffix: &str) -> io::Result<(File, PathBuf)> {
    let file = tempfile::Builder::new()
        .prefix("mysql")
        .suffix(suffix)
        .tempfile()?;
    let (file, path) = file.keep().map_err(|e| e.error)?;
    cleanup::delete_on_exit(&path);
    Ok((file, path))
}

fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

//! Command-line argument parsing for embedded-mysql.

use clap::Parser;
use embedded_mysql::config::Settings;
use embedded_mysql::error::Result;
use embedded_mysql::logging;
use embedded_mysql::script::{FileSource, Sources};
use std::path::PathBuf;

/// Output format for statement results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw client output, one result after another.
    #[default]
    Text,
    /// JSON array of `{ "source", "output" }` objects.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text or json"
            )),
        }
    }
}

/// Run SQL against a MySQL server through its bundled mysql client.
#[derive(Parser, Debug)]
#[command(name = "embedded-mysql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQL statements, each run in its own client invocation
    #[arg(value_name = "SQL")]
    pub sql: Vec<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// MySQL installation directory containing bin/mysql
    #[arg(long, value_name = "DIR", env = "EMBEDDED_MYSQL_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Schema to run against
    #[arg(short = 's', long, value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Server port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Server socket file (Unix)
    #[arg(long, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// SQL script file, or a directory of .sql files (repeatable)
    #[arg(long, value_name = "PATH")]
    pub script: Vec<PathBuf>,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write logs to a file instead of stderr; without PATH, the default log location
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::default_path)
    }

    /// Returns the log file to write to, if file logging was requested.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(logging::get_log_path))
    }

    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates arguments that clap cannot check on its own.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.sql.is_empty() && self.script.is_empty() {
            return Err("Nothing to execute: pass SQL statements or --script".to_string());
        }
        self.parse_output_format()?;
        Ok(())
    }

    /// Script sources in argument order, directories expanded to their
    /// `.sql` files sorted by name.
    pub fn script_sources(&self) -> Result<Vec<FileSource>> {
        let mut sources = Vec::new();
        for path in &self.script {
            if path.is_dir() {
                sources.extend(Sources::from_dir(path)?);
            } else {
                sources.push(Sources::from_file(path));
            }
        }
        Ok(sources)
    }

    /// Overlays command-line flags on the loaded settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.server.port = Some(port);
            settings.server.free_port = false;
        }
        if let Some(base_dir) = &self.base_dir {
            settings.client.base_dir = Some(base_dir.clone());
        }
        if let Some(schema) = &self.schema {
            settings.client.schema = schema.clone();
        }
        if let Some(socket) = &self.socket {
            settings.client.socket = Some(socket.clone());
        }
    }
}

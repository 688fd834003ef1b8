//! Sequential SQL execution through the mysql command-line client.
//!
//! Every statement or script is one invocation of `<baseDir>/bin/mysql`,
//! connected as the administrative user. Invocations run strictly one after
//! another on the calling thread; the first failure aborts the rest.

mod command;
mod io;

pub use command::{client_program, reported_command, ClientCommand, ClientTarget};

use crate::config::{Charset, ServerConfig, SystemDefaults};
use crate::error::{CommandFailure, FailureReason, MysqlError, Result};
use crate::platform::Platform;
use crate::script::SqlScriptSource;
use crate::server::ServerHandle;
use io::CommandFiles;
use std::path::Path;
use std::process::Stdio;
use tracing::debug;

/// Executes SQL against a running server by shelling out to the mysql client.
pub struct MysqlClient<'a> {
    config: &'a ServerConfig,
    server: &'a dyn ServerHandle,
    schema: String,
    charset: Charset,
    platform: Platform,
}

impl<'a> MysqlClient<'a> {
    /// Creates a client for `schema` using `charset` as the connection charset.
    pub fn new(
        config: &'a ServerConfig,
        server: &'a dyn ServerHandle,
        schema: impl Into<String>,
        charset: Charset,
    ) -> Self {
        Self {
            config,
            server,
            schema: schema.into(),
            charset,
            platform: Platform::detect(),
        }
    }

    /// Creates a client for `schema` using the server's configured charset.
    pub fn for_schema(
        config: &'a ServerConfig,
        server: &'a dyn ServerHandle,
        schema: impl Into<String>,
    ) -> Self {
        Self::new(config, server, schema, config.charset().clone())
    }

    /// Creates a client for `information_schema`.
    pub fn for_system_schema(config: &'a ServerConfig, server: &'a dyn ServerHandle) -> Self {
        Self::for_schema(config, server, SystemDefaults::SCHEMA)
    }

    /// Overrides the detected platform, which decides the transport.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Executes each statement in its own client invocation, in order.
    ///
    /// Stops at the first failure; no further statements are run.
    pub fn execute_commands<S: AsRef<str>>(&self, sqls: &[S]) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(sqls.len());
        for sql in sqls {
            results.push(self.execute(sql.as_ref())?);
        }
        Ok(results)
    }

    /// Executes each script in its own client invocation, in order.
    ///
    /// Stops at the first source that cannot be read or fails to execute.
    pub fn execute_scripts<S: SqlScriptSource>(&self, sources: &[S]) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            let sql = source.read().map_err(|e| {
                MysqlError::script(format!("Failed to read {}: {e}", source.describe()))
            })?;
            debug!("Executing script {}", source.describe());
            results.push(self.execute(&sql)?);
        }
        Ok(results)
    }

    /// Executes one SQL unit and returns the client's raw stdout.
    pub fn execute(&self, sql: &str) -> Result<String> {
        let command = reported_command(self.platform, sql);
        let sock_file = if self.platform.uses_sock_file() {
            self.config.sock_file()
        } else {
            None
        };
        let target = ClientTarget {
            base_dir: self.server.base_dir(),
            sock_file: sock_file.as_deref(),
            charset: &self.charset,
            port: self.config.port(),
            schema: &self.schema,
        };

        let Some(invocation) = ClientCommand::build(self.platform, &target) else {
            return Err(self.failure(
                command,
                client_program(target.base_dir).display().to_string(),
                FailureReason::Message(
                    "no socket file has been generated or assigned for this server".to_string(),
                ),
                String::new(),
            ));
        };

        debug!(schema = %self.schema, "Running {invocation}");
        run(&invocation, sql).map_err(|(reason, output)| {
            self.failure(command, invocation.to_string(), reason, output)
        })
    }

    fn failure(
        &self,
        command: String,
        invocation: String,
        reason: FailureReason,
        output: String,
    ) -> MysqlError {
        CommandFailure {
            command,
            schema: self.schema.clone(),
            invocation,
            reason,
            output,
        }
        .into()
    }
}

/// Runs one invocation with temp-file redirects and waits for it to exit.
fn run(invocation: &ClientCommand, sql: &str) -> std::result::Result<String, (FailureReason, String)> {
    let message = |e: std::io::Error| (FailureReason::Message(e.to_string()), String::new());

    let (files, redirects) = CommandFiles::prepare(sql).map_err(message)?;
    debug!("SQL staged in {}", files.input_path().display());
    let mut child = invocation
        .to_command()
        .stdin(Stdio::from(redirects.stdin))
        .stdout(Stdio::from(redirects.stdout))
        .stderr(Stdio::from(redirects.stderr))
        .spawn()
        .map_err(|e| spawn_failure(invocation.program(), e))?;
    let status = child.wait().map_err(message)?;

    if status.success() {
        return files.read_output().map_err(message);
    }

    let reason = match status.code() {
        Some(code) => FailureReason::ExitCode(code),
        None => FailureReason::Message(format!("client was terminated ({status})")),
    };
    Err((reason, diagnostic(files.read_error(), || files.read_output())))
}

/// Stderr, or stdout when stderr is empty. Read errors become the diagnostic
/// so the exit status is still reported.
fn diagnostic(
    stderr: std::io::Result<String>,
    stdout: impl FnOnce() -> std::io::Result<String>,
) -> String {
    match stderr {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => stdout().unwrap_or_else(|e| format!("failed to read client output: {e}")),
        Err(e) => format!("failed to read client error output: {e}"),
    }
}

fn spawn_failure(program: &Path, e: std::io::Error) -> (FailureReason, String) {
    (
        FailureReason::Message(format!("failed to start {}: {e}", program.display())),
        String::new(),
    )
}

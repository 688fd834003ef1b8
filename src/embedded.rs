//! An owned server with an application user and managed schemas.

use crate::client::MysqlClient;
use crate::config::{Charset, ServerConfig, SystemDefaults};
use crate::error::{MysqlError, Result};
use crate::script::{FileSource, SqlScriptSource};
use crate::server::{Installation, MysqldProcess, ServerHandle};
use std::path::Path;
use tracing::info;

/// A schema to create, with the scripts that populate it.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    name: String,
    charset: Option<Charset>,
    scripts: Vec<FileSource>,
}

impl SchemaConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charset: None,
            scripts: Vec::new(),
        }
    }

    /// Overrides the server charset for this schema.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Appends scripts, run in order after the schema is created.
    pub fn with_scripts(mut self, scripts: impl IntoIterator<Item = FileSource>) -> Self {
        self.scripts.extend(scripts);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn charset(&self) -> Option<&Charset> {
        self.charset.as_ref()
    }

    pub fn scripts(&self) -> &[FileSource] {
        &self.scripts
    }
}

/// A running mysqld plus the configuration it was started with.
#[derive(Debug)]
pub struct EmbeddedMysql {
    config: ServerConfig,
    process: MysqldProcess,
}

impl EmbeddedMysql {
    /// Starts mysqld and creates the configured application user.
    pub fn start(config: ServerConfig, installation: Installation) -> Result<Self> {
        check_identifier("username", config.username())?;
        let process = MysqldProcess::start(&config, installation)?;
        let mysql = Self { config, process };

        let user = mysql.config.username();
        mysql
            .system_client()
            .execute_commands(&create_user_statements(user, mysql.config.password()))?;
        info!(
            port = mysql.config.port(),
            version = %mysql.config.version(),
            user,
            "Embedded MySQL started"
        );
        Ok(mysql)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        self.process.base_dir()
    }

    /// Creates a schema and runs its scripts against it.
    pub fn add_schema(&self, schema: &SchemaConfig) -> Result<()> {
        check_identifier("schema", schema.name())?;
        let charset = schema.charset().unwrap_or(self.config.charset());
        self.system_client().execute(&format!(
            "CREATE DATABASE `{}` CHARACTER SET = {} COLLATE = {}",
            schema.name(),
            charset.charset(),
            charset.collate()
        ))?;
        self.client(schema.name()).execute_scripts(schema.scripts())?;
        info!(schema = schema.name(), "Schema added");
        Ok(())
    }

    pub fn drop_schema(&self, name: &str) -> Result<()> {
        check_identifier("schema", name)?;
        self.system_client()
            .execute(&format!("DROP DATABASE IF EXISTS `{name}`"))?;
        info!(schema = name, "Schema dropped");
        Ok(())
    }

    /// Drops and re-creates a schema from its scripts.
    pub fn reload_schema(&self, schema: &SchemaConfig) -> Result<()> {
        self.drop_schema(schema.name())?;
        self.add_schema(schema)
    }

    pub fn execute_commands<S: AsRef<str>>(&self, schema: &str, sqls: &[S]) -> Result<Vec<String>> {
        self.client(schema).execute_commands(sqls)
    }

    pub fn execute_scripts<S: SqlScriptSource>(
        &self,
        schema: &str,
        sources: &[S],
    ) -> Result<Vec<String>> {
        self.client(schema).execute_scripts(sources)
    }

    /// Stops the server. Dropping the value has the same effect.
    pub fn stop(mut self) {
        self.process.stop();
    }

    fn client(&self, schema: &str) -> MysqlClient<'_> {
        MysqlClient::for_schema(&self.config, &self.process, schema)
    }

    fn system_client(&self) -> MysqlClient<'_> {
        self.client(SystemDefaults::SCHEMA)
    }
}

fn create_user_statements(user: &str, password: &str) -> [String; 2] {
    let password = quote_literal(password);
    [
        format!("CREATE USER IF NOT EXISTS '{user}'@'%' IDENTIFIED BY {password}"),
        format!("GRANT ALL ON *.* TO '{user}'@'%'"),
    ]
}

/// Single-quoted string literal; backslashes escape under the default `sql_mode`.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// Names are interpolated into statements, so only plain identifiers pass.
fn check_identifier(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(MysqlError::invalid_configuration(format!(
            "Invalid {kind} '{name}': only letters, digits, '_' and '$' are allowed"
        )))
    }
}

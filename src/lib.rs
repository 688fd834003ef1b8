//! embedded-mysql - ephemeral MySQL servers for integration tests.
//!
//! Configuration is built once with [`ServerConfig::builder`], then SQL is
//! run sequentially through the `mysql` command-line client with
//! [`MysqlClient`]. [`EmbeddedMysql`] additionally owns the mysqld process.

pub mod cleanup;
pub mod client;
pub mod config;
pub mod embedded;
pub mod error;
pub mod logging;
pub mod platform;
pub mod script;
pub mod server;

pub use client::MysqlClient;
pub use config::{Charset, ServerConfig, ServerConfigBuilder, TimeUnit, Version};
pub use embedded::{EmbeddedMysql, SchemaConfig};
pub use error::{CommandFailure, FailureReason, MysqlError, Result};
pub use platform::Platform;
pub use script::{FileSource, Sources, SqlScriptSource, StringSource};
pub use server::{Installation, MysqldProcess, ServerHandle};

//! embedded-mysql - run SQL through a MySQL installation's client.

mod cli;

use cli::{Cli, OutputFormat};
use embedded_mysql::config::Settings;
use embedded_mysql::error::{MysqlError, Result};
use embedded_mysql::logging;
use embedded_mysql::script::SqlScriptSource;
use embedded_mysql::server::Installation;
use embedded_mysql::MysqlClient;
use serde::Serialize;
use tracing::{error, info};

/// One executed statement or script, as printed in JSON mode.
#[derive(Debug, Serialize)]
struct Execution {
    source: String,
    output: String,
}

fn main() {
    let cli = Cli::parse_args();

    match cli.log_path() {
        Some(path) => logging::init_file_logging(&path, cli.verbose),
        None => logging::init_stderr_logging(cli.verbose),
    }

    if let Err(e) = run(&cli) {
        error!("{}: {}", e.category(), e);
        if cli.log_file.is_some() {
            eprintln!("{}: {}", e.category(), e);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    cli.validate().map_err(MysqlError::config)?;
    let format = cli.parse_output_format().map_err(MysqlError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut settings = Settings::load_from_file(&config_path)?;
    cli.apply_to(&mut settings);

    let config = settings.server.to_builder()?.build()?;
    if let Some(socket) = &settings.client.socket {
        config.assign_sock_file(socket)?;
    }

    let base_dir = settings.client.base_dir.clone().ok_or_else(|| {
        MysqlError::config("No MySQL installation configured: use --base-dir or [client].base_dir")
    })?;
    let installation = Installation::open(base_dir)?;
    let client = MysqlClient::for_schema(&config, &installation, settings.client.schema.as_str());

    let mut executions = Vec::new();
    for source in cli.script_sources()? {
        let output = client.execute_scripts(std::slice::from_ref(&source))?;
        executions.extend(output.into_iter().map(|output| Execution {
            source: source.describe(),
            output,
        }));
    }
    for sql in &cli.sql {
        let output = client.execute(sql)?;
        executions.push(Execution {
            source: sql.clone(),
            output,
        });
    }

    match format {
        OutputFormat::Text => {
            for execution in &executions {
                print!("{}", execution.output);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&executions)
                .map_err(|e| MysqlError::config(format!("Failed to render JSON: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

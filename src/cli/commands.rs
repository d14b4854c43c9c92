//! CLI command implementations
//!
//! Startup sequence for `start`:
//! 1. Configuration load
//! 2. Database open (schema ensured)
//! 3. HTTP activation

use std::path::Path;

use serde_json::json;

use crate::http_server::HttpServer;
use crate::inventory::Database;
use crate::observability::{log_event_with_fields, Event};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start { config, port } => start(&config, port),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("database_path", &config.database_path.display().to_string()),
        ],
    );
    Ok(config)
}

fn open_database(config: &Config) -> CliResult<Database> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::storage_error(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let db = Database::open(&config.database_path)?;
    log_event_with_fields(Event::DatabaseOpened, &[("location", db.location())]);
    Ok(db)
}

/// Create the database file and product table.
///
/// Safe to run more than once; an existing table is left untouched.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let db = open_database(&config)?;

    write_response(json!({
        "initialized": true,
        "database_path": db.location(),
    }))?;

    Ok(())
}

/// Open the database and serve HTTP until Ctrl-C.
pub fn start(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path)?.with_port_override(port)?;

    let db = open_database(&config)?;
    let server = HttpServer::new(config.http, db);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

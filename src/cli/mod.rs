//! CLI module
//!
//! Provides command-line interface for:
//! - init: Create the database and product table
//! - start: Serve the HTTP API

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};

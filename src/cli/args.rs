//! CLI argument definitions using clap
//!
//! Commands:
//! - inventory init --config <path>
//! - inventory start --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Retail inventory manager
#[derive(Parser, Debug)]
#[command(name = "inventory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and product table
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./inventory.json")]
        config: PathBuf,
    },

    /// Open the database and serve the HTTP API
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./inventory.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

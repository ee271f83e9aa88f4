//! CLI argument definitions using clap
//!
//! Commands:
//! - tronics serve [--host <host>] [--port <port>] [--log-json]
//! - tronics check-config

use clap::{Parser, Subcommand};

/// Tronics - product catalog and account service
#[derive(Parser, Debug)]
#[command(name = "tronics")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Bind host, overrides HOST
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides PORT
        #[arg(long)]
        port: Option<u16>,

        /// Emit logs as JSON lines
        #[arg(long)]
        log_json: bool,
    },

    /// Load configuration from the environment, print it and exit
    CheckConfig,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

//! CLI module for Tronics
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - check-config: Validate environment configuration and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

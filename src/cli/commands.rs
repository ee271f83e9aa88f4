//! CLI command implementations

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::http_server::{AppConfig, HttpServer};
use crate::observability::{self, LogFormat};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            host,
            port,
            log_json,
        } => serve(host, port, log_json),
        Command::CheckConfig => check_config(),
    }
}

/// Environment configuration with command-line overrides applied
pub fn load_config(host: Option<String>, port: Option<u16>) -> CliResult<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    Ok(config)
}

/// Start the HTTP server and block until it stops
pub fn serve(host: Option<String>, port: Option<u16>, log_json: bool) -> CliResult<()> {
    let format = if log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    observability::init(format);

    let config = load_config(host, port)?;
    tracing::info!(config = ?config, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let server = HttpServer::new(config).await?;
        server.start().await?;
        Ok::<(), CliError>(())
    })
}

/// Validate configuration without serving
pub fn check_config() -> CliResult<()> {
    let config = load_config(None, None)?;
    println!("{:#?}", config);
    Ok(())
}

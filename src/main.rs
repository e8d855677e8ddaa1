//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, builds the registry and serves
//! the single controlling client over stdio.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use starter_mcp_server::core::{Config, McpServer, StdioTransport};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);
    if config.credentials.hf_token().is_none() {
        info!("No Hugging Face token configured; generate_image will report a missing credential");
    }

    let server = McpServer::new(config)?;

    info!("Server initialized");

    StdioTransport::run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the protocol.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

//! MySQL MCP Server - Main entry point.
//!
//! Serves MCP over stdio, exposing one MySQL database as resources
//! (table list and table contents) and one execute_sql tool.

use clap::Parser;
use mysql_mcp_server::config::Config;
use mysql_mcp_server::transport::StdioTransport;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Stdout carries the MCP protocol, so all log output goes to stderr.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    info!("Starting MySQL MCP Server v{}", env!("CARGO_PKG_VERSION"));

    // Connection settings are resolved per request, so a missing MYSQL_USER
    // fails individual calls rather than startup. Surface it early anyway.
    if let Err(e) = mysql_mcp_server::ConnectionSettings::resolve() {
        tracing::warn!(error = %e, "Database configuration incomplete; calls will fail until fixed");
    }

    let result = StdioTransport::new().run().await;

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

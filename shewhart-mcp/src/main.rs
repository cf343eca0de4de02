//! Shewhart MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr; stdout carries
//! protocol messages only.
//!
//! Tools:
//! - analyze: statistics and all four control charts for a sample
//! - describe: descriptive statistics only
//! - control_chart: one chart (x, p, r or c)
//! - call: one registered function on a list of values
//! - help: documentation for a function
//! - list_functions: available functions
//!
//! Environment:
//! - SHEWHART_SIGMA: control band width in sigma units (default 3)
//! - SHEWHART_DECIMALS: decimal places in rendered tables (default 4)
//! - RUST_LOG: log filter (default info)

mod config;
mod handlers;
mod protocol;

use config::Config;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    init_tracing();

    let config = Config::from_env();
    let engine = config.build_engine();

    info!(
        version = handlers::SERVER_VERSION,
        protocol = handlers::PROTOCOL_VERSION,
        sigma = config.sigma,
        decimals = config.decimals,
        "shewhart MCP server started"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received");

        if let Some(response) = handlers::handle_line(&engine, line) {
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("client disconnected, shutting down");
    Ok(())
}

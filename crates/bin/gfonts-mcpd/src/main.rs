//! Daemon entry point for the gfonts MCP server.
//!
//! Loads configuration from the environment, opens the font store read-only,
//! and serves the MCP protocol over stdio and, optionally, streamable HTTP.

mod config;

use std::process::ExitCode;

use gfonts_core::control::FontsControlPlane;
use gfonts_core::store::SqliteFontStore;
use gfonts_mcp::server::serve;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::McpdConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "gfonts-mcpd failed");
            eprintln!("gfonts-mcpd: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), BoxError> {
    let config = McpdConfig::from_args()?;
    let store = SqliteFontStore::open_read_only(&config.db_path)?;
    let control = FontsControlPlane::new(store);
    let stats = control.database_stats().await?;
    info!(
        path = %config.db_path.display(),
        fonts = stats.fonts,
        variants = stats.variants,
        icons = stats.icons,
        "opened font store"
    );

    serve(control, config.transports()).await?;
    Ok(())
}

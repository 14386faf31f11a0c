//! Transport runners for the gfonts MCP service.
//!
//! The daemon serves stdio, streamable HTTP, or both at once. The HTTP side
//! also answers `GET /health` with the store's row counts.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use gfonts_core::control::FontsControlPlane;
use gfonts_store::models::DatabaseStats;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::{info, warn};

use crate::GfontsMcp;

pub type ServeError = Box<dyn Error + Send + Sync>;

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Transports a daemon run should open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transports {
    pub stdio: bool,
    pub http: Option<SocketAddr>,
}

impl Transports {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.stdio && self.http.is_none()
    }
}

/// Serves every enabled transport until one of them stops.
///
/// With both enabled, the run ends when the stdio client disconnects.
///
/// # Errors
/// Returns an error if no transport is enabled, or the first transport error.
pub async fn serve(control: FontsControlPlane, transports: Transports) -> Result<(), ServeError> {
    match (transports.stdio, transports.http) {
        (false, None) => Err("no MCP transport enabled".into()),
        (true, None) => serve_stdio(control).await,
        (false, Some(addr)) => serve_http(control, addr).await,
        (true, Some(addr)) => {
            tokio::select! {
                result = serve_stdio(control.clone()) => result,
                result = serve_http(control, addr) => result,
            }
        }
    }
}

/// Serves the tools over stdin and stdout.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(control: FontsControlPlane) -> Result<(), ServeError> {
    let running = serve_server(GfontsMcp::new(control), stdio()).await?;
    info!("MCP stdio transport ready");
    let _ = running.waiting().await?;
    info!("MCP stdio client disconnected");
    Ok(())
}

/// Binds `addr` and serves [`router`] on it.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_http(control: FontsControlPlane, addr: SocketAddr) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "MCP HTTP transport listening");
    axum::serve(listener, router(control)).await?;
    Ok(())
}

/// Streamable HTTP endpoint at `/mcp` plus a stats-backed `/health`.
#[must_use]
pub fn router(control: FontsControlPlane) -> Router {
    let sessions = control.clone();
    let mcp: StreamableHttpService<GfontsMcp, LocalSessionManager> = StreamableHttpService::new(
        move || Ok(GfontsMcp::new(sessions.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: Some(SSE_KEEP_ALIVE),
            stateful_mode: true,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
        .with_state(control)
}

async fn health(
    State(control): State<FontsControlPlane>,
) -> Result<Json<DatabaseStats>, (StatusCode, String)> {
    control.database_stats().await.map(Json).map_err(|err| {
        warn!(error = %err, "health check could not read the store");
        (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use crate::tools::test_support;

    use super::*;

    #[tokio::test]
    async fn health_reports_store_counts() {
        let control = test_support::server().control().clone();
        let Json(stats) = health(State(control)).await.expect("store is readable");
        assert_eq!(
            stats,
            DatabaseStats {
                fonts: 2,
                variants: 1,
                icons: 2,
            }
        );
    }

    #[tokio::test]
    async fn serve_needs_a_transport() {
        let control = test_support::server().control().clone();
        assert!(Transports::default().is_empty());
        let err = serve(control, Transports::default())
            .await
            .expect_err("nothing to serve");
        assert_eq!(err.to_string(), "no MCP transport enabled");
    }

    #[tokio::test]
    async fn http_bind_failure_is_reported() {
        let held = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = held.local_addr().expect("local addr");
        let control = test_support::server().control().clone();
        let transports = Transports {
            stdio: false,
            http: Some(addr),
        };
        assert!(serve(control, transports).await.is_err());
    }
}

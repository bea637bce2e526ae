//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use claimdrop_service::{ClaimMetrics, ClaimService, StatsReporter};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers;
use crate::RpcError;

/// Display-only campaign details reported by the health endpoint.
#[derive(Clone, Debug, Default)]
pub struct CampaignInfo {
    /// Account participants must follow, without the leading `@`.
    pub follow_account: Option<String>,
    /// Network label of the token distribution (e.g. `devnet`).
    pub network: String,
    pub bypass_verification: bool,
}

/// Shared state handed to every handler.
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub stats: StatsReporter,
    pub metrics: Arc<ClaimMetrics>,
    pub info: CampaignInfo,
}

/// Build the router with all routes. Exposed for in-process testing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/verify", post(handlers::claim))
        .route("/api/claim", post(handlers::claim))
        .route("/api/stats", get(handlers::stats))
        .route("/api/health", get(handlers::health))
        .route("/api/verifier", get(handlers::verifier_key))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub addr: SocketAddr,
    state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { addr, state }
    }

    /// Bind and serve until `shutdown` resolves; in-flight requests are
    /// allowed to finish.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {}: {e}", self.addr)))?;
        let local = listener
            .local_addr()
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("HTTP server listening on {}", local);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("HTTP server stopped");
        Ok(())
    }
}

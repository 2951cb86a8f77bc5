//! # Tidewave Node
//!
//! HTTP API for the Tidewave orchestrator.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::Args;
pub use engine::Engine;
pub use error::ApiError;
pub use state::AppState;

/// Install the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ping", get(api::health::ping))
        .route("/ops", get(api::ops::ops))
        .route("/orchestrate", post(api::orchestrate::orchestrate))
        .route("/mvp", post(api::mvp::mvp_log))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Serve the API on `listener` until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Bind `addr` and run the node.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    info!("🚀 {} starting...", state.config.app_name);
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

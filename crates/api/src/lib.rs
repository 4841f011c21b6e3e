mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use strategy::StrategyRegistry;

pub use error::ApiError;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Read-only strategy table built at startup.
    pub registry: Arc<StrategyRegistry>,
}

impl AppState {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Assemble the full router with its middleware.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::api_router())
        .merge(routes::health_router())
        .merge(routes::static_router())
        .with_state(state)
        .layer(cors)
        .layer(CompressionLayer::new())
}

/// Bind and run the HTTP server until it fails.
pub async fn serve(state: AppState, port: u16) -> common::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "BackTest Buddy listening");
    axum::serve(listener, app).await?;
    Ok(())
}

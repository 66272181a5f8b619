//! HTTP serve mode.
//!
//! Exposes the catalog over a local REST API. The pool is opened when the
//! state is built and closed after the listener shuts down.

pub mod api;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use state::{AppState, ServerConfig};

/// Run the HTTP server. Blocks until shutdown (Ctrl+C).
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let port = config.port;
    let state = Arc::new(AppState::connect(config).await?);

    let app = build_router(Arc::clone(&state), port);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    println!("schemascope: server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.catalog.close().await;
    println!("\nschemascope: server stopped");

    Ok(())
}

/// Build the router with CORS restricted to same-origin. The server only
/// binds to localhost, but without this any website could read table data
/// through the local port.
pub fn build_router(state: Arc<AppState>, port: u16) -> Router {
    let allowed_origins = [
        format!("http://localhost:{port}").parse().unwrap(),
        format!("http://127.0.0.1:{port}").parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(api::api_routes())
        .with_state(state)
        .layer(cors)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}

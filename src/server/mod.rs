use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub mod events;
pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    get_layers, get_scene, get_settings, get_sites, index_html, layer_events_stream, script_js,
    set_layer_visibility, style_css,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/scene", get(get_scene))
        .route("/api/sites", get(get_sites))
        .route("/api/layers", get(get_layers))
        .route("/api/layers/:name", post(set_layer_visibility))
        .route("/api/settings", get(get_settings))
        .route("/api/events", get(layer_events_stream))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))
}

/// Serves until Ctrl+C.
pub async fn start_server(state: AppState, listener: TcpListener) -> Result<()> {
    let app = create_app(state);

    tracing::info!(
        "HTTP server started at http://{}",
        listener.local_addr().context("Listener has no local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

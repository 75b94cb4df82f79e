//! HTTP/WebSocket server module
//!
//! Exposes the channel table over REST and the per-channel crawl event
//! stream over WebSocket:
//! - `GET /ping` - liveness check
//! - `GET /channels` - configured channels with current viewer counts
//! - `GET /ws/:channel` - subscribe to a channel's event stream

mod session;
mod ws;

pub use session::{ChannelSummary, SessionManager};

use crate::config::Config;
use crate::Result;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state behind every handler
pub struct AppState {
    pub sessions: SessionManager,
}

/// Binds the listener and serves until the process is stopped
pub async fn start_server(config: Config) -> Result<()> {
    let state = Arc::new(AppState {
        sessions: SessionManager::new(&config.channels),
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/channels", get(channels_handler))
        .route("/ws/:channel", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn channels_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelSummary>> {
    Json(state.sessions.summaries())
}

//! Plain HTTP liveness endpoint polled by uptime monitors.

use axum::Router;
use axum::routing::get;
use log::{error, info};
use std::net::SocketAddr;

pub const LIVENESS_BODY: &str = "Bot is running!";

pub fn router() -> Router {
    Router::new().route("/", get(|| async { LIVENESS_BODY }))
}

/// Serves the liveness router until the process exits. A bind failure is
/// logged and the bot keeps running without it.
pub async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not start health check server on {}: {}", addr, e);
            return;
        }
    };

    info!("Health check server started on port {}", port);
    if let Err(e) = axum::serve(listener, router()).await {
        error!("Health check server stopped: {}", e);
    }
}

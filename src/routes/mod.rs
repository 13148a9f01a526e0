use crate::config::Config;
use crate::session_registry::actor_client::SessionRegistryClient;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod health;
mod metrics;
mod session;

pub fn create_router(config: &Config) -> Router<Arc<SessionRegistryClient>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/session", post(session::create))
        .route("/session/:session_id", get(session::canonical_id))
        .route(
            "/session/:session_id/player/:name/ws",
            get(session::connect_player_to_websocket),
        )
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}

use std::sync::Arc;

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::player::actor::PlayerActor;
use crate::session_registry::actor_client::SessionRegistryClient;
use crate::websocket::send_error_and_close;

#[derive(Serialize)]
pub struct SessionIdResponse {
    id: String,
}

pub async fn create(State(registry): State<Arc<SessionRegistryClient>>) -> Response {
    match registry.create_session().await {
        Ok(id) => (StatusCode::OK, Json(SessionIdResponse { id })).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Resolves a session id typed with different casing to the id of the
/// existing session, so that every player ends up in the same one.
pub async fn canonical_id(
    State(registry): State<Arc<SessionRegistryClient>>,
    Path(session_id): Path<String>,
) -> Response {
    match registry.canonical_session_id(&session_id).await {
        Ok(id) => (StatusCode::OK, Json(SessionIdResponse { id })).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub async fn connect_player_to_websocket(
    State(registry): State<Arc<SessionRegistryClient>>,
    Path((session_id, name)): Path<(String, String)>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| async move {
        match registry.get_or_create_session(&session_id).await {
            Ok(session) => PlayerActor::create(name, session, websocket).await,
            Err(error) => send_error_and_close(websocket, &error, "join").await,
        }
    })
}

pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::Error;
use message::{WsMessageIn, WsMessageOut};

pub async fn send_error_and_close(mut websocket: WebSocket, error: &Error, command: &str) {
    send_error(&mut websocket, error, command).await;
    close(websocket).await;
}

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::debug!("Could not close the WebSocket. Error: '{error}'.")
    }
}

pub async fn send_error(websocket: &mut WebSocket, error: &Error, command: &str) {
    // The websocket may be gone already, nothing else to do
    if let Err(send_failure) = send_message(websocket, &error_to_ws_message(error, command)).await
    {
        log::debug!(
            "Could not send an error to the player. Error: '{error}', SendError: '{send_failure}'."
        );
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;

    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, message: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(message.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

/// Rejections only name the command; the reason stays in the server logs.
pub fn error_to_ws_message(error: &Error, command: &str) -> WsMessageOut {
    match error {
        Error::Domain(_) => WsMessageOut::Rejected {
            command: command.to_string(),
        },
        Error::Internal(_) => WsMessageOut::Error {
            r#type: "INTERNAL_SERVER".to_string(),
            title: "Internal Server error".to_string(),
            detail: error.to_string(),
        },
        Error::UnprocessableMessage(_, _) => WsMessageOut::Error {
            r#type: "UNPROCESSABLE_WEBSOCKET_MESSAGE".to_string(),
            title: "Unprocessable websocket message".to_string(),
            detail: error.to_string(),
        },
        Error::WebsocketClosed(_) => WsMessageOut::Error {
            r#type: "WEBSOCKET_CLOSED".to_string(),
            title: "The player websocket is closed".to_string(),
            detail: error.to_string(),
        },
    }
}

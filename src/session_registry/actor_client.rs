use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::session::actor_client::SessionClient;
use crate::session_registry::actor::{SessionRegistryCommand, SessionRegistryResponse};

#[derive(Clone, Debug)]
pub struct SessionRegistryClient {
    pub(crate) registry_tx: Sender<SessionRegistryCommand>,
}

impl SessionRegistryClient {
    pub async fn create_session(&self) -> Result<String, Error> {
        let (tx, rx): (
            OneshotSender<SessionRegistryResponse>,
            OneshotReceiver<SessionRegistryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionRegistryCommand::CreateSession {
                response_channel: tx,
            },
            "The SessionRegistry is not alive. Can't create Session",
        )
        .await?;

        match rx.await {
            Ok(SessionRegistryResponse::SessionCreated { session_id }) => Ok(session_id),
            error => Err(SessionRegistryClient::handle_event_error(error)),
        }
    }

    pub async fn get_or_create_session(&self, session_id: &str) -> Result<SessionClient, Error> {
        let (tx, rx): (
            OneshotSender<SessionRegistryResponse>,
            OneshotReceiver<SessionRegistryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionRegistryCommand::GetOrCreateSession {
                session_id: session_id.to_string(),
                response_channel: tx,
            },
            "The SessionRegistry channel is closed",
        )
        .await?;

        match rx.await {
            Ok(SessionRegistryResponse::Session { session }) => Ok(session),
            error => Err(SessionRegistryClient::handle_event_error(error)),
        }
    }

    pub async fn canonical_session_id(&self, session_id: &str) -> Result<String, Error> {
        let (tx, rx): (
            OneshotSender<SessionRegistryResponse>,
            OneshotReceiver<SessionRegistryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionRegistryCommand::GetCanonicalSessionId {
                session_id: session_id.to_string(),
                response_channel: tx,
            },
            "The SessionRegistry channel is closed",
        )
        .await?;

        match rx.await {
            Ok(SessionRegistryResponse::CanonicalSessionId { session_id }) => Ok(session_id),
            error => Err(SessionRegistryClient::handle_event_error(error)),
        }
    }

    pub async fn remove_session(&self, session_id: &str) -> Result<(), Error> {
        self.send_command(
            SessionRegistryCommand::RemoveSession {
                session_id: session_id.to_string(),
            },
            "The SessionRegistry channel is closed",
        )
        .await
    }

    async fn send_command(
        &self,
        command: SessionRegistryCommand,
        error_message: &str,
    ) -> Result<(), Error> {
        self.registry_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'"))
        })
    }

    fn handle_event_error(error: Result<SessionRegistryResponse, RecvError>) -> Error {
        match error {
            Ok(SessionRegistryResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected SessionRegistryResponse. SessionRegistryResponse: '{unexpected_response}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the SessionRegistry actor, but the actor channel died.",
            ),
        }
    }
}

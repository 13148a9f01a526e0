use std::fmt::{Display, Formatter};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot::Sender as OneshotSender;

use crate::config::SessionSettings;
use crate::error::Error;
use crate::session::actor_client::SessionClient;
use crate::session_registry::actor_client::SessionRegistryClient;
use crate::session_registry::SessionRegistry;

pub struct SessionRegistryActor {
    registry: SessionRegistry,
    registry_rx: Receiver<SessionRegistryCommand>,
    registry_tx: Sender<SessionRegistryCommand>,
}

impl SessionRegistryActor {
    /// Runs the SessionRegistry Actor in background and returns a Client to communicate with it
    pub fn spawn(session_settings: SessionSettings, words: Vec<String>) -> SessionRegistryClient {
        let registry = SessionRegistry::new(session_settings, words);
        let (registry_tx, registry_rx): (
            Sender<SessionRegistryCommand>,
            Receiver<SessionRegistryCommand>,
        ) = mpsc::channel(512);

        tokio::spawn(
            SessionRegistryActor {
                registry,
                registry_rx,
                registry_tx: registry_tx.clone(),
            }
            .start(),
        );

        SessionRegistryClient { registry_tx }
    }

    async fn start(mut self) {
        while let Some(message) = self.registry_rx.recv().await {
            let response = match message {
                SessionRegistryCommand::CreateSession { response_channel } => {
                    let session_id = self.registry.create_session(self.client());
                    Some((
                        Ok(SessionRegistryResponse::SessionCreated { session_id }),
                        response_channel,
                    ))
                }
                SessionRegistryCommand::GetOrCreateSession {
                    session_id,
                    response_channel,
                } => {
                    let result = self
                        .registry
                        .get_or_create_session(&session_id, self.client())
                        .map(|session| SessionRegistryResponse::Session { session });
                    Some((result, response_channel))
                }
                SessionRegistryCommand::GetCanonicalSessionId {
                    session_id,
                    response_channel,
                } => {
                    let session_id = self.registry.canonical_session_id(&session_id);
                    Some((
                        Ok(SessionRegistryResponse::CanonicalSessionId { session_id }),
                        response_channel,
                    ))
                }
                SessionRegistryCommand::RemoveSession { session_id } => {
                    if self.registry.remove_session(&session_id).is_some() {
                        log::info!("Session removed. SessionId: '{session_id}'.");
                    }
                    None
                }
            };
            if let Some((result, response_tx)) = response {
                let event = match result {
                    Ok(event) => event,
                    Err(error) => SessionRegistryResponse::Error { error },
                };
                if let Err(error) = response_tx.send(event) {
                    log::error!("Sent SessionRegistryResponse but the response channel is closed. Error: '{error}'.");
                }
            }
        }
    }

    fn client(&self) -> SessionRegistryClient {
        SessionRegistryClient {
            registry_tx: self.registry_tx.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum SessionRegistryCommand {
    CreateSession {
        response_channel: OneshotSender<SessionRegistryResponse>,
    },
    GetOrCreateSession {
        session_id: String,
        response_channel: OneshotSender<SessionRegistryResponse>,
    },
    GetCanonicalSessionId {
        session_id: String,
        response_channel: OneshotSender<SessionRegistryResponse>,
    },
    RemoveSession {
        session_id: String,
    },
}

#[derive(Debug)]
pub(crate) enum SessionRegistryResponse {
    SessionCreated { session_id: String },
    Session { session: SessionClient },
    CanonicalSessionId { session_id: String },
    Error { error: Error },
}

impl Display for SessionRegistryResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                SessionRegistryResponse::SessionCreated { session_id } =>
                    format!("SessionCreated(session_id: {session_id})"),
                SessionRegistryResponse::Session { session: _ } => "Session".to_string(),
                SessionRegistryResponse::CanonicalSessionId { session_id } =>
                    format!("CanonicalSessionId(session_id: {session_id})"),
                SessionRegistryResponse::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}

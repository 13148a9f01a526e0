use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::player::normalize_name;
use crate::session::actor::{SessionCommand, SessionResponse};
use crate::session::event::SessionEvent;

#[derive(Clone, Debug)]
pub struct SessionClient {
    pub(crate) session_tx: Sender<SessionCommand>,
}

impl SessionClient {
    pub fn is_closed(&self) -> bool {
        self.session_tx.is_closed()
    }

    pub async fn join(&self, name: &str) -> Result<SessionEventReceiver, Error> {
        let (tx, rx): (OneshotSender<SessionResponse>, OneshotReceiver<SessionResponse>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::Join {
                name: name.to_string(),
                response_tx: tx,
            })
            .await
            // The registry handed out a Session whose actor stopped in the
            // meantime; the player has to reconnect
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "The Session is not alive. Can't add Player to Session. Error: '{error}'"
                ))
            })?;

        match rx.await {
            Ok(SessionResponse::Joined { broadcast_rx }) => {
                Ok(SessionEventReceiver { broadcast_rx })
            }
            Ok(SessionResponse::Error { error }) => Err(error),
            _ => Err(Error::log_and_create_internal(
                "Player sent a SessionCommand::Join to Session, but Session channel died.",
            )),
        }
    }

    pub async fn leave(&self, name: &str) -> Result<(), Error> {
        self.session_tx
            .send(SessionCommand::Leave {
                name: name.to_string(),
            })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Tried to send SessionCommand::Leave but SessionActor is not listening. Error: {error}."
                ))
            })
    }

    /// Returns the name the member is known by after the rename.
    pub async fn rename(&self, old: &str, new: &str) -> Result<String, Error> {
        self.send_command_and_wait("Rename", |response_tx| SessionCommand::Rename {
            old: old.to_string(),
            new: new.to_string(),
            response_tx,
        })
        .await?;
        Ok(normalize_name(new))
    }

    pub async fn start(&self, name: &str, guesser: &str) -> Result<(), Error> {
        self.send_command_and_wait("Start", |response_tx| SessionCommand::Start {
            name: name.to_string(),
            guesser: guesser.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn end(&self, name: &str) -> Result<(), Error> {
        self.send_command_and_wait("End", |response_tx| SessionCommand::End {
            name: name.to_string(),
            response_tx,
        })
        .await
    }

    pub async fn submit_clue(
        &self,
        name: &str,
        clue: &str,
        round: Option<u32>,
    ) -> Result<(), Error> {
        self.send_command_and_wait("SubmitClue", |response_tx| SessionCommand::SubmitClue {
            name: name.to_string(),
            clue: clue.to_string(),
            round,
            response_tx,
        })
        .await
    }

    pub async fn unsubmit_clue(&self, name: &str, round: Option<u32>) -> Result<(), Error> {
        self.send_command_and_wait("UnsubmitClue", |response_tx| {
            SessionCommand::UnsubmitClue {
                name: name.to_string(),
                round,
                response_tx,
            }
        })
        .await
    }

    pub async fn approve_clues(
        &self,
        name: &str,
        clues: Vec<String>,
        finalize: bool,
        round: Option<u32>,
    ) -> Result<(), Error> {
        self.send_command_and_wait("ApproveClues", |response_tx| {
            SessionCommand::ApproveClues {
                name: name.to_string(),
                clues,
                finalize,
                round,
                response_tx,
            }
        })
        .await
    }

    pub async fn submit_guess(
        &self,
        name: &str,
        guess: &str,
        round: Option<u32>,
    ) -> Result<(), Error> {
        self.send_command_and_wait("SubmitGuess", |response_tx| SessionCommand::SubmitGuess {
            name: name.to_string(),
            guess: guess.to_string(),
            round,
            response_tx,
        })
        .await
    }

    async fn send_command_and_wait<F>(&self, command_name: &str, build: F) -> Result<(), Error>
    where
        F: FnOnce(OneshotSender<SessionResponse>) -> SessionCommand,
    {
        let (tx, rx): (OneshotSender<SessionResponse>, OneshotReceiver<SessionResponse>) =
            oneshot::channel();

        self.session_tx.send(build(tx)).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Tried to send SessionCommand::{command_name} but SessionActor is not listening. Error: {error}."
            ))
        })?;

        match rx.await {
            Ok(SessionResponse::Ok) => Ok(()),
            Ok(SessionResponse::Error { error }) => Err(error),
            Ok(unexpected_response) => Err(Error::log_and_create_internal(&format!(
                "Received an unexpected SessionResponse. SessionResponse: '{unexpected_response}'."
            ))),
            Err(_) => Err(Error::log_and_create_internal(&format!(
                "Sent a SessionCommand::{command_name} to the Session, but the Session channel died."
            ))),
        }
    }
}

pub struct SessionEventReceiver {
    broadcast_rx: broadcast::Receiver<SessionEvent>,
}

impl SessionEventReceiver {
    /// Events carry the full state, so a receiver that fell behind skips the
    /// events it missed and continues with the oldest one still buffered.
    pub async fn next(&mut self) -> Result<SessionEvent, Error> {
        loop {
            match self.broadcast_rx.recv().await {
                Ok(event) => return Ok(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Player fell behind the Session events. SkippedEvents: '{skipped}'.");
                }
                Err(error) => {
                    return Err(Error::log_and_create_internal(&format!(
                        "The broadcast channel with the Session has been closed. Error: {error}."
                    )))
                }
            }
        }
    }
}

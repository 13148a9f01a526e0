use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender},
};
use tokio::time;

use crate::config::SessionSettings;
use crate::error::Error;
use crate::metrics::{ACTIVE_SESSIONS, GUESSES_RESOLVED, ROUNDS_STARTED};
use crate::session::actor_client::SessionClient;
use crate::session::event::SessionEvent;
use crate::session::Session;
use crate::session_registry::actor_client::SessionRegistryClient;
use crate::words::ShuffledWords;

/// Owns one Session and applies its commands one at a time.
pub struct SessionActor {
    session: Session,
    session_rx: Receiver<SessionCommand>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    registry: SessionRegistryClient,
    inactivity_timeout: Duration,
}

impl SessionActor {
    pub fn spawn(
        id: &str,
        settings: SessionSettings,
        words: Vec<String>,
        registry: SessionRegistryClient,
    ) -> SessionClient {
        let session = Session::new(
            id,
            Box::new(ShuffledWords::new(words)),
            settings.approver.policy(),
        );
        let (session_tx, session_rx): (Sender<SessionCommand>, Receiver<SessionCommand>) =
            mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<SessionEvent>,
            broadcast::Receiver<SessionEvent>,
        ) = broadcast::channel(64);

        tokio::spawn(
            SessionActor {
                session,
                session_rx,
                broadcast_tx,
                registry,
                inactivity_timeout: settings.inactivity_timeout(),
            }
            .start(),
        );

        SessionClient { session_tx }
    }

    async fn start(mut self) {
        ACTIVE_SESSIONS.inc();

        loop {
            match time::timeout(self.inactivity_timeout, self.session_rx.recv()).await {
                Err(_) => {
                    if self.session.all_players_are_disconnected() {
                        log::info!(
                            "No activity detected in session {} after {} seconds. Stopping session actor.",
                            self.session.id(),
                            self.inactivity_timeout.as_secs()
                        );
                        break;
                    }
                }
                Ok(None) => {
                    log::info!("Session channel has been dropped. Stopping session actor.");
                    break;
                }
                Ok(Some(command)) => self.handle_command(command),
            }
        }

        self.stop_session().await;
        ACTIVE_SESSIONS.dec();
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let (result, name, response_tx, is_join) = match command {
            SessionCommand::Join { name, response_tx } => {
                // Subscribe before applying, so the new member receives the
                // events caused by their own join
                let broadcast_rx = self.broadcast_tx.subscribe();
                let result = self
                    .session
                    .join(&name)
                    .map(|events| (SessionResponse::Joined { broadcast_rx }, events));
                (result, name, response_tx, true)
            }
            SessionCommand::Leave { name } => {
                match self.session.leave(&name) {
                    Ok(events) => self.broadcast(events),
                    Err(error) => log::warn!(
                        "Ignoring leave of a non member. SessionId: '{}', Error: '{error}'.",
                        self.session.id()
                    ),
                }
                return;
            }
            SessionCommand::Rename {
                old,
                new,
                response_tx,
            } => {
                let result = self
                    .session
                    .rename(&old, &new)
                    .map(|events| (SessionResponse::Ok, events));
                (result, old, response_tx, false)
            }
            SessionCommand::Start {
                name,
                guesser,
                response_tx,
            } => {
                let result = self.session.start(&name, &guesser).map(|events| {
                    ROUNDS_STARTED.inc();
                    (SessionResponse::Ok, events)
                });
                (result, name, response_tx, false)
            }
            SessionCommand::End { name, response_tx } => {
                let result = self
                    .session
                    .end(&name)
                    .map(|events| (SessionResponse::Ok, events));
                (result, name, response_tx, false)
            }
            SessionCommand::SubmitClue {
                name,
                clue,
                round,
                response_tx,
            } => {
                let result = self
                    .session
                    .submit_clue(&name, &clue, round)
                    .map(|events| (SessionResponse::Ok, events));
                (result, name, response_tx, false)
            }
            SessionCommand::UnsubmitClue {
                name,
                round,
                response_tx,
            } => {
                let result = self
                    .session
                    .unsubmit_clue(&name, round)
                    .map(|events| (SessionResponse::Ok, events));
                (result, name, response_tx, false)
            }
            SessionCommand::ApproveClues {
                name,
                clues,
                finalize,
                round,
                response_tx,
            } => {
                let result = self
                    .session
                    .approve_clues(&name, clues, finalize, round)
                    .map(|events| (SessionResponse::Ok, events));
                (result, name, response_tx, false)
            }
            SessionCommand::SubmitGuess {
                name,
                guess,
                round,
                response_tx,
            } => {
                let result = self
                    .session
                    .submit_guess(&name, &guess, round)
                    .map(|events| {
                        GUESSES_RESOLVED.inc();
                        (SessionResponse::Ok, events)
                    });
                (result, name, response_tx, false)
            }
        };

        let (response, events) = match result {
            Ok((response, events)) => (response, events),
            Err(error) => {
                if let Error::Domain(domain_error) = &error {
                    log::info!(
                        "Command rejected. SessionId: '{}', Name: '{name}', Kind: '{:?}', Error: '{domain_error}'.",
                        self.session.id(),
                        domain_error.kind()
                    );
                }
                (SessionResponse::Error { error }, Vec::default())
            }
        };

        if let Err(response) = response_tx.send(response) {
            log::error!("Sent {response} to Player {name} but the response channel is closed.");
            if is_join && !events.is_empty() {
                // The connection is gone before it received its subscription
                if let Ok(events) = self.session.leave(&name) {
                    self.broadcast(events);
                }
                return;
            }
        }
        self.broadcast(events);
    }

    fn broadcast(&self, events: Vec<SessionEvent>) {
        for event in events {
            // No receivers is not an error: every member may have disconnected
            let _ = self.broadcast_tx.send(event);
        }
    }

    async fn stop_session(mut self) {
        self.session_rx.close();
        let session_id = self.session.id();
        if let Err(error) = self.registry.remove_session(session_id).await {
            log::error!("The SessionRegistry channel is closed, can't remove the Session. SessionId: '{session_id}', Error: '{error}'.");
        }
    }
}

pub(crate) enum SessionCommand {
    Join {
        name: String,
        response_tx: OneshotSender<SessionResponse>,
    },
    Leave {
        name: String,
    },
    Rename {
        old: String,
        new: String,
        response_tx: OneshotSender<SessionResponse>,
    },
    Start {
        name: String,
        guesser: String,
        response_tx: OneshotSender<SessionResponse>,
    },
    End {
        name: String,
        response_tx: OneshotSender<SessionResponse>,
    },
    SubmitClue {
        name: String,
        clue: String,
        round: Option<u32>,
        response_tx: OneshotSender<SessionResponse>,
    },
    UnsubmitClue {
        name: String,
        round: Option<u32>,
        response_tx: OneshotSender<SessionResponse>,
    },
    ApproveClues {
        name: String,
        clues: Vec<String>,
        finalize: bool,
        round: Option<u32>,
        response_tx: OneshotSender<SessionResponse>,
    },
    SubmitGuess {
        name: String,
        guess: String,
        round: Option<u32>,
        response_tx: OneshotSender<SessionResponse>,
    },
}

#[derive(Debug)]
pub(crate) enum SessionResponse {
    Joined {
        broadcast_rx: broadcast::Receiver<SessionEvent>,
    },
    Ok,
    Error {
        error: Error,
    },
}

impl Display for SessionResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                SessionResponse::Joined { .. } => "SessionResponse::Joined".to_string(),
                SessionResponse::Ok => "SessionResponse::Ok".to_string(),
                SessionResponse::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}

use axum::extract::ws::{Message, WebSocket};
use std::time::Duration;
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::error::Error;
use crate::metrics::CONNECTED_PLAYERS;
use crate::player::normalize_name;
use crate::session::actor_client::{SessionClient, SessionEventReceiver};
use crate::session::event::SessionEvent;
use crate::websocket::message::{ClueDto, WsMessageIn, WsMessageOut};
use crate::websocket::{
    close, parse_message, send_error, send_error_and_close, send_message, send_message_string,
};

/// Bridges one websocket with its Session. Commands coming from the browser
/// are forwarded to the Session, and Session events are masked for this
/// member before being sent.
pub struct PlayerActor {
    name: String,
    session: SessionClient,
    session_event_receiver: SessionEventReceiver,
    websocket: WebSocket,
    inactivity_timeout: Duration,
}

impl PlayerActor {
    pub async fn create(name: String, session: SessionClient, websocket: WebSocket) {
        let name = normalize_name(&name);
        match session.join(&name).await {
            Ok(session_event_receiver) => {
                PlayerActor {
                    name,
                    session,
                    session_event_receiver,
                    websocket,
                    inactivity_timeout: Duration::from_millis(2500),
                }
                .start()
                .await
            }
            Err(error) => send_error_and_close(websocket, &error, "join").await,
        }
    }

    async fn start(mut self) {
        CONNECTED_PLAYERS.inc();

        loop {
            select! {
                session_event = self.session_event_receiver.next() => {
                    if let Err(error) = self.receive_session_event(session_event).await {
                        send_error(&mut self.websocket, &error, "").await;
                        if error.should_close_websocket() {
                            break;
                        }
                    }
                },
                websocket_message = timeout(self.inactivity_timeout, self.websocket.recv()) => {
                    if let Err((error, command)) = self.receive_websocket_message(websocket_message).await {
                        send_error(&mut self.websocket, &error, command).await;
                        if error.should_close_websocket() {
                            break;
                        }
                    }
                },
            }
        }

        if let Err(error) = self.session.leave(&self.name).await {
            log::error!(
                "Could not leave the session. Name: '{}', Error: '{error}'.",
                self.name
            );
        }
        close(self.websocket).await;
        CONNECTED_PLAYERS.dec();
    }

    async fn receive_session_event(
        &mut self,
        session_event: Result<SessionEvent, Error>,
    ) -> Result<(), Error> {
        let event = session_event?;
        send_message(
            &mut self.websocket,
            &PlayerActor::mask_event(&self.name, event),
        )
        .await
    }

    /// What `recipient` is allowed to see of a Session event.
    fn mask_event(recipient: &str, event: SessionEvent) -> WsMessageOut {
        match event {
            SessionEvent::RosterUpdated { players, started } => WsMessageOut::Roster {
                players: players.into_iter().map(|player| player.into()).collect(),
                started,
            },
            SessionEvent::RoundStarted {
                round,
                guesser,
                secret_word,
            } => WsMessageOut::RoundStarted {
                round,
                secret_word: (guesser != recipient).then_some(secret_word),
                guesser,
            },
            SessionEvent::CluesUpdated {
                round,
                guesser,
                secret_word,
                clues,
            } => WsMessageOut::CluesUpdated {
                round,
                secret_word: (guesser != recipient).then_some(secret_word),
                guesser,
                clues: clues
                    .into_iter()
                    .map(|(cluer, clue)| ClueDto {
                        submitted: clue.is_some(),
                        clue: if cluer == recipient { clue } else { None },
                        cluer,
                    })
                    .collect(),
            },
            SessionEvent::RevealClues {
                round,
                guesser,
                approver,
                review,
                selection,
            } => {
                let is_approver = approver.as_deref() == Some(recipient);
                WsMessageOut::RevealClues {
                    round,
                    guesser,
                    approver,
                    clues: review
                        .into_iter()
                        .filter(|clue| is_approver || clue.author == recipient)
                        .map(|clue| clue.into())
                        .collect(),
                    selection: is_approver.then_some(selection),
                }
            }
            SessionEvent::GuessingStarted {
                round,
                guesser,
                approved_clues,
            } => WsMessageOut::GuessingStarted {
                round,
                guesser,
                approved_clues,
            },
            SessionEvent::GuessResolved {
                round,
                guesser,
                guess,
                correct,
                secret_word,
            } => WsMessageOut::GuessResolved {
                round,
                guesser,
                guess,
                correct,
                secret_word,
            },
            SessionEvent::RoundEnded => WsMessageOut::RoundEnded,
        }
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Result<Option<Result<Message, axum::Error>>, Elapsed>,
    ) -> Result<(), (Error, &'static str)> {
        match websocket_message {
            Ok(Some(Ok(Message::Text(txt)))) => match txt.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong")
                    .await
                    .map_err(|error| (error, "ping")),
                message => {
                    let message = parse_message(message).map_err(|error| (error, ""))?;
                    let command = message.command_name();
                    self.handle_command(message)
                        .await
                        .map_err(|error| (error, command))
                }
            },
            // browser said "close"
            Ok(Some(Ok(Message::Close(_)))) => {
                self.log_connection_lost_with_player("browser sent 'Close' websocket frame");
                Err((
                    Error::WebsocketClosed("browser sent 'Close' websocket frame".to_string()),
                    "",
                ))
            }
            // websocket was closed
            Ok(None) => {
                self.log_connection_lost_with_player("other end of websocket was closed abruptly");
                Err((
                    Error::WebsocketClosed(
                        "other end of websocket was closed abruptly".to_string(),
                    ),
                    "",
                ))
            }
            // timeout without receiving anything from player
            Err(_) => {
                self.log_connection_lost_with_player(
                    "connection timed out; missing 'Ping' messages",
                );
                Err((
                    Error::WebsocketClosed(
                        "connection timed out; missing 'Ping' messages".to_string(),
                    ),
                    "",
                ))
            }
            Ok(Some(Err(error))) => Err((
                Error::UnprocessableMessage(
                    "Message cannot be loaded".to_string(),
                    error.to_string(),
                ),
                "",
            )),
            Ok(Some(Ok(_))) => Err((
                Error::UnprocessableMessage(
                    "Unsupported message type".to_string(),
                    "Unsupported message type".to_string(),
                ),
                "",
            )),
        }
    }

    async fn handle_command(&mut self, message: WsMessageIn) -> Result<(), Error> {
        match message {
            WsMessageIn::Rename { name } => {
                match self.session.rename(&self.name, &name).await {
                    Ok(name) => {
                        log::info!("Player renamed. OldName: '{}', NewName: '{name}'.", self.name);
                        self.name = name;
                        Ok(())
                    }
                    // A refused rename is silent for everyone, the issuer included
                    Err(Error::Domain(error)) => {
                        log::debug!("Rename ignored. Name: '{}', Error: '{error}'.", self.name);
                        Ok(())
                    }
                    Err(error) => Err(error),
                }
            }
            WsMessageIn::StartRound { guesser } => {
                self.session.start(&self.name, &guesser).await
            }
            WsMessageIn::EndRound => self.session.end(&self.name).await,
            WsMessageIn::SubmitClue { clue, round } => {
                self.session.submit_clue(&self.name, &clue, round).await
            }
            WsMessageIn::UnsubmitClue { round } => {
                self.session.unsubmit_clue(&self.name, round).await
            }
            WsMessageIn::ApproveClues {
                clues,
                finalize,
                round,
            } => {
                self.session
                    .approve_clues(&self.name, clues, finalize, round)
                    .await
            }
            WsMessageIn::SubmitGuess { guess, round } => {
                self.session.submit_guess(&self.name, &guess, round).await
            }
        }
    }

    fn log_connection_lost_with_player(&self, reason: &str) {
        log::info!(
            "Connection with player {} lost due to: {}. Stopping player actor.",
            &self.name,
            reason,
        );
    }
}

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use super::{test_app::TestApp, test_player::TestPlayer};

pub struct TestSession {
    pub app: TestApp,
    pub id: String,
    pub players: Vec<TestPlayer>,
}

impl TestSession {
    /// Connects a new player and reads the roster update on everyone.
    pub async fn add_player(&mut self, name: &str) -> Result<Roster, String> {
        let (tx, rx) = self
            .app
            .open_session_websocket(&self.id, name)
            .await?
            .split();
        let mut player = TestPlayer {
            name: name.to_string(),
            tx,
            rx,
        };
        let roster = match player.receive_message().await? {
            WsMessageOut::Roster { players, started } => Roster { players, started },
            message => return Err(format!("Expected a roster, got {message:?}")),
        };
        for player in self.players.iter_mut() {
            let _ = player.receive_until("roster").await;
        }
        self.players.push(player);
        Ok(roster)
    }

    pub fn player(&mut self, name: &str) -> &mut TestPlayer {
        self.players
            .iter_mut()
            .find(|player| player.name == name)
            .unwrap()
    }

    /// Sends a command from `name` and waits until every player got an event of
    /// `kind`. Returns what each player received, in join order.
    pub async fn broadcast_command(
        &mut self,
        name: &str,
        command: WsMessageIn,
        kind: &str,
    ) -> Vec<WsMessageOut> {
        self.player(name).send_command(command).await;
        let mut messages = Vec::with_capacity(self.players.len());
        for player in self.players.iter_mut() {
            messages.push(player.receive_until(kind).await);
        }
        messages
    }

    /// Starts a round guessed by `guesser` and returns the secret word, as seen
    /// by one of the cluers.
    pub async fn start_round(&mut self, guesser: &str) -> String {
        let messages = self
            .broadcast_command(
                guesser,
                WsMessageIn::StartRound {
                    guesser: guesser.to_string(),
                },
                "roundStarted",
            )
            .await;
        for player in self.players.iter_mut() {
            let _ = player.receive_until("cluesUpdated").await;
        }
        messages
            .into_iter()
            .find_map(|message| match message {
                WsMessageOut::RoundStarted {
                    secret_word: Some(secret_word),
                    ..
                } => Some(secret_word),
                _ => None,
            })
            .unwrap()
    }
}

pub struct Roster {
    pub players: Vec<Player>,
    pub started: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub is_connected: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub cluer: String,
    pub submitted: bool,
    pub clue: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewedClue {
    pub author: String,
    pub text: String,
    pub unique: bool,
}

/// What the server sends.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageOut {
    Error {
        r#type: String,
        title: String,
        detail: String,
    },
    Rejected {
        command: String,
    },
    Roster {
        players: Vec<Player>,
        started: bool,
    },
    #[serde(rename_all = "camelCase")]
    RoundStarted {
        round: u32,
        guesser: String,
        secret_word: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CluesUpdated {
        round: u32,
        guesser: String,
        secret_word: Option<String>,
        clues: Vec<Clue>,
    },
    RevealClues {
        round: u32,
        guesser: String,
        approver: Option<String>,
        clues: Vec<ReviewedClue>,
        selection: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    GuessingStarted {
        round: u32,
        guesser: String,
        approved_clues: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    GuessResolved {
        round: u32,
        guesser: String,
        guess: String,
        correct: bool,
        secret_word: String,
    },
    RoundEnded,
}

impl WsMessageOut {
    pub fn kind(&self) -> &'static str {
        match self {
            WsMessageOut::Error { .. } => "error",
            WsMessageOut::Rejected { .. } => "rejected",
            WsMessageOut::Roster { .. } => "roster",
            WsMessageOut::RoundStarted { .. } => "roundStarted",
            WsMessageOut::CluesUpdated { .. } => "cluesUpdated",
            WsMessageOut::RevealClues { .. } => "revealClues",
            WsMessageOut::GuessingStarted { .. } => "guessingStarted",
            WsMessageOut::GuessResolved { .. } => "guessResolved",
            WsMessageOut::RoundEnded => "roundEnded",
        }
    }
}

/// What the server receives.
#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageIn {
    Rename {
        name: String,
    },
    StartRound {
        guesser: String,
    },
    EndRound,
    SubmitClue {
        clue: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
    UnsubmitClue {
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
    ApproveClues {
        clues: Vec<String>,
        finalize: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
    SubmitGuess {
        guess: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
}

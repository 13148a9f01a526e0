use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::round::clue_review::ReviewedClue;

#[derive(Deserialize, Debug, PartialEq)]
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
        round: Option<u32>,
    },
    UnsubmitClue {
        round: Option<u32>,
    },
    ApproveClues {
        clues: Vec<String>,
        #[serde(default)]
        finalize: bool,
        round: Option<u32>,
    },
    SubmitGuess {
        guess: String,
        round: Option<u32>,
    },
}

impl WsMessageIn {
    /// The wire name of the command, echoed back when it is rejected.
    pub fn command_name(&self) -> &'static str {
        match self {
            WsMessageIn::Rename { .. } => "rename",
            WsMessageIn::StartRound { .. } => "startRound",
            WsMessageIn::EndRound => "endRound",
            WsMessageIn::SubmitClue { .. } => "submitClue",
            WsMessageIn::UnsubmitClue { .. } => "unsubmitClue",
            WsMessageIn::ApproveClues { .. } => "approveClues",
            WsMessageIn::SubmitGuess { .. } => "submitGuess",
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
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
        players: Vec<PlayerDto>,
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
        clues: Vec<ClueDto>,
    },
    RevealClues {
        round: u32,
        guesser: String,
        approver: Option<String>,
        clues: Vec<ReviewedClueDto>,
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

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub name: String,
    pub is_connected: bool,
}

impl From<Player> for PlayerDto {
    fn from(player: Player) -> Self {
        PlayerDto {
            is_connected: player.is_connected(),
            name: player.name,
        }
    }
}

/// One cluer's slot. `clue` is only filled in for the recipient's own slot.
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClueDto {
    pub cluer: String,
    pub submitted: bool,
    pub clue: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedClueDto {
    pub author: String,
    pub text: String,
    pub unique: bool,
}

impl From<ReviewedClue> for ReviewedClueDto {
    fn from(clue: ReviewedClue) -> Self {
        ReviewedClueDto {
            author: clue.author,
            text: clue.text,
            unique: clue.unique,
        }
    }
}

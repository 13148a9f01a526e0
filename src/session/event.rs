use crate::player::Player;
use crate::round::clue_review::ReviewedClue;

/// State changes broadcast to every member of a session. Events carry the full
/// state; each connection masks what its member is not allowed to see.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    RosterUpdated {
        players: Vec<Player>,
        started: bool,
    },
    RoundStarted {
        round: u32,
        guesser: String,
        secret_word: String,
    },
    CluesUpdated {
        round: u32,
        guesser: String,
        secret_word: String,
        /// `(cluer, clue)` sorted by cluer name.
        clues: Vec<(String, Option<String>)>,
    },
    RevealClues {
        round: u32,
        guesser: String,
        approver: Option<String>,
        review: Vec<ReviewedClue>,
        selection: Vec<String>,
    },
    GuessingStarted {
        round: u32,
        guesser: String,
        approved_clues: Vec<String>,
    },
    GuessResolved {
        round: u32,
        guesser: String,
        guess: String,
        correct: bool,
        secret_word: String,
    },
    RoundEnded,
}

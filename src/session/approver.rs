use rand::{seq::SliceRandom, thread_rng};
use serde::Deserialize;

/// Picks the member who reviews the clues of a round. Returning `None`, or a
/// name that is not a connected member, makes the session approve every clue
/// without review.
pub trait ApproverPolicy: Send + Sync {
    /// `cluers` are the connected members who submitted a clue.
    fn choose(&self, guesser: &str, cluers: &[String]) -> Option<String>;
}

pub struct RandomCluer;

impl ApproverPolicy for RandomCluer {
    fn choose(&self, _guesser: &str, cluers: &[String]) -> Option<String> {
        cluers.choose(&mut thread_rng()).cloned()
    }
}

pub struct Guesser;

impl ApproverPolicy for Guesser {
    fn choose(&self, guesser: &str, _cluers: &[String]) -> Option<String> {
        Some(guesser.to_string())
    }
}

pub struct Automatic;

impl ApproverPolicy for Automatic {
    fn choose(&self, _guesser: &str, _cluers: &[String]) -> Option<String> {
        None
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ApproverSelection {
    RandomCluer,
    Guesser,
    Automatic,
}

impl ApproverSelection {
    pub fn policy(&self) -> Box<dyn ApproverPolicy> {
        match self {
            ApproverSelection::RandomCluer => Box::new(RandomCluer),
            ApproverSelection::Guesser => Box::new(Guesser),
            ApproverSelection::Automatic => Box::new(Automatic),
        }
    }
}

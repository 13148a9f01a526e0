pub mod clue_review;
pub mod round_fsm;

use rust_fsm::StateMachine;

use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::round::clue_review::ReviewedClue;
use crate::round::round_fsm::{RoundFsm, RoundFsmInput, RoundFsmState};

#[derive(Clone, Debug, PartialEq)]
pub struct ClueSlot {
    pub cluer: String,
    pub clue: Option<String>,
    sequence: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub guess: String,
    pub correct: bool,
}

pub struct Round {
    number: u32,
    secret_word: String,
    guesser: String,
    clues: Vec<ClueSlot>,
    fsm: StateMachine<RoundFsm>,
    approver: Option<String>,
    review: Vec<ReviewedClue>,
    selection: Vec<String>,
    approved_clues: Vec<String>,
    outcome: Option<Outcome>,
    next_sequence: u64,
}

impl Round {
    /// `cluers` is every member except the guesser, in roster order.
    pub fn new(number: u32, secret_word: &str, guesser: &str, cluers: Vec<String>) -> Self {
        Self {
            number,
            secret_word: secret_word.to_string(),
            guesser: guesser.to_string(),
            clues: cluers
                .into_iter()
                .filter(|cluer| cluer != guesser)
                .map(|cluer| ClueSlot {
                    cluer,
                    clue: None,
                    sequence: 0,
                })
                .collect(),
            fsm: StateMachine::default(),
            approver: None,
            review: Vec::default(),
            selection: Vec::default(),
            approved_clues: Vec::default(),
            outcome: None,
            next_sequence: 0,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> &RoundFsmState {
        self.fsm.state()
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guesser(&self) -> &str {
        &self.guesser
    }

    pub fn clues(&self) -> &[ClueSlot] {
        &self.clues
    }

    pub fn approver(&self) -> Option<&str> {
        self.approver.as_deref()
    }

    pub fn review(&self) -> &[ReviewedClue] {
        &self.review
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn approved_clues(&self) -> &[String] {
        &self.approved_clues
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.phase() == &RoundFsmState::Resolved
    }

    pub fn is_cluer(&self, name: &str) -> bool {
        self.clues.iter().any(|slot| slot.cluer == name)
    }

    pub fn submit_clue(&mut self, name: &str, clue: &str) -> Result<(), Error> {
        self.expect_phase(RoundFsmState::Clueing)?;
        if name == self.guesser {
            return Err(DomainError::GuesserCannotSubmitClue(name.to_string()).into());
        }
        let clue = clue.trim();
        if clue.is_empty() {
            return Err(DomainError::EmptyClue(name.to_string()).into());
        }

        self.next_sequence += 1;
        let sequence = self.next_sequence;
        let slot = self.get_slot_mut(name)?;
        slot.clue = Some(clue.to_string());
        slot.sequence = sequence;
        Ok(())
    }

    pub fn unsubmit_clue(&mut self, name: &str) -> Result<(), Error> {
        self.expect_phase(RoundFsmState::Clueing)?;
        if name == self.guesser {
            return Err(DomainError::GuesserCannotSubmitClue(name.to_string()).into());
        }
        self.get_slot_mut(name)?.clue = None;
        Ok(())
    }

    /// True when every cluer in `connected` has a clue and there is at least
    /// one clue to review.
    pub fn have_all_cluers_submitted(&self, connected: &[&str]) -> bool {
        let any_clue = self.clues.iter().any(|slot| slot.clue.is_some());
        any_clue
            && self
                .clues
                .iter()
                .filter(|slot| connected.contains(&slot.cluer.as_str()))
                .all(|slot| slot.clue.is_some())
    }

    /// Submitted clues as `(author, text)` in submission order.
    pub fn submitted_clues(&self) -> Vec<(String, String)> {
        let mut submitted: Vec<&ClueSlot> =
            self.clues.iter().filter(|slot| slot.clue.is_some()).collect();
        submitted.sort_by_key(|slot| slot.sequence);
        submitted
            .into_iter()
            .filter_map(|slot| {
                slot.clue
                    .as_ref()
                    .map(|clue| (slot.cluer.to_string(), clue.to_string()))
            })
            .collect()
    }

    pub fn start_approval(&mut self, approver: Option<String>) -> Result<(), Error> {
        self.process_event(&RoundFsmInput::AllCluesSubmitted)?;
        self.review = clue_review::review_clues(self.submitted_clues());
        self.selection = clue_review::suggested_selection(&self.review);
        self.approver = approver;
        Ok(())
    }

    /// Stores a draft selection of the approver, or commits it when
    /// `finalize` is set.
    pub fn approve_clues(
        &mut self,
        name: &str,
        selection: Vec<String>,
        finalize: bool,
    ) -> Result<(), Error> {
        self.expect_phase(RoundFsmState::Approving)?;
        if self.approver.as_deref() != Some(name) {
            return Err(DomainError::NonApproverCannotApproveClues(name.to_string()).into());
        }
        let approved = clue_review::resolve_selection(&self.review, &selection)?;
        if finalize {
            self.finalize_approval(approved)
        } else {
            self.selection = approved;
            Ok(())
        }
    }

    /// Approves every submitted clue verbatim, without human review.
    pub fn auto_approve(&mut self) -> Result<(), Error> {
        self.expect_phase(RoundFsmState::Approving)?;
        let mut approved: Vec<String> = self
            .review
            .iter()
            .map(|clue| clue.text.to_string())
            .collect();
        clue_review::sort_for_display(&mut approved);
        self.finalize_approval(approved)
    }

    fn finalize_approval(&mut self, approved: Vec<String>) -> Result<(), Error> {
        self.process_event(&RoundFsmInput::CluesApproved)?;
        self.selection = approved.clone();
        self.approved_clues = approved;
        Ok(())
    }

    pub fn submit_guess(&mut self, name: &str, guess: &str) -> Result<(), Error> {
        self.expect_phase(RoundFsmState::Guessing)?;
        if name != self.guesser {
            return Err(DomainError::NonGuesserCannotGuess(name.to_string()).into());
        }
        let correct = Round::normalize(guess) == Round::normalize(&self.secret_word);
        self.process_event(&RoundFsmInput::GuessSubmitted)?;
        self.outcome = Some(Outcome {
            guess: guess.trim().to_string(),
            correct,
        });
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) {
        if self.guesser == old {
            self.guesser = new.to_string();
        }
        if self.approver.as_deref() == Some(old) {
            self.approver = Some(new.to_string());
        }
        for slot in self.clues.iter_mut().filter(|slot| slot.cluer == old) {
            slot.cluer = new.to_string();
        }
        for clue in self.review.iter_mut().filter(|clue| clue.author == old) {
            clue.author = new.to_string();
        }
    }

    fn normalize(word: &str) -> String {
        word.trim().to_lowercase()
    }

    fn expect_phase(&self, expected: RoundFsmState) -> Result<(), Error> {
        if self.phase() == &expected {
            Ok(())
        } else {
            Err(DomainError::InvalidPhase(self.phase().clone(), expected).into())
        }
    }

    fn get_slot_mut(&mut self, name: &str) -> Result<&mut ClueSlot, Error> {
        self.clues
            .iter_mut()
            .find(|slot| slot.cluer == name)
            .ok_or_else(|| DomainError::NotAMember(name.to_string()).into())
    }

    fn process_event(&mut self, event: &RoundFsmInput) -> Result<(), Error> {
        self.fsm.consume(event).map(|_| ()).map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The round fsm in phase {:?} can't transition with an event {:?}. Error: '{error}'.",
                self.fsm.state(),
                event
            ))
        })
    }
}

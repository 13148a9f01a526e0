pub mod actor;
pub mod actor_client;
pub mod approver;
pub mod event;

use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::player::{normalize_name, Player};
use crate::round::round_fsm::RoundFsmState;
use crate::round::Round;
use crate::session::approver::ApproverPolicy;
use crate::session::event::SessionEvent;
use crate::words::WordSource;

pub struct Session {
    id: String,
    players: Vec<Player>,
    round: Option<Round>,
    rounds_played: u32,
    words: Box<dyn WordSource>,
    approver_policy: Box<dyn ApproverPolicy>,
}

impl Session {
    const MINIMUM_PLAYERS: usize = 2;

    pub fn new(
        id: &str,
        words: Box<dyn WordSource>,
        approver_policy: Box<dyn ApproverPolicy>,
    ) -> Self {
        Self {
            id: id.to_string(),
            players: Vec::default(),
            round: None,
            rounds_played: 0,
            words,
            approver_policy,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.round.is_some()
    }

    pub fn all_players_are_disconnected(&self) -> bool {
        self.players.iter().all(|player| !player.is_connected())
    }

    /// Adds a connection for `name`. Joining twice with the same name is not an
    /// error; a member rejoining a started session gets the current round again.
    /// Names are stored trimmed, see [`normalize_name`].
    pub fn join(&mut self, name: &str) -> Result<Vec<SessionEvent>, Error> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(DomainError::EmptyName.into());
        }

        if let Some(player) = self.get_player_mut(&name) {
            player.connect();
        } else if self.is_started() {
            return Err(DomainError::SessionInProgress(self.id.to_string()).into());
        } else {
            self.players.push(Player::new(&name));
        }

        self.advance()?;
        let mut events = vec![self.roster_event()];
        if let Some(round) = &self.round {
            events.push(SessionEvent::RoundStarted {
                round: round.number(),
                guesser: round.guesser().to_string(),
                secret_word: round.secret_word().to_string(),
            });
        }
        events.extend(self.round_event());
        Ok(events)
    }

    /// Drops a connection of `name`. A member without connections leaves the
    /// roster in the lobby, but stays (disconnected) while a round is running so
    /// that they can rejoin under the same name.
    pub fn leave(&mut self, name: &str) -> Result<Vec<SessionEvent>, Error> {
        let name = normalize_name(name);
        let started = self.is_started();
        let player = self
            .get_player_mut(&name)
            .ok_or_else(|| DomainError::NotAMember(name.to_string()))?;
        player.disconnect();
        if !started && !player.is_connected() {
            self.players.retain(|player| player.name != name);
        }

        self.advance()?;
        let mut events = vec![self.roster_event()];
        events.extend(self.round_event());
        Ok(events)
    }

    /// Renames a member with a single connection. The new name is stored as
    /// [`normalize_name`] returns it, the caller must use that form from now on.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<Vec<SessionEvent>, Error> {
        let (old_name, new_name) = (normalize_name(old), normalize_name(new));
        let (old, new) = (old_name.as_str(), new_name.as_str());
        if new.is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        let player = self
            .get_player(old)
            .ok_or_else(|| DomainError::NotAMember(old.to_string()))?;
        // Other connections of the member would keep the old name
        if player.connections() > 1 {
            return Err(DomainError::RenameWithSeveralConnections(old.to_string()).into());
        }
        if old == new {
            return Ok(Vec::default());
        }
        if self.get_player(new).is_some() {
            return Err(DomainError::NameAlreadyTaken(new.to_string()).into());
        }

        if let Some(player) = self.get_player_mut(old) {
            player.name = new.to_string();
        }
        if let Some(round) = self.round.as_mut() {
            round.rename(old, new);
        }

        self.advance()?;
        let mut events = vec![self.roster_event()];
        events.extend(self.round_event());
        Ok(events)
    }

    /// Starts a fresh round. Allowed when no round is running or the current
    /// one is resolved.
    pub fn start(&mut self, name: &str, guesser: &str) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        if self.round.as_ref().is_some_and(|round| !round.is_resolved()) {
            return Err(DomainError::RoundInProgress(self.id.to_string()).into());
        }
        let connected_players = self.connected_names().len();
        if connected_players < Session::MINIMUM_PLAYERS {
            return Err(
                DomainError::NotEnoughPlayers(connected_players, Session::MINIMUM_PLAYERS).into(),
            );
        }
        if !self.connected_names().iter().any(|player| player == guesser) {
            return Err(DomainError::GuesserIsNotAMember(guesser.to_string()).into());
        }

        self.prune_disconnected_players();
        self.rounds_played += 1;
        let secret_word = self.words.next_word();
        log::info!(
            "Starting round. SessionId: '{}', Round: '{}', Guesser: '{}'.",
            self.id,
            self.rounds_played,
            guesser
        );
        self.round = Some(Round::new(
            self.rounds_played,
            &secret_word,
            guesser,
            self.players
                .iter()
                .map(|player| player.name.to_string())
                .collect(),
        ));

        let mut events = vec![
            self.roster_event(),
            SessionEvent::RoundStarted {
                round: self.rounds_played,
                guesser: guesser.to_string(),
                secret_word,
            },
        ];
        events.extend(self.round_event());
        Ok(events)
    }

    pub fn end(&mut self, name: &str) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        if self.round.take().is_none() {
            return Err(DomainError::NoActiveRound(self.id.to_string()).into());
        }
        self.prune_disconnected_players();
        log::info!("Round ended. SessionId: '{}'.", self.id);

        Ok(vec![SessionEvent::RoundEnded, self.roster_event()])
    }

    pub fn submit_clue(
        &mut self,
        name: &str,
        clue: &str,
        round: Option<u32>,
    ) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        self.get_current_round_mut(round)?.submit_clue(name, clue)?;
        self.advance()?;
        Ok(self.round_event().into_iter().collect())
    }

    pub fn unsubmit_clue(
        &mut self,
        name: &str,
        round: Option<u32>,
    ) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        self.get_current_round_mut(round)?.unsubmit_clue(name)?;
        self.advance()?;
        Ok(self.round_event().into_iter().collect())
    }

    pub fn approve_clues(
        &mut self,
        name: &str,
        selection: Vec<String>,
        finalize: bool,
        round: Option<u32>,
    ) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        self.get_current_round_mut(round)?
            .approve_clues(name, selection, finalize)?;
        self.advance()?;
        Ok(self.round_event().into_iter().collect())
    }

    pub fn submit_guess(
        &mut self,
        name: &str,
        guess: &str,
        round: Option<u32>,
    ) -> Result<Vec<SessionEvent>, Error> {
        self.ensure_member(name)?;
        self.get_current_round_mut(round)?.submit_guess(name, guess)?;
        Ok(self.round_event().into_iter().collect())
    }

    /// Derived transitions, re-evaluated after every mutating command: the
    /// round moves to approval once every connected cluer has a clue, and clues
    /// are approved without review when there is no connected approver.
    fn advance(&mut self) -> Result<(), Error> {
        let connected = self.connected_names();
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };

        if round.phase() == &RoundFsmState::Clueing {
            let connected_refs: Vec<&str> = connected.iter().map(String::as_str).collect();
            if round.have_all_cluers_submitted(&connected_refs) {
                let cluers: Vec<String> = round
                    .clues()
                    .iter()
                    .filter(|slot| slot.clue.is_some() && connected.contains(&slot.cluer))
                    .map(|slot| slot.cluer.to_string())
                    .collect();
                let approver = self.approver_policy.choose(round.guesser(), &cluers);
                log::info!(
                    "All clues submitted. SessionId: '{}', Approver: '{:?}'.",
                    self.id,
                    approver
                );
                round.start_approval(approver)?;
            }
        }

        if round.phase() == &RoundFsmState::Approving {
            let approver_is_connected = round
                .approver()
                .is_some_and(|approver| connected.iter().any(|name| name == approver));
            if !approver_is_connected {
                log::info!(
                    "No connected approver, approving every clue. SessionId: '{}'.",
                    self.id
                );
                round.auto_approve()?;
            }
        }

        Ok(())
    }

    fn roster_event(&self) -> SessionEvent {
        SessionEvent::RosterUpdated {
            players: self.players.to_vec(),
            started: self.is_started(),
        }
    }

    fn round_event(&self) -> Option<SessionEvent> {
        let round = self.round.as_ref()?;
        let event = match round.phase() {
            RoundFsmState::Clueing => {
                let mut clues: Vec<(String, Option<String>)> = round
                    .clues()
                    .iter()
                    .map(|slot| (slot.cluer.to_string(), slot.clue.clone()))
                    .collect();
                clues.sort_by(|(left, _), (right, _)| left.cmp(right));
                SessionEvent::CluesUpdated {
                    round: round.number(),
                    guesser: round.guesser().to_string(),
                    secret_word: round.secret_word().to_string(),
                    clues,
                }
            }
            RoundFsmState::Approving => SessionEvent::RevealClues {
                round: round.number(),
                guesser: round.guesser().to_string(),
                approver: round.approver().map(str::to_string),
                review: round.review().to_vec(),
                selection: round.selection().to_vec(),
            },
            RoundFsmState::Guessing => SessionEvent::GuessingStarted {
                round: round.number(),
                guesser: round.guesser().to_string(),
                approved_clues: round.approved_clues().to_vec(),
            },
            RoundFsmState::Resolved => {
                let outcome = round.outcome()?;
                SessionEvent::GuessResolved {
                    round: round.number(),
                    guesser: round.guesser().to_string(),
                    guess: outcome.guess.to_string(),
                    correct: outcome.correct,
                    secret_word: round.secret_word().to_string(),
                }
            }
        };
        Some(event)
    }

    fn get_current_round_mut(&mut self, addressed: Option<u32>) -> Result<&mut Round, Error> {
        let round = self
            .round
            .as_mut()
            .ok_or_else(|| DomainError::NoActiveRound(self.id.to_string()))?;
        match addressed {
            Some(number) if number != round.number() => {
                Err(DomainError::StaleRound(number, round.number()).into())
            }
            _ => Ok(round),
        }
    }

    fn connected_names(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|player| player.is_connected())
            .map(|player| player.name.to_string())
            .collect()
    }

    fn prune_disconnected_players(&mut self) {
        self.players.retain(|player| player.is_connected());
    }

    fn ensure_member(&self, name: &str) -> Result<(), Error> {
        match self.get_player(name) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotAMember(name.to_string()).into()),
        }
    }

    fn get_player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    fn get_player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.name == name)
    }
}

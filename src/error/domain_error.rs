use thiserror::Error;

use crate::round::round_fsm::RoundFsmState;

/// The four rejection families a command can fall into. Only the family is
/// useful for metrics and logs; the issuing member is told nothing beyond
/// "rejected".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    InvalidPhase,
    NotAMember,
    NotAuthorized,
    PreconditionFailed,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Invalid phase for the command. ActualPhase: '{0:?}', ExpectedPhase: '{1:?}'.")]
    InvalidPhase(RoundFsmState, RoundFsmState),
    #[error("There is no active round in the session. SessionId: '{0}'.")]
    NoActiveRound(String),
    #[error("The session already has an unresolved round. SessionId: '{0}'.")]
    RoundInProgress(String),
    #[error("The command addressed a round that is no longer current. AddressedRound: '{0}', CurrentRound: '{1}'.")]
    StaleRound(u32, u32),
    #[error("The player is not a member of the session. Name: '{0}'.")]
    NotAMember(String),
    #[error("The guesser cannot submit clues. Name: '{0}'.")]
    GuesserCannotSubmitClue(String),
    #[error("Only the guesser can submit a guess. Name: '{0}'.")]
    NonGuesserCannotGuess(String),
    #[error("Only the approver can approve clues. Name: '{0}'.")]
    NonApproverCannotApproveClues(String),
    #[error("Not enough players to start a round. ActualPlayers: '{0}', MinimumPlayers: '{1}'.")]
    NotEnoughPlayers(usize, usize),
    #[error("The chosen guesser is not a connected member. Name: '{0}'.")]
    GuesserIsNotAMember(String),
    #[error("A clue cannot be empty. Name: '{0}'.")]
    EmptyClue(String),
    #[error("The approved clue was not submitted in this round. Clue: '{0}'.")]
    UnknownApprovedClue(String),
    #[error("A player name cannot be empty.")]
    EmptyName,
    #[error("A player with the same name already exists. Name: '{0}'.")]
    NameAlreadyTaken(String),
    #[error("A player connected more than once cannot be renamed. Name: '{0}'.")]
    RenameWithSeveralConnections(String),
    #[error("The session is in progress and its roster is frozen. SessionId: '{0}'.")]
    SessionInProgress(String),
    #[error("The session id is not valid. SessionId: '{0}'.")]
    InvalidSessionId(String),
}

impl DomainError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            DomainError::InvalidPhase(_, _)
            | DomainError::NoActiveRound(_)
            | DomainError::RoundInProgress(_)
            | DomainError::StaleRound(_, _) => RejectionKind::InvalidPhase,
            DomainError::NotAMember(_) => RejectionKind::NotAMember,
            DomainError::GuesserCannotSubmitClue(_)
            | DomainError::NonGuesserCannotGuess(_)
            | DomainError::NonApproverCannotApproveClues(_) => RejectionKind::NotAuthorized,
            DomainError::NotEnoughPlayers(_, _)
            | DomainError::GuesserIsNotAMember(_)
            | DomainError::EmptyClue(_)
            | DomainError::UnknownApprovedClue(_)
            | DomainError::EmptyName
            | DomainError::NameAlreadyTaken(_)
            | DomainError::RenameWithSeveralConnections(_)
            | DomainError::SessionInProgress(_)
            | DomainError::InvalidSessionId(_) => RejectionKind::PreconditionFailed,
        }
    }
}

use std::fmt;

use rust_fsm::state_machine;

state_machine! {
    derive(Debug, Clone, PartialEq)
    pub RoundFsm(Clueing)

    Clueing => {
        AllCluesSubmitted => Approving
    },
    Approving => {
        CluesApproved => Guessing
    },
    Guessing => {
        GuessSubmitted => Resolved
    }
}

impl fmt::Display for RoundFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

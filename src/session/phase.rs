use crate::MoveNumber;

/// Where a hand stands, from the local side's move counter.
/// Phases only ever advance within one hand.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    AwaitingEntropyCommit,
    AwaitingDiscardSelection,
    AwaitingFinalReveal,
    HandComplete,
}

impl TryFrom<MoveNumber> for Phase {
    type Error = crate::Error;
    fn try_from(n: MoveNumber) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Phase::AwaitingEntropyCommit),
            1 => Ok(Phase::AwaitingDiscardSelection),
            2 => Ok(Phase::AwaitingFinalReveal),
            crate::FINAL_MOVE => Ok(Phase::HandComplete),
            n => Err(crate::Error::InvalidPhase(n)),
        }
    }
}

impl From<Phase> for MoveNumber {
    fn from(phase: Phase) -> MoveNumber {
        phase as MoveNumber
    }
}

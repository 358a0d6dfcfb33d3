use crate::MoveNumber;
use crate::Peak;
use crate::cards::Selection;
use crate::engine::GameId;
use crate::engine::Readable;
use crate::settlement::WatchReport;

/// Inputs the session processes one at a time, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Inbound peer message.
    DeliverMessage(String),
    /// Advance the local side of the hand. The payload follows from the phase.
    MakeMove,
    /// Engine reported an opponent move; tagged with our move number at the time.
    TakeOpponentMove(MoveNumber, GameId, Readable),
    TakeGameMessage(MoveNumber, GameId, Readable),
    SetCardSelections(Selection),
    StartGame,
    ShutDown(Option<String>),
    /// The engine finished on its own; tear it down.
    ReceivedShutdown,
    TakeBlockData(Peak, WatchReport),
}

impl Event {
    /// Events still meaningful once the session is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::ShutDown(_) | Event::ReceivedShutdown)
    }
    /// Local play, refused while the channel is closing.
    pub fn is_play(&self) -> bool {
        matches!(
            self,
            Event::MakeMove | Event::SetCardSelections(_) | Event::StartGame
        )
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::DeliverMessage(m) => write!(f, "DeliverMessage({} bytes)", m.len()),
            Event::MakeMove => write!(f, "MakeMove"),
            Event::TakeOpponentMove(n, id, _) => write!(f, "TakeOpponentMove({}, {})", n, id),
            Event::TakeGameMessage(n, id, _) => write!(f, "TakeGameMessage({}, {})", n, id),
            Event::SetCardSelections(s) => write!(f, "SetCardSelections({})", s),
            Event::StartGame => write!(f, "StartGame"),
            Event::ShutDown(reason) => write!(f, "ShutDown({:?})", reason),
            Event::ReceivedShutdown => write!(f, "ReceivedShutdown"),
            Event::TakeBlockData(peak, _) => write!(f, "TakeBlockData({})", peak),
        }
    }
}

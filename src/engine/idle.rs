use super::*;
use crate::Amount;
use crate::settlement::Transaction;

/// Everything one `idle` poll produced.
/// Each field is either absolute state or an additive delta, never a diff.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Idle {
    /// Another poll is needed to reach quiescence.
    pub continue_on: bool,
    pub finished: bool,
    pub handshake_done: bool,
    pub outbound_messages: Vec<String>,
    pub outbound_transactions: Vec<Transaction>,
    pub receive_error: Option<String>,
    pub notifications: Vec<Notification>,
}

/// Game-level happenings the engine reports during a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    OpponentMoved { game_id: GameId, readable: Readable },
    GameMessage { game_id: GameId, readable: Readable },
    GameStarted { game_ids: Vec<GameId> },
    /// The hand was accepted and paid out.
    GameFinished { game_id: GameId, amount: Amount },
}

use crate::cards::*;

/// Decoded payload attached to an opponent move or game message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readable {
    /// Both dealt hands, Alice's first.
    Hands([Vec<Card>; 2]),
    /// Result of the final reveal.
    Result(GameResult),
    /// Nothing the session needs to interpret.
    Opaque(String),
}

/// The engine's account of a finished hand.
///
/// Alice is the sub-game first mover, the side that did not open the channel.
/// `win_direction` is positive when the channel opener won, negative when
/// Alice won and zero on a tie.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GameResult {
    /// Cards the opponent passed, over the opponent's dealt hand.
    pub their_discards: Selection,
    /// Alice's five used cards, over her final eight.
    pub alice_picks: Selection,
    /// Bob's five used cards, over his final eight.
    pub bob_picks: Selection,
    pub alice_value: HandValue,
    pub bob_value: HandValue,
    pub win_direction: i8,
}

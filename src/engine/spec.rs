use crate::Amount;
use crate::settlement::Coin;

/// Sub-game identifier assigned by the engine.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel parameters handed to the engine when the session opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub unique_id: String,
    pub coin: Coin,
    pub my_contribution: Amount,
    pub their_contribution: Amount,
    pub channel_timeout: u64,
    pub unroll_timeout: u64,
    /// Whether we hold the right to send first.
    pub have_potato: bool,
}

/// Terms of one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSpec {
    /// Hex of the game type name.
    pub game_type: String,
    pub timeout: u64,
    /// Total pot.
    pub amount: Amount,
    pub my_contribution: Amount,
    pub my_turn: bool,
    pub parameters: String,
}

impl GameSpec {
    /// Equal stakes, `per_game` from each side.
    pub fn new(game_type: &str, timeout: u64, per_game: Amount, my_turn: bool) -> Self {
        Self {
            game_type: game_type.bytes().map(|b| format!("{:02x}", b)).collect(),
            timeout,
            amount: 2 * per_game,
            my_contribution: per_game,
            my_turn,
            parameters: crate::GAME_PARAMETERS.to_string(),
        }
    }
}

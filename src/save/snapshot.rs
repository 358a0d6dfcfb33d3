use crate::Amount;
use crate::MoveNumber;
use crate::cards::*;
use crate::engine::GameId;
use crate::engine::GameResult;

/// Everything needed to rebuild a session after a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub id: String,
    /// Unix seconds.
    pub saved_at: u64,
    /// Opaque engine blob.
    pub engine: String,
    pub unique_id: String,
    pub i_started: bool,
    pub amount: Amount,
    pub move_number: MoveNumber,
    pub my_turn: bool,
    pub card_selections: Selection,
    pub handshake_done: bool,
    pub player_hand: Vec<Card>,
    pub opponent_hand: Vec<Card>,
    pub game_ids: Vec<GameId>,
    /// Last engine result of the current hand, from which the outcome is re-derived.
    #[serde(default)]
    pub result: Option<GameResult>,
}

impl Snapshot {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Seconds since the unix epoch.
pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

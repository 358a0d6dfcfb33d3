use super::*;
use crate::MoveNumber;
use crate::cards::*;
use crate::engine::GameId;
use crate::outcome::Outcome;

/// Partial update published to observers.
///
/// Absent fields mean "unchanged". `outcome` distinguishes absent from an
/// explicit `null`, which clears the previous result. Unknown keys are
/// ignored when decoding.
#[derive(Debug, Default, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_connection_state: Option<ConnectionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_hand: Option<Vec<Card>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_hand: Option<Vec<Card>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_number: Option<MoveNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_turn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_selections: Option<Selection>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double")]
    pub outcome: Option<Option<Outcome>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_ids: Option<Vec<GameId>>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
    pub fn state(state: StateId) -> Self {
        Self::connection(ConnectionState::new(state))
    }
    pub fn connection(state: ConnectionState) -> Self {
        Self {
            game_connection_state: Some(state),
            ..Self::default()
        }
    }
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
    /// Overlay `other` on top of `self`, later fields winning.
    pub fn merge(self, other: Delta) -> Self {
        Self {
            game_connection_state: other.game_connection_state.or(self.game_connection_state),
            player_hand: other.player_hand.or(self.player_hand),
            opponent_hand: other.opponent_hand.or(self.opponent_hand),
            move_number: other.move_number.or(self.move_number),
            my_turn: other.my_turn.or(self.my_turn),
            card_selections: other.card_selections.or(self.card_selections),
            outcome: other.outcome.or(self.outcome),
            error: other.error.or(self.error),
            game_ids: other.game_ids.or(self.game_ids),
        }
    }
}

/// present-but-null decodes as Some(None)
fn double<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

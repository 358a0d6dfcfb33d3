use super::*;
use crate::cards::*;
use crate::engine::GameResult;

/// Human-facing reading of a finished hand.
///
/// Built from the dealt hands and the engine's [`GameResult`]. Alice is hand
/// index 0, the side with `i_started == false`; Bob is index 1. The engine
/// reports `win_direction` from Bob's seat, so the local direction is the raw
/// one when we are Bob and its negation when we are Alice.
///
/// Construction is pure: the same inputs always yield an equal value, which
/// is what lets a resumed session re-derive it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Outcome {
    pub i_started: bool,
    pub alice_cards: Vec<Card>,
    pub bob_cards: Vec<Card>,
    pub alice_discards: Selection,
    pub bob_discards: Selection,
    pub alice_final_hand: Vec<Card>,
    pub bob_final_hand: Vec<Card>,
    pub alice_picks: Selection,
    pub bob_picks: Selection,
    pub alice_used: Vec<Card>,
    pub bob_used: Vec<Card>,
    pub alice_value: HandValue,
    pub bob_value: HandValue,
    pub alice_ranking: Option<Ranking>,
    pub bob_ranking: Option<Ranking>,
    /// Positive when the local player won.
    pub win_direction: i8,
    pub verdict: Verdict,
}

impl Outcome {
    pub fn new(
        i_started: bool,
        my_discards: Selection,
        alice_cards: &[Card],
        bob_cards: &[Card],
        result: &GameResult,
    ) -> Self {
        let (alice_discards, bob_discards) = match i_started {
            true => (result.their_discards, my_discards),
            false => (my_discards, result.their_discards),
        };
        let (alice_passed, alice_kept) = alice_discards.apply(alice_cards);
        let (bob_passed, bob_kept) = bob_discards.apply(bob_cards);
        let alice_final_hand = [alice_kept, bob_passed].concat();
        let bob_final_hand = [bob_kept, alice_passed].concat();
        let alice_used = result.alice_picks.apply(&alice_final_hand).0;
        let bob_used = result.bob_picks.apply(&bob_final_hand).0;
        let win_direction = match i_started {
            true => result.win_direction.signum(),
            false => -result.win_direction.signum(),
        };
        Self {
            i_started,
            alice_cards: alice_cards.to_vec(),
            bob_cards: bob_cards.to_vec(),
            alice_discards,
            bob_discards,
            alice_final_hand,
            bob_final_hand,
            alice_picks: result.alice_picks,
            bob_picks: result.bob_picks,
            alice_used,
            bob_used,
            alice_ranking: result.alice_value.ranking(),
            bob_ranking: result.bob_value.ranking(),
            alice_value: result.alice_value.clone(),
            bob_value: result.bob_value.clone(),
            win_direction,
            verdict: Verdict::from(win_direction),
        }
    }

    pub fn my_final_hand(&self) -> &[Card] {
        match self.i_started {
            true => &self.bob_final_hand,
            false => &self.alice_final_hand,
        }
    }
    pub fn their_final_hand(&self) -> &[Card] {
        match self.i_started {
            true => &self.alice_final_hand,
            false => &self.bob_final_hand,
        }
    }
    pub fn my_used(&self) -> &[Card] {
        match self.i_started {
            true => &self.bob_used,
            false => &self.alice_used,
        }
    }
    pub fn my_ranking(&self) -> Option<Ranking> {
        match self.i_started {
            true => self.bob_ranking,
            false => self.alice_ranking,
        }
    }
    pub fn their_ranking(&self) -> Option<Ranking> {
        match self.i_started {
            true => self.alice_ranking,
            false => self.bob_ranking,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let describe = |r: Option<Ranking>| r.map(|r| r.to_string()).unwrap_or_else(|| "?".into());
        write!(
            f,
            "{} ({} vs {})",
            self.verdict,
            describe(self.my_ranking()),
            describe(self.their_ranking())
        )
    }
}

use crate::cards::Selection;
use rand::Rng;

/// What a local move reveals to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Entropy commitment. No content.
    Start,
    /// Which four cards to pass to the opponent.
    Discards(Selection),
    /// Final reveal. No content.
    Finish,
}

impl Payload {
    /// Hex of the serialized atom the engine expects.
    /// Empty payloads are the nil atom `80`; a discard mask is the one-byte
    /// atom `81 xx`.
    pub fn encode(&self) -> String {
        match self {
            Payload::Start | Payload::Finish => crate::GAME_PARAMETERS.to_string(),
            Payload::Discards(mask) => format!("{:x}", 0x8100u16 | u16::from(mask.bits())),
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Fresh randomness mixed into every move.
/// Only the engine reads the bytes; nothing formats them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entropy([u8; 32]);

impl Entropy {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        Self(bytes)
    }
    pub fn bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Entropy {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Entropy(..)")
    }
}

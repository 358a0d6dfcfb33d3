/// Result of a hand from the local player's seat.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win,
    Lose,
    Tie,
}

impl From<i8> for Verdict {
    fn from(direction: i8) -> Self {
        match direction.signum() {
            1 => Verdict::Win,
            -1 => Verdict::Lose,
            _ => Verdict::Tie,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::Win => write!(f, "win"),
            Verdict::Lose => write!(f, "lose"),
            Verdict::Tie => write!(f, "tie"),
        }
    }
}

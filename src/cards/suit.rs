/// Card suit as the engine reveals it, numbered 1 through 4.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Suit {
    #[default]
    Club = 1,
    Diamond = 2,
    Heart = 3,
    Spade = 4,
}

impl TryFrom<u8> for Suit {
    type Error = anyhow::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Suit::Club),
            2 => Ok(Suit::Diamond),
            3 => Ok(Suit::Heart),
            4 => Ok(Suit::Spade),
            _ => Err(anyhow::anyhow!("invalid suit: {}", n)),
        }
    }
}
impl From<Suit> for u8 {
    fn from(s: Suit) -> u8 {
        s as u8
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Club => "c",
                Suit::Diamond => "d",
                Suit::Heart => "h",
                Suit::Spade => "s",
            }
        )
    }
}

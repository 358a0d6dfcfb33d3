use super::rank::Rank;
use super::suit::Suit;
use std::fmt::Display;
use std::fmt::Formatter;

/// A single revealed card.
/// Serialized as the `[rank, suit]` pair the engine and the UI exchange.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "[u8; 2]", try_from = "[u8; 2]")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

/// [rank, suit] isomorphism
impl From<Card> for [u8; 2] {
    fn from(c: Card) -> [u8; 2] {
        [u8::from(c.rank), u8::from(c.suit)]
    }
}
impl TryFrom<[u8; 2]> for Card {
    type Error = anyhow::Error;
    fn try_from([rank, suit]: [u8; 2]) -> Result<Self, Self::Error> {
        Ok(Self {
            rank: Rank::try_from(rank)?,
            suit: Suit::try_from(suit)?,
        })
    }
}

/// str isomorphism, e.g. "Ts"
impl TryFrom<&str> for Card {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        let rank = chars
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty card str"))?;
        let suit = match chars.next() {
            Some('c') => Suit::Club,
            Some('d') => Suit::Diamond,
            Some('h') => Suit::Heart,
            Some('s') => Suit::Spade,
            _ => return Err(anyhow::anyhow!("invalid card str: {}", s)),
        };
        match chars.next() {
            Some(_) => Err(anyhow::anyhow!("invalid card str: {}", s)),
            None => Ok(Self {
                rank: Rank::try_from(rank.to_string().as_str())?,
                suit,
            }),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_engine_pair() {
        let card = Card::try_from([1, 4]).unwrap();
        assert_eq!(card.rank(), Rank::Ace);
        assert_eq!(card.suit(), Suit::Spade);
        assert_eq!(<[u8; 2]>::from(card), [14, 4]);
    }

    #[test]
    fn rejects_bad_pair() {
        assert!(Card::try_from([7, 0]).is_err());
        assert!(Card::try_from([0, 2]).is_err());
    }

    #[test]
    fn display_matches_str() {
        let card = Card::try_from("Th").unwrap();
        assert_eq!(card.to_string(), "Th");
    }

    #[test]
    fn serializes_as_pair() {
        let card = Card::new(Rank::Queen, Suit::Diamond);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "[12,2]");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
        assert!(serde_json::from_str::<Card>("[12,9]").is_err());
    }
}

use super::rank::Rank;

/// Category of a five-card hand, as read off the engine's hand value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOAK(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOAK(Rank),
    StraightFlush(Rank),
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "high card {}", r),
            Ranking::OnePair(r) => write!(f, "pair of {}", r.plural()),
            Ranking::TwoPair(hi, lo) => {
                write!(f, "two pair, {} and {}", hi.plural(), lo.plural())
            }
            Ranking::ThreeOAK(r) => write!(f, "three {}", r.plural()),
            Ranking::Straight(r) => write!(f, "{} high straight", r),
            Ranking::Flush(r) => write!(f, "{} high flush", r),
            Ranking::FullHouse(t, p) => {
                write!(f, "full house, {} over {}", t.plural(), p.plural())
            }
            Ranking::FourOAK(r) => write!(f, "four {}", r.plural()),
            Ranking::StraightFlush(r) => write!(f, "{} high straight flush", r),
        }
    }
}

use super::rank::Rank;
use super::ranking::Ranking;

/// Hand value as computed by the engine: group sizes, largest first,
/// followed by the ranks that break ties. Values compare lexicographically.
///
/// - straight flush `[5, high]`
/// - four of a kind `[4, 1, quad, kicker]`
/// - full house `[3, 2, trips, pair]`
/// - flush `[3, 1, 3, r1..r5]`
/// - straight `[3, 1, 2, high]`
/// - three of a kind `[3, 1, 1, trips, k1, k2]`
/// - two pair `[2, 2, 1, hi, lo, kicker]`
/// - pair `[2, 1, 1, 1, pair, k1, k2, k3]`
/// - high card `[1, 1, 1, 1, 1, r1..r5]`
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HandValue(Vec<u8>);

impl HandValue {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// None when the value does not follow any known layout.
    pub fn ranking(&self) -> Option<Ranking> {
        let rank = |i: usize| self.0.get(i).and_then(|n| Rank::try_from(*n).ok());
        match self.0.as_slice() {
            [5, ..] => Some(Ranking::StraightFlush(rank(1)?)),
            [4, 1, ..] => Some(Ranking::FourOAK(rank(2)?)),
            [3, 2, ..] => Some(Ranking::FullHouse(rank(2)?, rank(3)?)),
            [3, 1, 3, ..] => Some(Ranking::Flush(rank(3)?)),
            [3, 1, 2, ..] => Some(Ranking::Straight(rank(3)?)),
            [3, 1, 1, ..] => Some(Ranking::ThreeOAK(rank(3)?)),
            [2, 2, 1, ..] => Some(Ranking::TwoPair(rank(3)?, rank(4)?)),
            [2, 1, 1, 1, ..] => Some(Ranking::OnePair(rank(4)?)),
            [1, 1, 1, 1, 1, ..] => Some(Ranking::HighCard(rank(5)?)),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for HandValue {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for HandValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.ranking() {
            Some(ranking) => write!(f, "{}", ranking),
            None => write!(f, "{:?}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_pair() {
        let value = HandValue::from(vec![2, 2, 1, 4, 2, 12]);
        assert_eq!(value.ranking(), Some(Ranking::TwoPair(Rank::Four, Rank::Two)));
    }

    #[test]
    fn pair() {
        let value = HandValue::from(vec![2, 1, 1, 1, 3, 14, 13, 11]);
        assert_eq!(value.ranking(), Some(Ranking::OnePair(Rank::Three)));
    }

    #[test]
    fn layouts_order_like_poker() {
        let values = [
            vec![1, 1, 1, 1, 1, 14, 12, 9, 5, 3],
            vec![2, 1, 1, 1, 3, 14, 13, 11],
            vec![2, 2, 1, 4, 2, 12],
            vec![3, 1, 1, 7, 13, 2],
            vec![3, 1, 2, 9],
            vec![3, 1, 3, 13, 11, 8, 4, 2],
            vec![3, 2, 5, 9],
            vec![4, 1, 6, 2],
            vec![5, 10],
        ]
        .map(HandValue::from);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert!(values
            .windows(2)
            .all(|w| w[0].ranking().unwrap() < w[1].ranking().unwrap()));
    }

    #[test]
    fn unknown_layout() {
        assert_eq!(HandValue::from(vec![9, 9]).ranking(), None);
        assert_eq!(HandValue::default().ranking(), None);
        assert_eq!(HandValue::from(vec![2, 2, 1, 40, 2, 12]).ranking(), None);
    }

    #[test]
    fn displays_ranking() {
        let value = HandValue::from(vec![3, 2, 13, 4]);
        assert_eq!(value.to_string(), "full house, kings over fours");
    }
}

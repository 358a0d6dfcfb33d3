use super::card::Card;

/// Bitmask over the eight slots of a dealt hand.
/// Bit i refers to slot i, in the order the engine revealed the cards.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Selection(u8);

impl Selection {
    pub const fn empty() -> Self {
        Self(0)
    }
    pub fn bits(&self) -> u8 {
        self.0
    }
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
    pub fn contains(&self, slot: usize) -> bool {
        slot < crate::HAND_SIZE && self.0 & (1 << slot) != 0
    }
    /// True when exactly the number of cards to pass has been marked.
    pub fn is_complete(&self) -> bool {
        self.count() == crate::DISCARD_COUNT
    }
    /// Flip one slot, ignoring slots past the end of the hand.
    pub fn toggle(self, slot: usize) -> Self {
        match slot {
            0..crate::HAND_SIZE => Self(self.0 ^ (1 << slot)),
            _ => self,
        }
    }
    pub fn complement(self) -> Self {
        Self(!self.0)
    }
    /// Split cards into (selected, unselected), preserving order.
    pub fn apply(&self, cards: &[Card]) -> (Vec<Card>, Vec<Card>) {
        cards
            .iter()
            .enumerate()
            .fold((Vec::new(), Vec::new()), |(mut hit, mut miss), (i, c)| {
                match self.contains(i) {
                    true => hit.push(*c),
                    false => miss.push(*c),
                }
                (hit, miss)
            })
    }
}

/// u8 isomorphism
impl From<u8> for Selection {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}
impl From<Selection> for u8 {
    fn from(s: Selection) -> u8 {
        s.0
    }
}

/// slot indices
impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |s, i| match s.contains(i) {
            true => s,
            false => s.toggle(i),
        })
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Vec<Card> {
        ["2c", "3d", "4h", "5s", "6c", "7d", "8h", "9s"]
            .into_iter()
            .map(|s| Card::try_from(s).unwrap())
            .collect()
    }

    #[test]
    fn counts_bits() {
        assert_eq!(Selection::from(0b0000_1111).count(), 4);
        assert!(Selection::from(0b1010_0101).is_complete());
        assert!(!Selection::from(0b0000_0111).is_complete());
    }

    #[test]
    fn bit_i_is_slot_i() {
        let (picked, rest) = Selection::from(0b1000_0001).apply(&hand());
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].to_string(), "2c");
        assert_eq!(picked[1].to_string(), "9s");
        assert_eq!(rest.len(), 6);
    }

    #[test]
    fn toggle_ignores_out_of_range() {
        let s = Selection::empty().toggle(3).toggle(9);
        assert_eq!(s.bits(), 0b0000_1000);
        assert_eq!(s.toggle(3), Selection::empty());
    }

    #[test]
    fn collects_slots() {
        let s = [0, 2, 2, 7].into_iter().collect::<Selection>();
        assert_eq!(s.bits(), 0b1000_0101);
    }
}

use super::transaction::Coin;
use crate::Peak;

/// Watched outputs observed since the previous report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WatchReport {
    #[serde(default)]
    pub created_watched: Vec<Coin>,
    #[serde(default)]
    pub deleted_watched: Vec<Coin>,
    #[serde(default)]
    pub timed_out: Vec<Coin>,
}

/// How overlapping watch reports are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Merge {
    /// Append everything, duplicates included.
    #[default]
    Concatenate,
    /// Append only coins not already present in the same list.
    Deduplicate,
}

impl WatchReport {
    pub fn is_empty(&self) -> bool {
        self.created_watched.is_empty() && self.deleted_watched.is_empty() && self.timed_out.is_empty()
    }

    pub fn merge(mut self, other: WatchReport, policy: Merge) -> Self {
        Self::extend(&mut self.created_watched, other.created_watched, policy);
        Self::extend(&mut self.deleted_watched, other.deleted_watched, policy);
        Self::extend(&mut self.timed_out, other.timed_out, policy);
        self
    }

    fn extend(into: &mut Vec<Coin>, from: Vec<Coin>, policy: Merge) {
        match policy {
            Merge::Concatenate => into.extend(from),
            Merge::Deduplicate => from.into_iter().for_each(|coin| {
                if !into.contains(&coin) {
                    into.push(coin);
                }
            }),
        }
    }
}

/// One block notification from the settlement layer.
/// A notification may cover several blocks and so carry several reports.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub peak: Peak,
    pub reports: Vec<WatchReport>,
}

impl Block {
    pub fn new(peak: Peak, report: WatchReport) -> Self {
        Self {
            peak,
            reports: vec![report],
        }
    }
    /// Collapse into the single report handed to the engine.
    pub fn fold(self, policy: Merge) -> (Peak, WatchReport) {
        let report = self
            .reports
            .into_iter()
            .fold(WatchReport::default(), |acc, r| acc.merge(r, policy));
        (self.peak, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(created: &[&str], deleted: &[&str], timed_out: &[&str]) -> WatchReport {
        WatchReport {
            created_watched: created.iter().map(|c| Coin::from(*c)).collect(),
            deleted_watched: deleted.iter().map(|c| Coin::from(*c)).collect(),
            timed_out: timed_out.iter().map(|c| Coin::from(*c)).collect(),
        }
    }

    fn block() -> Block {
        Block {
            peak: 12,
            reports: vec![
                report(&["a", "b"], &["x"], &[]),
                report(&["b", "c"], &["x"], &["t"]),
            ],
        }
    }

    #[test]
    fn concatenate_keeps_duplicates() {
        let (peak, merged) = block().fold(Merge::Concatenate);
        assert_eq!(peak, 12);
        assert_eq!(merged, report(&["a", "b", "b", "c"], &["x", "x"], &["t"]));
    }

    #[test]
    fn deduplicate_drops_repeats() {
        let (_, merged) = block().fold(Merge::Deduplicate);
        assert_eq!(merged, report(&["a", "b", "c"], &["x"], &["t"]));
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let once = block().fold(Merge::Deduplicate).1;
        let twice = once.clone().merge(once.clone(), Merge::Deduplicate);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_block() {
        let (_, merged) = Block::default().fold(Merge::Concatenate);
        assert!(merged.is_empty());
    }
}

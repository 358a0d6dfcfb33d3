use thiserror::Error;

/// Failures reported by the settlement layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// A coin this spend depends on is not confirmed yet. Resubmit later.
    #[error("unknown unspent: {0}")]
    UnknownUnspent(String),
    /// Anything else the layer refused. Never resubmitted.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("unreachable: {0}")]
    Unreachable(String),
}

impl SettlementError {
    /// Sort a raw failure message into the transient or opaque class.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        match message.contains(crate::UNKNOWN_UNSPENT) {
            true => Self::UnknownUnspent(message),
            false => Self::Rejected(message),
        }
    }
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UnknownUnspent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_marker() {
        let e = SettlementError::classify("push_tx failed: UNKNOWN_UNSPENT");
        assert!(e.is_transient());
        let e = SettlementError::classify("DOUBLE_SPEND");
        assert_eq!(e, SettlementError::Rejected("DOUBLE_SPEND".into()));
        assert!(!e.is_transient());
        assert!(!SettlementError::Unreachable("down".into()).is_transient());
    }
}

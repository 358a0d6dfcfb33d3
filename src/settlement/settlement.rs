use super::*;
use crate::Amount;

/// Blockchain-facing capability: funds the channel and records spends.
/// Block notifications are delivered separately as a stream of [`Block`]s.
#[async_trait::async_trait]
pub trait Settlement: Send + Sync {
    /// Produce a coin worth `amount` that the channel can be funded from.
    async fn create_spendable(
        &self,
        unique_id: &str,
        target: &str,
        amount: Amount,
    ) -> Result<Spendable, SettlementError>;

    /// Submit a signed transaction once. Retrying is the caller's business.
    async fn submit(&self, transaction: &Transaction) -> Result<Receipt, SettlementError>;
}

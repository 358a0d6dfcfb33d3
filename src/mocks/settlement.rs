use crate::Amount;
use crate::settlement::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

/// Settlement layer with scripted answers.
/// Submissions succeed unless a response was queued with [`Ledger::respond`].
#[derive(Debug, Clone, Default)]
pub struct Ledger(Arc<Mutex<Book>>);

#[derive(Debug, Default)]
struct Book {
    responses: VecDeque<Result<Receipt, SettlementError>>,
    submitted: Vec<Transaction>,
    requests: Vec<(String, String, Amount)>,
    spendable: Option<SettlementError>,
}

impl Ledger {
    pub fn respond(&self, response: Result<Receipt, SettlementError>) {
        self.book(|b| b.responses.push_back(response));
    }
    /// Make every coin request fail with `error`.
    pub fn refuse_spendable(&self, error: SettlementError) {
        self.book(|b| b.spendable = Some(error));
    }
    pub fn submitted(&self) -> Vec<Transaction> {
        self.book(|b| b.submitted.clone())
    }
    /// (unique id, target, amount) of every coin request.
    pub fn requests(&self) -> Vec<(String, String, Amount)> {
        self.book(|b| b.requests.clone())
    }
    fn book<R>(&self, f: impl FnOnce(&mut Book) -> R) -> R {
        match self.0.lock() {
            Ok(mut guard) => f(&mut *guard),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait::async_trait]
impl Settlement for Ledger {
    async fn create_spendable(
        &self,
        unique_id: &str,
        target: &str,
        amount: Amount,
    ) -> Result<Spendable, SettlementError> {
        self.book(|b| {
            b.requests
                .push((unique_id.to_string(), target.to_string(), amount));
            match b.spendable.clone() {
                Some(e) => Err(e),
                None => Ok(Spendable {
                    coin: Coin(format!("coin-{}", b.requests.len())),
                    from: target.to_string(),
                }),
            }
        })
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Receipt, SettlementError> {
        self.book(|b| {
            b.submitted.push(transaction.clone());
            b.responses.pop_front().unwrap_or_else(|| {
                Ok(Receipt {
                    status: "SUCCESS".to_string(),
                })
            })
        })
    }
}

use super::*;
use crate::session::Delta;
use crate::session::Observers;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Submits engine transactions in the background.
///
/// Each transaction gets its own task. An unknown-unspent rejection is
/// resubmitted after a fixed delay, forever; any other failure is published
/// as an error and dropped. Outstanding tasks are aborted when the relay is
/// dropped; [`Relay::flush`] waits for them instead.
pub struct Relay {
    settlement: Arc<dyn Settlement>,
    observers: Observers,
    delay: Duration,
    tasks: Vec<JoinHandle<()>>,
}

impl Relay {
    pub fn new(settlement: Arc<dyn Settlement>, observers: Observers, delay: Duration) -> Self {
        Self {
            settlement,
            observers,
            delay,
            tasks: Vec::new(),
        }
    }

    pub fn settlement(&self) -> &Arc<dyn Settlement> {
        &self.settlement
    }

    /// Submissions still retrying or in flight.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    pub fn submit(&mut self, transaction: Transaction) {
        self.tasks.retain(|t| !t.is_finished());
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => self.tasks.push(runtime.spawn(Self::relay(
                self.settlement.clone(),
                self.observers.clone(),
                transaction,
                self.delay,
            ))),
            Err(e) => {
                log::error!("[relay] no runtime to submit {}: {}", transaction, e);
                self.observers
                    .publish(Delta::error(format!("could not submit transaction: {}", e)));
            }
        }
    }

    /// Wait out every outstanding submission, retries included.
    pub async fn flush(mut self) {
        for task in std::mem::take(&mut self.tasks) {
            let _ = task
                .await
                .inspect_err(|e| log::warn!("[relay] submission task ended: {}", e));
        }
    }

    async fn relay(
        settlement: Arc<dyn Settlement>,
        observers: Observers,
        transaction: Transaction,
        delay: Duration,
    ) {
        loop {
            match settlement.submit(&transaction).await {
                Ok(receipt) => {
                    log::info!("[relay] submitted {}: {}", transaction, receipt.status);
                    return;
                }
                Err(e) if e.is_transient() => {
                    log::warn!("[relay] {} not yet spendable, retrying in {:?}", transaction, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log::error!("[relay] {} failed: {}", transaction, e);
                    observers.publish(Delta::error(e.to_string()));
                    return;
                }
            }
        }
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.tasks.iter().for_each(|t| t.abort());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::Ledger;

    fn unspent() -> SettlementError {
        SettlementError::classify("UNKNOWN_UNSPENT")
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_accepted() {
        let ledger = Ledger::default();
        ledger.respond(Err(unspent()));
        ledger.respond(Err(unspent()));
        let observers = Observers::default();
        let mut errors = observers.subscribe();
        let mut relay = Relay::new(Arc::new(ledger.clone()), observers, Duration::from_secs(30));
        relay.submit(Transaction::from("spend"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ledger.submitted().len(), 1);
        tokio::time::sleep(Duration::from_secs(28)).await;
        assert_eq!(ledger.submitted().len(), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ledger.submitted().len(), 2);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ledger.submitted().len(), 3);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(ledger.submitted().len(), 3);
        assert!(ledger.submitted().iter().all(|t| t == &Transaction::from("spend")));
        assert_eq!(relay.pending(), 0);
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn opaque_failure_is_surfaced_once() {
        let ledger = Ledger::default();
        ledger.respond(Err(SettlementError::Rejected("DOUBLE_SPEND".into())));
        let observers = Observers::default();
        let mut errors = observers.subscribe();
        let mut relay = Relay::new(Arc::new(ledger.clone()), observers, Duration::from_secs(30));
        relay.submit(Transaction::from("spend"));
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(ledger.submitted().len(), 1);
        let delta = errors.try_recv().unwrap();
        assert_eq!(delta.error.as_deref(), Some("rejected: DOUBLE_SPEND"));
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_retries() {
        let ledger = Ledger::default();
        (0..10).for_each(|_| ledger.respond(Err(unspent())));
        let mut relay = Relay::new(
            Arc::new(ledger.clone()),
            Observers::default(),
            Duration::from_secs(30),
        );
        relay.submit(Transaction::from("spend"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(relay.pending(), 1);
        drop(relay);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(ledger.submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_outlasts_retries() {
        let ledger = Ledger::default();
        ledger.respond(Err(unspent()));
        ledger.respond(Err(unspent()));
        let mut relay = Relay::new(
            Arc::new(ledger.clone()),
            Observers::default(),
            Duration::from_secs(30),
        );
        relay.submit(Transaction::from("closing"));
        relay.flush().await;
        assert_eq!(ledger.submitted().len(), 3);
    }

    #[test]
    fn no_runtime_is_reported() {
        let observers = Observers::default();
        let mut errors = observers.subscribe();
        let mut relay = Relay::new(
            Arc::new(Ledger::default()),
            observers,
            Duration::from_secs(30),
        );
        relay.submit(Transaction::from("spend"));
        assert!(errors.try_recv().unwrap().error.is_some());
        assert_eq!(relay.pending(), 0);
    }
}

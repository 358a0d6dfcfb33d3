use super::*;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::mpsc::*;

/// Fan-out of [`Delta`]s to every subscriber.
/// Cloned handles share one subscriber list; closed subscribers are dropped
/// on the next publish.
#[derive(Debug, Clone, Default)]
pub struct Observers(Arc<Mutex<Vec<UnboundedSender<Delta>>>>);

impl Observers {
    pub fn subscribe(&self) -> UnboundedReceiver<Delta> {
        let (tx, rx) = unbounded_channel();
        self.with(|list| list.push(tx));
        rx
    }

    pub fn publish(&self, delta: Delta) {
        if delta.is_empty() {
            return;
        }
        log::debug!("[session] publish {:?}", delta);
        self.with(|list| {
            list.retain(|inbox| {
                inbox
                    .send(delta.clone())
                    .inspect_err(|_| log::debug!("[session] dropping closed subscriber"))
                    .is_ok()
            })
        });
    }

    pub fn len(&self) -> usize {
        self.with(|list| list.len())
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with<R>(&self, f: impl FnOnce(&mut Vec<UnboundedSender<Delta>>) -> R) -> R {
        match self.0.lock() {
            Ok(mut guard) => f(&mut *guard),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_out() {
        let observers = Observers::default();
        let mut a = observers.subscribe();
        let mut b = observers.clone().subscribe();
        observers.publish(Delta::state(StateId::Running));
        assert_eq!(a.try_recv().unwrap(), Delta::state(StateId::Running));
        assert_eq!(b.try_recv().unwrap(), Delta::state(StateId::Running));
    }

    #[test]
    fn skips_empty() {
        let observers = Observers::default();
        let mut rx = observers.subscribe();
        observers.publish(Delta::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drops_closed() {
        let observers = Observers::default();
        drop(observers.subscribe());
        let _keep = observers.subscribe();
        assert_eq!(observers.len(), 2);
        observers.publish(Delta::error("x"));
        assert_eq!(observers.len(), 1);
    }
}

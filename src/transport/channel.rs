use tokio::sync::mpsc::*;

/// One end of an in-process duplex link between two sessions: the sender
/// serves as that session's [`super::Transport`], the receiver as its table's
/// inbound stream.
#[derive(Debug)]
pub struct Channel<T> {
    tx: UnboundedSender<T>,
    rx: UnboundedReceiver<T>,
}

impl<T> Channel<T> {
    /// Two cross-wired ends. What one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = unbounded_channel();
        let (b_tx, a_rx) = unbounded_channel();
        (Self { tx: a_tx, rx: a_rx }, Self { tx: b_tx, rx: b_rx })
    }

    pub fn tx(&mut self) -> &mut UnboundedSender<T> {
        &mut self.tx
    }

    pub fn rx(&mut self) -> &mut UnboundedReceiver<T> {
        &mut self.rx
    }

    pub fn split(self) -> (UnboundedSender<T>, UnboundedReceiver<T>) {
        (self.tx, self.rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;

    #[tokio::test]
    async fn cross_wired() {
        let (mut alice, mut bob) = Channel::<String>::pair();
        <UnboundedSender<String> as Transport>::send(alice.tx(), "hello".into()).unwrap();
        <UnboundedSender<String> as Transport>::send(bob.tx(), "hi".into()).unwrap();
        assert_eq!(bob.rx().recv().await.unwrap(), "hello");
        assert_eq!(alice.rx().recv().await.unwrap(), "hi");
    }

    #[test]
    fn closed_peer() {
        let (alice, bob) = Channel::<String>::pair();
        drop(bob);
        let (tx, _rx) = alice.split();
        assert!(<UnboundedSender<String> as Transport>::send(&tx, "lost".into()).is_err());
    }
}

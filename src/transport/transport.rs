use tokio::sync::mpsc::UnboundedSender;

/// Fire-and-forget delivery of opaque messages to the peer.
/// No acknowledgement and no retransmission; order from one sender is kept.
pub trait Transport: Send + Sync {
    fn send(&self, message: String) -> anyhow::Result<()>;
}

impl Transport for UnboundedSender<String> {
    fn send(&self, message: String) -> anyhow::Result<()> {
        UnboundedSender::send(self, message).map_err(|_| anyhow::anyhow!("peer channel closed"))
    }
}

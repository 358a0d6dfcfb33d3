use crate::error::Result;
use crate::save::Snapshot;
use crate::session::Event;
use tokio::sync::oneshot;

/// Requests a [`super::Handle`] sends to its table.
#[derive(Debug)]
pub enum Command {
    Push(Event),
    Snapshot(oneshot::Sender<Result<Snapshot>>),
}

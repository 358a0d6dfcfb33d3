use super::*;
use crate::cards::Selection;
use crate::error::Error;
use crate::error::Result;
use crate::save::Snapshot;
use crate::session::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Cloneable front door to a running [`Table`].
/// Every setter only enqueues; nothing here touches session state.
#[derive(Debug, Clone)]
pub struct Handle {
    commands: UnboundedSender<Command>,
    observers: Observers,
}

impl Handle {
    pub fn new(commands: UnboundedSender<Command>, observers: Observers) -> Self {
        Self {
            commands,
            observers,
        }
    }

    pub fn make_move(&self) -> Result<()> {
        self.push(Event::MakeMove)
    }
    pub fn set_card_selections(&self, mask: Selection) -> Result<()> {
        self.push(Event::SetCardSelections(mask))
    }
    pub fn start_game(&self) -> Result<()> {
        self.push(Event::StartGame)
    }
    pub fn shut_down(&self, reason: Option<String>) -> Result<()> {
        self.push(Event::ShutDown(reason))
    }
    pub fn deliver_message(&self, message: String) -> Result<()> {
        self.push(Event::DeliverMessage(message))
    }
    pub fn push(&self, event: Event) -> Result<()> {
        self.commands
            .send(Command::Push(event))
            .map_err(|_| Error::Closed)
    }

    pub fn subscribe(&self) -> UnboundedReceiver<Delta> {
        self.observers.subscribe()
    }

    /// Snapshot taken between events.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(tx))
            .map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)?
    }

    /// Resolves once the table has stopped.
    pub async fn closed(&self) {
        self.commands.closed().await
    }
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

use crate::transport::Transport;
use std::sync::Arc;
use std::sync::Mutex;

/// Transport that remembers everything it was asked to send.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn sent(&self) -> Vec<String> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Transport for Recorder {
    fn send(&self, message: String) -> anyhow::Result<()> {
        self.0
            .lock()
            .map_err(|_| anyhow::anyhow!("recorder poisoned"))?
            .push(message);
        Ok(())
    }
}

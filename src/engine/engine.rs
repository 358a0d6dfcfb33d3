use super::*;
use crate::Peak;
use crate::settlement::WatchReport;

/// The cryptographic state-channel engine, as seen from the session.
///
/// Driving calls mutate the engine; `idle` flushes whatever those calls
/// produced. The session never calls into an engine from two places at once,
/// so implementations need no interior locking.
pub trait Engine: Send {
    /// Open the channel. Called exactly once, before anything else.
    fn create_session(&mut self, config: &SessionConfig) -> anyhow::Result<()>;
    /// Address the funding coin should be created at.
    fn address(&self) -> anyhow::Result<String>;
    /// Propose sub-games. Returns the ids of the games created locally.
    fn start_games(&mut self, initiator: bool, spec: &GameSpec) -> anyhow::Result<Vec<GameId>>;
    fn make_move(&mut self, game: &GameId, payload: &Payload, entropy: &Entropy) -> anyhow::Result<()>;
    fn accept(&mut self, game: &GameId) -> anyhow::Result<()>;
    fn deliver_message(&mut self, message: &str) -> anyhow::Result<()>;
    fn block_data(&mut self, peak: Peak, report: &WatchReport) -> anyhow::Result<()>;
    /// Begin a clean channel close.
    fn shut_down(&mut self) -> anyhow::Result<()>;
    /// One step of internal progress.
    fn idle(&mut self) -> anyhow::Result<Idle>;
    /// Opaque blob that `restore` accepts.
    fn serialize(&self) -> anyhow::Result<String>;
    /// Name for the current channel state that both peers derive alike,
    /// so saves can be matched across the two sides.
    fn save_id(&self) -> anyhow::Result<String>;
    fn restore(&mut self, blob: &str) -> anyhow::Result<()>;
}

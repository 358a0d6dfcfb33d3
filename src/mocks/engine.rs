use crate::Peak;
use crate::engine::*;
use crate::settlement::WatchReport;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// A driving or polling call observed by [`Scripted`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSession(SessionConfig),
    StartGames(bool, GameSpec),
    MakeMove(GameId, Payload),
    Accept(GameId),
    DeliverMessage(String),
    BlockData(Peak, WatchReport),
    ShutDown,
    Idle,
    Restore(String),
}

impl Call {
    /// Everything except polling.
    pub fn is_driving(&self) -> bool {
        !matches!(self, Call::Idle)
    }
}

/// Engine double that replays queued [`Idle`] results and records calls.
///
/// Cloning shares the script, so a test keeps one clone to steer and inspect
/// while the session owns the other. Every call asserts that no other call is
/// in flight on the same script.
#[derive(Debug, Clone, Default)]
pub struct Scripted(Arc<Inner>);

#[derive(Debug, Default)]
struct Inner {
    script: Mutex<Script>,
    depth: AtomicUsize,
    deepest: AtomicUsize,
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<Call>,
    idles: VecDeque<Idle>,
    failure: Option<String>,
    games: usize,
    blob: String,
    entropy: Vec<[u8; 32]>,
}

impl Scripted {
    /// Queue results for upcoming polls. Once drained, polls report quiescence.
    pub fn then(&self, idle: Idle) -> &Self {
        self.script(|s| s.idles.push_back(idle));
        self
    }
    /// Fail the next driving call with `message`.
    pub fn fail_next(&self, message: &str) {
        self.script(|s| s.failure = Some(message.to_string()));
    }
    pub fn calls(&self) -> Vec<Call> {
        self.script(|s| s.calls.clone())
    }
    pub fn driving(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_driving).collect()
    }
    pub fn moves(&self) -> Vec<Payload> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::MakeMove(_, payload) => Some(payload),
                _ => None,
            })
            .collect()
    }
    /// Entropy handed over with each move, in order.
    pub fn entropy(&self) -> Vec<[u8; 32]> {
        self.script(|s| s.entropy.clone())
    }
    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }
    pub fn pending(&self) -> usize {
        self.script(|s| s.idles.len())
    }
    /// Highest number of simultaneous calls ever observed.
    pub fn deepest(&self) -> usize {
        self.0.deepest.load(Ordering::SeqCst)
    }
}

impl Scripted {
    fn script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        match self.0.script.lock() {
            Ok(mut guard) => f(&mut *guard),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }

    fn call<R>(&self, call: Call, f: impl FnOnce(&mut Script) -> R) -> anyhow::Result<R> {
        let depth = self.0.depth.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.deepest.fetch_max(depth, Ordering::SeqCst);
        assert!(depth <= 1, "engine re-entered: {} calls in flight", depth);
        let result = self.script(|s| {
            let failure = match call.is_driving() {
                true => s.failure.take(),
                false => None,
            };
            s.calls.push(call);
            match failure {
                Some(message) => Err(anyhow::anyhow!(message)),
                None => Ok(f(s)),
            }
        });
        self.0.depth.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl Engine for Scripted {
    fn create_session(&mut self, config: &SessionConfig) -> anyhow::Result<()> {
        self.call(Call::CreateSession(config.clone()), |_| ())
    }
    fn address(&self) -> anyhow::Result<String> {
        Ok("scripted-address".to_string())
    }
    fn start_games(&mut self, initiator: bool, spec: &GameSpec) -> anyhow::Result<Vec<GameId>> {
        self.call(Call::StartGames(initiator, spec.clone()), |s| {
            s.games += 1;
            vec![GameId(format!("game-{}", s.games))]
        })
    }
    fn make_move(&mut self, game: &GameId, payload: &Payload, entropy: &Entropy) -> anyhow::Result<()> {
        self.call(Call::MakeMove(game.clone(), *payload), |s| s.entropy.push(*entropy.bytes()))
    }
    fn accept(&mut self, game: &GameId) -> anyhow::Result<()> {
        self.call(Call::Accept(game.clone()), |_| ())
    }
    fn deliver_message(&mut self, message: &str) -> anyhow::Result<()> {
        self.call(Call::DeliverMessage(message.to_string()), |_| ())
    }
    fn block_data(&mut self, peak: Peak, report: &WatchReport) -> anyhow::Result<()> {
        self.call(Call::BlockData(peak, report.clone()), |_| ())
    }
    fn shut_down(&mut self) -> anyhow::Result<()> {
        self.call(Call::ShutDown, |_| ())
    }
    fn idle(&mut self) -> anyhow::Result<Idle> {
        self.call(Call::Idle, |s| s.idles.pop_front().unwrap_or_default())
    }
    fn serialize(&self) -> anyhow::Result<String> {
        Ok(self.script(|s| match s.blob.is_empty() {
            true => format!("scripted:{}", s.calls.len()),
            false => s.blob.clone(),
        }))
    }
    fn save_id(&self) -> anyhow::Result<String> {
        Ok(self.script(|s| format!("save-{}", s.games)))
    }
    fn restore(&mut self, blob: &str) -> anyhow::Result<()> {
        self.call(Call::Restore(blob.to_string()), |s| s.blob = blob.to_string())
    }
}

//! Session orchestration for two-party California poker.
//!
//! A [`session::Session`] owns one cryptographic game engine and turns UI
//! intents, peer messages and block notifications into a serialized
//! progression of a two-move-per-side hand. The engine, the peer transport and
//! the settlement layer are capabilities supplied by the caller:
//!
//! - [`engine::Engine`]: opaque state-channel engine, driven by calls and polled via `idle`
//! - [`transport::Transport`]: fire-and-forget delivery of opaque strings to the peer
//! - [`settlement::Settlement`]: coin creation and transaction submission
//!
//! [`table::Table`] runs a session inside a tokio task and hands out a
//! cloneable [`table::Handle`] for the UI. Every state change is published as a
//! [`session::Delta`] to subscribers.
pub mod cards;
pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod save;
pub mod session;
pub mod settlement;
pub mod table;
pub mod transport;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use config::Config;
pub use error::Error;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Coin amounts in the settlement layer's base unit.
pub type Amount = u64;
/// Block height reported by the settlement layer.
pub type Peak = u64;
/// Phase counter within one hand (0..=3).
pub type MoveNumber = u8;

// ============================================================================
// HAND PARAMETERS
// ============================================================================
/// Cards dealt to each side.
pub const HAND_SIZE: usize = 8;
/// Cards each side must pass to the opponent.
pub const DISCARD_COUNT: u32 = 4;
/// Move number reached once the final reveal has been issued.
pub const FINAL_MOVE: MoveNumber = 3;

// ============================================================================
// CHANNEL PARAMETERS
// ============================================================================
/// Game type registered with the engine.
pub const GAME_TYPE: &str = "calpoker";
/// Blocks before an unresponsive channel may be unilaterally closed.
pub const CHANNEL_TIMEOUT: u64 = 100;
/// Blocks allotted to the unroll of a closing channel.
pub const UNROLL_TIMEOUT: u64 = 100;
/// Blocks allotted to each move of an on-chain game.
pub const GAME_TIMEOUT: u64 = 100;
/// Default per-hand wager is the channel amount divided by this.
pub const PER_HAND_DIVISOR: Amount = 10;
/// Sub-game parameters passed at start (the nil atom).
pub const GAME_PARAMETERS: &str = "80";

// ============================================================================
// SETTLEMENT
// ============================================================================
/// Marker in a submission failure meaning a spent coin is not yet confirmed.
pub const UNKNOWN_UNSPENT: &str = "UNKNOWN_UNSPENT";
/// Seconds between resubmissions of a transaction rejected as unknown unspent.
pub const SUBMIT_RETRY_SECS: u64 = 30;

// ============================================================================
// PERSISTENCE
// ============================================================================
/// Saves kept on disk before the oldest is evicted.
pub const MAX_SAVES: usize = 3;
/// Saves older than this are never offered for resumption.
pub const STALE_SAVE_SECS: u64 = 60 * 60;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

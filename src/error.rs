use crate::MoveNumber;
use crate::settlement::SettlementError;
use thiserror::Error;

/// Failures that escape the session.
///
/// "Not ready yet" conditions (a discard move without four cards marked, a
/// move before the handshake) are absorbed by the session and never appear here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("move requested in invalid phase: move number {0}")]
    InvalidPhase(MoveNumber),
    #[error("engine error: {0}")]
    Engine(#[from] anyhow::Error),
    #[error("settlement error: {0}")]
    Settlement(#[from] SettlementError),
    #[error("save error: {0}")]
    Save(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("table closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;

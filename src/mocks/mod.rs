//! Deterministic test doubles for the session's capabilities.
mod engine;
mod settlement;
mod transport;

pub use engine::*;
pub use settlement::*;
pub use transport::*;

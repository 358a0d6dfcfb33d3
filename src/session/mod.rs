mod delta;
mod event;
mod observers;
mod phase;
mod session;
mod state;

pub use delta::*;
pub use event::*;
pub use observers::*;
pub use phase::*;
pub use session::*;
pub use state::*;

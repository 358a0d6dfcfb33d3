mod channel;
mod transport;

pub use channel::*;
pub use transport::*;

mod saves;
mod snapshot;

pub use saves::*;
pub use snapshot::*;

mod error;
mod relay;
mod report;
mod settlement;
mod transaction;

pub use error::*;
pub use relay::*;
pub use report::*;
pub use settlement::*;
pub use transaction::*;

mod engine;
mod idle;
mod payload;
mod readable;
mod spec;

pub use engine::*;
pub use idle::*;
pub use payload::*;
pub use readable::*;
pub use spec::*;

mod command;
mod handle;
mod table;

pub use command::*;
pub use handle::*;
pub use table::*;

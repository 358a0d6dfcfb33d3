pub mod card;
pub use card::*;

pub mod rank;
pub use rank::*;

pub mod ranking;
pub use ranking::*;

pub mod selection;
pub use selection::*;

pub mod suit;
pub use suit::*;

pub mod value;
pub use value::*;

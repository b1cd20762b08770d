pub mod returns;
pub mod rolling;

pub use returns::{carried_pct_change, pct_change};
pub use rolling::{trailing_zscore, TrailingWindow, MIN_STD};

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use chrono::NaiveDate;

pub use memory::InMemorySource;
pub use sqlite::SqlitePriceStore;

/// External provider of daily observations.
///
/// Series are `(date, value)` pairs ordered by date. A symbol the source does
/// not know yields an empty series rather than an error.
pub trait PriceSource {
    fn price_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>>;

    /// Only called for crypto assets.
    fn volume_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn price_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        (**self).price_series(symbol)
    }

    fn volume_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        (**self).volume_series(symbol)
    }
}

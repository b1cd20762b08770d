pub mod asset;
pub mod calendar;
pub mod series;

pub use asset::{Asset, AssetClass};
pub use calendar::Calendar;
pub use series::{fmt_date, DailyBar, RawSeries, SeriesKind};

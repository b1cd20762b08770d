use chrono::NaiveDate;
use thiserror::Error;

/// Invalid matrix settings, detected before any data is fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("y_crypto must not be empty")]
    EmptyTarget,

    #[error("x_cryptos must list at least one symbol")]
    EmptyExplanatory,

    #[error("{field} contains an empty symbol")]
    EmptySymbol { field: &'static str },

    #[error("{name} must be >= 1 (got {value})")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("y_crypto '{0}' also appears in x_cryptos")]
    TargetInExplanatory(String),

    #[error("symbol '{0}' is listed more than once")]
    DuplicateSymbol(String),

    #[error("column '{0}' would be produced by more than one asset")]
    ColumnCollision(String),
}

/// Raw data that cannot be aligned onto the master calendar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataIntegrityError {
    #[error("{symbol}: duplicate observation on {date}")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("{symbol}: non-finite value {value} on {date}")]
    NonFiniteValue {
        symbol: String,
        date: NaiveDate,
        value: f64,
    },

    #[error("{symbol}: no observation on or before {calendar_start} to forward-fill from")]
    NoFillSeed {
        symbol: String,
        calendar_start: NaiveDate,
    },

    #[error("no crypto price observations; master calendar is empty")]
    EmptyCalendar,
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("data source error for '{symbol}': {source}")]
    Source {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("column '{0}' is not present in the matrix")]
    MissingColumn(String),
}

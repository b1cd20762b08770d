pub mod config;
pub mod error;
pub mod indicator;
pub mod matrix;
pub mod model;
pub mod pipeline;
pub mod source;

pub use config::{Config, MatrixConfig};
pub use error::{BuildError, ConfigurationError, DataIntegrityError};
pub use matrix::{BuildWarning, DesignMatrix};
pub use pipeline::DesignMatrixBuilder;
pub use source::PriceSource;

pub mod loader;
pub mod roller;
pub mod standardizer;

pub use loader::{load, AlignedLevels, LoadedSeries};
pub use roller::{roll, RollWindows};
pub use standardizer::standardize;

use crate::config::MatrixConfig;
use crate::error::{BuildError, ConfigurationError};
use crate::matrix::DesignMatrix;
use crate::source::PriceSource;

/// Validated settings for building one design matrix.
///
/// Construction fails fast on bad settings; [`build`](Self::build) runs
/// load → roll → standardize and returns either the finished matrix or the
/// first error.
#[derive(Debug, Clone)]
pub struct DesignMatrixBuilder {
    config: MatrixConfig,
}

impl DesignMatrixBuilder {
    pub fn new(config: MatrixConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn build<S: PriceSource + ?Sized>(&self, source: &S) -> Result<DesignMatrix, BuildError> {
        let cfg = &self.config;
        tracing::info!(
            y_crypto = %cfg.y_crypto,
            x_cryptos = ?cfg.x_cryptos,
            x_assets = ?cfg.x_assets,
            "Building design matrix"
        );

        let loaded = load(source, cfg)?;
        let rolled = roll(
            &loaded,
            &cfg.cryptos(),
            RollWindows {
                price: cfg.n_rolling_price,
                volume: cfg.n_rolling_volume,
            },
        )?;
        let matrix = standardize(&rolled, &cfg.y_crypto, cfg.n_std_window)?;

        tracing::info!(
            rows = matrix.len(),
            columns = matrix.column_names().len(),
            warnings = matrix.warnings().len(),
            "Design matrix built"
        );
        Ok(matrix)
    }
}

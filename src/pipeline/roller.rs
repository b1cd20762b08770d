use crate::error::{BuildError, ConfigurationError};
use crate::indicator::pct_change;
use crate::matrix::{BuildWarning, DesignMatrix};
use crate::model::asset::volume_column;
use crate::pipeline::loader::LoadedSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollWindows {
    pub price: usize,
    pub volume: usize,
}

/// Returns a copy of the loaded matrix in which `{symbol}` and `{symbol}_volume`
/// hold `level(t) / level(t - n) - 1` for every symbol in `cryptos`.
///
/// With `n = 1` the columns are unchanged. The first `n` rows are always missing.
pub fn roll(
    loaded: &LoadedSeries,
    cryptos: &[&str],
    windows: RollWindows,
) -> Result<DesignMatrix, BuildError> {
    for (name, value) in [
        ("n_rolling_price", windows.price),
        ("n_rolling_volume", windows.volume),
    ] {
        if value == 0 {
            return Err(ConfigurationError::InvalidWindow { name, value }.into());
        }
    }
    let mut matrix = loaded.matrix.clone();

    for &sym in cryptos {
        let levels = loaded
            .levels(sym)
            .ok_or_else(|| BuildError::MissingColumn(sym.to_string()))?;
        let volume = levels
            .volume
            .as_ref()
            .ok_or_else(|| BuildError::MissingColumn(volume_column(sym)))?;

        for (column, values, window) in [
            (sym.to_string(), &levels.price, windows.price),
            (volume_column(sym), volume, windows.volume),
        ] {
            let available = values.iter().filter(|v| v.is_some()).count();
            if window >= available {
                matrix.push_warning(BuildWarning::InsufficientHistory {
                    column: column.clone(),
                    window,
                    available,
                });
            }
            matrix.set_column(&column, pct_change(values, window));
        }
    }

    tracing::info!(
        cryptos = cryptos.len(),
        price_window = windows.price,
        volume_window = windows.volume,
        "Rolled crypto returns"
    );
    Ok(matrix)
}

use crate::error::{BuildError, ConfigurationError};
use crate::indicator::trailing_zscore;
use crate::matrix::{BuildWarning, DesignMatrix};
use crate::model::asset::{px_std_column, volume_column, volume_std_column};

/// Adds `{target}_px_std` and `{target}_volume_std`: each row of the target's
/// rolled columns scored against the `window` rows before it, using the sample
/// standard deviation. Short or incomplete history yields missing values.
pub fn standardize(
    matrix: &DesignMatrix,
    target: &str,
    window: usize,
) -> Result<DesignMatrix, BuildError> {
    if window == 0 {
        return Err(ConfigurationError::InvalidWindow {
            name: "n_std_window",
            value: window,
        }
        .into());
    }
    let mut out = matrix.clone();

    for (source, dest) in [
        (target.to_string(), px_std_column(target)),
        (volume_column(target), volume_std_column(target)),
    ] {
        let values = matrix
            .column(&source)
            .ok_or_else(|| BuildError::MissingColumn(source.clone()))?;

        if window < 2 {
            out.push_warning(BuildWarning::UndefinedDispersion {
                column: dest.clone(),
                window,
            });
        } else {
            let available = values.iter().filter(|v| v.is_some()).count();
            if window >= available {
                out.push_warning(BuildWarning::InsufficientHistory {
                    column: dest.clone(),
                    window,
                    available,
                });
            }
        }

        let scored = trailing_zscore(values, window);
        tracing::debug!(
            column = %dest,
            defined = scored.iter().filter(|v| v.is_some()).count(),
            "Standardized column"
        );
        out.set_column(&dest, scored);
    }

    Ok(out)
}

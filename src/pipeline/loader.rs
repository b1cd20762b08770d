use std::collections::BTreeMap;

use crate::config::MatrixConfig;
use crate::error::{BuildError, DataIntegrityError};
use crate::indicator::{carried_pct_change, pct_change};
use crate::matrix::DesignMatrix;
use crate::model::asset::{volume_column, Asset};
use crate::model::calendar::Calendar;
use crate::model::series::{fmt_date, RawSeries, SeriesKind};
use crate::source::PriceSource;

/// Calendar-aligned price and volume levels of one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedLevels {
    pub asset: Asset,
    pub price: Vec<Option<f64>>,
    /// `None` for non-crypto assets.
    pub volume: Option<Vec<Option<f64>>>,
}

/// Output of [`load`]: the single-period return matrix plus the levels it was
/// computed from, which the roller needs for multi-period returns.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub matrix: DesignMatrix,
    pub levels: BTreeMap<String, AlignedLevels>,
}

impl LoadedSeries {
    pub fn levels(&self, symbol: &str) -> Option<&AlignedLevels> {
        self.levels.get(symbol)
    }
}

/// Fetch every configured series, align it onto the master calendar and take
/// single-period returns.
///
/// Cryptos define the calendar and are used as observed. Non-crypto levels are
/// forward-filled; their returns come from consecutive trading-day prints and
/// carry over weekends and holidays.
pub fn load<S: PriceSource + ?Sized>(
    source: &S,
    config: &MatrixConfig,
) -> Result<LoadedSeries, BuildError> {
    let mut crypto_prices = Vec::new();
    let mut crypto_volumes = Vec::new();
    for sym in config.cryptos() {
        crypto_prices.push(fetch(source, sym, SeriesKind::Price)?);
        crypto_volumes.push(fetch(source, sym, SeriesKind::Volume)?);
    }
    let mut asset_prices = Vec::new();
    for sym in &config.x_assets {
        asset_prices.push(fetch(source, sym, SeriesKind::Price)?);
    }

    let calendar = Calendar::from_union(crypto_prices.iter());
    let (Some(start), Some(end)) = (calendar.start(), calendar.end()) else {
        return Err(DataIntegrityError::EmptyCalendar.into());
    };
    tracing::info!(
        start = %fmt_date(start),
        end = %fmt_date(end),
        days = calendar.len(),
        "Built master calendar"
    );

    let mut levels = BTreeMap::new();
    let mut matrix = DesignMatrix::new(calendar.dates().to_vec());

    for (price, volume) in crypto_prices.iter().zip(&crypto_volumes) {
        let asset = Asset::crypto(price.symbol());
        let price_levels = price.align_exact(&calendar);
        let volume_levels = volume.align_exact(&calendar);

        let holes = price_levels.iter().filter(|v| v.is_none()).count();
        let leading = price_levels.iter().take_while(|v| v.is_none()).count();
        if holes > leading {
            tracing::warn!(
                symbol = %asset.symbol,
                missing_days = holes - leading,
                "Crypto price series has calendar holes; returns touching them are missing"
            );
        }

        matrix.set_column(asset.price_column(), pct_change(&price_levels, 1));
        matrix.set_column(&volume_column(&asset.symbol), pct_change(&volume_levels, 1));
        levels.insert(
            asset.symbol.clone(),
            AlignedLevels {
                asset,
                price: price_levels,
                volume: Some(volume_levels),
            },
        );
    }

    for series in &asset_prices {
        let asset = Asset::non_crypto(series.symbol());
        let filled = series.forward_fill(&calendar)?;
        tracing::debug!(
            symbol = %asset.symbol,
            trading_days = series
                .points()
                .iter()
                .filter(|(date, _)| (start..=end).contains(date))
                .count(),
            calendar_days = calendar.len(),
            "Forward-filled non-crypto series"
        );
        matrix.set_column(
            asset.price_column(),
            carried_pct_change(series.points(), calendar.dates()),
        );
        levels.insert(
            asset.symbol.clone(),
            AlignedLevels {
                asset,
                price: filled.into_iter().map(Some).collect(),
                volume: None,
            },
        );
    }

    Ok(LoadedSeries { matrix, levels })
}

fn fetch<S: PriceSource + ?Sized>(
    source: &S,
    symbol: &str,
    kind: SeriesKind,
) -> Result<RawSeries, BuildError> {
    let points = match kind {
        SeriesKind::Price => source.price_series(symbol),
        SeriesKind::Volume => source.volume_series(symbol),
    }
    .map_err(|err| BuildError::Source {
        symbol: symbol.to_string(),
        source: err,
    })?;
    Ok(RawSeries::new(symbol, points)?)
}

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;

use crate::model::series::DailyBar;
use crate::source::PriceSource;

/// Map-backed source for fixtures and small in-process datasets.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    prices: HashMap<String, Vec<(NaiveDate, f64)>>,
    volumes: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(mut self, symbol: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        self.prices.insert(symbol.to_string(), points);
        self
    }

    pub fn with_volumes(mut self, symbol: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        self.volumes.insert(symbol.to_string(), points);
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: &[DailyBar]) -> Self {
        self.prices.insert(
            symbol.to_string(),
            bars.iter().map(|b| (b.date, b.price)).collect(),
        );
        self.volumes.insert(
            symbol.to_string(),
            bars.iter()
                .filter_map(|b| b.volume.map(|v| (b.date, v)))
                .collect(),
        );
        self
    }

    /// Overwrite one price observation, appending it if the date is new.
    pub fn set_price(&mut self, symbol: &str, date: NaiveDate, price: f64) {
        let points = self.prices.entry(symbol.to_string()).or_default();
        match points.iter_mut().find(|(d, _)| *d == date) {
            Some(point) => point.1 = price,
            None => points.push((date, price)),
        }
    }
}

impl PriceSource for InMemorySource {
    fn price_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        Ok(self.prices.get(symbol).cloned().unwrap_or_default())
    }

    fn volume_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>> {
        Ok(self.volumes.get(symbol).cloned().unwrap_or_default())
    }
}

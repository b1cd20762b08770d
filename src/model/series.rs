use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;
use crate::model::calendar::Calendar;

/// Which of an asset's stored series to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Price,
    Volume,
}

/// One stored daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: Option<f64>,
}

/// A validated price or volume series: sorted by date, unique dates, finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    symbol: String,
    points: Vec<(NaiveDate, f64)>,
}

impl RawSeries {
    pub fn new(
        symbol: &str,
        mut points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, DataIntegrityError> {
        points.sort_by_key(|(date, _)| *date);

        for (date, value) in &points {
            if !value.is_finite() {
                return Err(DataIntegrityError::NonFiniteValue {
                    symbol: symbol.to_string(),
                    date: *date,
                    value: *value,
                });
            }
        }
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DataIntegrityError::DuplicateDate {
                symbol: symbol.to_string(),
                date: w[0].0,
            });
        }

        Ok(Self {
            symbol: symbol.to_string(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Every observation in date order, including those outside any calendar.
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Values on exactly the calendar's dates; days without an observation are `None`.
    pub fn align_exact(&self, calendar: &Calendar) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(calendar.len());
        let mut idx = 0;
        for &date in calendar.dates() {
            while idx < self.points.len() && self.points[idx].0 < date {
                idx += 1;
            }
            match self.points.get(idx) {
                Some((d, v)) if *d == date => out.push(Some(*v)),
                _ => out.push(None),
            }
        }
        out
    }

    /// Carry the latest observation on or before each calendar date forward.
    ///
    /// Fails when nothing is observed on or before the calendar's first day.
    pub fn forward_fill(&self, calendar: &Calendar) -> Result<Vec<f64>, DataIntegrityError> {
        let mut out = Vec::with_capacity(calendar.len());
        let mut idx = 0;
        let mut last = None;
        for &date in calendar.dates() {
            while idx < self.points.len() && self.points[idx].0 <= date {
                last = Some(self.points[idx].1);
                idx += 1;
            }
            match last {
                Some(v) => out.push(v),
                None => {
                    return Err(DataIntegrityError::NoFillSeed {
                        symbol: self.symbol.clone(),
                        calendar_start: calendar.start().unwrap_or(date),
                    })
                }
            }
        }
        Ok(out)
    }
}

/// Render a date the way matrix exports and log lines show it.
pub fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

use std::fmt;
use std::io::Write;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::series::fmt_date;

/// Non-fatal condition recorded while building a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The window needs more history than the column has, so the column
    /// carries leading (or only) missing values.
    InsufficientHistory {
        column: String,
        window: usize,
        available: usize,
    },
    /// A one-row window has no sample standard deviation; the column is all missing.
    UndefinedDispersion { column: String, window: usize },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientHistory {
                column,
                window,
                available,
            } => write!(
                f,
                "{}: window of {} exceeds available history of {} observations",
                column, window, available
            ),
            Self::UndefinedDispersion { column, window } => write!(
                f,
                "{}: sample std is undefined for a window of {}",
                column, window
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

/// Date-indexed feature table. One row per calendar day, ascending; `None` marks a
/// value that is undefined (no history, no data, zero dispersion).
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
    warnings: Vec<BuildWarning>,
}

impl DesignMatrix {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Replace the column called `name`, or append it if absent.
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Option<f64>>) {
        assert_eq!(
            values.len(),
            self.dates.len(),
            "column '{}' length does not match the date index",
            name
        );
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
    }

    /// Builder-style constructor for a standalone matrix, e.g. to feed
    /// [`standardize`](crate::pipeline::standardize) directly.
    pub fn with_column(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.set_column(name, values);
        self
    }

    pub(crate) fn push_warning(&mut self, warning: BuildWarning) {
        match &warning {
            BuildWarning::InsufficientHistory { .. } => {
                tracing::warn!(warning = %warning, "Insufficient history for design-matrix column")
            }
            BuildWarning::UndefinedDispersion { .. } => {
                tracing::warn!(warning = %warning, "Undefined dispersion for design-matrix column")
            }
        }
        self.warnings.push(warning);
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Value at `date` in `column`; `None` when missing or when either key is unknown.
    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let idx = self.position(date)?;
        self.column(column)?[idx]
    }

    pub fn row(&self, date: NaiveDate) -> Option<Vec<(&str, Option<f64>)>> {
        let idx = self.position(date)?;
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), c.values[idx]))
                .collect(),
        )
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Copy without the rows that have a missing value in any column.
    pub fn drop_incomplete_rows(&self) -> DesignMatrix {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&i| self.columns.iter().all(|c| c.values[i].is_some()))
            .collect();
        DesignMatrix {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: keep.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn to_records(&self) -> Vec<MatrixRecord<'_>> {
        (0..self.dates.len())
            .map(|idx| MatrixRecord { matrix: self, idx })
            .collect()
    }

    /// Write the matrix as a pretty-printed JSON array, one object per date.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_records())
    }
}

/// Borrowed view of one matrix row; serializes as `{"date": ..., "<column>": ...}`
/// with columns in table order.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRecord<'a> {
    matrix: &'a DesignMatrix,
    idx: usize,
}

impl MatrixRecord<'_> {
    pub fn date(&self) -> NaiveDate {
        self.matrix.dates[self.idx]
    }
}

impl Serialize for MatrixRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.matrix.columns.len() + 1))?;
        map.serialize_entry("date", &fmt_date(self.date()))?;
        for col in &self.matrix.columns {
            map.serialize_entry(&col.name, &col.values[self.idx])?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
    }

    fn sample() -> DesignMatrix {
        DesignMatrix::new(vec![d(1), d(2), d(3)])
            .with_column("btc", vec![None, Some(0.1), Some(-0.05)])
            .with_column("SP500", vec![None, Some(0.01), Some(0.01)])
    }

    #[test]
    fn lookup_by_date_and_column() {
        let m = sample();
        assert_eq!(m.len(), 3);
        assert_eq!(m.column_names(), vec!["btc", "SP500"]);
        assert_eq!(m.value(d(2), "btc"), Some(0.1));
        assert_eq!(m.value(d(1), "btc"), None);
        assert_eq!(m.value(d(2), "eth"), None);
        assert_eq!(m.value(d(9), "btc"), None);
        assert_eq!(
            m.row(d(3)).unwrap(),
            vec![("btc", Some(-0.05)), ("SP500", Some(0.01))]
        );
    }

    #[test]
    fn set_column_replaces_in_place() {
        let mut m = sample();
        m.set_column("btc", vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(m.column_names(), vec!["btc", "SP500"]);
        assert_eq!(m.value(d(1), "btc"), Some(1.0));
    }

    #[test]
    #[should_panic(expected = "length does not match")]
    fn set_column_rejects_wrong_length() {
        let mut m = sample();
        m.set_column("eth", vec![Some(1.0)]);
    }

    #[test]
    fn drop_incomplete_rows_removes_leading_row() {
        let m = sample().drop_incomplete_rows();
        assert_eq!(m.dates(), &[d(2), d(3)]);
        assert_eq!(m.column("SP500").unwrap(), &[Some(0.01), Some(0.01)]);
    }

    #[test]
    fn json_records_keep_column_order() {
        let mut buf = Vec::new();
        sample().write_json(&mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["date"], "2018-01-01");
        assert!(rows[0]["btc"].is_null());
        assert_eq!(rows[1]["btc"], 0.1);

        let text = String::from_utf8(buf).unwrap();
        let btc_at = text.find("\"btc\"").unwrap();
        let spx_at = text.find("\"SP500\"").unwrap();
        assert!(btc_at < spx_at);
    }

    #[test]
    fn warnings_are_recorded_in_order() {
        let mut m = sample();
        let short = BuildWarning::InsufficientHistory {
            column: "btc".to_string(),
            window: 5,
            available: 2,
        };
        let flat = BuildWarning::UndefinedDispersion {
            column: "btc_px_std".to_string(),
            window: 1,
        };
        m.push_warning(short.clone());
        m.push_warning(flat.clone());
        assert_eq!(m.warnings(), &[short, flat]);
        assert_eq!(m.drop_incomplete_rows().warnings().len(), 2);
    }

    #[test]
    fn warning_display() {
        let w = BuildWarning::InsufficientHistory {
            column: "btc_px_std".to_string(),
            window: 20,
            available: 5,
        };
        assert_eq!(
            w.to_string(),
            "btc_px_std: window of 20 exceeds available history of 5 observations"
        );
    }
}

use chrono::NaiveDate;

use crate::model::series::RawSeries;

/// Contiguous, strictly increasing run of calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Calendar {
    dates: Vec<NaiveDate>,
}

impl Calendar {
    /// Every day from `start` to `end` inclusive. Empty when `end < start`.
    pub fn spanning(start: NaiveDate, end: NaiveDate) -> Self {
        let mut dates = Vec::new();
        let mut cur = Some(start);
        while let Some(date) = cur {
            if date > end {
                break;
            }
            dates.push(date);
            cur = date.succ_opt();
        }
        Self { dates }
    }

    /// Master calendar: the union of the given series' dates with any gaps closed.
    pub fn from_union<'a>(series: impl IntoIterator<Item = &'a RawSeries>) -> Self {
        let mut start: Option<NaiveDate> = None;
        let mut end: Option<NaiveDate> = None;
        for s in series {
            if let (Some(first), Some(last)) = (s.first_date(), s.last_date()) {
                start = Some(start.map_or(first, |cur| cur.min(first)));
                end = Some(end.map_or(last, |cur| cur.max(last)));
            }
        }
        match (start, end) {
            (Some(start), Some(end)) => Self::spanning(start, end),
            _ => Self::default(),
        }
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

    pub fn start(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

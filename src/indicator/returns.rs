use chrono::NaiveDate;

/// Level-ratio return over `periods` rows: `level[t] / level[t - periods] - 1`.
///
/// The first `periods` rows are `None`, as is any row whose endpoints are
/// missing or whose base level is zero.
pub fn pct_change(levels: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    assert!(periods > 0, "pct_change periods must be > 0");
    (0..levels.len())
        .map(|t| {
            let base = t.checked_sub(periods).and_then(|p| levels[p])?;
            ratio_return(base, levels[t]?)
        })
        .collect()
}

/// Single-period returns for an asset that only trades on some calendar days.
///
/// `observed` is the asset's full sorted history, including prints before
/// `dates` starts. Each observation's return is taken against the previous
/// observation; every calendar day carries the return of the latest
/// observation on or before it, so non-trading days repeat the last trading
/// day's return. Row 0 is always `None`.
pub fn carried_pct_change(
    observed: &[(NaiveDate, f64)],
    dates: &[NaiveDate],
) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(dates.len());
    let mut idx = 0;
    let mut current = None;
    for &date in dates {
        while idx < observed.len() && observed[idx].0 <= date {
            current = idx
                .checked_sub(1)
                .and_then(|prev| ratio_return(observed[prev].1, observed[idx].1));
            idx += 1;
        }
        out.push(current);
    }
    if let Some(first) = out.first_mut() {
        *first = None;
    }
    out
}

fn ratio_return(base: f64, cur: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some(cur / base - 1.0).filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_period() {
        let out = pct_change(&[Some(100.0), Some(110.0), Some(99.0)], 1);
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((out[2].unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn multi_period_compounds_from_levels() {
        // +10% then +10% is +21% over two periods, not +20%.
        let out = pct_change(&[Some(100.0), Some(110.0), Some(121.0)], 2);
        assert_eq!(&out[..2], &[None, None]);
        assert!((out[2].unwrap() - 0.21).abs() < 1e-12);
    }

    #[test]
    fn missing_or_zero_base_is_missing() {
        let out = pct_change(&[Some(0.0), Some(5.0), None, Some(6.0)], 1);
        assert_eq!(out, vec![None, None, None, None]);
    }

    #[test]
    fn window_longer_than_series_is_all_missing() {
        let out = pct_change(&[Some(1.0), Some(2.0)], 5);
        assert_eq!(out, vec![None, None]);
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
    }

    fn days(from: u32, to: u32) -> Vec<NaiveDate> {
        (from..=to).map(d).collect()
    }

    #[test]
    fn carried_returns_repeat_over_non_trading_days() {
        // Thu 1/11 .. Tue 1/16, Mon 1/15 a holiday
        let observed = [(d(11), 100.0), (d(12), 101.0), (d(16), 99.99)];
        let out = carried_pct_change(&observed, &days(11, 16));
        assert_eq!(out[0], None);
        let fri = out[1].unwrap();
        assert!((fri - 0.01).abs() < 1e-12);
        assert_eq!(&out[2..5], &[Some(fri), Some(fri), Some(fri)]);
        assert!((out[5].unwrap() + 0.01).abs() < 1e-12);
    }

    #[test]
    fn carried_returns_use_prints_before_the_first_row() {
        // calendar opens on Sat 1/13; Friday's return is already known
        let observed = [(d(11), 100.0), (d(12), 102.0), (d(16), 102.0)];
        let out = carried_pct_change(&observed, &days(13, 17));
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(out[2], out[1]);
        assert_eq!(&out[3..], &[Some(0.0), Some(0.0)]);
    }

    #[test]
    fn carried_returns_need_two_prints() {
        let out = carried_pct_change(&[(d(2), 5.0), (d(4), 6.0)], &days(1, 5));
        assert_eq!(&out[..3], &[None, None, None]);
        assert!((out[3].unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(out[4], out[3]);
    }

    #[test]
    fn carried_returns_from_zero_price_are_missing() {
        let out = carried_pct_change(&[(d(1), 0.0), (d(2), 1.0), (d(3), 2.0)], &days(1, 3));
        assert_eq!(out[..2], [None, None]);
        assert!((out[2].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "pct_change periods must be > 0")]
    fn zero_periods_panics() {
        pct_change(&[Some(1.0)], 0);
    }
}

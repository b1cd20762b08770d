use chrono::NaiveDate;

use design_matrix::error::{BuildError, ConfigurationError};
use design_matrix::matrix::{BuildWarning, DesignMatrix};
use design_matrix::pipeline::standardize;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
}

fn matrix(px: Vec<Option<f64>>, vol: Vec<Option<f64>>) -> DesignMatrix {
    let dates = d(1).iter_days().take(px.len()).collect();
    DesignMatrix::new(dates)
        .with_column("btc", px.clone())
        .with_column("btc_volume", vol)
        .with_column("eth", px)
}

fn wave(n: usize) -> Vec<Option<f64>> {
    (0..n).map(|i| Some(((i * 7) % 5) as f64 * 0.01 - 0.02)).collect()
}

#[test]
fn zscore_uses_preceding_rows_and_sample_std() {
    let px = vec![Some(0.01), Some(0.02), Some(0.03), Some(0.06), Some(0.0)];
    let out = standardize(&matrix(px.clone(), px), "btc", 3).unwrap();
    let z = out.column("btc_px_std").unwrap();

    assert_eq!(&z[..3], &[None, None, None]);
    // window (0.01, 0.02, 0.03): mean 0.02, sample std 0.01
    assert!((z[3].unwrap() - 4.0).abs() < 1e-9);
    // window (0.02, 0.03, 0.06): mean 0.11/3, sample std sqrt(0.00043333)
    let mean = 0.11 / 3.0;
    let std = (((0.02f64 - mean).powi(2) + (0.03 - mean).powi(2) + (0.06 - mean).powi(2)) / 2.0).sqrt();
    assert!((z[4].unwrap() - (0.0 - mean) / std).abs() < 1e-9);
}

#[test]
/// Changing any value after date t never changes the standardized value at t.
fn no_look_ahead() {
    let base = wave(30);
    let before = standardize(&matrix(base.clone(), base.clone()), "btc", 10).unwrap();

    let t = 20;
    let mut bumped = base.clone();
    for v in bumped.iter_mut().skip(t + 1) {
        *v = v.map(|x| x * 50.0 + 3.0);
    }
    let after = standardize(&matrix(bumped.clone(), bumped), "btc", 10).unwrap();

    let z_before = before.column("btc_px_std").unwrap();
    let z_after = after.column("btc_px_std").unwrap();
    assert_eq!(&z_before[..=t], &z_after[..=t]);
    assert!(z_before[t].is_some());
    assert_ne!(z_before[t + 1], z_after[t + 1]);
}

#[test]
/// Rows without a full trailing window are missing, never zero.
fn insufficient_history_is_missing_not_zero() {
    let out = standardize(&matrix(wave(8), wave(8)), "btc", 20).unwrap();
    for col in ["btc_px_std", "btc_volume_std"] {
        assert!(out.column(col).unwrap().iter().all(Option::is_none));
    }
    assert_eq!(
        out.warnings(),
        &[
            BuildWarning::InsufficientHistory {
                column: "btc_px_std".to_string(),
                window: 20,
                available: 8,
            },
            BuildWarning::InsufficientHistory {
                column: "btc_volume_std".to_string(),
                window: 20,
                available: 8,
            },
        ]
    );
}

#[test]
/// Leading missing rolled values push the first defined z-score back by the
/// same number of rows.
fn missing_values_inside_window_yield_missing() {
    let mut px = wave(12);
    px[0] = None;
    px[1] = None;
    let out = standardize(&matrix(px.clone(), px), "btc", 4).unwrap();
    let z = out.column("btc_px_std").unwrap();
    assert!(z[..6].iter().all(Option::is_none));
    assert!(z[6].is_some());
}

#[test]
/// A flat trailing window has zero dispersion; the result is missing rather
/// than infinite, and later rows recover.
fn zero_std_is_missing() {
    let mut px = vec![Some(0.0); 6];
    px.extend([Some(0.01), Some(-0.01), Some(0.02), Some(0.03)]);
    let out = standardize(&matrix(px.clone(), px), "btc", 3).unwrap();
    let z = out.column("btc_px_std").unwrap();
    assert!(z[..7].iter().all(Option::is_none));
    assert!(z[7].unwrap().is_finite());
    assert!(z.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn only_target_is_standardized() {
    let out = standardize(&matrix(wave(10), wave(10)), "btc", 3).unwrap();
    assert_eq!(
        out.column_names(),
        vec!["btc", "btc_volume", "eth", "btc_px_std", "btc_volume_std"]
    );
}

#[test]
fn one_row_window_has_undefined_dispersion() {
    let out = standardize(&matrix(wave(5), wave(5)), "btc", 1).unwrap();
    assert!(out.column("btc_px_std").unwrap().iter().all(Option::is_none));
    assert!(out.warnings().contains(&BuildWarning::UndefinedDispersion {
        column: "btc_px_std".to_string(),
        window: 1,
    }));
}

#[test]
fn missing_source_column_is_an_error() {
    let out = standardize(&matrix(wave(5), wave(5)), "ltc", 3);
    assert!(matches!(out, Err(BuildError::MissingColumn(ref c)) if c == "ltc"));
}

#[test]
fn zero_window_is_rejected() {
    let err = standardize(&matrix(wave(5), wave(5)), "btc", 0).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Configuration(ConfigurationError::InvalidWindow {
            name: "n_std_window",
            value: 0
        })
    ));
}

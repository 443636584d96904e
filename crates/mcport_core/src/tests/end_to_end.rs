//! End-to-end scenarios
//!
//! These tests verify that:
//! - Zero returns keep every path at the initial value, exactly
//! - A drift-only single asset compounds deterministically
//! - Log-mode projections produce a full percentile table
//! - Unavailable sections propagate instead of panicking
//! - The one-call discrete run reports which stage failed

use jiff::ToSpan;
use jiff::civil::date;

use crate::aggregate::{failure_rate, percentile_table, summarize};
use crate::config::{DiscreteSettings, ProjectionSettings};
use crate::error::{Error, EstimationError, SimulationError};
use crate::linalg::Matrix;
use crate::model::{Ensemble, ReturnSeries, Unavailable, Weights};
use crate::momentum::momentum_parameters;
use crate::simulation::{
    DiscreteSimulation, LogGbmSimulation, run_discrete, simulate_discrete, simulate_log_gbm,
};
use crate::stats::estimate;

/// Two assets, three days of zero returns: every value stays at 100000
#[test]
fn test_zero_returns_hold_initial_value() {
    let returns = ReturnSeries::from_rows(
        vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
        vec!["A".into(), "B".into()],
        &[vec![0.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]],
    )
    .unwrap();
    let stats = estimate(&returns).unwrap();
    let settings = DiscreteSettings {
        num_paths: 10,
        horizon_days: 3,
        initial_value: 100_000.0,
        ..Default::default()
    };
    let sim = DiscreteSimulation::from_statistics(
        &stats,
        Weights::new(vec![0.5, 0.5]).unwrap(),
        &settings,
    );

    let ensemble = simulate_discrete(&sim).unwrap();

    assert_eq!(ensemble.n_paths(), 10);
    for path in ensemble.paths() {
        assert!(path.iter().all(|&v| v == 100_000.0), "path drifted: {path:?}");
    }
    // 100000 < 110000 on every path
    assert_eq!(failure_rate(&ensemble, 100_000.0, 1.1).computed(), Some(100.0));
}

/// One asset, 0.01/day, zero volatility, 5 days from 1000
#[test]
fn test_drift_only_single_asset() {
    let sim = DiscreteSimulation {
        mean_returns: vec![0.01],
        covariance: Matrix::zeros(1),
        weights: Weights::equal(1).unwrap(),
        horizon: 5,
        num_paths: 7,
        initial_value: 1_000.0,
        seed: 3,
    };
    let ensemble = simulate_discrete(&sim).unwrap();

    let summary = summarize(&ensemble, &[10.0, 50.0, 90.0]).computed().unwrap();
    let expected = 1_000.0 * 1.01_f64.powi(5);
    assert!((summary.mean - expected).abs() < 1e-9);
    assert!((expected - 1051.01).abs() < 0.01);
    assert!(summary.std_dev.abs() < 1e-9);
    assert!((summary.min - summary.max).abs() < 1e-9);
}

#[test]
fn test_projection_table_over_years() {
    let settings = ProjectionSettings {
        num_paths: 200,
        years: 5,
        ..Default::default()
    };
    let sim = LogGbmSimulation::from_settings(0.07, 0.15, &settings);
    let ensemble = simulate_log_gbm(&sim).unwrap();
    assert_eq!(ensemble.steps(), 5 * 252);

    let table = percentile_table(&ensemble, &settings.markers(), &settings.percentiles)
        .computed()
        .unwrap();
    assert_eq!(table.markers, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(table.values.len(), 6);
    assert!(table.values.iter().all(|row| row.len() == 5));

    // year 0 is the first simulated day, close to the initial value
    let median0 = table.value(0, 50.0).unwrap();
    assert!((median0 / settings.initial_value - 1.0).abs() < 0.05);
}

#[test]
fn test_momentum_projection() {
    let n = 300;
    let dates: Vec<_> = date(2020, 1, 1).series(1.day()).take(n).collect();
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| vec![0.001 + 0.0001 * (i % 3) as f64, 0.0005])
        .collect();
    let returns = ReturnSeries::from_rows(dates, vec!["A".into(), "B".into()], &rows).unwrap();

    let (mean, vol) = momentum_parameters(&returns, 252).computed().unwrap();
    assert!(mean > 0.0);
    assert!(vol > 0.0);

    let settings = ProjectionSettings {
        num_paths: 50,
        years: 1,
        ..Default::default()
    };
    let ensemble = simulate_log_gbm(&LogGbmSimulation::from_settings(mean, vol, &settings)).unwrap();
    assert_eq!(ensemble.n_paths(), 50);
}

#[test]
fn test_empty_ensemble_sections_are_unavailable() {
    let empty = Ensemble::from_paths(vec![]);
    assert_eq!(
        summarize(&empty, &[50.0]).reason(),
        Some(&Unavailable::EmptyEnsemble)
    );
    assert!(!percentile_table(&empty, &[0, 1], &[50.0]).is_computed());
    assert!(!failure_rate(&empty, 1.0, 1.0).is_computed());
}

fn two_asset_returns(rows: &[Vec<f64>]) -> ReturnSeries {
    let dates: Vec<_> = date(2024, 1, 2).series(1.day()).take(rows.len()).collect();
    ReturnSeries::from_rows(dates, vec!["A".into(), "B".into()], rows).unwrap()
}

#[test]
fn test_run_discrete_from_returns() {
    let returns = two_asset_returns(&vec![vec![0.0, 0.0]; 4]);
    let settings = DiscreteSettings {
        num_paths: 5,
        horizon_days: 2,
        initial_value: 500.0,
        ..Default::default()
    };

    let run = run_discrete(&returns, Weights::equal(2).unwrap(), &settings).unwrap();

    assert_eq!(run.statistics.symbols, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(run.ensemble.n_paths(), 5);
    assert_eq!(run.ensemble.final_values(), vec![500.0; 5]);
}

#[test]
fn test_run_discrete_reports_failing_stage() {
    let settings = DiscreteSettings::default();

    let short = two_asset_returns(&[vec![0.01, 0.02]]);
    let err = run_discrete(&short, Weights::equal(2).unwrap(), &settings).unwrap_err();
    assert!(matches!(
        err,
        Error::Estimation(EstimationError::InsufficientObservations { observations: 1 })
    ));

    let returns = two_asset_returns(&[vec![0.01, 0.02], vec![0.0, -0.01], vec![0.02, 0.0]]);
    let err = run_discrete(&returns, Weights::equal(3).unwrap(), &settings).unwrap_err();
    assert!(matches!(
        err,
        Error::Simulation(SimulationError::DimensionMismatch { expected: 2, found: 3, .. })
    ));
}

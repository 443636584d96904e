//! Momentum-tilted weighting
//!
//! Each asset is weighted by its trailing mean return relative to the sum of
//! absolute trailing means at that step. Weights are applied with a one-step
//! lag, so today's return is weighted by yesterday's score.

use crate::model::{Outcome, ReturnSeries, Unavailable};
use crate::stats::{annualize, mean, sample_std};

/// Trailing `lookback`-observation mean of every column, per row.
///
/// Rows before the window is full are `None`.
#[must_use]
pub fn rolling_scores(returns: &ReturnSeries, lookback: usize) -> Vec<Option<Vec<f64>>> {
    let lookback = lookback.max(1);
    let n = returns.n_assets();
    let mut sums = vec![0.0; n];

    (0..returns.n_obs())
        .map(|t| {
            for (s, r) in sums.iter_mut().zip(returns.row(t)) {
                *s += r;
            }
            if t >= lookback {
                for (s, r) in sums.iter_mut().zip(returns.row(t - lookback)) {
                    *s -= r;
                }
            }
            (t + 1 >= lookback).then(|| sums.iter().map(|s| s / lookback as f64).collect())
        })
        .collect()
}

/// Per-step weight vectors derived from rolling scores.
///
/// Falls back to equal weights when the window is not yet full or the
/// absolute scores sum to zero. Weights may be negative for assets with a
/// negative trailing mean.
#[must_use]
pub fn momentum_weights(returns: &ReturnSeries, lookback: usize) -> Vec<Vec<f64>> {
    let n = returns.n_assets();
    let equal = vec![1.0 / n as f64; n];

    rolling_scores(returns, lookback)
        .into_iter()
        .map(|scores| match scores {
            Some(scores) => {
                let total: f64 = scores.iter().map(|s| s.abs()).sum();
                if total > 0.0 && total.is_finite() {
                    scores.iter().map(|s| s / total).collect()
                } else {
                    equal.clone()
                }
            }
            None => equal.clone(),
        })
        .collect()
}

/// Realized momentum portfolio return per observation.
///
/// The first observation has no lagged weight and contributes zero.
pub fn momentum_returns(returns: &ReturnSeries, lookback: usize) -> Outcome<Vec<f64>> {
    if returns.n_assets() == 0 {
        return Outcome::Unavailable(Unavailable::NoAssets);
    }
    if returns.is_empty() {
        return Outcome::Unavailable(Unavailable::EmptySeries {
            what: "return series".to_string(),
        });
    }

    let weights = momentum_weights(returns, lookback);
    let realized = (0..returns.n_obs())
        .map(|t| {
            if t == 0 {
                return 0.0;
            }
            weights[t - 1]
                .iter()
                .zip(returns.row(t))
                .map(|(w, r)| w * r)
                .sum()
        })
        .collect();

    Outcome::Computed(realized)
}

/// Annualized `(mean, volatility)` of the momentum return series.
pub fn momentum_parameters(returns: &ReturnSeries, lookback: usize) -> Outcome<(f64, f64)> {
    momentum_returns(returns, lookback).map(|realized| {
        let (annual_mean, annual_volatility) = annualize(mean(&realized), sample_std(&realized));
        tracing::debug!(annual_mean, annual_volatility, lookback, "momentum parameters");
        (annual_mean, annual_volatility)
    })
}

//! Statistics estimator
//!
//! Turns aligned return series into the inputs of the path simulator (mean
//! vector and sample covariance) plus annualized descriptive figures.

use serde::{Deserialize, Serialize};

use crate::error::EstimationError;
use crate::linalg::Matrix;
use crate::model::{PriceFrame, ReturnSeries};

/// Trading days per year used for annualization
pub const TRADING_DAYS: usize = 252;

/// Mean vector and covariance matrix of a set of return series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    pub symbols: Vec<String>,
    pub mean: Vec<f64>,
    /// Sample covariance (`n - 1` denominator)
    pub covariance: Matrix,
    pub observations: usize,
}

/// Estimate per-asset means and the sample covariance matrix.
pub fn estimate(returns: &ReturnSeries) -> Result<ReturnStatistics, EstimationError> {
    let n_assets = returns.n_assets();
    let n_obs = returns.n_obs();
    if n_assets == 0 {
        return Err(EstimationError::NoAssets);
    }
    if n_obs < 2 {
        return Err(EstimationError::InsufficientObservations {
            observations: n_obs,
        });
    }

    let columns: Vec<Vec<f64>> = (0..n_assets).map(|j| returns.column(j)).collect();
    if let Some(j) = columns
        .iter()
        .position(|c| c.iter().any(|v| !v.is_finite()))
    {
        return Err(EstimationError::NonFinite {
            symbol: returns.symbols()[j].clone(),
        });
    }

    let mean: Vec<f64> = columns.iter().map(|c| mean(c)).collect();
    let denom = (n_obs - 1) as f64;

    let mut covariance = Matrix::zeros(n_assets);
    for i in 0..n_assets {
        for j in i..n_assets {
            let cov = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(a, b)| (a - mean[i]) * (b - mean[j]))
                .sum::<f64>()
                / denom;
            covariance.set(i, j, cov);
            covariance.set(j, i, cov);
        }
    }

    tracing::debug!(assets = n_assets, observations = n_obs, "estimated return statistics");

    Ok(ReturnStatistics {
        symbols: returns.symbols().to_vec(),
        mean,
        covariance,
        observations: n_obs,
    })
}

impl ReturnStatistics {
    /// Per-asset sample standard deviations
    #[must_use]
    pub fn std_devs(&self) -> Vec<f64> {
        self.covariance
            .diag()
            .into_iter()
            .map(|v| v.max(0.0).sqrt())
            .collect()
    }

    #[must_use]
    pub fn correlation(&self) -> Matrix {
        self.covariance.correlation()
    }

    /// Annualized return, volatility, and Sharpe ratio per asset.
    ///
    /// `risk_free_rate` is annual, in the same units as the returns.
    #[must_use]
    pub fn asset_statistics(&self, risk_free_rate: f64) -> Vec<AssetStatistics> {
        self.symbols
            .iter()
            .zip(self.mean.iter().zip(self.std_devs()))
            .map(|(symbol, (&m, s))| {
                let (annualized_return, annualized_volatility) = annualize(m, s);
                AssetStatistics {
                    symbol: symbol.clone(),
                    annualized_return,
                    annualized_volatility,
                    sharpe_ratio: sharpe_ratio(
                        annualized_return,
                        annualized_volatility,
                        risk_free_rate,
                    ),
                }
            })
            .collect()
    }

    /// Portfolio-level figures: average of per-asset means and volatilities.
    #[must_use]
    pub fn portfolio_statistics(&self) -> PortfolioStatistics {
        let (annual_return, annual_volatility) =
            annualize(mean(&self.mean), mean(&self.std_devs()));
        PortfolioStatistics {
            annual_return,
            annual_volatility,
            sharpe_ratio: sharpe_ratio(annual_return, annual_volatility, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStatistics {
    pub symbol: String,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
}

/// Scale a daily mean and standard deviation to annual figures.
#[inline]
#[must_use]
pub fn annualize(daily_mean: f64, daily_std: f64) -> (f64, f64) {
    (
        daily_mean * TRADING_DAYS as f64,
        daily_std * (TRADING_DAYS as f64).sqrt(),
    )
}

/// Excess return per unit of volatility; zero when volatility is zero.
#[inline]
#[must_use]
pub fn sharpe_ratio(annual_return: f64, annual_volatility: f64, risk_free_rate: f64) -> f64 {
    if annual_volatility > 0.0 {
        (annual_return - risk_free_rate) / annual_volatility
    } else {
        0.0
    }
}

/// Arithmetic mean; 0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (`n - 1`); 0 with fewer than two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Population standard deviation (`n`); 0 for an empty slice.
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Largest peak-to-trough decline of one price column, as a non-positive fraction.
#[must_use]
pub fn drawdown(prices: &[f64]) -> Option<f64> {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: Option<f64> = None;
    for &p in prices {
        peak = peak.max(p);
        let dd = p / peak - 1.0;
        worst = Some(worst.map_or(dd, |w| w.min(dd)));
    }
    worst
}

/// Worst drawdown across every asset in the frame.
#[must_use]
pub fn max_drawdown(frame: &PriceFrame) -> Option<f64> {
    (0..frame.n_assets())
        .filter_map(|j| drawdown(&frame.column(j)))
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn returns(rows: &[Vec<f64>]) -> ReturnSeries {
        let dates = (0..rows.len())
            .map(|i| date(2024, 1, 1 + i as i8))
            .collect();
        let symbols = (0..rows[0].len()).map(|j| format!("S{j}")).collect();
        ReturnSeries::from_rows(dates, symbols, rows).unwrap()
    }

    #[test]
    fn test_estimate_mean_and_covariance() {
        let stats = estimate(&returns(&[
            vec![0.01, 0.02],
            vec![0.03, 0.00],
            vec![0.02, 0.04],
        ]))
        .unwrap();

        assert!((stats.mean[0] - 0.02).abs() < 1e-12);
        assert!((stats.mean[1] - 0.02).abs() < 1e-12);
        // var(a) = (1e-4 + 1e-4 + 0) / 2
        assert!((stats.covariance.get(0, 0) - 1e-4).abs() < 1e-15);
        // cov(a, b) = ((-0.01)(0) + (0.01)(-0.02) + 0 * 0.02) / 2
        assert!((stats.covariance.get(0, 1) - (-1e-4)).abs() < 1e-15);
        assert!(stats.covariance.is_symmetric());
        assert_eq!(stats.observations, 3);
    }

    #[test]
    fn test_estimate_requires_two_observations() {
        let err = estimate(&returns(&[vec![0.01]])).unwrap_err();
        assert!(matches!(
            err,
            EstimationError::InsufficientObservations { observations: 1 }
        ));
    }

    #[test]
    fn test_estimate_rejects_non_finite() {
        let err = estimate(&returns(&[vec![0.01, f64::NAN], vec![0.02, 0.01]])).unwrap_err();
        assert!(matches!(err, EstimationError::NonFinite { symbol } if symbol == "S1"));
    }

    #[test]
    fn test_zero_variance_is_not_an_estimation_error() {
        let stats = estimate(&returns(&[vec![0.0, 0.0], vec![0.0, 0.0]])).unwrap();
        assert_eq!(stats.covariance, Matrix::zeros(2));
    }

    #[test]
    fn test_asset_statistics() {
        let stats = ReturnStatistics {
            symbols: vec!["A".into()],
            mean: vec![0.001],
            covariance: Matrix::diagonal(&[0.0001]),
            observations: 100,
        };
        let a = &stats.asset_statistics(0.02)[0];
        assert!((a.annualized_return - 0.252).abs() < 1e-12);
        assert!((a.annualized_volatility - 0.01 * 252f64.sqrt()).abs() < 1e-12);
        assert!((a.sharpe_ratio - (0.252 - 0.02) / a.annualized_volatility).abs() < 1e-12);
    }

    #[test]
    fn test_std_helpers() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&values) - 2.0).abs() < 1e-12);
        assert!((sample_std(&values) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_drawdown() {
        assert_eq!(drawdown(&[100.0, 120.0, 90.0, 130.0]), Some(90.0 / 120.0 - 1.0));
        assert_eq!(drawdown(&[]), None);
        assert_eq!(drawdown(&[1.0, 2.0, 3.0]), Some(0.0));
    }
}

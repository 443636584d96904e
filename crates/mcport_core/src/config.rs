//! Run parameters for the two simulation modes
//!
//! These records are plain data (serde-friendly) and are turned into the
//! explicit per-call simulation records in [`crate::simulation`].

use serde::{Deserialize, Serialize};

use crate::stats::TRADING_DAYS;

fn default_discrete_paths() -> usize {
    10_000
}

fn default_discrete_horizon() -> usize {
    365
}

fn default_discrete_initial() -> f64 {
    100_000.0
}

fn default_expected_gain() -> f64 {
    1.1
}

fn default_seed() -> u64 {
    42
}

fn default_projection_paths() -> usize {
    1_000
}

fn default_projection_years() -> u32 {
    20
}

fn default_projection_initial() -> f64 {
    1_000_000.0
}

fn default_percentiles() -> Vec<f64> {
    vec![10.0, 25.0, 50.0, 75.0, 90.0]
}

fn default_true() -> bool {
    true
}

fn default_lookback() -> usize {
    TRADING_DAYS
}

fn default_horizon_years() -> Vec<u32> {
    vec![1, 3, 5, 7, 10]
}

fn default_risk_free_rate() -> f64 {
    0.02
}

/// Discrete (arithmetic daily compounding, full covariance) run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSettings {
    #[serde(default = "default_discrete_paths")]
    pub num_paths: usize,
    /// Simulated days
    #[serde(default = "default_discrete_horizon")]
    pub horizon_days: usize,
    #[serde(default = "default_discrete_initial")]
    pub initial_value: f64,
    /// Target multiple of the initial value; paths ending below it fail
    #[serde(default = "default_expected_gain")]
    pub expected_gain: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

impl Default for DiscreteSettings {
    fn default() -> Self {
        Self {
            num_paths: default_discrete_paths(),
            horizon_days: default_discrete_horizon(),
            initial_value: default_discrete_initial(),
            expected_gain: default_expected_gain(),
            seed: default_seed(),
            percentiles: default_percentiles(),
        }
    }
}

/// Long-horizon log-GBM projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    #[serde(default = "default_projection_paths")]
    pub num_paths: usize,
    /// Projection length; reporting markers run from year 0 to this year
    #[serde(default = "default_projection_years")]
    pub years: u32,
    #[serde(default = "default_projection_initial")]
    pub initial_value: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
    /// Subtract `0.5·σ²` from the daily drift
    #[serde(default = "default_true")]
    pub ito_correction: bool,
    /// Rolling window for momentum scores, in observations
    #[serde(default = "default_lookback")]
    pub momentum_lookback: usize,
    /// Horizons for the per-asset return-range table
    #[serde(default = "default_horizon_years")]
    pub horizon_years: Vec<u32>,
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            num_paths: default_projection_paths(),
            years: default_projection_years(),
            initial_value: default_projection_initial(),
            seed: default_seed(),
            percentiles: default_percentiles(),
            ito_correction: true,
            momentum_lookback: default_lookback(),
            horizon_years: default_horizon_years(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl ProjectionSettings {
    /// Simulated trading days
    #[must_use]
    pub fn horizon_days(&self) -> usize {
        self.years as usize * TRADING_DAYS
    }

    /// Year markers `0..=years`
    #[must_use]
    pub fn markers(&self) -> Vec<u32> {
        (0..=self.years).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_horizon() {
        let settings = ProjectionSettings {
            years: 3,
            ..Default::default()
        };
        assert_eq!(settings.horizon_days(), 756);
        assert_eq!(settings.markers(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_defaults() {
        let d = DiscreteSettings::default();
        assert_eq!(d.num_paths, 10_000);
        assert_eq!(d.horizon_days, 365);
        assert_eq!(d.expected_gain, 1.1);

        let p = ProjectionSettings::default();
        assert_eq!(p.percentiles, vec![10.0, 25.0, 50.0, 75.0, 90.0]);
        assert!(p.ito_correction);
        assert_eq!(p.momentum_lookback, 252);
    }
}

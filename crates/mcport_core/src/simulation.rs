//! Monte Carlo path simulation
//!
//! Two distinct discretizations are provided and deliberately kept apart:
//!
//! - [`simulate_discrete`]: arithmetic daily returns drawn from the full
//!   historical mean vector and covariance (correlated through a Cholesky
//!   factor), compounded as `V₀ · ∏(1 + w·r[t])`.
//! - [`simulate_log_gbm`]: a single aggregate annualized mean/volatility scaled
//!   to a daily drift/shock pair, with values `V₀ · exp(Σ normal(drift, shock))`.
//!
//! [`run_discrete`] chains estimation and the discrete simulation for callers
//! that start from a return series.
//!
//! [`simulate_horizon_returns`] runs the log formulation per asset to produce
//! return ranges at several horizons.
//!
//! Every path draws from its own RNG seeded from the master seed, so results
//! are identical with or without the `parallel` feature.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{DiscreteSettings, ProjectionSettings};
use crate::error::SimulationError;
use crate::linalg::Matrix;
use crate::model::{Ensemble, ReturnSeries, Weights};
use crate::stats::{ReturnStatistics, TRADING_DAYS, estimate};

const MAX_BATCH_SIZE: usize = 100;

/// Inputs for one discrete-mode simulation call
#[derive(Debug, Clone)]
pub struct DiscreteSimulation {
    /// Mean daily return per asset
    pub mean_returns: Vec<f64>,
    pub covariance: Matrix,
    pub weights: Weights,
    /// Number of simulated days
    pub horizon: usize,
    pub num_paths: usize,
    pub initial_value: f64,
    pub seed: u64,
}

impl DiscreteSimulation {
    #[must_use]
    pub fn from_statistics(
        stats: &ReturnStatistics,
        weights: Weights,
        settings: &DiscreteSettings,
    ) -> Self {
        Self {
            mean_returns: stats.mean.clone(),
            covariance: stats.covariance.clone(),
            weights,
            horizon: settings.horizon_days,
            num_paths: settings.num_paths,
            initial_value: settings.initial_value,
            seed: settings.seed,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let n = self.mean_returns.len();
        if self.covariance.dim() != n {
            return Err(SimulationError::DimensionMismatch {
                what: "covariance matrix",
                expected: n,
                found: self.covariance.dim(),
            });
        }
        if self.weights.len() != n {
            return Err(SimulationError::DimensionMismatch {
                what: "weight vector",
                expected: n,
                found: self.weights.len(),
            });
        }
        if !self.initial_value.is_finite() {
            return Err(SimulationError::InvalidInitialValue(self.initial_value));
        }
        Ok(())
    }
}

/// How the daily drift is derived from the annual mean in log mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftConvention {
    /// `mean/252 - 0.5·σ²/252`
    ItoCorrected,
    /// `mean/252`
    Raw,
}

/// Inputs for one log-GBM simulation call
#[derive(Debug, Clone)]
pub struct LogGbmSimulation {
    pub annual_mean: f64,
    pub annual_volatility: f64,
    pub horizon: usize,
    pub num_paths: usize,
    pub initial_value: f64,
    pub seed: u64,
    pub drift: DriftConvention,
}

impl LogGbmSimulation {
    #[must_use]
    pub fn from_settings(annual_mean: f64, annual_volatility: f64, settings: &ProjectionSettings) -> Self {
        Self {
            annual_mean,
            annual_volatility,
            horizon: settings.horizon_days(),
            num_paths: settings.num_paths,
            initial_value: settings.initial_value,
            seed: settings.seed,
            drift: if settings.ito_correction {
                DriftConvention::ItoCorrected
            } else {
                DriftConvention::Raw
            },
        }
    }

    /// Daily `(drift, shock)` pair
    #[must_use]
    pub fn daily_parameters(&self) -> (f64, f64) {
        daily_parameters(self.annual_mean, self.annual_volatility, self.drift)
    }
}

/// Scale annual mean/volatility to a daily log drift and shock.
#[must_use]
pub fn daily_parameters(annual_mean: f64, annual_volatility: f64, drift: DriftConvention) -> (f64, f64) {
    let days = TRADING_DAYS as f64;
    let variance = annual_volatility * annual_volatility;
    let daily_drift = match drift {
        DriftConvention::ItoCorrected => annual_mean / days - 0.5 * variance / days,
        DriftConvention::Raw => annual_mean / days,
    };
    (daily_drift, annual_volatility / days.sqrt())
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, SimulationError> {
    let invalid = || SimulationError::InvalidDistributionParameters {
        mean,
        std_dev,
        reason: "std_dev must be non-negative and finite",
    };
    // Normal::new only rejects a non-finite std_dev
    if std_dev < 0.0 {
        return Err(invalid());
    }
    Normal::new(mean, std_dev).map_err(|_| invalid())
}

/// Run `num_paths` independent paths, each with its own seeded RNG.
///
/// Paths are generated in batches; batch `i` seeds a generator from the master
/// seed that in turn hands out one seed per path. Output order is path order.
fn run_paths<F>(num_paths: usize, seed: u64, path_fn: &F) -> Vec<Vec<f64>>
where
    F: Fn(&mut SmallRng) -> Vec<f64> + Sync,
{
    let num_batches = num_paths.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |i: usize| {
        let mut rng =
            SmallRng::seed_from_u64(seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let batch_size = if i == num_batches - 1 {
            num_paths - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        (0..batch_size)
            .map(|_| {
                let mut path_rng = SmallRng::seed_from_u64(rng.next_u64());
                path_fn(&mut path_rng)
            })
            .collect::<Vec<_>>()
    };

    #[cfg(feature = "parallel")]
    let paths = (0..num_batches).into_par_iter().flat_map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let paths = (0..num_batches).flat_map(run_batch).collect();

    paths
}

/// Statistics and ensemble of one discrete-mode run
#[derive(Debug, Clone)]
pub struct DiscreteRun {
    pub statistics: ReturnStatistics,
    pub ensemble: Ensemble,
}

/// Estimate mean/covariance from `returns` and simulate the weighted portfolio.
pub fn run_discrete(
    returns: &ReturnSeries,
    weights: Weights,
    settings: &DiscreteSettings,
) -> crate::Result<DiscreteRun> {
    let statistics = estimate(returns)?;
    let simulation = DiscreteSimulation::from_statistics(&statistics, weights, settings);
    let ensemble = simulate_discrete(&simulation)?;
    Ok(DiscreteRun {
        statistics,
        ensemble,
    })
}

/// Discrete-mode ensemble: correlated daily returns compounded arithmetically.
pub fn simulate_discrete(config: &DiscreteSimulation) -> Result<Ensemble, SimulationError> {
    config.validate()?;
    let l = config.covariance.cholesky()?;
    let n = config.mean_returns.len();
    let mean = config.mean_returns.as_slice();
    let weights = &config.weights;

    tracing::debug!(
        assets = n,
        horizon = config.horizon,
        paths = config.num_paths,
        "running discrete simulation"
    );

    let path_fn = |rng: &mut SmallRng| {
        let mut z = vec![0.0; n];
        let mut shocks = vec![0.0; n];
        let mut daily = vec![0.0; n];
        let mut value = config.initial_value;
        let mut path = Vec::with_capacity(config.horizon);

        for _ in 0..config.horizon {
            for zi in &mut z {
                *zi = rng.sample(StandardNormal);
            }
            l.lower_mul_into(&z, &mut shocks);
            for ((d, m), s) in daily.iter_mut().zip(mean).zip(&shocks) {
                *d = m + s;
            }
            value *= 1.0 + weights.dot(&daily);
            path.push(value);
        }
        path
    };

    Ok(Ensemble::from_paths(run_paths(
        config.num_paths,
        config.seed,
        &path_fn,
    )))
}

/// Log-mode ensemble: `V₀ · exp(cumsum(normal(drift, shock)))`.
pub fn simulate_log_gbm(config: &LogGbmSimulation) -> Result<Ensemble, SimulationError> {
    if !config.initial_value.is_finite() {
        return Err(SimulationError::InvalidInitialValue(config.initial_value));
    }
    let (drift, shock) = config.daily_parameters();
    let dist = normal(drift, shock)?;

    tracing::debug!(
        drift,
        shock,
        horizon = config.horizon,
        paths = config.num_paths,
        "running log-GBM simulation"
    );

    let path_fn = |rng: &mut SmallRng| {
        let mut log_growth = 0.0;
        (0..config.horizon)
            .map(|_| {
                log_growth += dist.sample(rng);
                config.initial_value * log_growth.exp()
            })
            .collect()
    };

    Ok(Ensemble::from_paths(run_paths(
        config.num_paths,
        config.seed,
        &path_fn,
    )))
}

/// Inputs for per-asset log-GBM horizon returns
#[derive(Debug, Clone)]
pub struct HorizonSimulation {
    /// Annualized mean log return per asset
    pub annual_means: Vec<f64>,
    /// Annualized volatility per asset
    pub annual_volatilities: Vec<f64>,
    pub weights: Weights,
    pub horizons_years: Vec<u32>,
    pub num_paths: usize,
    pub seed: u64,
    pub drift: DriftConvention,
}

/// Simulated portfolio returns (fractions) at one horizon
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonReturns {
    pub years: u32,
    pub returns: Vec<f64>,
}

/// For each horizon, simulate every asset independently and record the
/// weighted final price relative minus one, per path.
pub fn simulate_horizon_returns(
    config: &HorizonSimulation,
) -> Result<Vec<HorizonReturns>, SimulationError> {
    let n = config.annual_means.len();
    if config.annual_volatilities.len() != n {
        return Err(SimulationError::DimensionMismatch {
            what: "volatility vector",
            expected: n,
            found: config.annual_volatilities.len(),
        });
    }
    if config.weights.len() != n {
        return Err(SimulationError::DimensionMismatch {
            what: "weight vector",
            expected: n,
            found: config.weights.len(),
        });
    }

    let dists = config
        .annual_means
        .iter()
        .zip(&config.annual_volatilities)
        .map(|(&m, &v)| {
            let (drift, shock) = daily_parameters(m, v, config.drift);
            normal(drift, shock)
        })
        .collect::<Result<Vec<_>, _>>()?;

    config
        .horizons_years
        .iter()
        .enumerate()
        .map(|(h, &years)| {
            let days = years as usize * TRADING_DAYS;
            let path_fn = |rng: &mut SmallRng| {
                let relatives: Vec<f64> = dists
                    .iter()
                    .map(|dist| (0..days).map(|_| dist.sample(rng)).sum::<f64>().exp())
                    .collect();
                vec![config.weights.dot(&relatives) - 1.0]
            };
            let horizon_seed = config.seed.wrapping_add(h as u64);
            let returns = run_paths(config.num_paths, horizon_seed, &path_fn)
                .into_iter()
                .map(|p| p[0])
                .collect();
            Ok(HorizonReturns { years, returns })
        })
        .collect()
}

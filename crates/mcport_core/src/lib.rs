//! Monte Carlo portfolio projection library
//!
//! This crate turns historical closing prices into simulated future
//! portfolio values. It supports:
//! - Loading price series from CSV files or a seeded synthetic generator
//! - Mean/covariance estimation and annualized descriptive statistics
//! - Discrete GBM paths with Cholesky-correlated daily returns
//! - Log-return GBM projections over multi-year horizons
//! - Momentum-tilted weighting from trailing mean returns
//! - Percentile tables, failure rates and summaries over the ensemble
//! - Historical portfolio vs. benchmark comparison series
//!
//! ```ignore
//! use mcport_core::config::DiscreteSettings;
//! use mcport_core::data::{CsvDirectory, PriceSource};
//! use mcport_core::model::{ReturnKind, Weights};
//! use mcport_core::simulation::run_discrete;
//!
//! let frame = CsvDirectory::new("data").excluding("SPY").frame()?;
//! let weights = Weights::equal(frame.n_assets())?;
//! let run = run_discrete(&frame.returns(ReturnKind::Simple), weights, &DiscreteSettings::default())?;
//! println!("{} paths", run.ensemble.n_paths());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod comparison;
pub mod data;
pub mod error;
pub mod linalg;
pub mod momentum;
pub mod simulation;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{DiscreteSettings, ProjectionSettings};
pub use error::{Error, Result};
pub use model::{Ensemble, Outcome, Unavailable, Weights};

use jiff::ToSpan;
use jiff::civil::{Date, Weekday};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::PriceSource;
use crate::error::DataError;
use crate::model::{PriceSeries, ReturnSeries};

/// Weekdays from `start` to `end`, inclusive. Holidays are not excluded.
#[must_use]
pub fn business_days(start: Date, end: Date) -> Vec<Date> {
    if start > end {
        return Vec::new();
    }
    start
        .series(1.day())
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday))
        .collect()
}

fn default_mean() -> f64 {
    0.0005
}

fn default_std_dev() -> f64 {
    0.01
}

fn default_initial_price() -> f64 {
    100.0
}

/// Seeded stand-in for historical market data
///
/// Daily returns are drawn i.i.d. normal per symbol; prices are
/// `initial_price · ∏(1 + r)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSource {
    pub symbols: Vec<String>,
    pub start: Date,
    pub end: Date,
    #[serde(default = "default_mean")]
    pub mean: f64,
    #[serde(default = "default_std_dev")]
    pub std_dev: f64,
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,
    pub seed: u64,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(symbols: Vec<String>, start: Date, end: Date, seed: u64) -> Self {
        Self {
            symbols,
            start,
            end,
            mean: default_mean(),
            std_dev: default_std_dev(),
            initial_price: default_initial_price(),
            seed,
        }
    }

    /// The drawn daily returns, one row per business day.
    pub fn returns(&self) -> Result<ReturnSeries, DataError> {
        if self.std_dev < 0.0 {
            return Err(DataError::Generator(format!(
                "std_dev must be non-negative, got {}",
                self.std_dev
            )));
        }
        let dist = Normal::new(self.mean, self.std_dev)
            .map_err(|e| DataError::Generator(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let dates = business_days(self.start, self.end);
        let rows: Vec<Vec<f64>> = dates
            .iter()
            .map(|_| self.symbols.iter().map(|_| dist.sample(&mut rng)).collect())
            .collect();

        ReturnSeries::from_rows(dates, self.symbols.clone(), &rows)
    }
}

impl PriceSource for SyntheticSource {
    fn load(&self) -> Result<Vec<PriceSeries>, DataError> {
        let returns = self.returns()?;
        let series = self
            .symbols
            .iter()
            .enumerate()
            .map(|(j, symbol)| {
                let mut price = self.initial_price;
                let points = returns
                    .dates()
                    .iter()
                    .zip(returns.column(j))
                    .map(|(&d, r)| {
                        price *= 1.0 + r;
                        (d, price)
                    })
                    .collect();
                PriceSeries::new(symbol.clone(), points)
            })
            .collect();

        tracing::info!(
            symbols = self.symbols.len(),
            days = returns.n_obs(),
            seed = self.seed,
            "generated synthetic prices"
        );
        Ok(series)
    }
}

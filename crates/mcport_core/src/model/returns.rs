use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// How a period return is derived from two consecutive prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// `p1 / p0 - 1`
    #[default]
    Simple,
    /// `ln(p1 / p0)`
    Log,
}

impl ReturnKind {
    #[inline]
    #[must_use]
    pub fn compute(self, previous: f64, current: f64) -> f64 {
        match self {
            ReturnKind::Simple => current / previous - 1.0,
            ReturnKind::Log => (current / previous).ln(),
        }
    }
}

/// Aligned per-asset return observations
///
/// Every asset shares the same date index; values are stored row-major with
/// one row per date.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<Date>,
    symbols: Vec<String>,
    values: Vec<f64>,
}

impl ReturnSeries {
    pub(crate) fn from_parts(dates: Vec<Date>, symbols: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len() * symbols.len(), values.len());
        Self {
            dates,
            symbols,
            values,
        }
    }

    /// Build from explicit rows, one per date.
    pub fn from_rows(
        dates: Vec<Date>,
        symbols: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<Self, DataError> {
        let n = symbols.len();
        if rows.len() != dates.len() || rows.iter().any(|r| r.len() != n) {
            return Err(DataError::Shape {
                rows: dates.len(),
                columns: n,
                values: rows.iter().map(Vec::len).sum(),
            });
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DataError::UnsortedDates);
        }
        Ok(Self::from_parts(dates, symbols, rows.concat()))
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of dated observations
    #[must_use]
    pub fn n_obs(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    #[must_use]
    pub fn row(&self, t: usize) -> &[f64] {
        let n = self.symbols.len();
        &self.values[t * n..(t + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.symbols.len().max(1))
    }

    #[must_use]
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|row| row[col]).collect()
    }

    /// Weighted return per date (`w · r[t]`).
    #[must_use]
    pub fn weighted(&self, weights: &[f64]) -> Vec<f64> {
        debug_assert_eq!(weights.len(), self.n_assets());
        self.rows()
            .map(|row| row.iter().zip(weights).map(|(r, w)| r * w).sum())
            .collect()
    }

    /// Cross-sectional mean per date, i.e. an equally weighted portfolio.
    #[must_use]
    pub fn row_means(&self) -> Vec<f64> {
        let n = self.n_assets() as f64;
        self.rows().map(|row| row.iter().sum::<f64>() / n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn sample() -> ReturnSeries {
        ReturnSeries::from_rows(
            vec![date(2024, 1, 2), date(2024, 1, 3)],
            vec!["A".into(), "B".into()],
            &[vec![0.01, 0.03], vec![-0.02, 0.00]],
        )
        .unwrap()
    }

    #[test]
    fn test_weighted_and_row_means() {
        let returns = sample();
        let weighted = returns.weighted(&[0.25, 0.75]);
        assert!((weighted[0] - 0.025).abs() < 1e-12);
        assert!((weighted[1] - (-0.005)).abs() < 1e-12);

        let means = returns.row_means();
        assert!((means[0] - 0.02).abs() < 1e-12);
        assert!((means[1] - (-0.01)).abs() < 1e-12);
        assert_eq!(returns.column(1), vec![0.03, 0.00]);
    }

    #[test]
    fn test_from_rows_validates_shape() {
        let result = ReturnSeries::from_rows(
            vec![date(2024, 1, 2)],
            vec!["A".into(), "B".into()],
            &[vec![0.01]],
        );
        assert!(matches!(result, Err(DataError::Shape { .. })));
    }

    #[test]
    fn test_return_kinds() {
        assert!((ReturnKind::Simple.compute(100.0, 105.0) - 0.05).abs() < 1e-12);
        assert!((ReturnKind::Log.compute(100.0, 100.0)).abs() < 1e-12);
    }
}

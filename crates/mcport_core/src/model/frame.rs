//! Date-aligned price table
//!
//! A [`PriceFrame`] holds one closing-price column per symbol over a shared,
//! strictly increasing date index. Frames built from independent
//! [`PriceSeries`] keep only the dates every series has a price for.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::error::DataError;
use crate::model::{PriceSeries, ReturnKind, ReturnSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceFrame {
    dates: Vec<Date>,
    symbols: Vec<String>,
    /// Row-major: `prices[row * symbols.len() + col]`
    prices: Vec<f64>,
}

impl PriceFrame {
    /// Build a frame from row-major prices.
    pub fn new(dates: Vec<Date>, symbols: Vec<String>, prices: Vec<f64>) -> Result<Self, DataError> {
        if dates.len() * symbols.len() != prices.len() {
            return Err(DataError::Shape {
                rows: dates.len(),
                columns: symbols.len(),
                values: prices.len(),
            });
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DataError::UnsortedDates);
        }
        Ok(Self {
            dates,
            symbols,
            prices,
        })
    }

    /// Join independent series on their common dates.
    ///
    /// Equivalent to an outer join followed by dropping every row with a
    /// missing price. Duplicate dates within one series keep the last value.
    #[must_use]
    pub fn align(series: &[PriceSeries]) -> Self {
        let symbols: Vec<String> = series.iter().map(|s| s.symbol.clone()).collect();
        if series.is_empty() {
            return Self {
                dates: Vec::new(),
                symbols,
                prices: Vec::new(),
            };
        }

        let lookups: Vec<FxHashMap<Date, f64>> = series
            .iter()
            .map(|s| {
                s.points
                    .iter()
                    .filter(|(_, price)| price.is_finite())
                    .copied()
                    .collect()
            })
            .collect();

        // Candidate dates come from the shortest series
        let shortest = lookups
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| m.len())
            .map_or(0, |(i, _)| i);
        let mut dates: Vec<Date> = lookups[shortest]
            .keys()
            .copied()
            .filter(|d| lookups.iter().all(|m| m.contains_key(d)))
            .collect();
        dates.sort_unstable();

        let mut prices = Vec::with_capacity(dates.len() * series.len());
        for date in &dates {
            for lookup in &lookups {
                prices.push(lookup[date]);
            }
        }

        tracing::debug!(
            symbols = symbols.len(),
            rows = dates.len(),
            "aligned price series"
        );

        Self {
            dates,
            symbols,
            prices,
        }
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
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
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.symbols.len();
        &self.prices[row * n..(row + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero, and a frame without symbols has no rows
        let n = self.symbols.len().max(1);
        self.prices.chunks_exact(n)
    }

    #[must_use]
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|row| row[col]).collect()
    }

    #[must_use]
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    #[must_use]
    pub fn column_by_symbol(&self, symbol: &str) -> Option<Vec<f64>> {
        self.position(symbol).map(|col| self.column(col))
    }

    /// One column as a standalone series.
    #[must_use]
    pub fn price_series(&self, symbol: &str) -> Option<PriceSeries> {
        let prices = self.column_by_symbol(symbol)?;
        Some(PriceSeries::new(
            symbol,
            self.dates.iter().copied().zip(prices).collect(),
        ))
    }

    /// Restrict the frame to the given symbols, in the given order.
    pub fn select<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Self, DataError> {
        let cols = symbols
            .iter()
            .map(|s| {
                self.position(s.as_ref())
                    .ok_or_else(|| DataError::UnknownSymbol(s.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut prices = Vec::with_capacity(self.n_rows() * cols.len());
        for row in self.rows() {
            prices.extend(cols.iter().map(|&c| row[c]));
        }
        Ok(Self {
            dates: self.dates.clone(),
            symbols: symbols.iter().map(|s| s.as_ref().to_string()).collect(),
            prices,
        })
    }

    /// Period-over-period returns. The first date has no return and is dropped.
    #[must_use]
    pub fn returns(&self, kind: ReturnKind) -> ReturnSeries {
        let n = self.n_assets();
        let mut values = Vec::with_capacity(self.n_rows().saturating_sub(1) * n);
        for t in 1..self.n_rows() {
            let prev = self.row(t - 1);
            let curr = self.row(t);
            values.extend(prev.iter().zip(curr).map(|(p, c)| kind.compute(*p, *c)));
        }
        let dates = self.dates.iter().skip(1).copied().collect();
        ReturnSeries::from_parts(dates, self.symbols.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn series(symbol: &str, points: &[(i16, i8, i8, f64)]) -> PriceSeries {
        PriceSeries::new(
            symbol,
            points
                .iter()
                .map(|&(y, m, d, p)| (date(y, m, d), p))
                .collect(),
        )
    }

    #[test]
    fn test_align_drops_rows_with_missing_assets() {
        let a = series(
            "AAA",
            &[(2024, 1, 2, 10.0), (2024, 1, 3, 11.0), (2024, 1, 4, 12.0)],
        );
        let b = series("BBB", &[(2024, 1, 4, 21.0), (2024, 1, 2, 20.0)]);

        let frame = PriceFrame::align(&[a, b]);

        assert_eq!(frame.dates(), &[date(2024, 1, 2), date(2024, 1, 4)]);
        assert_eq!(frame.row(0), &[10.0, 20.0]);
        assert_eq!(frame.row(1), &[12.0, 21.0]);
        assert_eq!(frame.column_by_symbol("BBB"), Some(vec![20.0, 21.0]));
    }

    #[test]
    fn test_align_skips_non_finite_prices() {
        let a = series("AAA", &[(2024, 1, 2, 10.0), (2024, 1, 3, f64::NAN)]);
        let frame = PriceFrame::align(&[a]);
        assert_eq!(frame.n_rows(), 1);
    }

    #[test]
    fn test_new_rejects_bad_shape_and_order() {
        let dates = vec![date(2024, 1, 3), date(2024, 1, 2)];
        assert!(matches!(
            PriceFrame::new(dates.clone(), vec!["A".into()], vec![1.0]),
            Err(DataError::Shape { .. })
        ));
        assert!(matches!(
            PriceFrame::new(dates, vec!["A".into()], vec![1.0, 2.0]),
            Err(DataError::UnsortedDates)
        ));
    }

    #[test]
    fn test_select_and_returns() {
        let frame = PriceFrame::new(
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
            vec!["A".into(), "B".into()],
            vec![100.0, 50.0, 110.0, 50.0, 99.0, 55.0],
        )
        .unwrap();

        let b_only = frame.select(&["B"]).unwrap();
        assert_eq!(b_only.column(0), vec![50.0, 50.0, 55.0]);
        assert!(frame.select(&["C"]).is_err());

        let simple = frame.returns(ReturnKind::Simple);
        assert_eq!(simple.n_obs(), 2);
        assert_eq!(simple.dates()[0], date(2024, 1, 3));
        assert!((simple.row(0)[0] - 0.10).abs() < 1e-12);
        assert!((simple.row(1)[0] - (-0.10)).abs() < 1e-12);
        assert!((simple.row(1)[1] - 0.10).abs() < 1e-12);

        let log = frame.returns(ReturnKind::Log);
        assert!((log.row(0)[0] - 1.1_f64.ln()).abs() < 1e-12);
    }
}

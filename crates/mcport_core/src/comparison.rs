//! Historical portfolio vs. benchmark comparison
//!
//! Everything here produces chart-ready [`DatedSeries`]; missing inputs come
//! back as [`Outcome::Unavailable`] rather than empty series.

use crate::model::{
    DatedSeries, Outcome, PriceFrame, PriceSeries, ReturnKind, ReturnSeries, Unavailable, Weights,
};

fn empty(what: &str) -> Unavailable {
    Unavailable::EmptySeries {
        what: what.to_string(),
    }
}

fn cumulative_sum(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Portfolio value relative to its first date: `(prices · w) / (first row · w)`.
pub fn portfolio_growth(frame: &PriceFrame, weights: &Weights) -> Outcome<DatedSeries> {
    if frame.n_assets() == 0 {
        return Outcome::Unavailable(Unavailable::NoAssets);
    }
    if frame.is_empty() {
        return Outcome::Unavailable(empty("portfolio price history"));
    }

    let base = weights.dot(frame.row(0));
    if !(base.is_finite() && base != 0.0) {
        return Outcome::Unavailable(empty("portfolio starting value"));
    }
    let values = frame.rows().map(|row| weights.dot(row) / base).collect();
    Outcome::Computed(DatedSeries::new("Portfolio", frame.dates().to_vec(), values))
}

/// Benchmark price relative to its first price.
pub fn benchmark_growth(benchmark: &PriceSeries) -> Outcome<DatedSeries> {
    let mut points = benchmark.points.clone();
    points.sort_by_key(|(d, _)| *d);
    let Some(&(_, first)) = points.first() else {
        return Outcome::Unavailable(Unavailable::MissingSymbol(benchmark.symbol.clone()));
    };
    if first == 0.0 {
        return Outcome::Unavailable(empty("benchmark starting price"));
    }
    let (dates, values) = points.into_iter().map(|(d, p)| (d, p / first)).unzip();
    Outcome::Computed(DatedSeries::new(benchmark.symbol.clone(), dates, values))
}

/// Running sum of weighted simple returns.
pub fn cumulative_weighted_returns(returns: &ReturnSeries, weights: &Weights) -> Outcome<DatedSeries> {
    if returns.n_assets() == 0 {
        return Outcome::Unavailable(Unavailable::NoAssets);
    }
    if returns.is_empty() {
        return Outcome::Unavailable(empty("portfolio returns"));
    }
    let values = cumulative_sum(returns.weighted(weights.as_slice()));
    Outcome::Computed(DatedSeries::new("Portfolio", returns.dates().to_vec(), values))
}

/// Running sum of a single series' simple returns, starting at its second date.
pub fn cumulative_returns(series: &PriceSeries) -> Outcome<DatedSeries> {
    let mut points = series.points.clone();
    points.sort_by_key(|(d, _)| *d);
    if points.len() < 2 {
        return Outcome::Unavailable(Unavailable::InsufficientHistory {
            needed: 2,
            available: points.len(),
        });
    }

    let returns = points
        .windows(2)
        .map(|w| ReturnKind::Simple.compute(w[0].1, w[1].1));
    let dates = points.iter().skip(1).map(|(d, _)| *d).collect();
    Outcome::Computed(DatedSeries::new(
        series.symbol.clone(),
        dates,
        cumulative_sum(returns),
    ))
}

/// Compounded growth `∏(1 + r)` of every asset, one series per symbol.
#[must_use]
pub fn cumulative_growth(returns: &ReturnSeries) -> Vec<DatedSeries> {
    returns
        .symbols()
        .iter()
        .enumerate()
        .map(|(j, symbol)| {
            let values = returns
                .column(j)
                .into_iter()
                .scan(1.0, |acc, r| {
                    *acc *= 1.0 + r;
                    Some(*acc)
                })
                .collect();
            DatedSeries::new(symbol.clone(), returns.dates().to_vec(), values)
        })
        .collect()
}

/// Total return in percent from a growth series ending at `last`.
pub fn total_return_pct(growth: &DatedSeries) -> Outcome<f64> {
    match growth.last() {
        Some(last) => Outcome::Computed((last - 1.0) * 100.0),
        None => Outcome::Unavailable(empty(&growth.label)),
    }
}

/// Trailing moving average; the output starts at the first full window.
pub fn rolling_mean(series: &DatedSeries, window: usize) -> Outcome<DatedSeries> {
    let window = window.max(1);
    if series.len() < window {
        return Outcome::Unavailable(Unavailable::InsufficientHistory {
            needed: window,
            available: series.len(),
        });
    }

    let values = series
        .values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect();
    Outcome::Computed(DatedSeries::new(
        format!("{} {window}-Day MA", series.label),
        series.dates[window - 1..].to_vec(),
        values,
    ))
}

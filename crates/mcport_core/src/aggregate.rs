//! Reduce a simulation ensemble to reportable figures
//!
//! Percentiles use linear interpolation between closest ranks, i.e. for a
//! sorted sample of `n` values the `p`-th percentile sits at fractional index
//! `p/100 · (n - 1)`.

use crate::model::{
    Ensemble, EnsembleSummary, Histogram, Outcome, PercentileTable, ReturnRange, Unavailable,
};
use crate::simulation::HorizonReturns;
use crate::stats::{TRADING_DAYS, mean, population_std};

/// Percentile of an already ascending-sorted slice; `None` when empty.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let rank = (percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Percentile of an unsorted sample; `None` when empty.
#[must_use]
pub fn percentile(values: &[f64], percentile: f64) -> Option<f64> {
    percentile_sorted(&sorted(values), percentile)
}

/// Several percentiles of one sample, sorting once.
#[must_use]
pub fn percentiles(values: &[f64], percentiles: &[f64]) -> Option<Vec<f64>> {
    let sorted = sorted(values);
    percentiles
        .iter()
        .map(|&p| percentile_sorted(&sorted, p))
        .collect()
}

/// Step index for a yearly marker, clamped to the last step.
#[must_use]
pub fn marker_index(year: u32, steps: usize) -> usize {
    (year as usize * TRADING_DAYS).min(steps.saturating_sub(1))
}

/// Percentile values at each yearly marker.
pub fn percentile_table(
    ensemble: &Ensemble,
    markers: &[u32],
    percentile_levels: &[f64],
) -> Outcome<PercentileTable> {
    if ensemble.is_empty() {
        return Outcome::Unavailable(Unavailable::EmptyEnsemble);
    }

    let values = markers
        .iter()
        .map(|&year| {
            let cross_section = ensemble.step_values(marker_index(year, ensemble.steps()));
            percentiles(&cross_section, percentile_levels).unwrap_or_default()
        })
        .collect();

    Outcome::Computed(PercentileTable {
        markers: markers.to_vec(),
        percentiles: percentile_levels.to_vec(),
        values,
    })
}

/// Percentage of paths whose final value is below `initial_value · expected_gain`.
pub fn failure_rate(ensemble: &Ensemble, initial_value: f64, expected_gain: f64) -> Outcome<f64> {
    if ensemble.is_empty() {
        return Outcome::Unavailable(Unavailable::EmptyEnsemble);
    }
    let target = initial_value * expected_gain;
    let finals = ensemble.final_values();
    let failures = finals.iter().filter(|&&v| v < target).count();
    Outcome::Computed(failures as f64 / finals.len() as f64 * 100.0)
}

/// Mean, population standard deviation, extremes and percentiles of final values.
pub fn summarize(ensemble: &Ensemble, percentile_levels: &[f64]) -> Outcome<EnsembleSummary> {
    if ensemble.is_empty() {
        return Outcome::Unavailable(Unavailable::EmptyEnsemble);
    }
    let finals = sorted(&ensemble.final_values());

    Outcome::Computed(EnsembleSummary {
        num_paths: finals.len(),
        mean: mean(&finals),
        std_dev: population_std(&finals),
        min: finals[0],
        max: finals[finals.len() - 1],
        percentiles: percentile_levels
            .iter()
            .filter_map(|&p| percentile_sorted(&finals, p).map(|v| (p, v)))
            .collect(),
    })
}

/// 5th / 50th / 95th percentile returns, in percent, per horizon.
#[must_use]
pub fn horizon_ranges(results: &[HorizonReturns]) -> Vec<ReturnRange> {
    results
        .iter()
        .filter_map(|h| {
            let pct = percentiles(&h.returns, &[5.0, 50.0, 95.0])?;
            Some(ReturnRange {
                years: h.years,
                low: pct[0] * 100.0,
                median: pct[1] * 100.0,
                high: pct[2] * 100.0,
            })
        })
        .collect()
}

/// Equal-width histogram of `values` over `[min, max]`.
pub fn histogram(values: &[f64], bins: usize) -> Outcome<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Outcome::Unavailable(Unavailable::EmptySeries {
            what: "histogram input".to_string(),
        });
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let edges = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for v in finite {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Outcome::Computed(Histogram { edges, counts })
}

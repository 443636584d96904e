//! Aggregated views of a simulation ensemble

use serde::{Deserialize, Serialize};

/// Tolerance for floating-point percentile lookup
pub const PERCENTILE_TOLERANCE: f64 = 0.001;

/// Percentile values at a sequence of reporting markers (usually years)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileTable {
    /// Marker labels, e.g. year numbers
    pub markers: Vec<u32>,
    /// Percentiles in `[0, 100]`
    pub percentiles: Vec<f64>,
    /// `values[marker][percentile]`
    pub values: Vec<Vec<f64>>,
}

impl PercentileTable {
    fn percentile_index(&self, percentile: f64) -> Option<usize> {
        self.percentiles
            .iter()
            .position(|p| (p - percentile).abs() < PERCENTILE_TOLERANCE)
    }

    /// One percentile's values across all markers (a fan-chart line).
    #[must_use]
    pub fn column(&self, percentile: f64) -> Option<Vec<f64>> {
        let idx = self.percentile_index(percentile)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }

    #[must_use]
    pub fn value(&self, marker: u32, percentile: f64) -> Option<f64> {
        let row = self.markers.iter().position(|&m| m == marker)?;
        let col = self.percentile_index(percentile)?;
        Some(self.values[row][col])
    }

    pub fn rows(&self) -> impl Iterator<Item = (u32, &[f64])> {
        self.markers
            .iter()
            .copied()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Re-express values as percent returns relative to `initial_value`.
    #[must_use]
    pub fn as_returns(&self, initial_value: f64) -> Self {
        Self {
            markers: self.markers.clone(),
            percentiles: self.percentiles.clone(),
            values: self
                .values
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| (v / initial_value - 1.0) * 100.0)
                        .collect()
                })
                .collect(),
        }
    }
}

/// Descriptive statistics of final-step portfolio values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSummary {
    pub num_paths: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `(percentile, value)` pairs
    pub percentiles: Vec<(f64, f64)>,
}

impl EnsembleSummary {
    #[must_use]
    pub fn percentile(&self, percentile: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(p, _)| (p - percentile).abs() < PERCENTILE_TOLERANCE)
            .map(|(_, v)| *v)
    }
}

/// Low / median / high simulated return for one horizon, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnRange {
    pub years: u32,
    pub low: f64,
    pub median: f64,
    pub high: f64,
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` edges, ascending
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PercentileTable {
        PercentileTable {
            markers: vec![0, 1],
            percentiles: vec![10.0, 50.0, 90.0],
            values: vec![vec![90.0, 100.0, 110.0], vec![80.0, 120.0, 150.0]],
        }
    }

    #[test]
    fn test_column_and_value_lookup() {
        let t = table();
        assert_eq!(t.column(50.0), Some(vec![100.0, 120.0]));
        assert_eq!(t.column(25.0), None);
        assert_eq!(t.value(1, 90.0), Some(150.0));
        assert_eq!(t.value(2, 90.0), None);
        assert_eq!(t.value(0, 10.0004), Some(90.0));
    }

    #[test]
    fn test_as_returns() {
        let r = table().as_returns(100.0);
        for (got, want) in r.values[1].iter().zip([-20.0, 20.0, 50.0]) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
        assert_eq!(r.markers, vec![0, 1]);
    }

    #[test]
    fn test_summary_lookup() {
        let s = EnsembleSummary {
            num_paths: 3,
            mean: 1.0,
            std_dev: 0.0,
            min: 1.0,
            max: 1.0,
            percentiles: vec![(10.0, 1.0), (50.0, 2.0)],
        };
        assert_eq!(s.percentile(50.0), Some(2.0));
        assert_eq!(s.percentile(75.0), None);
    }
}

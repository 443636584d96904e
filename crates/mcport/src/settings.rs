//! YAML run file
//!
//! Every section is optional; missing fields fall back to the same defaults
//! the CLI uses. Flags given on the command line override the file.
//!
//! ```yaml
//! data:
//!   dir: data
//!   benchmark: SPY
//! discrete:
//!   num_paths: 10000
//!   horizon_days: 365
//! projection:
//!   years: 20
//!   ito_correction: false
//! ```

use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail, eyre};
use jiff::civil::{Date, date};
use mcport_core::config::{DiscreteSettings, ProjectionSettings};
use mcport_core::error::WeightError;
use mcport_core::model::Weights;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

fn default_benchmark() -> String {
    "SPY".to_string()
}

fn default_symbols() -> Vec<String> {
    [
        "BRK-B", "WFC", "OKE", "NUE", "HII", "MSTR", "XOM", "TSLA", "GEO", "XLV", "XLK", "XLI",
        "XLF", "XLE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_start() -> Date {
    date(1999, 1, 1)
}

fn default_end() -> Date {
    date(2024, 12, 31)
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_bins() -> usize {
    50
}

fn default_sample_paths() -> usize {
    100
}

fn default_ma_windows() -> Vec<usize> {
    vec![50, 200]
}

/// How portfolio weights are chosen for the discrete run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    Equal,
    /// Uniform random scores normalized to 1, seeded from the run seed
    #[default]
    Random,
    Explicit(Vec<f64>),
}

impl WeightScheme {
    /// Parse `equal`, `random`, or a comma-separated list of weights.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "equal" => Ok(Self::Equal),
            "random" => Ok(Self::Random),
            list => list
                .split(',')
                .map(|w| w.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Explicit)
                .map_err(|e| format!("expected 'equal', 'random' or a list of numbers: {e}")),
        }
    }

    pub fn resolve(&self, n_assets: usize, seed: u64) -> Result<Weights, WeightError> {
        match self {
            Self::Equal => Weights::equal(n_assets),
            Self::Random => Weights::random(&mut StdRng::seed_from_u64(seed), n_assets),
            Self::Explicit(values) => {
                if values.len() != n_assets {
                    return Err(WeightError::Length {
                        expected: n_assets,
                        found: values.len(),
                    });
                }
                Weights::new(values.clone())
            }
        }
    }
}

/// Parameters of the synthetic market used when no price directory is given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSettings {
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    #[serde(default = "default_start")]
    pub start: Date,
    #[serde(default = "default_end")]
    pub end: Date,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            start: default_start(),
            end: default_end(),
            seed: default_seed(),
        }
    }
}

/// Where price data comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory of per-asset CSV files; synthetic data when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Benchmark symbol; files containing it are not portfolio assets
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
    /// Explicit benchmark CSV; otherwise the first file in `dir` matching `benchmark`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_file: Option<PathBuf>,
    #[serde(default)]
    pub synthetic: SyntheticSettings,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: None,
            benchmark: default_benchmark(),
            benchmark_file: None,
            synthetic: SyntheticSettings::default(),
        }
    }
}

/// Report and chart-data output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Bins for exported histograms
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,
    /// Paths written to the ensemble sample export
    #[serde(default = "default_sample_paths")]
    pub sample_paths: usize,
    /// Moving-average windows for cumulative return charts
    #[serde(default = "default_ma_windows")]
    pub moving_average_windows: Vec<usize>,
    /// Also write a JSON copy of the report
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            histogram_bins: default_bins(),
            sample_paths: default_sample_paths(),
            moving_average_windows: default_ma_windows(),
            json: false,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunSettings {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub weights: WeightScheme,
    #[serde(default)]
    pub discrete: DiscreteSettings,
    #[serde(default)]
    pub projection: ProjectionSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl RunSettings {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Read a run file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading run file {}", path.display()))?;
        let settings = Self::from_yaml(&yaml)
            .map_err(|e| eyre!("parsing run file {}: {e}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject parameter combinations no simulation can use.
    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.discrete.num_paths == 0 || self.projection.num_paths == 0 {
            bail!("num_paths must be at least 1");
        }
        if self.discrete.horizon_days == 0 {
            bail!("horizon_days must be at least 1");
        }
        if self.projection.years == 0 {
            bail!("projection years must be at least 1");
        }
        if self.output.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if let Some(p) = self
            .discrete
            .percentiles
            .iter()
            .chain(&self.projection.percentiles)
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            bail!("percentile {p} is outside [0, 100]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let settings = RunSettings::from_yaml("{}").unwrap();
        assert_eq!(settings, RunSettings::default());
        assert_eq!(settings.discrete.num_paths, 10_000);
        assert_eq!(settings.data.benchmark, "SPY");
        assert_eq!(settings.weights, WeightScheme::Random);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
data:
  dir: prices
discrete:
  num_paths: 500
  expected_gain: 1.05
projection:
  years: 10
  ito_correction: false
weights: equal
output:
  json: true
"#;
        let settings = RunSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.data.dir, Some(PathBuf::from("prices")));
        assert_eq!(settings.discrete.num_paths, 500);
        assert_eq!(settings.discrete.horizon_days, 365);
        assert_eq!(settings.discrete.expected_gain, 1.05);
        assert_eq!(settings.projection.years, 10);
        assert!(!settings.projection.ito_correction);
        assert_eq!(settings.weights, WeightScheme::Equal);
        assert!(settings.output.json);
        settings.validate().unwrap();
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut settings = RunSettings::default();
        settings.weights = WeightScheme::Explicit(vec![0.25, 0.75]);
        settings.data.dir = Some(PathBuf::from("data"));

        let yaml = settings.to_yaml().unwrap();
        assert_eq!(RunSettings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_validate_rejects_bad_percentile() {
        let mut settings = RunSettings::default();
        settings.projection.percentiles.push(120.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_weight_scheme_parse_and_resolve() {
        assert_eq!(WeightScheme::parse("equal"), Ok(WeightScheme::Equal));
        assert_eq!(
            WeightScheme::parse("0.5, 0.5"),
            Ok(WeightScheme::Explicit(vec![0.5, 0.5]))
        );
        assert!(WeightScheme::parse("half").is_err());

        let w = WeightScheme::Random.resolve(4, 42).unwrap();
        assert_eq!(w, WeightScheme::Random.resolve(4, 42).unwrap());
        assert!((w.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-12);

        assert!(WeightScheme::Explicit(vec![1.0]).resolve(2, 0).is_err());
    }
}

//! Human-readable and JSON reports
//!
//! Each command produces one report record. `Display` renders the flat text
//! report that is written to disk and echoed to stdout; `Serialize` gives the
//! structured copy.

use std::fmt::{self, Write as _};

use mcport_core::config::DiscreteSettings;
use mcport_core::linalg::Matrix;
use mcport_core::model::{EnsembleSummary, Outcome, PercentileTable, ReturnRange};
use mcport_core::stats::{AssetStatistics, PortfolioStatistics};
use serde::Serialize;

use crate::util::format::{
    format_compact_currency, format_currency, format_currency_short, format_percent_points,
    format_percentage,
};

/// `10` -> `10th`, `1` -> `1st`, `22.5` -> `22.5th`
pub fn ordinal(percentile: f64) -> String {
    if percentile.fract() != 0.0 {
        return format!("{percentile}th");
    }
    let n = percentile as i64;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn percentile_label(percentile: f64) -> String {
    if percentile == 50.0 {
        format!("{} Percentile (Median)", ordinal(percentile))
    } else {
        format!("{} Percentile", ordinal(percentile))
    }
}

fn write_matrix(f: &mut fmt::Formatter<'_>, symbols: &[String], m: &Matrix) -> fmt::Result {
    let width = symbols.iter().map(String::len).max().unwrap_or(0).max(7);
    write!(f, "{:width$}", "")?;
    for s in symbols {
        write!(f, " {s:>width$}")?;
    }
    writeln!(f)?;
    for (i, s) in symbols.iter().enumerate() {
        write!(f, "{s:width$}")?;
        for j in 0..symbols.len() {
            write!(f, " {:>width$.4}", m.get(i, j))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_table(
    f: &mut fmt::Formatter<'_>,
    table: &PercentileTable,
    header: impl Fn(f64) -> String,
    cell: impl Fn(f64) -> String,
) -> fmt::Result {
    let headers: Vec<String> = table.percentiles.iter().map(|&p| header(p)).collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(14)).collect();

    write!(f, "{:>5}", "Years")?;
    for (h, w) in headers.iter().zip(&widths) {
        write!(f, "  {h:>w$}")?;
    }
    writeln!(f)?;
    for (marker, row) in table.rows() {
        write!(f, "{marker:>5}")?;
        for (v, w) in row.iter().zip(&widths) {
            write!(f, "  {:>w$}", cell(*v))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_asset_table(f: &mut fmt::Formatter<'_>, stats: &[AssetStatistics]) -> fmt::Result {
    writeln!(
        f,
        "{:<8} {:>22} {:>26} {:>13}",
        "Symbol", "Annualized Return (%)", "Annualized Volatility (%)", "Sharpe Ratio"
    )?;
    for a in stats {
        writeln!(
            f,
            "{:<8} {:>22.2} {:>26.2} {:>13.2}",
            a.symbol,
            a.annualized_return * 100.0,
            a.annualized_volatility * 100.0,
            a.sharpe_ratio
        )?;
    }
    Ok(())
}

/// Final cumulative figures of the historical comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSummary {
    pub benchmark: String,
    /// Percent
    pub portfolio_return: Outcome<f64>,
    /// Percent
    pub benchmark_return: Outcome<f64>,
}

impl HistoricalSummary {
    fn write(&self, f: &mut fmt::Formatter<'_>, what: &str) -> fmt::Result {
        match &self.portfolio_return {
            Outcome::Computed(v) => writeln!(f, "Portfolio {what}: {}", format_percent_points(*v))?,
            Outcome::Unavailable(reason) => writeln!(f, "Portfolio {what}: unavailable ({reason})")?,
        }
        match &self.benchmark_return {
            Outcome::Computed(v) => {
                writeln!(f, "{} {what}: {}", self.benchmark, format_percent_points(*v))
            }
            Outcome::Unavailable(reason) => {
                writeln!(f, "{} {what}: unavailable ({reason})", self.benchmark)
            }
        }
    }
}

/// Result of the discrete simulation command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub settings: DiscreteSettings,
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
    pub failure_rate: Outcome<f64>,
    pub summary: Outcome<EnsembleSummary>,
    pub portfolio: PortfolioStatistics,
    pub max_drawdown: Option<f64>,
    pub correlation: Matrix,
    pub historical: HistoricalSummary,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.settings;
        writeln!(f, "=== Monte Carlo Simulation Results ===")?;
        writeln!(f, "Initial Portfolio Value: {}", format_currency(s.initial_value))?;
        writeln!(
            f,
            "Expected Gain (Target): {:.1}%",
            s.expected_gain * 100.0
        )?;
        match &self.failure_rate {
            Outcome::Computed(rate) => writeln!(f, "Failure Rate: {}", format_percent_points(*rate))?,
            Outcome::Unavailable(reason) => writeln!(f, "Failure Rate: unavailable ({reason})")?,
        }
        writeln!(f)?;

        match &self.summary {
            Outcome::Computed(summary) => {
                writeln!(f, "Portfolio Value Distribution:")?;
                for (p, v) in &summary.percentiles {
                    writeln!(f, "- {}: {}", percentile_label(*p), format_currency(*v))?;
                }
                writeln!(f)?;
                writeln!(
                    f,
                    "- Average Final Portfolio Value: {}",
                    format_currency(summary.mean)
                )?;
                writeln!(f, "- Standard Deviation: {}", format_currency(summary.std_dev))?;
                writeln!(f, "- Best Case: {}", format_currency(summary.max))?;
                writeln!(f, "- Worst Case: {}", format_currency(summary.min))?;
            }
            Outcome::Unavailable(reason) => {
                writeln!(f, "Portfolio Value Distribution: unavailable ({reason})")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Portfolio vs. {} ===", self.historical.benchmark)?;
        writeln!(
            f,
            "Portfolio Annualized Return: {}",
            format_percentage(self.portfolio.annual_return)
        )?;
        writeln!(
            f,
            "Portfolio Annualized Volatility: {}",
            format_percentage(self.portfolio.annual_volatility)
        )?;
        writeln!(f, "Sharpe Ratio: {:.2}", self.portfolio.sharpe_ratio)?;
        match self.max_drawdown {
            Some(dd) => writeln!(f, "Maximum Drawdown: {}", format_percentage(dd))?,
            None => writeln!(f, "Maximum Drawdown: unavailable")?,
        }
        self.historical.write(f, "Cumulative Return")?;
        writeln!(f)?;

        writeln!(f, "=== Weights Used in Simulation ===")?;
        for (symbol, w) in self.symbols.iter().zip(&self.weights) {
            writeln!(f, "{symbol}: {w:.4}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Correlation Matrix ===")?;
        write_matrix(f, &self.symbols, &self.correlation)
    }
}

/// One log-GBM projection with its inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSection {
    pub annual_mean: f64,
    pub annual_volatility: f64,
    pub values: PercentileTable,
    /// Percent change from the initial value
    pub returns: PercentileTable,
}

impl ProjectionSection {
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Annual mean return {}, annual volatility {}",
            format_percentage(self.annual_mean),
            format_percentage(self.annual_volatility)
        )?;
        writeln!(f)?;
        write_table(
            f,
            &self.values,
            |p| format!("{} Percentile ($)", ordinal(p)),
            format_currency_short,
        )?;
        writeln!(f)?;
        write_table(
            f,
            &self.returns,
            |p| format!("{} Percentile (%)", ordinal(p)),
            |v| format!("{v:.2}"),
        )
    }
}

/// Result of the projection command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub initial_value: f64,
    pub num_paths: usize,
    pub symbols: Vec<String>,
    pub asset_statistics: Vec<AssetStatistics>,
    pub historical: HistoricalSummary,
    pub horizon_ranges: Vec<ReturnRange>,
    pub baseline: Outcome<ProjectionSection>,
    pub momentum: Outcome<ProjectionSection>,
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Asset Statistics ===")?;
        write_asset_table(f, &self.asset_statistics)?;
        writeln!(f)?;

        writeln!(f, "=== Historical Performance ===")?;
        self.historical.write(f, "Total Return")?;
        writeln!(f)?;

        writeln!(f, "=== Portfolio Return Ranges ===")?;
        writeln!(
            f,
            "{:>5}  {:>18}  {:>10}  {:>19}",
            "Years", "5th Percentile (%)", "Median (%)", "95th Percentile (%)"
        )?;
        for r in &self.horizon_ranges {
            writeln!(
                f,
                "{:>5}  {:>18.2}  {:>10.2}  {:>19.2}",
                r.years, r.low, r.median, r.high
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "=== Projected Portfolio Value ({} start, {} paths) ===",
            format_compact_currency(self.initial_value),
            self.num_paths
        )?;
        match &self.baseline {
            Outcome::Computed(section) => section.write(f)?,
            Outcome::Unavailable(reason) => writeln!(f, "unavailable ({reason})")?,
        }
        writeln!(f)?;

        writeln!(f, "=== Momentum Strategy Projection ===")?;
        match &self.momentum {
            Outcome::Computed(section) => section.write(f),
            Outcome::Unavailable(reason) => writeln!(f, "unavailable ({reason})"),
        }
    }
}

/// Result of the statistics command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub symbols: Vec<String>,
    pub observations: usize,
    pub first_date: Option<jiff::civil::Date>,
    pub last_date: Option<jiff::civil::Date>,
    pub risk_free_rate: f64,
    pub asset_statistics: Vec<AssetStatistics>,
    pub portfolio: PortfolioStatistics,
    pub max_drawdown: Option<f64>,
    pub correlation: Matrix,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut span = String::new();
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            write!(span, " from {first} to {last}")?;
        }
        writeln!(
            f,
            "=== Return Statistics ({} observations{span}) ===",
            self.observations
        )?;
        writeln!(
            f,
            "Risk-free rate: {}",
            format_percentage(self.risk_free_rate)
        )?;
        write_asset_table(f, &self.asset_statistics)?;
        writeln!(f)?;

        writeln!(f, "=== Equal-Weighted Portfolio ===")?;
        writeln!(
            f,
            "Annualized Return: {}",
            format_percentage(self.portfolio.annual_return)
        )?;
        writeln!(
            f,
            "Annualized Volatility: {}",
            format_percentage(self.portfolio.annual_volatility)
        )?;
        writeln!(f, "Sharpe Ratio: {:.2}", self.portfolio.sharpe_ratio)?;
        if let Some(dd) = self.max_drawdown {
            writeln!(f, "Maximum Drawdown: {}", format_percentage(dd))?;
        }
        writeln!(f)?;

        writeln!(f, "=== Correlation Matrix ===")?;
        write_matrix(f, &self.symbols, &self.correlation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcport_core::model::Unavailable;

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(10.0), "10th");
        assert_eq!(ordinal(1.0), "1st");
        assert_eq!(ordinal(22.0), "22nd");
        assert_eq!(ordinal(11.0), "11th");
        assert_eq!(ordinal(2.5), "2.5th");
        assert_eq!(percentile_label(50.0), "50th Percentile (Median)");
    }

    fn simulation_report() -> SimulationReport {
        SimulationReport {
            settings: DiscreteSettings::default(),
            symbols: vec!["VTI".into(), "QQQ".into()],
            weights: vec![0.4, 0.6],
            failure_rate: Outcome::Computed(37.5),
            summary: Outcome::Computed(EnsembleSummary {
                num_paths: 4,
                mean: 110_000.0,
                std_dev: 5_000.0,
                min: 101_000.0,
                max: 120_000.5,
                percentiles: vec![(10.0, 102_000.0), (50.0, 109_500.25)],
            }),
            portfolio: PortfolioStatistics {
                annual_return: 0.12,
                annual_volatility: 0.2,
                sharpe_ratio: 0.6,
            },
            max_drawdown: Some(-0.25),
            correlation: Matrix::identity(2),
            historical: HistoricalSummary {
                benchmark: "SPY".into(),
                portfolio_return: Outcome::Computed(42.0),
                benchmark_return: Outcome::Unavailable(Unavailable::MissingSymbol("SPY".into())),
            },
        }
    }

    #[test]
    fn test_simulation_report_text() {
        let text = simulation_report().to_string();
        assert!(text.contains("Initial Portfolio Value: $100,000.00"));
        assert!(text.contains("Expected Gain (Target): 110.0%"));
        assert!(text.contains("Failure Rate: 37.50%"));
        assert!(text.contains("- 50th Percentile (Median): $109,500.25"));
        assert!(text.contains("- Best Case: $120,000.50"));
        assert!(text.contains("Maximum Drawdown: -25.00%"));
        assert!(text.contains("SPY Cumulative Return: unavailable (SPY data not available)"));
        assert!(text.contains("QQQ: 0.6000"));
    }

    #[test]
    fn test_simulation_report_json() {
        let json = serde_json::to_value(simulation_report()).unwrap();
        assert_eq!(json["failure_rate"]["Computed"], 37.5);
        assert_eq!(json["symbols"][1], "QQQ");
    }

    #[test]
    fn test_projection_report_text() {
        let values = PercentileTable {
            markers: vec![0, 1],
            percentiles: vec![10.0, 50.0],
            values: vec![vec![990_000.0, 1_000_000.0], vec![950_000.0, 1_070_000.0]],
        };
        let report = ProjectionReport {
            initial_value: 1_000_000.0,
            num_paths: 1000,
            symbols: vec!["A".into()],
            asset_statistics: vec![AssetStatistics {
                symbol: "A".into(),
                annualized_return: 0.126,
                annualized_volatility: 0.158,
                sharpe_ratio: 0.67,
            }],
            historical: HistoricalSummary {
                benchmark: "SPY".into(),
                portfolio_return: Outcome::Computed(250.0),
                benchmark_return: Outcome::Computed(180.0),
            },
            horizon_ranges: vec![ReturnRange {
                years: 1,
                low: -10.0,
                median: 7.0,
                high: 25.0,
            }],
            baseline: Outcome::Computed(ProjectionSection {
                annual_mean: 0.07,
                annual_volatility: 0.15,
                returns: values.as_returns(1_000_000.0),
                values,
            }),
            momentum: Outcome::Unavailable(Unavailable::NoAssets),
        };

        let text = report.to_string();
        assert!(text.contains("($1.0M start, 1000 paths)"));
        assert!(text.contains("$1,070,000"));
        assert!(text.contains("7.00"));
        assert!(text.contains("SPY Total Return: 180.00%"));
        assert!(text.contains("=== Momentum Strategy Projection ===\nunavailable (no valid assets in portfolio)"));
    }
}

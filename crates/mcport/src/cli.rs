use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::{RunSettings, WeightScheme};

#[derive(Parser, Debug)]
#[command(name = "mcport")]
#[command(about = "Monte Carlo portfolio projections from historical prices")]
pub struct Cli {
    /// YAML run file; command-line flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for reports, chart data and the log file (default: output/)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Also write the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discrete GBM simulation with correlated daily returns and a failure rate
    Simulate(SimulateArgs),
    /// Multi-year log-GBM projections, momentum variant and horizon return ranges
    Project(ProjectArgs),
    /// Annualized statistics, correlations and drawdown of the price history
    Stats(StatsArgs),
}

#[derive(Args, Debug, Default)]
pub struct DataArgs {
    /// Directory of per-asset CSV price files (synthetic data when omitted)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Benchmark symbol, excluded from the portfolio (default: SPY)
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Benchmark CSV file (default: the file in the data directory matching the benchmark)
    #[arg(long)]
    pub benchmark_file: Option<PathBuf>,

    /// Seed for synthetic price data
    #[arg(long)]
    pub synthetic_seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Number of simulated paths
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Simulated days
    #[arg(long)]
    pub days: Option<usize>,

    #[arg(long)]
    pub initial_value: Option<f64>,

    /// Target multiple of the initial value, e.g. 1.1 for +10%
    #[arg(long)]
    pub expected_gain: Option<f64>,

    #[arg(short, long)]
    pub seed: Option<u64>,

    /// `equal`, `random`, or comma-separated weights in asset order
    #[arg(short, long, value_parser = WeightScheme::parse)]
    pub weights: Option<WeightScheme>,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Number of simulated paths
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Projection length in years
    #[arg(short, long)]
    pub years: Option<u32>,

    #[arg(long)]
    pub initial_value: Option<f64>,

    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Use the raw `mean/252` daily drift instead of subtracting `0.5·σ²`
    #[arg(long)]
    pub no_ito_correction: bool,

    /// Momentum lookback in trading days
    #[arg(long)]
    pub lookback: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Annual risk-free rate for Sharpe ratios, as a fraction
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
}

impl Cli {
    /// Fold global and subcommand flags into the run settings.
    pub fn apply(&self, settings: &mut RunSettings) {
        if let Some(dir) = &self.output_dir {
            settings.output.dir = dir.clone();
        }
        if self.json {
            settings.output.json = true;
        }
        match &self.command {
            Command::Simulate(args) => args.apply(settings),
            Command::Project(args) => args.apply(settings),
            Command::Stats(args) => args.apply(settings),
        }
    }
}

impl DataArgs {
    fn apply(&self, settings: &mut RunSettings) {
        let data = &mut settings.data;
        if let Some(dir) = &self.data_dir {
            data.dir = Some(dir.clone());
        }
        if let Some(benchmark) = &self.benchmark {
            data.benchmark = benchmark.clone();
        }
        if let Some(file) = &self.benchmark_file {
            data.benchmark_file = Some(file.clone());
        }
        if let Some(seed) = self.synthetic_seed {
            data.synthetic.seed = seed;
        }
    }
}

impl SimulateArgs {
    fn apply(&self, settings: &mut RunSettings) {
        self.data.apply(settings);
        let d = &mut settings.discrete;
        if let Some(v) = self.paths {
            d.num_paths = v;
        }
        if let Some(v) = self.days {
            d.horizon_days = v;
        }
        if let Some(v) = self.initial_value {
            d.initial_value = v;
        }
        if let Some(v) = self.expected_gain {
            d.expected_gain = v;
        }
        if let Some(v) = self.seed {
            d.seed = v;
        }
        if let Some(w) = &self.weights {
            settings.weights = w.clone();
        }
    }
}

impl ProjectArgs {
    fn apply(&self, settings: &mut RunSettings) {
        self.data.apply(settings);
        let p = &mut settings.projection;
        if let Some(v) = self.paths {
            p.num_paths = v;
        }
        if let Some(v) = self.years {
            p.years = v;
        }
        if let Some(v) = self.initial_value {
            p.initial_value = v;
        }
        if let Some(v) = self.seed {
            p.seed = v;
        }
        if self.no_ito_correction {
            p.ito_correction = false;
        }
        if let Some(v) = self.lookback {
            p.momentum_lookback = v;
        }
    }
}

impl StatsArgs {
    fn apply(&self, settings: &mut RunSettings) {
        self.data.apply(settings);
        if let Some(rf) = self.risk_free_rate {
            settings.projection.risk_free_rate = rf;
        }
    }
}

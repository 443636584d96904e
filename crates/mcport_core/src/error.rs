use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading or shaping price data
#[derive(Debug, Clone)]
pub enum DataError {
    Io {
        path: PathBuf,
        message: String,
    },
    /// A required column is absent from an input file
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
    /// No usable price files were found
    NoPriceFiles(PathBuf),
    UnknownSymbol(String),
    Shape {
        rows: usize,
        columns: usize,
        values: usize,
    },
    UnsortedDates,
    /// Synthetic generator parameters are unusable
    Generator(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            DataError::MissingColumn { path, column } => {
                write!(f, "missing '{column}' column in {}", path.display())
            }
            DataError::Parse {
                path,
                line,
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            DataError::NoPriceFiles(dir) => {
                write!(f, "no price files found in {}", dir.display())
            }
            DataError::UnknownSymbol(symbol) => write!(f, "symbol '{symbol}' not in price data"),
            DataError::Shape {
                rows,
                columns,
                values,
            } => write!(
                f,
                "expected {rows}x{columns} = {} values, found {values}",
                rows * columns
            ),
            DataError::UnsortedDates => write!(f, "dates must be strictly increasing"),
            DataError::Generator(message) => write!(f, "invalid synthetic data parameters: {message}"),
        }
    }
}

impl std::error::Error for DataError {}

/// Errors from the statistics estimator
#[derive(Debug, Clone)]
pub enum EstimationError {
    NoAssets,
    InsufficientObservations { observations: usize },
    NonFinite { symbol: String },
}

impl fmt::Display for EstimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationError::NoAssets => write!(f, "return series contains no assets"),
            EstimationError::InsufficientObservations { observations } => write!(
                f,
                "at least 2 observations are required, found {observations}"
            ),
            EstimationError::NonFinite { symbol } => {
                write!(f, "return series for '{symbol}' contains non-finite values")
            }
        }
    }
}

impl std::error::Error for EstimationError {}

/// Errors related to portfolio weight vectors
#[derive(Debug, Clone)]
pub enum WeightError {
    Empty,
    Negative { index: usize, value: f64 },
    NonFinite { index: usize },
    BadSum { sum: f64 },
    /// One weight per asset is required
    Length { expected: usize, found: usize },
}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightError::Empty => write!(f, "weight vector is empty"),
            WeightError::Negative { index, value } => {
                write!(f, "weight {index} is negative ({value})")
            }
            WeightError::NonFinite { index } => write!(f, "weight {index} is not finite"),
            WeightError::BadSum { sum } => write!(f, "weights sum to {sum}, expected 1"),
            WeightError::Length { expected, found } => {
                write!(f, "expected {expected} weights, one per asset, found {found}")
            }
        }
    }
}

impl std::error::Error for WeightError {}

/// Errors raised by the path simulator
#[derive(Debug, Clone)]
pub enum SimulationError {
    NotSymmetric {
        row: usize,
        col: usize,
    },
    /// Cholesky decomposition hit a negative (or inconsistent zero) pivot
    NotPositiveDefinite {
        pivot: usize,
        value: f64,
    },
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    InvalidDistributionParameters {
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
    InvalidInitialValue(f64),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::NotSymmetric { row, col } => {
                write!(f, "covariance matrix is not symmetric at ({row}, {col})")
            }
            SimulationError::NotPositiveDefinite { pivot, value } => write!(
                f,
                "covariance matrix is not positive-definite (pivot {pivot} = {value})"
            ),
            SimulationError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what} has length {found}, expected {expected}"),
            SimulationError::InvalidDistributionParameters {
                mean,
                std_dev,
                reason,
            } => write!(
                f,
                "invalid normal parameters (mean={mean}, std_dev={std_dev}): {reason}"
            ),
            SimulationError::InvalidInitialValue(value) => {
                write!(f, "initial portfolio value must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Any failure of a combined run such as [`crate::simulation::run_discrete`]
#[derive(Debug, Clone)]
pub enum Error {
    Data(DataError),
    Estimation(EstimationError),
    Weights(WeightError),
    Simulation(SimulationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Data(e) => write!(f, "{e}"),
            Error::Estimation(e) => write!(f, "{e}"),
            Error::Weights(e) => write!(f, "{e}"),
            Error::Simulation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Data(e) => Some(e),
            Error::Estimation(e) => Some(e),
            Error::Weights(e) => Some(e),
            Error::Simulation(e) => Some(e),
        }
    }
}

impl From<DataError> for Error {
    fn from(err: DataError) -> Self {
        Error::Data(err)
    }
}

impl From<EstimationError> for Error {
    fn from(err: EstimationError) -> Self {
        Error::Estimation(err)
    }
}

impl From<WeightError> for Error {
    fn from(err: WeightError) -> Self {
        Error::Weights(err)
    }
}

impl From<SimulationError> for Error {
    fn from(err: SimulationError) -> Self {
        Error::Simulation(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

mod ensemble;
mod frame;
mod outcome;
mod projection;
mod returns;
mod series;
mod weights;

pub use ensemble::Ensemble;
pub use frame::PriceFrame;
pub use outcome::{Outcome, Unavailable};
pub use projection::{EnsembleSummary, Histogram, PercentileTable, ReturnRange};
pub use returns::{ReturnKind, ReturnSeries};
pub use series::{DatedSeries, PriceSeries};
pub use weights::Weights;

//! Price data sources
//!
//! - [`CsvDirectory`]: one CSV per asset in a directory
//! - [`CsvFile`]: a single CSV, typically the benchmark
//! - [`SyntheticSource`]: seeded normal daily returns on a business-day calendar
//!
//! A remote market-data client would implement [`PriceSource`] as well.

mod csv_source;
mod synthetic;

pub use csv_source::{CsvDirectory, CsvFile, parse_date, parse_price, read_price_csv};
pub use synthetic::{SyntheticSource, business_days};

use crate::error::DataError;
use crate::model::{PriceFrame, PriceSeries};

/// Anything that can produce closing-price series per symbol
pub trait PriceSource {
    fn load(&self) -> Result<Vec<PriceSeries>, DataError>;

    /// Load and inner-join every series on common dates.
    fn frame(&self) -> Result<PriceFrame, DataError> {
        Ok(PriceFrame::align(&self.load()?))
    }
}

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Raw closing prices for one symbol, as read from a source
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<(Date, f64)>,
}

impl PriceSeries {
    #[must_use]
    pub fn new(symbol: impl Into<String>, points: Vec<(Date, f64)>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A date-indexed sequence of values ready for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedSeries {
    pub label: String,
    pub dates: Vec<Date>,
    pub values: Vec<f64>,
}

impl DatedSeries {
    #[must_use]
    pub fn new(label: impl Into<String>, dates: Vec<Date>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            label: label.into(),
            dates,
            values,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

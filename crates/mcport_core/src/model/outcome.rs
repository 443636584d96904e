//! Explicit "computed or unavailable" results
//!
//! Sections of a run that can legitimately have no data (an empty benchmark
//! file, an ensemble with zero paths) return an [`Outcome`] instead of an
//! empty placeholder, so consumers decide explicitly to skip them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a result could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unavailable {
    NoAssets,
    EmptySeries { what: String },
    EmptyEnsemble,
    MissingSymbol(String),
    InsufficientHistory { needed: usize, available: usize },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NoAssets => write!(f, "no valid assets in portfolio"),
            Unavailable::EmptySeries { what } => write!(f, "{what} is empty"),
            Unavailable::EmptyEnsemble => write!(f, "simulation ensemble has no paths"),
            Unavailable::MissingSymbol(symbol) => write!(f, "{symbol} data not available"),
            Unavailable::InsufficientHistory { needed, available } => write!(
                f,
                "needs {needed} observations, only {available} available"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome<T> {
    Computed(T),
    Unavailable(Unavailable),
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, Outcome::Computed(_))
    }

    pub fn computed(self) -> Option<T> {
        match self {
            Outcome::Computed(value) => Some(value),
            Outcome::Unavailable(_) => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Computed(value) => Outcome::Computed(value),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason.clone()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Computed(value) => Outcome::Computed(f(value)),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Computed(value) => f(value),
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        }
    }

    /// The reason this result is missing, if it is
    pub fn reason(&self) -> Option<&Unavailable> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Unavailable(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_combinators() {
        let computed: Outcome<f64> = Outcome::Computed(2.0);
        assert!(computed.is_computed());
        assert_eq!(computed.clone().map(|v| v * 2.0).computed(), Some(4.0));

        let missing: Outcome<f64> = Outcome::Unavailable(Unavailable::EmptyEnsemble);
        assert!(!missing.is_computed());
        assert_eq!(missing.reason(), Some(&Unavailable::EmptyEnsemble));
        assert_eq!(missing.and_then(|v| Outcome::Computed(v + 1.0)).computed(), None);
    }

    #[test]
    fn test_unavailable_messages() {
        assert_eq!(
            Unavailable::MissingSymbol("SPY".into()).to_string(),
            "SPY data not available"
        );
        assert_eq!(
            Unavailable::InsufficientHistory {
                needed: 252,
                available: 10
            }
            .to_string(),
            "needs 252 observations, only 10 available"
        );
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WeightError;

/// Tolerance on the sum of a weight vector
const SUM_TOLERANCE: f64 = 1e-9;

/// Portfolio weights: non-negative, one per asset, summing to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Weights(Vec<f64>);

impl Weights {
    /// Validate an explicit weight vector.
    pub fn new(weights: Vec<f64>) -> Result<Self, WeightError> {
        if weights.is_empty() {
            return Err(WeightError::Empty);
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(WeightError::NonFinite { index });
            }
            if value < 0.0 {
                return Err(WeightError::Negative { index, value });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightError::BadSum { sum });
        }
        Ok(Self(weights))
    }

    /// Scale non-negative raw scores so they sum to 1.
    pub fn normalized(raw: Vec<f64>) -> Result<Self, WeightError> {
        let sum: f64 = raw.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(WeightError::BadSum { sum });
        }
        Self::new(raw.into_iter().map(|w| w / sum).collect())
    }

    /// `1/n` for each of `n` assets.
    pub fn equal(n: usize) -> Result<Self, WeightError> {
        if n == 0 {
            return Err(WeightError::Empty);
        }
        Ok(Self(vec![1.0 / n as f64; n]))
    }

    /// Uniform random scores, normalized.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Self, WeightError> {
        if n == 0 {
            return Err(WeightError::Empty);
        }
        // random() is in [0, 1); nudge away from an all-zero draw
        let raw = (0..n).map(|_| rng.random::<f64>() + f64::EPSILON).collect();
        Self::normalized(raw)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dot(&self, values: &[f64]) -> f64 {
        self.0.iter().zip(values).map(|(w, v)| w * v).sum()
    }
}

impl TryFrom<Vec<f64>> for Weights {
    type Error = WeightError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weights> for Vec<f64> {
    fn from(value: Weights) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_equal_weights() {
        let w = Weights::equal(4).unwrap();
        assert_eq!(w.as_slice(), &[0.25; 4]);
        assert!(Weights::equal(0).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(Weights::new(vec![0.5, 0.5]).is_ok());
        assert!(matches!(
            Weights::new(vec![0.6, 0.6]),
            Err(WeightError::BadSum { .. })
        ));
        assert!(matches!(
            Weights::new(vec![1.5, -0.5]),
            Err(WeightError::Negative { index: 1, .. })
        ));
        assert!(matches!(
            Weights::new(vec![f64::NAN, 1.0]),
            Err(WeightError::NonFinite { index: 0 })
        ));
        assert!(matches!(Weights::new(vec![]), Err(WeightError::Empty)));
    }

    #[test]
    fn test_random_weights_sum_to_one() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let w = Weights::random(&mut rng, 5).unwrap();
        assert_eq!(w.len(), 5);
        assert!((w.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(w.as_slice().iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_dot() {
        let w = Weights::new(vec![0.25, 0.75]).unwrap();
        assert!((w.dot(&[4.0, 8.0]) - 7.0).abs() < 1e-12);
    }
}

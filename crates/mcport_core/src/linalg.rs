//! Small dense square matrices and Cholesky factorization
//!
//! Asset counts are small (tens at most), so a flat row-major `Vec<f64>` is
//! all the structure needed.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Relative tolerance used for symmetry checks and zero pivots
const TOLERANCE: f64 = 1e-12;

/// Square matrix stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    #[must_use]
    pub fn diagonal(values: &[f64]) -> Self {
        let mut m = Self::zeros(values.len());
        for (i, &v) in values.iter().enumerate() {
            m.set(i, i, v);
        }
        m
    }

    /// Build from nested rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SimulationError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(SimulationError::DimensionMismatch {
                what: "matrix row",
                expected: n,
                found: bad.len(),
            });
        }
        Ok(Self {
            n,
            data: rows.concat(),
        })
    }

    /// Dimension of the (square) matrix
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    #[must_use]
    pub fn diag(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.get(i, i)).collect()
    }

    /// Largest absolute diagonal entry; 1 for an all-zero diagonal.
    fn scale(&self) -> f64 {
        let max = self.diag().iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        if max > 0.0 { max } else { 1.0 }
    }

    /// First off-diagonal pair violating symmetry, if any.
    #[must_use]
    pub fn asymmetry(&self) -> Option<(usize, usize)> {
        let tol = TOLERANCE * self.scale();
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return Some((i, j));
                }
            }
        }
        None
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.asymmetry().is_none()
    }

    /// Lower-triangular factor `L` with `L·Lᵗ = self`.
    ///
    /// Zero-variance directions are accepted: a pivot that is zero (within
    /// tolerance) with an all-zero remainder below it yields a zero column, so
    /// a zero covariance factors to the zero matrix. A negative pivot, or a
    /// zero pivot with non-zero coupling to later assets, is an error.
    pub fn cholesky(&self) -> Result<Self, SimulationError> {
        if let Some((row, col)) = self.asymmetry() {
            return Err(SimulationError::NotSymmetric { row, col });
        }
        if let Some(pos) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(SimulationError::NotPositiveDefinite {
                pivot: pos / self.n.max(1),
                value: self.data[pos],
            });
        }

        let n = self.n;
        let scale = self.scale();
        let tol = TOLERANCE * scale;
        // |Σij| <= sqrt(Σii·Σjj), so coupling to a vanishing pivot is bounded by sqrt(tol·scale)
        let coupling_tol = TOLERANCE.sqrt() * scale;
        let mut l = Self::zeros(n);

        for j in 0..n {
            let sum: f64 = (0..j).map(|k| l.get(j, k) * l.get(j, k)).sum();
            let pivot = self.get(j, j) - sum;

            if pivot < -tol {
                return Err(SimulationError::NotPositiveDefinite { pivot: j, value: pivot });
            }

            if pivot <= tol {
                for i in (j + 1)..n {
                    let residual =
                        self.get(i, j) - (0..j).map(|k| l.get(i, k) * l.get(j, k)).sum::<f64>();
                    if residual.abs() > coupling_tol {
                        return Err(SimulationError::NotPositiveDefinite { pivot: j, value: pivot });
                    }
                }
                continue;
            }

            let d = pivot.sqrt();
            l.set(j, j, d);
            for i in (j + 1)..n {
                let sum: f64 = (0..j).map(|k| l.get(i, k) * l.get(j, k)).sum();
                l.set(i, j, (self.get(i, j) - sum) / d);
            }
        }

        Ok(l)
    }

    /// `out = self · x`, treating `self` as lower-triangular.
    #[inline]
    pub fn lower_mul_into(&self, x: &[f64], out: &mut [f64]) {
        for (i, o) in out.iter_mut().enumerate().take(self.n) {
            let row = self.row(i);
            *o = row[..=i].iter().zip(x).map(|(a, b)| a * b).sum();
        }
    }

    /// `self · selfᵗ`
    #[must_use]
    pub fn mul_transpose(&self) -> Self {
        let n = self.n;
        let mut out = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                let v = self.row(i).iter().zip(self.row(j)).map(|(a, b)| a * b).sum();
                out.set(i, j, v);
            }
        }
        out
    }

    /// Correlation matrix implied by a covariance matrix.
    ///
    /// Zero-variance assets get a unit diagonal and zero off-diagonals.
    #[must_use]
    pub fn correlation(&self) -> Self {
        let std: Vec<f64> = self.diag().iter().map(|v| v.max(0.0).sqrt()).collect();
        let mut out = Self::zeros(self.n);
        for i in 0..self.n {
            for j in 0..self.n {
                let v = if i == j {
                    1.0
                } else if std[i] > 0.0 && std[j] > 0.0 {
                    self.get(i, j) / (std[i] * std[j])
                } else {
                    0.0
                };
                out.set(i, j, v);
            }
        }
        out
    }
}

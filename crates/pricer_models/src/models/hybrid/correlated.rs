//! Factor correlation with a positive semi-definite Cholesky factorisation.
//!
//! ## Mathematical Background
//!
//! Given `n` independent standard normals `Z`, correlated normals are
//! ```text
//! W = L * Z,   C = L * L^T
//! ```
//! where `L` is lower triangular. Correlation matrices met in practice are
//! often only positive *semi*-definite (two factors driven by the same
//! shock, `rho = 1`), so the factorisation accepts zero pivots as long as
//! the matrix stays consistent, and only rejects matrices with a genuinely
//! negative eigen-direction.
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::hybrid::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[
//!     1.0_f64, 0.5,
//!     0.5, 1.0,
//! ], 2).unwrap();
//!
//! let cholesky = corr.cholesky().unwrap();
//! let w = cholesky.transform(&[0.5_f64, 0.8]);
//! assert_eq!(w.len(), 2);
//! assert_eq!(w[0], 0.5);
//! ```

use num_traits::Float;
use thiserror::Error;

/// Tolerance for unit diagonal, symmetry and zero pivots.
const TOLERANCE: f64 = 1e-10;

/// Error types for correlation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive semi-definite
    #[error("Correlation matrix is not positive semi-definite (pivot {index})")]
    NotPositiveSemiDefinite {
        /// Column at which the factorisation failed
        index: usize,
    },

    /// Matrix dimensions are invalid
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Required element count
        expected: usize,
        /// Supplied element count
        got: usize,
    },

    /// Diagonal elements are not 1.0
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Matrix is not symmetric
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row
        i: usize,
        /// Column
        j: usize,
    },

    /// Correlation value out of range [-1, 1]
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row
        i: usize,
        /// Column
        j: usize,
        /// Offending value
        value: f64,
    },

    /// Several factors are simulated but no correlation matrix was supplied
    #[error("A correlation matrix is required for {factors} factors")]
    Missing {
        /// Number of simulated factors
        factors: usize,
    },
}

/// Validated correlation matrix (row-major).
///
/// # Invariants
///
/// - square, symmetric, unit diagonal
/// - off-diagonal entries in [-1, 1]
///
/// Positive semi-definiteness is checked by [`cholesky`](Self::cholesky).
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix<T: Float> {
    data: Vec<T>,
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Create a new correlation matrix from a row-major slice of `dim * dim`
    /// elements.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions`, `InvalidDiagonal`, `NotSymmetric` or `OutOfRange`.
    pub fn new(data: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let one = T::one();
        let epsilon = T::from(TOLERANCE).unwrap_or(T::zero());

        for i in 0..dim {
            let diag = data[i * dim + i];
            if !((diag - one).abs() <= epsilon) {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if !((val_ij - val_ji).abs() <= epsilon) {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }
                if !(val_ij.abs() <= one) {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij.to_f64().unwrap_or(f64::NAN),
                    });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Identity correlation (independent factors).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Lower triangular `L` with `C = L * L^T`.
    ///
    /// A pivot within tolerance of zero is set to zero, provided the rest of
    /// its column is also zero; the corresponding factor is then fully
    /// explained by the factors before it.
    ///
    /// # Errors
    ///
    /// `NotPositiveSemiDefinite` when a pivot is negative or a zero pivot has
    /// a non-zero residual below it.
    pub fn cholesky(&self) -> Result<CholeskyFactor<T>, CorrelationError> {
        let n = self.dim;
        let tol = T::from(TOLERANCE).unwrap_or(T::zero());
        let mut lower = vec![T::zero(); n * n];

        for j in 0..n {
            let mut pivot = self.get(j, j);
            for k in 0..j {
                let l_jk = lower[j * n + k];
                pivot = pivot - l_jk * l_jk;
            }
            if pivot < -tol {
                return Err(CorrelationError::NotPositiveSemiDefinite { index: j });
            }

            let degenerate = pivot <= tol;
            let l_jj = if degenerate { T::zero() } else { pivot.sqrt() };
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let mut residual = self.get(i, j);
                for k in 0..j {
                    residual = residual - lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = if degenerate {
                    if residual.abs() > tol.sqrt() {
                        return Err(CorrelationError::NotPositiveSemiDefinite { index: j });
                    }
                    T::zero()
                } else {
                    residual / l_jj
                };
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower triangular Cholesky factor of a correlation matrix.
#[derive(Clone, Debug)]
pub struct CholeskyFactor<T: Float> {
    data: Vec<T>,
    dim: usize,
}

impl<T: Float> CholeskyFactor<T> {
    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at (i, j); zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Correlated normals `W = L * Z`.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[T]) -> Vec<T> {
        let mut w = vec![T::zero(); self.dim];
        self.transform_into(z, &mut w);
        w
    }

    /// Write `L * Z` into `out` without allocating.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `out` is shorter than `self.dim()`.
    pub fn transform_into(&self, z: &[T], out: &mut [T]) {
        assert!(
            z.len() >= self.dim && out.len() >= self.dim,
            "Input length {} / output length {} shorter than matrix dimension {}",
            z.len(),
            out.len(),
            self.dim
        );

        let n = self.dim;
        for (i, w) in out.iter_mut().take(n).enumerate() {
            let row = &self.data[i * n..i * n + i + 1];
            *w = row
                .iter()
                .zip(z)
                .fold(T::zero(), |acc, (&l, &zj)| acc + l * zj);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reconstruct(l: &CholeskyFactor<f64>, i: usize, j: usize) -> f64 {
        (0..l.dim()).map(|k| l.get(i, k) * l.get(j, k)).sum()
    }

    #[test]
    fn test_correlation_matrix_valid() {
        let m = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5, 1.0], 2).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(0, 1), 0.5);
        assert_eq!(m.get(1, 0), 0.5);
    }

    #[test]
    fn test_correlation_matrix_validation_errors() {
        assert!(matches!(
            CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5], 2),
            Err(CorrelationError::InvalidDimensions { expected: 4, got: 3 })
        ));
        assert!(matches!(
            CorrelationMatrix::new(&[0.9_f64, 0.5, 0.5, 1.0], 2),
            Err(CorrelationError::InvalidDiagonal { index: 0, .. })
        ));
        assert!(matches!(
            CorrelationMatrix::new(&[1.0_f64, 0.5, 0.3, 1.0], 2),
            Err(CorrelationError::NotSymmetric { i: 0, j: 1 })
        ));
        assert!(matches!(
            CorrelationMatrix::new(&[1.0_f64, 2.0, 2.0, 1.0], 2),
            Err(CorrelationError::OutOfRange { i: 0, j: 1, .. })
        ));
        assert!(matches!(
            CorrelationMatrix::new(&[1.0_f64, f64::NAN, f64::NAN, 1.0], 2),
            Err(CorrelationError::NotSymmetric { .. })
        ));
    }

    #[test]
    fn test_cholesky_2x2() {
        let m = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5, 1.0], 2).unwrap();
        let l = m.cholesky().unwrap();
        assert_relative_eq!(l.get(0, 0), 1.0);
        assert_relative_eq!(l.get(1, 0), 0.5);
        assert_relative_eq!(l.get(1, 1), 0.75_f64.sqrt());
        assert_eq!(l.get(0, 1), 0.0);
    }

    #[test]
    fn test_cholesky_reconstruction_3x3() {
        #[rustfmt::skip]
        let data = [
            1.0_f64, 0.3, -0.2,
            0.3, 1.0, 0.4,
            -0.2, 0.4, 1.0,
        ];
        let m = CorrelationMatrix::new(&data, 3).unwrap();
        let l = m.cholesky().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(reconstruct(&l, i, j), m.get(i, j), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_accepts_perfect_correlation() {
        #[rustfmt::skip]
        let data = [
            1.0_f64, 1.0, 0.3,
            1.0, 1.0, 0.3,
            0.3, 0.3, 1.0,
        ];
        let m = CorrelationMatrix::new(&data, 3).unwrap();
        let l = m.cholesky().unwrap();
        assert_eq!(l.get(1, 1), 0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(reconstruct(&l, i, j), m.get(i, j), epsilon = 1e-12);
            }
        }

        let w = l.transform(&[0.7, -2.0, 0.1]);
        assert_relative_eq!(w[0], w[1]);
    }

    #[test]
    fn test_cholesky_rejects_indefinite_matrix() {
        #[rustfmt::skip]
        let data = [
            1.0_f64, 0.9, -0.9,
            0.9, 1.0, 0.9,
            -0.9, 0.9, 1.0,
        ];
        let m = CorrelationMatrix::new(&data, 3).unwrap();
        assert_eq!(
            m.cholesky().unwrap_err(),
            CorrelationError::NotPositiveSemiDefinite { index: 2 }
        );
    }

    #[test]
    fn test_identity() {
        let identity: CorrelationMatrix<f64> = CorrelationMatrix::identity(3);
        let l = identity.cholesky().unwrap();
        assert_eq!(l.transform(&[0.5, 0.8, -0.1]), vec![0.5, 0.8, -0.1]);
    }

    #[test]
    fn test_transform_into() {
        let m = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5, 1.0], 2).unwrap();
        let l = m.cholesky().unwrap();
        let mut out = [0.0; 2];
        l.transform_into(&[1.0, 0.0], &mut out);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 0.5);
    }

    #[test]
    fn test_f32_compatibility() {
        let m = CorrelationMatrix::new(&[1.0_f32, 0.5, 0.5, 1.0], 2).unwrap();
        let w = m.cholesky().unwrap().transform(&[1.0_f32, 0.0]);
        assert!((w[1] - 0.5_f32).abs() < 1e-6);
    }

    #[test]
    fn test_error_display() {
        let err = CorrelationError::Missing { factors: 3 };
        assert_eq!(err.to_string(), "A correlation matrix is required for 3 factors");
    }
}

//! LU decomposition with partial pivoting.

use super::{Matrix, Vector};
use crate::types::LinalgError;

/// Relative pivot threshold below which a matrix is treated as singular.
///
/// During elimination a pivot `p` triggers
/// [`LinalgError::SingularMatrix`] when `|p| <= SINGULAR_PIVOT_TOLERANCE *
/// max_abs(A)`, where `max_abs(A)` is the largest absolute entry of the
/// input matrix. The threshold is deliberately conservative: a Jacobian this
/// close to singular produces Newton steps dominated by rounding noise, and
/// surfacing the failure beats iterating on garbage.
pub const SINGULAR_PIVOT_TOLERANCE: f64 = 1e-11;

/// LU factorisation of a square matrix with partial (row) pivoting.
///
/// Stores the combined L/U factors and the row permutation, and solves
/// `A x = b` by forward and backward substitution. Factorising once and
/// solving repeatedly is cheaper than re-eliminating per right-hand side.
///
/// # Examples
///
/// ```
/// use quantfit_core::math::linalg::{LuDecomposition, Matrix, Vector};
///
/// let a = Matrix::from_rows(vec![vec![0.0, 2.0], vec![1.0, 1.0]]).unwrap();
/// let lu = LuDecomposition::new(&a).unwrap();
/// let x = lu.solve(&Vector::new(vec![2.0, 2.0])).unwrap();
/// assert!((x.as_slice()[0] - 1.0).abs() < 1e-14);
/// assert!((x.as_slice()[1] - 1.0).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Matrix,
    pivots: Vec<usize>,
}

impl LuDecomposition {
    /// Factorise a square matrix.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::NotSquare`] when the matrix is not square
    /// * [`LinalgError::SingularMatrix`] when a pivot falls below the
    ///   scaled threshold [`SINGULAR_PIVOT_TOLERANCE`]
    pub fn new(a: &Matrix) -> Result<Self, LinalgError> {
        if !a.is_square() {
            return Err(LinalgError::NotSquare {
                rows: a.rows(),
                cols: a.cols(),
            });
        }
        let n = a.rows();
        let threshold = SINGULAR_PIVOT_TOLERANCE * a.max_abs();

        let mut lu = a.clone();
        let mut pivots = Vec::with_capacity(n);

        for k in 0..n {
            // Select the largest remaining pivot in column k.
            let mut pivot_row = k;
            let mut pivot_mag = lu.get(k, k).abs();
            for i in (k + 1)..n {
                let mag = lu.get(i, k).abs();
                if mag > pivot_mag {
                    pivot_row = i;
                    pivot_mag = mag;
                }
            }
            if pivot_mag <= threshold {
                return Err(LinalgError::SingularMatrix {
                    row: k,
                    pivot: pivot_mag,
                });
            }
            if pivot_row != k {
                for j in 0..n {
                    let tmp = lu.get(k, j);
                    lu.set(k, j, lu.get(pivot_row, j));
                    lu.set(pivot_row, j, tmp);
                }
            }
            pivots.push(pivot_row);

            let pivot = lu.get(k, k);
            for i in (k + 1)..n {
                let factor = lu.get(i, k) / pivot;
                lu.set(i, k, factor);
                for j in (k + 1)..n {
                    let updated = lu.get(i, j) - factor * lu.get(k, j);
                    lu.set(i, j, updated);
                }
            }
        }

        Ok(Self { lu, pivots })
    }

    /// Solve `A x = b` for `x`.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::DimensionMismatch`] when `b` does not match
    /// the matrix dimension.
    pub fn solve(&self, b: &Vector) -> Result<Vector, LinalgError> {
        let n = self.lu.rows();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: n,
                got: b.len(),
            });
        }

        // Apply the row permutation to b.
        let mut x: Vec<f64> = b.as_slice().to_vec();
        for (k, &p) in self.pivots.iter().enumerate() {
            if p != k {
                x.swap(k, p);
            }
        }

        // Forward substitution with unit lower factor.
        for i in 1..n {
            let mut sum = x[i];
            for j in 0..i {
                sum -= self.lu.get(i, j) * x[j];
            }
            x[i] = sum;
        }

        // Backward substitution with the upper factor.
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum -= self.lu.get(i, j) * x[j];
            }
            x[i] = sum / self.lu.get(i, i);
        }

        Ok(Vector::new(x))
    }
}

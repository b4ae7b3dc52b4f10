//! Finite-difference roughness penalty matrices.
//!
//! A P-spline fit augments the least-squares objective with
//! `lambda * ||D w||^2`, where `D` applies the k-th finite difference to
//! the coefficient sequence. This module builds `D`, the penalty `D^T D`,
//! and the Kronecker embedding of the penalty for coefficients laid out on
//! an N-D grid.
//!
//! `D` is constructively banded; the dense representation used here keeps
//! correctness independent of storage, and the coefficient counts involved
//! in curve fitting stay small.

use super::FitError;
use quantfit_core::math::linalg::Matrix;

fn binomial(n: usize, k: usize) -> f64 {
    let mut value = 1.0;
    for i in 0..k {
        value = value * ((n - i) as f64) / ((i + 1) as f64);
    }
    value
}

/// The `order`-th finite-difference operator on `m` coefficients.
///
/// Returns an `m x m` matrix whose rows `order..m` hold the alternating
/// binomial stencil; the first `order` rows are zero, so `D^T D` matches
/// the rectangular difference operator. Order zero is the identity.
///
/// # Errors
///
/// Returns [`FitError::InvalidPenaltyOrder`] when `order >= m`.
///
/// # Examples
///
/// ```
/// use quantfit_optimiser::leastsquare::penalty::difference_matrix;
///
/// let d = difference_matrix(5, 2).unwrap();
/// // Second-difference stencil 1, -2, 1.
/// assert_eq!(d.get(2, 0), 1.0);
/// assert_eq!(d.get(2, 1), -2.0);
/// assert_eq!(d.get(2, 2), 1.0);
/// ```
pub fn difference_matrix(m: usize, order: usize) -> Result<Matrix, FitError> {
    if order >= m {
        return Err(FitError::InvalidPenaltyOrder {
            order,
            parameters: m,
        });
    }
    if order == 0 {
        return Ok(Matrix::identity(m));
    }

    // Stencil coefficients (-1)^(order - j) * C(order, j) for j = 0..=order.
    let mut stencil = vec![0.0; order + 1];
    let mut sign = 1.0;
    for j in (0..=order).rev() {
        stencil[j] = sign * binomial(order, j);
        sign = -sign;
    }

    let mut d = Matrix::zeros(m, m);
    for i in order..m {
        for (j, &coefficient) in stencil.iter().enumerate() {
            d.set(i, j + i - order, coefficient);
        }
    }
    Ok(d)
}

/// The roughness penalty `D^T D` for `m` coefficients.
///
/// # Errors
///
/// Returns [`FitError::InvalidPenaltyOrder`] when `order >= m`.
pub fn penalty_matrix(m: usize, order: usize) -> Result<Matrix, FitError> {
    let d = difference_matrix(m, order)?;
    let mut p = Matrix::zeros(m, m);
    for i in 0..m {
        for j in 0..=i {
            let mut sum = 0.0;
            for r in 0..m {
                sum += d.get(r, i) * d.get(r, j);
            }
            p.set(i, j, sum);
            p.set(j, i, sum);
        }
    }
    Ok(p)
}

/// The roughness penalty acting along one dimension of a coefficient grid.
///
/// Coefficients are flattened row-major with the last dimension varying
/// fastest (matching the tensor basis generator). The penalty along
/// dimension `dim` is the Kronecker embedding `I ⊗ D^T D ⊗ I` of the 1-D
/// penalty on `sizes[dim]` coefficients.
///
/// # Errors
///
/// * [`FitError::InvalidInput`] when `dim` is out of range or the grid is
///   empty
/// * [`FitError::InvalidPenaltyOrder`] when `order >= sizes[dim]`
pub fn grid_penalty_matrix(
    sizes: &[usize],
    order: usize,
    dim: usize,
) -> Result<Matrix, FitError> {
    if sizes.is_empty() {
        return Err(FitError::invalid_input("coefficient grid has no dimensions"));
    }
    if dim >= sizes.len() {
        return Err(FitError::invalid_input(format!(
            "penalty dimension {} out of range for a {}-dimensional grid",
            dim,
            sizes.len()
        )));
    }

    let base = penalty_matrix(sizes[dim], order)?;
    let n_dim = sizes[dim];
    let pre: usize = sizes[..dim].iter().product();
    let post: usize = sizes[dim + 1..].iter().product();
    let total = pre * n_dim * post;

    let mut p = Matrix::zeros(total, total);
    for block in 0..pre {
        for a in 0..n_dim {
            for b in 0..n_dim {
                let value = base.get(a, b);
                if value == 0.0 {
                    continue;
                }
                for q in 0..post {
                    let row = (block * n_dim + a) * post + q;
                    let col = (block * n_dim + b) * post + q;
                    p.set(row, col, value);
                }
            }
        }
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantfit_core::math::linalg::Vector;

    #[test]
    fn test_order_zero_is_identity() {
        let d = difference_matrix(4, 0).unwrap();
        assert_eq!(d, Matrix::identity(4));
    }

    #[test]
    fn test_first_difference_stencil() {
        let d = difference_matrix(4, 1).unwrap();
        // Rows 1..4 hold -1, 1; row 0 is zero.
        for j in 0..4 {
            assert_eq!(d.get(0, j), 0.0);
        }
        for i in 1..4 {
            assert_eq!(d.get(i, i - 1), -1.0);
            assert_eq!(d.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_second_difference_annihilates_linear() {
        let d = difference_matrix(6, 2).unwrap();
        // A linear coefficient sequence has zero second difference.
        let linear = Vector::new((0..6).map(|i| 2.0 + 3.0 * i as f64).collect());
        let diff = d.mul_vec(&linear);
        assert!(diff.max_abs() < 1e-12);
    }

    #[test]
    fn test_third_difference_stencil() {
        let d = difference_matrix(5, 3).unwrap();
        assert_eq!(d.get(3, 0), -1.0);
        assert_eq!(d.get(3, 1), 3.0);
        assert_eq!(d.get(3, 2), -3.0);
        assert_eq!(d.get(3, 3), 1.0);
    }

    #[test]
    fn test_order_too_high() {
        let err = difference_matrix(3, 3).unwrap_err();
        assert_eq!(
            err,
            FitError::InvalidPenaltyOrder {
                order: 3,
                parameters: 3
            }
        );
    }

    #[test]
    fn test_penalty_matrix_is_symmetric_psd() {
        let p = penalty_matrix(8, 2).unwrap();
        for i in 0..8 {
            for j in 0..8 {
                assert_eq!(p.get(i, j), p.get(j, i));
            }
        }
        // w^T P w = ||D w||^2 >= 0 for a handful of directions.
        for seed in 0..5 {
            let w = Vector::new(
                (0..8)
                    .map(|i| ((seed * 8 + i) as f64 * 0.7).sin())
                    .collect(),
            );
            let quadratic = w.dot(&p.mul_vec(&w));
            assert!(quadratic >= -1e-12);
        }
    }

    #[test]
    fn test_penalty_matches_difference_action() {
        let m = 7;
        let order = 2;
        let d = difference_matrix(m, order).unwrap();
        let p = penalty_matrix(m, order).unwrap();
        let w = Vector::new((0..m).map(|i| ((i * i) as f64).sqrt()).collect());
        let dw = d.mul_vec(&w);
        assert!((w.dot(&p.mul_vec(&w)) - dw.dot(&dw)).abs() < 1e-10);
    }

    #[test]
    fn test_grid_penalty_single_dimension_matches_1d() {
        let p1 = penalty_matrix(6, 2).unwrap();
        let pg = grid_penalty_matrix(&[6], 2, 0).unwrap();
        assert_eq!(p1, pg);
    }

    #[test]
    fn test_grid_penalty_shapes() {
        let p0 = grid_penalty_matrix(&[4, 5], 2, 0).unwrap();
        let p1 = grid_penalty_matrix(&[4, 5], 2, 1).unwrap();
        assert_eq!(p0.rows(), 20);
        assert_eq!(p1.rows(), 20);
    }

    #[test]
    fn test_grid_penalty_last_dimension_action() {
        // Along the last (fastest-varying) dimension the grid penalty acts
        // row by row of the coefficient grid.
        let sizes = [3usize, 4usize];
        let p = grid_penalty_matrix(&sizes, 1, 1).unwrap();
        let base = penalty_matrix(4, 1).unwrap();

        // Coefficient grid w[i][j] = values per row; flattened i*4 + j.
        let rows = [
            [1.0, 2.0, 4.0, 7.0],
            [0.0, 0.0, 0.0, 0.0],
            [3.0, 3.0, 3.0, 3.0],
        ];
        let flat = Vector::new(rows.iter().flatten().copied().collect());
        let quadratic = flat.dot(&p.mul_vec(&flat));

        let mut expected = 0.0;
        for row in &rows {
            let w = Vector::new(row.to_vec());
            expected += w.dot(&base.mul_vec(&w));
        }
        assert!((quadratic - expected).abs() < 1e-12);
    }

    #[test]
    fn test_grid_penalty_dim_out_of_range() {
        let err = grid_penalty_matrix(&[4, 4], 1, 2).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)));
    }
}

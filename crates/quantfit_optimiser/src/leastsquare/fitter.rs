//! Generalized least-squares fitting engine.
//!
//! # Algorithm
//!
//! Given observations `(x_j, y_j, sigma_j)` and basis functions `b_i`, the
//! fitted coefficients `w` minimise the chi-square objective
//!
//! ```text
//! chi^2(w) = sum_j [ (y_j - sum_i w_i b_i(x_j)) / sigma_j ]^2
//! ```
//!
//! by solving the normal equations `(A^T A) w = A^T b` with a Cholesky
//! decomposition, where `A[j][i] = b_i(x_j) / sigma_j`. The penalized form
//! adds `lambda * D^T D` to the normal matrix, with `D` the finite
//! difference operator of the requested order on the coefficient sequence.
//!
//! Accumulation into the normal equations runs in a fixed order, so the
//! fitted values are reproducible bit for bit across runs, with or without
//! the `parallel` feature.

use super::penalty::{grid_penalty_matrix, penalty_matrix};
use super::{FitError, FitResult, SmoothFitResult};
use quantfit_core::math::basis::{BasisFunction, BasisFunctionAggregation};
use quantfit_core::math::linalg::{CholeskyDecomposition, Matrix, Vector};

/// Weighted basis-function regression with optional roughness penalties.
///
/// The fitter is stateless: every call operates purely on its arguments, so
/// a single instance can serve concurrent callers.
///
/// # Example
///
/// ```
/// use quantfit_optimiser::leastsquare::GeneralizedLeastSquares;
///
/// // Fit y = w0 + w1 * x through three exact observations.
/// let bases: Vec<fn(&f64) -> f64> = vec![|_| 1.0, |x| *x];
/// let xs = [0.0, 1.0, 2.0];
/// let ys = [1.0, 3.0, 5.0];
/// let sigmas = [0.1, 0.1, 0.1];
///
/// let fitter = GeneralizedLeastSquares::new();
/// let result = fitter.fit(&xs, &ys, &sigmas, &bases).unwrap();
/// assert!((result.parameters.as_slice()[0] - 1.0).abs() < 1e-10);
/// assert!((result.parameters.as_slice()[1] - 2.0).abs() < 1e-10);
/// assert!(result.chi_sq < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedLeastSquares;

impl GeneralizedLeastSquares {
    /// Create a fitter.
    pub fn new() -> Self {
        Self
    }

    /// Fit basis-function coefficients to weighted observations.
    ///
    /// # Errors
    ///
    /// * `FitError::DimensionMismatch` when the input slices disagree in
    ///   length
    /// * `FitError::InvalidSigma` when a sigma is not strictly positive and
    ///   finite
    /// * `FitError::EmptyBasis` when no basis functions are supplied
    /// * `FitError::SingularSystem` when the normal equations are not
    ///   positive definite
    pub fn fit<X, B>(
        &self,
        xs: &[X],
        ys: &[f64],
        sigmas: &[f64],
        bases: &[B],
    ) -> Result<FitResult, FitError>
    where
        B: BasisFunction<X>,
    {
        validate_inputs(xs.len(), ys, sigmas, bases.len())?;
        let design = design_matrix(xs, bases);
        solve_normal_equations(&design, ys, sigmas, None)
    }

    /// As [`fit`](Self::fit), but evaluating the design rows in parallel.
    ///
    /// Each design entry is computed independently; the accumulation into
    /// the normal equations is identical to the sequential path, so the
    /// result matches [`fit`](Self::fit) exactly.
    #[cfg(feature = "parallel")]
    pub fn fit_parallel<X, B>(
        &self,
        xs: &[X],
        ys: &[f64],
        sigmas: &[f64],
        bases: &[B],
    ) -> Result<FitResult, FitError>
    where
        X: Sync,
        B: BasisFunction<X> + Sync,
    {
        validate_inputs(xs.len(), ys, sigmas, bases.len())?;
        let design = design_matrix_parallel(xs, bases);
        solve_normal_equations(&design, ys, sigmas, None)
    }

    /// Fit with a roughness penalty of weight `lambda` on the `diff_order`-th
    /// finite differences of the coefficient sequence (P-spline smoothing).
    ///
    /// Consumes the basis functions to reconstruct the fitted smooth
    /// function in the result. The reported chi-square is the data misfit
    /// only; the penalty term is not included.
    ///
    /// # Errors
    ///
    /// As [`fit`](Self::fit), plus `FitError::InvalidPenaltyWeight` and
    /// `FitError::InvalidPenaltyOrder`.
    pub fn fit_penalized<X, B>(
        &self,
        xs: &[X],
        ys: &[f64],
        sigmas: &[f64],
        bases: Vec<B>,
        lambda: f64,
        diff_order: usize,
    ) -> Result<SmoothFitResult<X, B>, FitError>
    where
        B: BasisFunction<X>,
    {
        let m = bases.len();
        validate_inputs(xs.len(), ys, sigmas, m)?;
        validate_penalty_weight(lambda)?;

        let mut penalty = Matrix::zeros(m, m);
        penalty.add_scaled_assign(&penalty_matrix(m, diff_order)?, lambda);

        let design = design_matrix(xs, &bases);
        let result = solve_normal_equations(&design, ys, sigmas, Some(&penalty))?;
        let weights = result.parameters.as_slice().to_vec();
        let function = BasisFunctionAggregation::new(bases, weights)?;
        Ok(SmoothFitResult::new(result, function))
    }

    /// Penalized fit for coefficients laid out on an N-D tensor grid.
    ///
    /// `sizes` gives the per-dimension coefficient counts (their product
    /// must equal the number of basis functions, flattened row-major with
    /// the last dimension fastest); each dimension carries its own penalty
    /// weight and difference order, and the per-dimension penalties are
    /// summed.
    ///
    /// # Errors
    ///
    /// As [`fit_penalized`](Self::fit_penalized), plus
    /// `FitError::InvalidInput` when the grid layout does not match the
    /// basis.
    pub fn fit_penalized_grid<X, B>(
        &self,
        xs: &[X],
        ys: &[f64],
        sigmas: &[f64],
        bases: Vec<B>,
        sizes: &[usize],
        lambdas: &[f64],
        diff_orders: &[usize],
    ) -> Result<SmoothFitResult<X, B>, FitError>
    where
        B: BasisFunction<X>,
    {
        let m = bases.len();
        validate_inputs(xs.len(), ys, sigmas, m)?;

        let grid_size: usize = sizes.iter().product();
        if sizes.is_empty() || grid_size != m {
            return Err(FitError::invalid_input(format!(
                "coefficient grid {:?} does not describe {} basis functions",
                sizes, m
            )));
        }
        if lambdas.len() != sizes.len() || diff_orders.len() != sizes.len() {
            return Err(FitError::invalid_input(format!(
                "expected one penalty weight and difference order per grid dimension ({}), got {} and {}",
                sizes.len(),
                lambdas.len(),
                diff_orders.len()
            )));
        }

        let mut penalty = Matrix::zeros(m, m);
        for (dim, (&lambda, &order)) in lambdas.iter().zip(diff_orders).enumerate() {
            validate_penalty_weight(lambda)?;
            penalty.add_scaled_assign(&grid_penalty_matrix(sizes, order, dim)?, lambda);
        }

        let design = design_matrix(xs, &bases);
        let result = solve_normal_equations(&design, ys, sigmas, Some(&penalty))?;
        let weights = result.parameters.as_slice().to_vec();
        let function = BasisFunctionAggregation::new(bases, weights)?;
        Ok(SmoothFitResult::new(result, function))
    }
}

fn validate_inputs(
    n_xs: usize,
    ys: &[f64],
    sigmas: &[f64],
    n_bases: usize,
) -> Result<(), FitError> {
    if n_xs != ys.len() || n_xs != sigmas.len() {
        return Err(FitError::dimension_mismatch(n_xs, ys.len(), sigmas.len()));
    }
    if n_bases == 0 {
        return Err(FitError::EmptyBasis);
    }
    for (index, &value) in sigmas.iter().enumerate() {
        if !(value > 0.0) || !value.is_finite() {
            return Err(FitError::InvalidSigma { index, value });
        }
    }
    Ok(())
}

fn validate_penalty_weight(lambda: f64) -> Result<(), FitError> {
    if !(lambda >= 0.0) || !lambda.is_finite() {
        return Err(FitError::InvalidPenaltyWeight { lambda });
    }
    Ok(())
}

// Basis evaluations: row i holds basis i over all observations.
fn design_matrix<X, B: BasisFunction<X>>(xs: &[X], bases: &[B]) -> Matrix {
    let mut design = Matrix::zeros(bases.len(), xs.len());
    for (i, basis) in bases.iter().enumerate() {
        for (j, x) in xs.iter().enumerate() {
            design.set(i, j, basis.evaluate(x));
        }
    }
    design
}

#[cfg(feature = "parallel")]
fn design_matrix_parallel<X, B>(xs: &[X], bases: &[B]) -> Matrix
where
    X: Sync,
    B: BasisFunction<X> + Sync,
{
    use rayon::prelude::*;

    let rows: Vec<Vec<f64>> = bases
        .par_iter()
        .map(|basis| xs.iter().map(|x| basis.evaluate(x)).collect())
        .collect();

    let mut design = Matrix::zeros(bases.len(), xs.len());
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            design.set(i, j, value);
        }
    }
    design
}

fn solve_normal_equations(
    design: &Matrix,
    ys: &[f64],
    sigmas: &[f64],
    penalty: Option<&Matrix>,
) -> Result<FitResult, FitError> {
    let m = design.rows();
    let n = design.cols();

    let inv_sigma_sq: Vec<f64> = sigmas.iter().map(|s| 1.0 / (s * s)).collect();

    // Weighted right-hand side A^T b.
    let mut rhs = vec![0.0; m];
    for (i, entry) in rhs.iter_mut().enumerate() {
        let row = design.row(i);
        let mut sum = 0.0;
        for j in 0..n {
            sum += ys[j] * row[j] * inv_sigma_sq[j];
        }
        *entry = sum;
    }

    // Normal matrix A^T A, symmetric, accumulated in a fixed order.
    let mut normal = Matrix::zeros(m, m);
    for i in 0..m {
        for k in 0..=i {
            let row_i = design.row(i);
            let row_k = design.row(k);
            let mut sum = 0.0;
            for j in 0..n {
                sum += row_i[j] * row_k[j] * inv_sigma_sq[j];
            }
            normal.set(i, k, sum);
            normal.set(k, i, sum);
        }
    }

    if let Some(penalty) = penalty {
        normal.add_scaled_assign(penalty, 1.0);
    }

    let weights = CholeskyDecomposition::new(&normal)?.solve(&Vector::new(rhs))?;

    // Chi-square at the fitted coefficients (data misfit only).
    let mut chi_sq = 0.0;
    for j in 0..n {
        let mut fitted = 0.0;
        for i in 0..m {
            fitted += weights[i] * design.get(i, j);
        }
        let residual = ys[j] - fitted;
        chi_sq += residual * residual * inv_sigma_sq[j];
    }

    Ok(FitResult::new(weights, chi_sq))
}

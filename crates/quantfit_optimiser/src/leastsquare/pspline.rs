//! P-spline fitting: B-spline basis generation plus penalized regression.

use super::{FitError, GeneralizedLeastSquares, SmoothFitResult};
use quantfit_core::math::basis::{BSpline, BasisFunctionGenerator, TensorProductBSpline};

/// One-call P-spline curve and surface fitting.
///
/// Combines a [`BasisFunctionGenerator`] and a [`GeneralizedLeastSquares`]
/// fitter: the basis is built from the domain description and the penalized
/// fit runs on it, returning the fitted smooth function ready for
/// evaluation.
///
/// # Example
///
/// ```
/// use quantfit_optimiser::leastsquare::PSplineFitter;
///
/// let xs: Vec<f64> = (0..10).map(|i| i as f64 / 5.0).collect();
/// let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
/// let sigmas = vec![0.01; xs.len()];
///
/// let fitter = PSplineFitter::new();
/// let result = fitter
///     .fit_curve(&xs, &ys, &sigmas, 0.0, 2.0, 20, 3, 0.01, 2)
///     .unwrap();
/// assert!((result.value(&1.0) - 1.0_f64.sin()).abs() < 0.05);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PSplineFitter {
    generator: BasisFunctionGenerator,
    fitter: GeneralizedLeastSquares,
}

impl PSplineFitter {
    /// Create a P-spline fitter.
    pub fn new() -> Self {
        Self {
            generator: BasisFunctionGenerator::new(),
            fitter: GeneralizedLeastSquares::new(),
        }
    }

    /// Fit a smooth curve through 1-D observations.
    ///
    /// Builds `n_knots + degree - 1` B-splines of the given degree over
    /// `[lower, upper]` and fits their coefficients with a roughness
    /// penalty of weight `lambda` on the `diff_order`-th coefficient
    /// differences.
    ///
    /// # Errors
    ///
    /// Any basis-construction or fitting error; see
    /// [`GeneralizedLeastSquares::fit_penalized`].
    #[allow(clippy::too_many_arguments)]
    pub fn fit_curve(
        &self,
        xs: &[f64],
        ys: &[f64],
        sigmas: &[f64],
        lower: f64,
        upper: f64,
        n_knots: usize,
        degree: usize,
        lambda: f64,
        diff_order: usize,
    ) -> Result<SmoothFitResult<f64, BSpline>, FitError> {
        let bases = self.generator.generate_set(lower, upper, n_knots, degree)?;
        self.fitter
            .fit_penalized(xs, ys, sigmas, bases, lambda, diff_order)
    }

    /// Fit a smooth surface through N-D observations.
    ///
    /// Builds the tensor-product B-spline basis described by the
    /// per-dimension domain bounds, knot counts and degrees, and fits with
    /// a separate roughness penalty per dimension.
    ///
    /// # Errors
    ///
    /// Any basis-construction or fitting error; see
    /// [`GeneralizedLeastSquares::fit_penalized_grid`].
    #[allow(clippy::too_many_arguments)]
    pub fn fit_surface(
        &self,
        xs: &[Vec<f64>],
        ys: &[f64],
        sigmas: &[f64],
        lower: &[f64],
        upper: &[f64],
        n_knots: &[usize],
        degree: &[usize],
        lambdas: &[f64],
        diff_orders: &[usize],
    ) -> Result<SmoothFitResult<Vec<f64>, TensorProductBSpline>, FitError> {
        let bases = self
            .generator
            .generate_tensor_set(lower, upper, n_knots, degree)?;
        let sizes: Vec<usize> = n_knots
            .iter()
            .zip(degree)
            .map(|(&k, &d)| k + d - 1)
            .collect();
        self.fitter
            .fit_penalized_grid(xs, ys, sigmas, bases, &sizes, lambdas, diff_orders)
    }
}

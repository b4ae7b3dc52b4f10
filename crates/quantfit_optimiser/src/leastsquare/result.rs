//! Fit result types.

use quantfit_core::math::basis::{BasisFunction, BasisFunctionAggregation};
use quantfit_core::math::linalg::Vector;

/// Result of a least-squares fit.
///
/// Created once on success and never mutated; a failed fit produces no
/// result at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitResult {
    /// Fitted basis-function coefficients.
    pub parameters: Vector,
    /// Chi-square of the fit: the sum of squared sigma-weighted residuals.
    pub chi_sq: f64,
}

impl FitResult {
    /// Create a new fit result.
    pub fn new(parameters: Vector, chi_sq: f64) -> Self {
        Self { parameters, chi_sq }
    }

    /// Root mean square of the weighted residuals.
    pub fn weighted_rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.chi_sq / n_observations as f64).sqrt()
    }
}

/// Result of a penalized (smoothing) fit.
///
/// Carries the plain [`FitResult`] plus the fitted function reconstructed
/// as a weighted sum of the input basis functions, ready to be evaluated
/// anywhere in the domain.
#[derive(Clone)]
pub struct SmoothFitResult<X, B> {
    result: FitResult,
    function: BasisFunctionAggregation<X, B>,
}

// Manual `Debug` impl: the derived one would require `X: Debug` and
// `B: Debug`, but `B` is typically a closure. Delegate to the fields'
// own `Debug` impls, neither of which needs those bounds.
impl<X, B> std::fmt::Debug for SmoothFitResult<X, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothFitResult")
            .field("result", &self.result)
            .field("function", &self.function)
            .finish()
    }
}

impl<X, B: BasisFunction<X>> SmoothFitResult<X, B> {
    /// Pair a fit result with its reconstructed function.
    pub fn new(result: FitResult, function: BasisFunctionAggregation<X, B>) -> Self {
        Self { result, function }
    }

    /// Chi-square of the fit (data misfit only; the penalty term is not
    /// included).
    pub fn chi_sq(&self) -> f64 {
        self.result.chi_sq
    }

    /// Fitted basis-function coefficients.
    pub fn parameters(&self) -> &Vector {
        &self.result.parameters
    }

    /// The fitted smooth function.
    pub fn function(&self) -> &BasisFunctionAggregation<X, B> {
        &self.function
    }

    /// Evaluate the fitted function at `x`.
    pub fn value(&self, x: &X) -> f64 {
        self.function.value(x)
    }
}

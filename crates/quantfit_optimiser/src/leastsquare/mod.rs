//! Generalized least-squares curve fitting.
//!
//! Fits a weighted sum of basis functions to noisy observations by
//! minimising the chi-square objective, optionally with a roughness penalty
//! on finite differences of the coefficient sequence (P-spline smoothing):
//!
//! - `GeneralizedLeastSquares`: the fitting engine
//! - `FitResult` / `SmoothFitResult`: fitted coefficients, chi-square, and
//!   (for penalized fits) the reconstructed smooth function
//! - `PSplineFitter`: convenience layer that generates a B-spline basis and
//!   runs the penalized fit in one call
//! - `penalty`: finite-difference penalty matrices, including their
//!   Kronecker embedding for coefficient grids
//! - `FitError`: typed failure modes; singular normal equations are
//!   surfaced, never silently worked around

pub mod penalty;

mod error;
mod fitter;
mod pspline;
mod result;

pub use error::FitError;
pub use fitter::GeneralizedLeastSquares;
pub use pspline::PSplineFitter;
pub use result::{FitResult, SmoothFitResult};

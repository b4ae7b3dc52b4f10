//! Root-finding error types.

use quantfit_core::types::LinalgError;
use thiserror::Error;

/// Errors that can occur during vector root finding.
///
/// # Variants
///
/// - `MaxIterationsExceeded`: Step budget exhausted without convergence
/// - `LineSearchFailure`: No step along the Newton direction reduced the
///   residual, even after refreshing the Jacobian estimate
/// - `NonSquareSystem`: Function codomain length differs from domain length
/// - `InvalidInput`: Empty or non-finite starting point
/// - `Linalg`: Wrapped linear algebra error; a singular (approximate)
///   Jacobian surfaces here
///
/// # Examples
///
/// ```
/// use quantfit_optimiser::rootfinding::RootFindError;
///
/// let err = RootFindError::MaxIterationsExceeded {
///     iterations: 100,
///     residual: 0.5,
/// };
/// assert!(format!("{}", err).contains("100"));
/// assert!(err.is_max_iterations());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootFindError {
    /// Step budget exhausted without meeting the tolerances.
    #[error("Failed to converge after {iterations} iterations (residual norm {residual:e})")]
    MaxIterationsExceeded {
        /// Number of accepted steps taken
        iterations: usize,
        /// Residual norm at the final position
        residual: f64,
    },

    /// Backtracking found no residual reduction along the Newton direction.
    #[error("Line search failed to reduce the residual (residual norm {residual:e})")]
    LineSearchFailure {
        /// Residual norm at the stalled position
        residual: f64,
    },

    /// The function does not map R^n to R^n.
    #[error("Function output length {codomain} does not match input length {domain}: only square systems are supported")]
    NonSquareSystem {
        /// Length of the input vector
        domain: usize,
        /// Length of the function output
        codomain: usize,
    },

    /// Empty or non-finite starting point.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrapped linear algebra error from the Newton step.
    #[error("Linear algebra failure: {0}")]
    Linalg(#[from] LinalgError),
}

impl RootFindError {
    /// Check if this failure was caused by a singular Jacobian estimate.
    pub fn is_singular_jacobian(&self) -> bool {
        matches!(self, Self::Linalg(e) if e.is_singular())
    }

    /// Check if this is an iteration-budget failure.
    pub fn is_max_iterations(&self) -> bool {
        matches!(self, Self::MaxIterationsExceeded { .. })
    }

    /// Check if this is a line-search stall.
    pub fn is_line_search_failure(&self) -> bool {
        matches!(self, Self::LineSearchFailure { .. })
    }
}

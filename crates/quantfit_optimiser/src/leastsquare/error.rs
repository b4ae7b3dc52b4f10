//! Least-squares fitting error types.

use quantfit_core::types::{BasisError, LinalgError};
use thiserror::Error;

/// Errors that can occur during generalized least-squares fitting.
///
/// # Variants
///
/// - `DimensionMismatch`: Parallel input sequences disagree in length
/// - `InvalidSigma`: An observation standard deviation is not strictly
///   positive and finite
/// - `EmptyBasis`: No basis functions were supplied
/// - `InvalidPenaltyOrder`: The difference order does not fit the
///   coefficient count
/// - `InvalidPenaltyWeight`: The penalty weight is negative or non-finite
/// - `SingularSystem`: The normal equations are not positive definite
///   (collinear bases, or fewer observations than coefficients without a
///   penalty)
/// - `Basis`: Wrapped basis-construction error
/// - `InvalidInput`: General invalid input error
///
/// # Examples
///
/// ```
/// use quantfit_optimiser::leastsquare::FitError;
///
/// let err = FitError::DimensionMismatch { xs: 10, ys: 9, sigmas: 10 };
/// assert!(format!("{}", err).contains("9"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitError {
    /// Parallel input sequences disagree in length.
    #[error("Parallel input lengths differ: {xs} x-values, {ys} y-values, {sigmas} sigmas")]
    DimensionMismatch {
        /// Number of x-values
        xs: usize,
        /// Number of y-values
        ys: usize,
        /// Number of sigma values
        sigmas: usize,
    },

    /// An observation standard deviation is not strictly positive and
    /// finite.
    #[error("Observation standard deviation must be strictly positive and finite: sigma[{index}] = {value}")]
    InvalidSigma {
        /// Index of the offending observation
        index: usize,
        /// The offending sigma value
        value: f64,
    },

    /// No basis functions were supplied.
    #[error("At least one basis function is required")]
    EmptyBasis,

    /// The difference order does not fit the coefficient count.
    #[error("Difference order {order} must be below the number of coefficients {parameters}")]
    InvalidPenaltyOrder {
        /// Requested finite-difference order
        order: usize,
        /// Number of fitted coefficients
        parameters: usize,
    },

    /// The penalty weight is negative or non-finite.
    #[error("Penalty weight must be non-negative and finite, got {lambda}")]
    InvalidPenaltyWeight {
        /// The offending penalty weight
        lambda: f64,
    },

    /// The normal equations are not positive definite.
    #[error("Normal equations are singular: {0}")]
    SingularSystem(#[from] LinalgError),

    /// Wrapped basis-construction error.
    #[error("Basis construction failed: {0}")]
    Basis(#[from] BasisError),

    /// General invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FitError {
    /// Create a dimension mismatch error from the three input lengths.
    pub fn dimension_mismatch(xs: usize, ys: usize, sigmas: usize) -> Self {
        Self::DimensionMismatch { xs, ys, sigmas }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a singular-system failure.
    pub fn is_singular_system(&self) -> bool {
        matches!(self, Self::SingularSystem(_))
    }

    /// Check if this is an input shape failure.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

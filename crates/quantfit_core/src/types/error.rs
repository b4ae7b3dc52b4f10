//! Error types for structured error handling.
//!
//! This module provides:
//! - `LinalgError`: Errors from dense linear algebra operations
//! - `BasisError`: Errors from basis-function construction

use thiserror::Error;

/// Linear algebra errors.
///
/// Provides structured error handling for matrix construction and
/// decomposition with descriptive context for each failure mode.
///
/// # Variants
/// - `DimensionMismatch`: Operand shapes are incompatible
/// - `RaggedRows`: Matrix rows have unequal lengths
/// - `NotSquare`: A square matrix was required
/// - `SingularMatrix`: Elimination met a pivot below the singularity threshold
/// - `NotPositiveDefinite`: Cholesky met a non-positive diagonal term
///
/// # Examples
/// ```
/// use quantfit_core::types::LinalgError;
///
/// let err = LinalgError::DimensionMismatch { expected: 3, got: 2 };
/// assert_eq!(format!("{}", err), "Dimension mismatch: expected 3, got 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinalgError {
    /// Operand shapes are incompatible.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Length or dimension required by the operation
        expected: usize,
        /// Length or dimension actually supplied
        got: usize,
    },

    /// Matrix rows have unequal lengths.
    #[error("Ragged rows: row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        /// Index of the offending row
        row: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        got: usize,
    },

    /// A square matrix was required.
    #[error("Matrix is not square: {rows} x {cols}")]
    NotSquare {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Elimination met a pivot below the singularity threshold.
    #[error("Matrix is numerically singular: pivot {pivot:e} at elimination step {row}")]
    SingularMatrix {
        /// Elimination step at which the pivot collapsed
        row: usize,
        /// Magnitude of the offending pivot
        pivot: f64,
    },

    /// Cholesky decomposition met a non-positive diagonal term.
    #[error("Matrix is not positive definite at row {row}")]
    NotPositiveDefinite {
        /// Row at which positive definiteness failed
        row: usize,
    },
}

impl LinalgError {
    /// Check if this error reports a numerically singular matrix.
    ///
    /// Both LU pivot collapse and Cholesky positive-definiteness failure
    /// count as singularity for callers that only care about solvability.
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            Self::SingularMatrix { .. } | Self::NotPositiveDefinite { .. }
        )
    }

    /// Check if this error reports an input shape problem.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::RaggedRows { .. } | Self::NotSquare { .. }
        )
    }
}

/// Basis-function construction errors.
///
/// # Variants
/// - `InvalidRange`: Domain bounds are not strictly increasing
/// - `InsufficientKnots`: Too few knots for the requested basis
/// - `IndexOutOfRange`: Spline index outside the generated set
/// - `DimensionMismatch`: Per-dimension parameter slices disagree in length
/// - `WeightMismatch`: Aggregation weights do not pair with the functions
/// - `EmptyBasis`: An aggregation over zero functions was requested
///
/// # Examples
/// ```
/// use quantfit_core::types::BasisError;
///
/// let err = BasisError::InvalidRange { lower: 2.0, upper: 1.0 };
/// assert!(format!("{}", err).contains("strictly less"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BasisError {
    /// Domain bounds are not strictly increasing.
    #[error("Invalid domain: lower bound {lower} must be strictly less than upper bound {upper}")]
    InvalidRange {
        /// Lower domain bound
        lower: f64,
        /// Upper domain bound
        upper: f64,
    },

    /// Too few knots for the requested basis.
    #[error("Insufficient knots: got {got}, need at least {need}")]
    InsufficientKnots {
        /// Number of knots supplied
        got: usize,
        /// Minimum number of knots required
        need: usize,
    },

    /// Spline index outside the generated set.
    #[error("Basis index {index} out of range for {count} splines")]
    IndexOutOfRange {
        /// Requested spline index
        index: usize,
        /// Number of splines the knot vector supports
        count: usize,
    },

    /// Per-dimension parameter slices disagree in length.
    #[error("Dimension mismatch: {expected} dimensions expected, got {got}")]
    DimensionMismatch {
        /// Number of dimensions implied by the domain bounds
        expected: usize,
        /// Number of dimensions actually supplied
        got: usize,
    },

    /// Aggregation weights do not pair with the functions.
    #[error("Weights length {weights} does not match number of basis functions {functions}")]
    WeightMismatch {
        /// Number of weights supplied
        weights: usize,
        /// Number of basis functions supplied
        functions: usize,
    },

    /// An aggregation over zero functions was requested.
    #[error("At least one basis function is required")]
    EmptyBasis,
}

//! Dense linear algebra for curve fitting and root finding.
//!
//! This module provides the small, self-contained kernel the solver layer is
//! built on:
//!
//! - [`Vector`]: fixed-length sequence of `f64` values
//! - [`Matrix`]: dense row-major matrix of `f64` values
//! - [`LuDecomposition`]: LU factorisation with partial pivoting, used for
//!   Newton steps on general square systems
//! - [`CholeskyDecomposition`]: factorisation for symmetric positive definite
//!   systems, used for normal equations
//!
//! All decompositions surface numerical singularity as a typed
//! [`LinalgError`](crate::types::LinalgError) rather than producing a
//! garbage solution.
//!
//! # Examples
//!
//! ```
//! use quantfit_core::math::linalg::{LuDecomposition, Matrix, Vector};
//!
//! let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
//! let b = Vector::new(vec![3.0, 5.0]);
//!
//! let lu = LuDecomposition::new(&a).unwrap();
//! let x = lu.solve(&b).unwrap();
//!
//! let residual = a.mul_vec(&x).sub(&b);
//! assert!(residual.norm() < 1e-12);
//! ```

mod cholesky;
mod lu;
mod matrix;
mod vector;

pub use cholesky::{CholeskyDecomposition, SINGULAR_DIAGONAL_TOLERANCE};
pub use lu::{LuDecomposition, SINGULAR_PIVOT_TOLERANCE};
pub use matrix::Matrix;
pub use vector::Vector;

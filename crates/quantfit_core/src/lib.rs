//! # quantfit_core: Mathematical Foundation for Curve Fitting
//!
//! ## Foundation Layer Role
//!
//! quantfit_core is the bottom layer of the two-crate workspace, providing:
//! - Dense linear algebra: [`math::linalg::Vector`], [`math::linalg::Matrix`],
//!   LU and Cholesky decompositions
//! - B-spline basis machinery (`math::basis`)
//! - Error types: `LinalgError`, `BasisError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! The foundation layer has no dependencies on the solver crate, with minimal
//! external dependencies:
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use quantfit_core::math::basis::{BasisFunction, BasisFunctionGenerator};
//! use quantfit_core::math::linalg::{LuDecomposition, Matrix, Vector};
//!
//! // Solve a small linear system
//! let a = Matrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
//! let b = Vector::new(vec![1.0, 2.0]);
//! let x = LuDecomposition::new(&a).unwrap().solve(&b).unwrap();
//! assert!((a.mul_vec(&x).as_slice()[0] - 1.0).abs() < 1e-12);
//!
//! // Generate a cubic B-spline basis over [0, 2]
//! let generator = BasisFunctionGenerator::new();
//! let splines = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
//! assert_eq!(splines.len(), 12);
//! let total: f64 = splines.iter().map(|s| s.evaluate(&1.0)).sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for vectors, matrices, and error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

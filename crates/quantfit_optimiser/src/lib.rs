//! # quantfit_optimiser
//!
//! Vector root finding and generalized least-squares curve fitting.
//!
//! This crate is the solver layer of the workspace, sitting on top of
//! `quantfit_core`. It solves the two inverse problems at the heart of curve
//! construction:
//!
//! - `rootfinding`: Broyden quasi-Newton solver for square nonlinear systems
//!   `F(x) = 0`, as used to strip yield curves from instrument quotes
//! - `leastsquare`: weighted basis-function regression with optional
//!   finite-difference roughness penalties (P-spline smoothing), as used to
//!   fit discount curves and volatility surfaces
//!
//! Both solvers are stateless beyond their configuration: a single instance
//! can be shared across threads, with every call operating purely on its own
//! inputs.
//!
//! ## Example
//!
//! ```rust
//! use quantfit_core::math::linalg::Vector;
//! use quantfit_optimiser::rootfinding::BroydenRootFinder;
//!
//! // Solve x0^2 + x1^2 = 4, x0 = x1.
//! let f = |x: &Vector| {
//!     Vector::new(vec![x.as_slice()[0].powi(2) + x.as_slice()[1].powi(2) - 4.0,
//!                      x.as_slice()[0] - x.as_slice()[1]])
//! };
//! let finder = BroydenRootFinder::with_defaults();
//! let result = finder.find_root(f, &Vector::new(vec![1.0, 1.0])).unwrap();
//! assert!((result.root.as_slice()[0] - 2.0_f64.sqrt()).abs() < 1e-7);
//! ```

pub mod leastsquare;
pub mod rootfinding;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::leastsquare::*;
    pub use crate::rootfinding::*;
}

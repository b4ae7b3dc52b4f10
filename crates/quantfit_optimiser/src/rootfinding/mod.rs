//! Root finding for square nonlinear systems.
//!
//! This module provides the Broyden quasi-Newton solver used to invert
//! market quotes into curve parameters:
//!
//! - `BroydenRootFinder`: the solver, driven by [`RootFinderConfig`]
//! - `RootFindResult`: solution vector plus convergence diagnostics
//! - `RootFindError`: typed failure modes (singular Jacobian, iteration
//!   budget exhausted, line-search stall)
//! - [`finite_difference_jacobian`]: the forward-difference estimate used
//!   when no explicit Jacobian is supplied
//!
//! The solver keeps a dense Jacobian approximation and refreshes it with a
//! rank-one secant update per accepted step, so a full derivative
//! recomputation is only needed when the approximation drifts.

mod broyden;
mod config;
mod error;
mod jacobian;

pub use broyden::{BroydenRootFinder, RootFindResult};
pub use config::RootFinderConfig;
pub use error::RootFindError;
pub use jacobian::finite_difference_jacobian;

//! Broyden quasi-Newton vector root finder.
//!
//! # Algorithm
//!
//! Solves `F(x) = 0` for square systems by Newton steps on an approximate
//! Jacobian:
//!
//! ```text
//! J p = F(x)
//! x' = x - lambda * p          (backtracking on lambda)
//! J += (dy - J dx) dx^T / (dx^T dx)
//! ```
//!
//! The rank-one secant update keeps the Jacobian estimate current without
//! recomputing derivatives each step; a full finite-difference refresh
//! happens only periodically, or when backtracking stalls.
//!
//! # Example
//!
//! ```
//! use quantfit_core::math::linalg::Vector;
//! use quantfit_optimiser::rootfinding::{BroydenRootFinder, RootFinderConfig};
//!
//! // Intersection of the circle x0^2 + x1^2 = 4 with the line x0 = x1.
//! let f = |x: &Vector| {
//!     let (a, b) = (x.as_slice()[0], x.as_slice()[1]);
//!     Vector::new(vec![a * a + b * b - 4.0, a - b])
//! };
//!
//! let finder = BroydenRootFinder::new(RootFinderConfig::default());
//! let result = finder.find_root(f, &Vector::new(vec![1.0, 0.5])).unwrap();
//! assert!(result.residual_norm < 1e-7);
//! ```

use super::{finite_difference_jacobian, RootFindError, RootFinderConfig};
use quantfit_core::math::linalg::{LuDecomposition, Matrix, Vector};

// Armijo sufficient-decrease parameter for the backtracking line search.
const ALPHA: f64 = 1e-4;

// Halving steps before the line search is declared stalled.
const MAX_BACKTRACKS: usize = 32;

// Accepted steps between full finite-difference refreshes of the Jacobian
// estimate; rank-one updates drift on strongly nonlinear systems.
const FULL_REFRESH_INTERVAL: usize = 20;

/// Result of a successful root-finding run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootFindResult {
    /// Solution vector satisfying the convergence criteria.
    pub root: Vector,
    /// Number of accepted steps taken.
    pub iterations: usize,
    /// Residual norm `||F(root)||` at the solution.
    pub residual_norm: f64,
}

impl RootFindResult {
    /// Create a new result.
    pub fn new(root: Vector, iterations: usize, residual_norm: f64) -> Self {
        Self {
            root,
            iterations,
            residual_norm,
        }
    }
}

/// Broyden quasi-Newton root finder for square nonlinear systems.
///
/// The solver holds only its configuration; every call works on its own
/// state, so one instance can serve concurrent callers.
///
/// # Example
///
/// ```
/// use quantfit_core::math::linalg::Vector;
/// use quantfit_optimiser::rootfinding::BroydenRootFinder;
///
/// let f = |x: &Vector| Vector::new(vec![x.as_slice()[0].powi(3) - 8.0]);
/// let finder = BroydenRootFinder::with_defaults();
/// let result = finder.find_root(f, &Vector::new(vec![1.0])).unwrap();
/// assert!((result.root.as_slice()[0] - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BroydenRootFinder {
    config: RootFinderConfig,
}

impl BroydenRootFinder {
    /// Create a root finder with the given configuration.
    pub fn new(config: RootFinderConfig) -> Self {
        Self { config }
    }

    /// Create a root finder with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: RootFinderConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &RootFinderConfig {
        &self.config
    }

    /// Find a root of `f` starting from `x0`.
    ///
    /// The initial Jacobian is estimated by forward finite differences.
    ///
    /// # Errors
    ///
    /// * `RootFindError::InvalidInput` for an empty or non-finite start
    /// * `RootFindError::NonSquareSystem` when `f` is not square
    /// * `RootFindError::Linalg` when the Jacobian estimate is singular
    /// * `RootFindError::LineSearchFailure` when no residual reduction is
    ///   possible even after a Jacobian refresh
    /// * `RootFindError::MaxIterationsExceeded` when the step budget runs
    ///   out
    pub fn find_root<F>(&self, f: F, x0: &Vector) -> Result<RootFindResult, RootFindError>
    where
        F: Fn(&Vector) -> Vector,
    {
        let y0 = self.check_start(&f, x0)?;
        let jacobian = finite_difference_jacobian(&f, x0, &y0);
        self.iterate(&f, jacobian, x0.clone(), y0)
    }

    /// Find a root of `f` starting from `x0` with an explicitly supplied
    /// initial Jacobian (for example, analytically computed).
    ///
    /// Subsequent iterations still maintain the estimate with Broyden
    /// updates and finite-difference refreshes.
    ///
    /// # Errors
    ///
    /// As [`find_root`](Self::find_root), plus `RootFindError::InvalidInput`
    /// when the supplied Jacobian is not `n x n`.
    pub fn find_root_with_jacobian<F>(
        &self,
        f: F,
        jacobian: Matrix,
        x0: &Vector,
    ) -> Result<RootFindResult, RootFindError>
    where
        F: Fn(&Vector) -> Vector,
    {
        let y0 = self.check_start(&f, x0)?;
        let n = x0.len();
        if jacobian.rows() != n || jacobian.cols() != n {
            return Err(RootFindError::InvalidInput(format!(
                "initial Jacobian is {}x{}, expected {}x{}",
                jacobian.rows(),
                jacobian.cols(),
                n,
                n
            )));
        }
        self.iterate(&f, jacobian, x0.clone(), y0)
    }

    fn check_start<F>(&self, f: &F, x0: &Vector) -> Result<Vector, RootFindError>
    where
        F: Fn(&Vector) -> Vector,
    {
        if x0.is_empty() {
            return Err(RootFindError::InvalidInput(
                "starting point is empty".to_string(),
            ));
        }
        if !x0.is_finite() {
            return Err(RootFindError::InvalidInput(
                "starting point has non-finite entries".to_string(),
            ));
        }
        let y0 = f(x0);
        if y0.len() != x0.len() {
            return Err(RootFindError::NonSquareSystem {
                domain: x0.len(),
                codomain: y0.len(),
            });
        }
        Ok(y0)
    }

    fn iterate<F>(
        &self,
        f: &F,
        mut jacobian: Matrix,
        mut x: Vector,
        mut y: Vector,
    ) -> Result<RootFindResult, RootFindError>
    where
        F: Fn(&Vector) -> Vector,
    {
        let mut g = y.dot(&y);
        let mut steps_since_refresh = 0usize;

        for iteration in 0..self.config.max_steps {
            if g.sqrt() < self.config.abs_tolerance {
                return Ok(RootFindResult::new(x, iteration, g.sqrt()));
            }

            if steps_since_refresh >= FULL_REFRESH_INTERVAL {
                jacobian = finite_difference_jacobian(f, &x, &y);
                steps_since_refresh = 0;
            }

            let direction = LuDecomposition::new(&jacobian)?.solve(&y)?;

            let step = match self.line_search(f, &x, g, &direction) {
                Some(step) => step,
                None => {
                    // Broyden drift can leave a direction that is no longer
                    // downhill; one exact refresh gives backtracking a
                    // second chance.
                    jacobian = finite_difference_jacobian(f, &x, &y);
                    steps_since_refresh = 0;
                    let direction = LuDecomposition::new(&jacobian)?.solve(&y)?;
                    self.line_search(f, &x, g, &direction)
                        .ok_or(RootFindError::LineSearchFailure { residual: g.sqrt() })?
                }
            };
            let (x_new, y_new, g_new) = step;

            let dx = x_new.sub(&x);
            let dy = y_new.sub(&y);

            // Broyden rank-one secant update: J += (dy - J dx) dx^T / (dx.dx).
            let dx_norm_sq = dx.dot(&dx);
            if dx_norm_sq > 0.0 {
                let correction = dy.sub(&jacobian.mul_vec(&dx));
                jacobian.add_outer_product(1.0 / dx_norm_sq, &correction, &dx);
            }

            let converged =
                self.step_converged(&dx, &x_new) && g_new.sqrt() < self.config.abs_tolerance;

            x = x_new;
            y = y_new;
            g = g_new;
            steps_since_refresh += 1;

            if converged {
                return Ok(RootFindResult::new(x, iteration + 1, g.sqrt()));
            }
        }

        Err(RootFindError::MaxIterationsExceeded {
            iterations: self.config.max_steps,
            residual: g.sqrt(),
        })
    }

    // Backtracking along the Newton direction: x' = x - lambda * p,
    // accepting the first lambda with sufficient residual decrease.
    fn line_search<F>(
        &self,
        f: &F,
        x: &Vector,
        g: f64,
        direction: &Vector,
    ) -> Option<(Vector, Vector, f64)>
    where
        F: Fn(&Vector) -> Vector,
    {
        let n = x.len();
        let mut lambda = 1.0;
        for _ in 0..MAX_BACKTRACKS {
            let candidate = x.add_scaled(direction, -lambda);
            let y_new = f(&candidate);
            if y_new.len() == n {
                let g_new = y_new.dot(&y_new);
                if g_new.is_finite() && g_new <= g * (1.0 - ALPHA * lambda) {
                    return Some((candidate, y_new, g_new));
                }
            }
            lambda *= 0.5;
        }
        None
    }

    fn step_converged(&self, dx: &Vector, x: &Vector) -> bool {
        dx.iter().zip(x.iter()).all(|(d, xi)| {
            d.abs() <= self.config.abs_tolerance + self.config.rel_tolerance * xi.abs()
        })
    }
}

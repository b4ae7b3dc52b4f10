//! Root-finder configuration.

/// Configuration for the Broyden vector root finder.
///
/// # Convergence
///
/// A solve terminates successfully once every component of the latest step
/// satisfies `|dx_i| <= abs_tolerance + rel_tolerance * |x_i|` and the
/// residual norm `||F(x)||` has dropped below `abs_tolerance`.
///
/// # Example
///
/// ```
/// use quantfit_optimiser::rootfinding::RootFinderConfig;
///
/// let config = RootFinderConfig::default();
/// assert!(config.abs_tolerance <= 1e-7);
/// assert!(config.max_steps >= 100);
///
/// let custom = RootFinderConfig::new(1e-10, 1e-10, 200);
/// assert_eq!(custom.max_steps, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootFinderConfig {
    /// Absolute tolerance on both the step components and the residual norm.
    pub abs_tolerance: f64,

    /// Relative tolerance on the step components, scaled by `|x_i|`.
    pub rel_tolerance: f64,

    /// Maximum number of accepted steps before giving up.
    ///
    /// If the solver does not converge within this limit, it returns
    /// `RootFindError::MaxIterationsExceeded`.
    pub max_steps: usize,
}

impl Default for RootFinderConfig {
    /// Default configuration: `abs_tolerance = 1e-7`,
    /// `rel_tolerance = 1e-7`, `max_steps = 100`.
    fn default() -> Self {
        Self {
            abs_tolerance: 1e-7,
            rel_tolerance: 1e-7,
            max_steps: 100,
        }
    }
}

impl RootFinderConfig {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if either tolerance is not strictly positive or
    /// `max_steps == 0`.
    pub fn new(abs_tolerance: f64, rel_tolerance: f64, max_steps: usize) -> Self {
        assert!(abs_tolerance > 0.0, "abs_tolerance must be positive");
        assert!(rel_tolerance > 0.0, "rel_tolerance must be positive");
        assert!(max_steps > 0, "max_steps must be > 0");
        Self {
            abs_tolerance,
            rel_tolerance,
            max_steps,
        }
    }

    /// Configuration with tight tolerances (1e-12) and a larger step budget.
    pub fn high_precision() -> Self {
        Self {
            abs_tolerance: 1e-12,
            rel_tolerance: 1e-12,
            max_steps: 500,
        }
    }

    /// Configuration with relaxed tolerances (1e-5) for speed.
    pub fn fast() -> Self {
        Self {
            abs_tolerance: 1e-5,
            rel_tolerance: 1e-5,
            max_steps: 50,
        }
    }
}

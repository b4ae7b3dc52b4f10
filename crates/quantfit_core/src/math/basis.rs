//! B-spline basis functions for curve and surface fitting.
//!
//! A fitted curve is a weighted sum of fixed building-block functions. This
//! module provides:
//!
//! - [`BasisFunction`]: the trait seam between the fitting layer and any
//!   scalar-valued basis, with a blanket implementation for closures
//! - [`BSpline`]: a single B-spline on a fixed knot vector, evaluated by the
//!   Cox–de Boor recursion
//! - [`TensorProductBSpline`]: products of per-dimension B-splines for
//!   surface fitting
//! - [`BasisFunctionGenerator`]: uniform-knot basis-set construction
//! - [`BasisFunctionAggregation`]: the weighted sum reconstructing a fitted
//!   function from coefficients
//!
//! # Examples
//!
//! ```
//! use quantfit_core::math::basis::{BasisFunction, BasisFunctionGenerator};
//!
//! let generator = BasisFunctionGenerator::new();
//! let splines = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
//!
//! // Cubic B-splines over uniform knots sum to one inside the domain.
//! let total: f64 = splines.iter().map(|s| s.evaluate(&0.7)).sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! ```

use crate::types::BasisError;
use std::marker::PhantomData;

/// A scalar-valued basis function over domain `X`.
///
/// Implementations must be pure: evaluating twice at the same point returns
/// the same value, with no hidden state. Any `Fn(&X) -> f64` closure
/// implements this trait, so callers can mix generated B-splines with ad-hoc
/// bases such as trigonometric families.
pub trait BasisFunction<X> {
    /// Evaluate the function at `x`.
    fn evaluate(&self, x: &X) -> f64;
}

impl<X, F> BasisFunction<X> for F
where
    F: Fn(&X) -> f64,
{
    fn evaluate(&self, x: &X) -> f64 {
        self(x)
    }
}

// Cox-de Boor recursion. Knot vectors here are strictly increasing and
// uniform, so the denominators never vanish.
fn b_spline_value(knots: &[f64], degree: usize, index: usize, x: f64) -> f64 {
    if degree == 0 {
        // Half-open support keeps adjacent degree-0 splines disjoint.
        return if x >= knots[index] && x < knots[index + 1] {
            1.0
        } else {
            0.0
        };
    }
    let left = (x - knots[index]) / (knots[index + degree] - knots[index]);
    let right =
        (knots[index + degree + 1] - x) / (knots[index + degree + 1] - knots[index + 1]);
    left * b_spline_value(knots, degree - 1, index, x)
        + right * b_spline_value(knots, degree - 1, index + 1, x)
}

/// A single B-spline of fixed degree on a fixed knot vector.
///
/// The spline with index `j` is supported on `[knots[j], knots[j+degree+1])`
/// and is zero elsewhere.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSpline {
    knots: Vec<f64>,
    degree: usize,
    index: usize,
}

impl BSpline {
    /// Create the `index`-th B-spline of the given degree on a knot vector.
    ///
    /// # Errors
    ///
    /// * [`BasisError::InsufficientKnots`] when the knot vector cannot
    ///   support a spline of this degree
    /// * [`BasisError::IndexOutOfRange`] when `index` has no room for its
    ///   `degree + 2` supporting knots
    pub fn new(knots: Vec<f64>, degree: usize, index: usize) -> Result<Self, BasisError> {
        if knots.len() < degree + 2 {
            return Err(BasisError::InsufficientKnots {
                got: knots.len(),
                need: degree + 2,
            });
        }
        let count = knots.len() - degree - 1;
        if index >= count {
            return Err(BasisError::IndexOutOfRange { index, count });
        }
        Ok(Self {
            knots,
            degree,
            index,
        })
    }

    /// Evaluate the spline at `x`.
    pub fn value(&self, x: f64) -> f64 {
        b_spline_value(&self.knots, self.degree, self.index, x)
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Left edge of the support interval.
    pub fn support_start(&self) -> f64 {
        self.knots[self.index]
    }

    /// Right edge of the support interval.
    pub fn support_end(&self) -> f64 {
        self.knots[self.index + self.degree + 1]
    }
}

impl BasisFunction<f64> for BSpline {
    fn evaluate(&self, x: &f64) -> f64 {
        self.value(*x)
    }
}

/// A tensor product of per-dimension B-splines.
///
/// Evaluates to the product of its one-dimensional components, giving a
/// local polynomial bump on an N-D grid cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TensorProductBSpline {
    components: Vec<BSpline>,
}

impl TensorProductBSpline {
    /// Combine per-dimension splines into a tensor product.
    ///
    /// # Errors
    ///
    /// Returns [`BasisError::EmptyBasis`] when no components are supplied.
    pub fn new(components: Vec<BSpline>) -> Result<Self, BasisError> {
        if components.is_empty() {
            return Err(BasisError::EmptyBasis);
        }
        Ok(Self { components })
    }

    /// Evaluate the product at an N-D point.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have one coordinate per component.
    pub fn value(&self, x: &[f64]) -> f64 {
        assert_eq!(
            x.len(),
            self.components.len(),
            "point dimension does not match basis dimension"
        );
        self.components
            .iter()
            .zip(x)
            .map(|(s, &xi)| s.value(xi))
            .product()
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.components.len()
    }
}

impl BasisFunction<Vec<f64>> for TensorProductBSpline {
    fn evaluate(&self, x: &Vec<f64>) -> f64 {
        self.value(x)
    }
}

/// Generator for uniform-knot B-spline basis sets.
///
/// A pure factory: the same parameters always produce the same basis set.
/// For `n_knots` knots spanning `[lower, upper]` and polynomial degree `d`,
/// the knot vector gains `d` uniformly spaced knots beyond each end and the
/// set contains `n_knots + d - 1` splines, so the splines sum to one
/// everywhere inside the domain.
///
/// # Examples
///
/// ```
/// use quantfit_core::math::basis::BasisFunctionGenerator;
///
/// let generator = BasisFunctionGenerator::new();
/// let set = generator.generate_set(0.0, 2.0, 20, 3).unwrap();
/// assert_eq!(set.len(), 22);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisFunctionGenerator;

impl BasisFunctionGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate a 1-D B-spline basis set.
    ///
    /// # Arguments
    ///
    /// * `lower`, `upper` - Domain bounds (strictly increasing)
    /// * `n_knots` - Number of knots spanning the domain (at least 2)
    /// * `degree` - Polynomial degree of each spline
    ///
    /// # Errors
    ///
    /// * [`BasisError::InvalidRange`] when `lower >= upper`
    /// * [`BasisError::InsufficientKnots`] when `n_knots < 2`
    pub fn generate_set(
        &self,
        lower: f64,
        upper: f64,
        n_knots: usize,
        degree: usize,
    ) -> Result<Vec<BSpline>, BasisError> {
        if !(lower < upper) {
            return Err(BasisError::InvalidRange { lower, upper });
        }
        if n_knots < 2 {
            return Err(BasisError::InsufficientKnots {
                got: n_knots,
                need: 2,
            });
        }

        let dx = (upper - lower) / ((n_knots - 1) as f64);
        let total = n_knots + 2 * degree;
        let knots: Vec<f64> = (0..total)
            .map(|i| lower + (i as f64 - degree as f64) * dx)
            .collect();

        let n_splines = n_knots + degree - 1;
        (0..n_splines)
            .map(|i| BSpline::new(knots.clone(), degree, i))
            .collect()
    }

    /// Generate an N-D tensor-product basis set.
    ///
    /// The flattened ordering is row-major with the last dimension varying
    /// fastest, matching the coefficient-grid layout expected by grid
    /// penalties.
    ///
    /// # Errors
    ///
    /// * [`BasisError::DimensionMismatch`] when the parameter slices
    ///   disagree in length or no dimensions are supplied
    /// * Any error from the per-dimension [`generate_set`](Self::generate_set)
    pub fn generate_tensor_set(
        &self,
        lower: &[f64],
        upper: &[f64],
        n_knots: &[usize],
        degree: &[usize],
    ) -> Result<Vec<TensorProductBSpline>, BasisError> {
        let dim = lower.len();
        if dim == 0 {
            return Err(BasisError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }
        for len in [upper.len(), n_knots.len(), degree.len()] {
            if len != dim {
                return Err(BasisError::DimensionMismatch {
                    expected: dim,
                    got: len,
                });
            }
        }

        let mut sets = Vec::with_capacity(dim);
        for d in 0..dim {
            sets.push(self.generate_set(lower[d], upper[d], n_knots[d], degree[d])?);
        }
        let sizes: Vec<usize> = sets.iter().map(Vec::len).collect();
        let total: usize = sizes.iter().product();

        let mut functions = Vec::with_capacity(total);
        for flat in 0..total {
            let mut rem = flat;
            let mut indices = vec![0usize; dim];
            for d in (0..dim).rev() {
                indices[d] = rem % sizes[d];
                rem /= sizes[d];
            }
            let components: Vec<BSpline> = indices
                .iter()
                .enumerate()
                .map(|(d, &i)| sets[d][i].clone())
                .collect();
            functions.push(TensorProductBSpline::new(components)?);
        }
        Ok(functions)
    }
}

/// A weighted sum of basis functions.
///
/// Reconstructs the fitted function `x ↦ Σᵢ wᵢ · basisᵢ(x)` from a
/// coefficient vector; itself a [`BasisFunction`], so aggregations compose.
#[derive(Clone)]
pub struct BasisFunctionAggregation<X, B> {
    functions: Vec<B>,
    weights: Vec<f64>,
    _domain: PhantomData<fn(&X) -> f64>,
}

// Manual `Debug` impl: the derived one would require `B: Debug`, but `B` is
// typically a closure. Report the shape without touching the functions.
impl<X, B> std::fmt::Debug for BasisFunctionAggregation<X, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasisFunctionAggregation")
            .field("functions", &format_args!("[{} functions]", self.functions.len()))
            .field("weights", &self.weights)
            .finish()
    }
}

impl<X, B: BasisFunction<X>> BasisFunctionAggregation<X, B> {
    /// Pair basis functions with their weights.
    ///
    /// # Errors
    ///
    /// * [`BasisError::EmptyBasis`] when no functions are supplied
    /// * [`BasisError::WeightMismatch`] when the counts disagree
    pub fn new(functions: Vec<B>, weights: Vec<f64>) -> Result<Self, BasisError> {
        if functions.is_empty() {
            return Err(BasisError::EmptyBasis);
        }
        if functions.len() != weights.len() {
            return Err(BasisError::WeightMismatch {
                weights: weights.len(),
                functions: functions.len(),
            });
        }
        Ok(Self {
            functions,
            weights,
            _domain: PhantomData,
        })
    }

    /// Evaluate the weighted sum at `x`.
    pub fn value(&self, x: &X) -> f64 {
        self.functions
            .iter()
            .zip(&self.weights)
            .map(|(f, w)| w * f.evaluate(x))
            .sum()
    }

    /// The fitted weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The underlying basis functions.
    pub fn functions(&self) -> &[B] {
        &self.functions
    }
}

impl<X, B: BasisFunction<X>> BasisFunction<X> for BasisFunctionAggregation<X, B> {
    fn evaluate(&self, x: &X) -> f64 {
        self.value(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // ========================================
    // BSpline Tests
    // ========================================

    #[test]
    fn test_degree_zero_indicator() {
        let spline = BSpline::new(vec![0.0, 1.0, 2.0], 0, 0).unwrap();
        assert_eq!(spline.value(0.0), 1.0);
        assert_eq!(spline.value(0.5), 1.0);
        assert_eq!(spline.value(1.0), 0.0); // half-open on the right
        assert_eq!(spline.value(-0.1), 0.0);
    }

    #[test]
    fn test_degree_one_hat() {
        let spline = BSpline::new(vec![-1.0, 0.0, 1.0, 2.0, 3.0], 1, 1).unwrap();
        assert_abs_diff_eq!(spline.value(1.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(spline.value(0.5), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(spline.value(1.5), 0.5, epsilon = 1e-15);
        assert_eq!(spline.value(2.5), 0.0);
    }

    #[test]
    fn test_local_support() {
        let generator = BasisFunctionGenerator::new();
        let splines = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
        for spline in &splines {
            assert_eq!(spline.value(spline.support_start() - 0.01), 0.0);
            assert_eq!(spline.value(spline.support_end() + 0.01), 0.0);
            let mid = 0.5 * (spline.support_start() + spline.support_end());
            assert!(spline.value(mid) > 0.0);
        }
    }

    #[test]
    fn test_insufficient_knots() {
        let err = BSpline::new(vec![0.0, 1.0], 3, 0).unwrap_err();
        assert_eq!(err, BasisError::InsufficientKnots { got: 2, need: 5 });
    }

    #[test]
    fn test_index_out_of_range() {
        let err = BSpline::new(vec![0.0, 1.0, 2.0, 3.0], 1, 2).unwrap_err();
        assert_eq!(err, BasisError::IndexOutOfRange { index: 2, count: 2 });
    }

    // ========================================
    // Generator Tests
    // ========================================

    #[test]
    fn test_set_size() {
        let generator = BasisFunctionGenerator::new();
        assert_eq!(generator.generate_set(0.0, 2.0, 20, 3).unwrap().len(), 22);
        assert_eq!(generator.generate_set(0.0, 1.0, 5, 1).unwrap().len(), 5);
        assert_eq!(generator.generate_set(0.0, 1.0, 7, 0).unwrap().len(), 6);
    }

    #[test]
    fn test_partition_of_unity() {
        let generator = BasisFunctionGenerator::new();
        let splines = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
        for i in 0..20 {
            let x = 0.05 + 1.9 * (i as f64) / 19.0;
            let total: f64 = splines.iter().map(|s| s.value(x)).sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_non_negative() {
        let generator = BasisFunctionGenerator::new();
        let splines = generator.generate_set(-1.0, 3.0, 8, 2).unwrap();
        for spline in &splines {
            for i in 0..50 {
                let x = -1.5 + 5.0 * (i as f64) / 49.0;
                assert!(spline.value(x) >= 0.0);
            }
        }
    }

    #[test]
    fn test_generation_is_pure() {
        let generator = BasisFunctionGenerator::new();
        let a = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
        let b = generator.generate_set(0.0, 2.0, 10, 3).unwrap();
        for (s, t) in a.iter().zip(&b) {
            assert_eq!(s.value(0.37), t.value(0.37));
        }
    }

    #[test]
    fn test_invalid_range() {
        let generator = BasisFunctionGenerator::new();
        let err = generator.generate_set(2.0, 2.0, 10, 3).unwrap_err();
        assert_eq!(
            err,
            BasisError::InvalidRange {
                lower: 2.0,
                upper: 2.0
            }
        );
    }

    #[test]
    fn test_too_few_knots() {
        let generator = BasisFunctionGenerator::new();
        let err = generator.generate_set(0.0, 1.0, 1, 3).unwrap_err();
        assert_eq!(err, BasisError::InsufficientKnots { got: 1, need: 2 });
    }

    // ========================================
    // Tensor Product Tests
    // ========================================

    #[test]
    fn test_tensor_set_size() {
        let generator = BasisFunctionGenerator::new();
        let set = generator
            .generate_tensor_set(&[0.0, 0.0], &[10.0, 10.0], &[10, 10], &[3, 3])
            .unwrap();
        assert_eq!(set.len(), 144);
        assert_eq!(set[0].dimension(), 2);
    }

    #[test]
    fn test_tensor_value_is_product() {
        let generator = BasisFunctionGenerator::new();
        let set_x = generator.generate_set(0.0, 10.0, 10, 3).unwrap();
        let set_y = generator.generate_set(0.0, 10.0, 10, 3).unwrap();
        let tensor = generator
            .generate_tensor_set(&[0.0, 0.0], &[10.0, 10.0], &[10, 10], &[3, 3])
            .unwrap();

        // Last dimension varies fastest: flat = i * 12 + j.
        let (i, j) = (5, 7);
        let point = vec![4.2, 6.1];
        let expected = set_x[i].value(point[0]) * set_y[j].value(point[1]);
        assert_abs_diff_eq!(tensor[i * 12 + j].value(&point), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_tensor_partition_of_unity() {
        let generator = BasisFunctionGenerator::new();
        let set = generator
            .generate_tensor_set(&[0.0, 0.0], &[10.0, 10.0], &[6, 6], &[2, 2])
            .unwrap();
        let point = vec![3.3, 8.1];
        let total: f64 = set.iter().map(|s| s.value(&point)).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tensor_dimension_mismatch() {
        let generator = BasisFunctionGenerator::new();
        let err = generator
            .generate_tensor_set(&[0.0, 0.0], &[1.0], &[5, 5], &[2, 2])
            .unwrap_err();
        assert_eq!(err, BasisError::DimensionMismatch { expected: 2, got: 1 });
    }

    // ========================================
    // Aggregation Tests
    // ========================================

    #[test]
    fn test_aggregation_weighted_sum() {
        let generator = BasisFunctionGenerator::new();
        let splines = generator.generate_set(0.0, 2.0, 5, 2).unwrap();
        let weights: Vec<f64> = (0..splines.len()).map(|i| i as f64).collect();
        let aggregation =
            BasisFunctionAggregation::new(splines.clone(), weights.clone()).unwrap();

        let x = 1.3;
        let expected: f64 = splines
            .iter()
            .zip(&weights)
            .map(|(s, w)| w * s.value(x))
            .sum();
        assert_abs_diff_eq!(aggregation.value(&x), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_aggregation_of_closures() {
        let functions: Vec<_> = (0..3)
            .map(|k| move |x: &f64| ((2 * k + 1) as f64 * x).sin())
            .collect();
        let aggregation =
            BasisFunctionAggregation::new(functions, vec![1.0, -0.5, 2.0]).unwrap();
        let x: f64 = 0.4;
        let expected = x.sin() - 0.5 * (3.0 * x).sin() + 2.0 * (5.0 * x).sin();
        assert_abs_diff_eq!(aggregation.value(&x), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_aggregation_weight_mismatch() {
        let generator = BasisFunctionGenerator::new();
        let splines = generator.generate_set(0.0, 1.0, 4, 1).unwrap();
        let err = BasisFunctionAggregation::new(splines, vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            BasisError::WeightMismatch {
                weights: 1,
                functions: 4
            }
        );
    }

    #[test]
    fn test_aggregation_empty() {
        let err =
            BasisFunctionAggregation::<f64, BSpline>::new(vec![], vec![]).unwrap_err();
        assert_eq!(err, BasisError::EmptyBasis);
    }
}

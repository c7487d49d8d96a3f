//! Kernel trait definition

use ndarray::ArrayView1;

/// Kernel function trait
///
/// A kernel function K(x, y) maps two feature vectors of equal length to a
/// similarity score. Implementations are pure: the same inputs always produce
/// the same value, and K(x, y) == K(y, x).
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;
}

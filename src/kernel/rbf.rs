//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-||x - y||² / (2σ²))
//! where σ (sigma) is the kernel bandwidth.

use crate::core::{LSSVMError, Result};
use crate::kernel::Kernel;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// RBF (Gaussian) kernel: K(x, y) = exp(-||x - y||² / (2σ²))
///
/// The bandwidth σ controls the "reach" of each training example:
/// - Small σ: only close points are similar (potential overfitting)
/// - Large σ: distant points stay similar (potential underfitting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RBFKernel {
    sigma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with the given bandwidth
    ///
    /// # Errors
    /// Returns `InvalidParameter` unless sigma is finite and strictly positive
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(LSSVMError::InvalidParameter(format!(
                "RBF bandwidth sigma must be positive, got: {sigma}"
            )));
        }
        Ok(Self { sigma })
    }

    /// Get the bandwidth parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Equivalent `gamma` in the exp(-γ||x - y||²) parameterisation
    pub fn gamma(&self) -> f64 {
        1.0 / (2.0 * self.sigma * self.sigma)
    }
}

impl Default for RBFKernel {
    /// Unit bandwidth (sigma = 1.0)
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let squared_distance = squared_euclidean_distance(x, y);
        (-self.gamma() * squared_distance).exp()
    }
}

/// Squared Euclidean distance ||x - y||²
fn squared_euclidean_distance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

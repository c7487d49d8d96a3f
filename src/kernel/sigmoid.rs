//! Sigmoid (Tanh) Kernel Implementation
//!
//! The Sigmoid kernel is defined as:
//! K(x, y) = tanh(α * <x, y> + c)
//!
//! where:
//! - α (alpha) is the scaling parameter for the dot product
//! - c (coef0) is the bias/offset parameter
//!
//! The kernel is not positive semi-definite for all parameter values, so the
//! LS-SVM system built from it can be indefinite. The MINRES solver copes with
//! that, but badly chosen parameters may still fail to converge.

use crate::core::{LSSVMError, Result};
use crate::kernel::traits::Kernel;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Sigmoid (Hyperbolic Tangent) kernel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmoidKernel {
    alpha: f64,
    coef0: f64,
}

impl SigmoidKernel {
    /// Creates a new Sigmoid kernel
    ///
    /// # Arguments
    /// * `alpha` - Scaling parameter for the dot product (must be positive)
    /// * `coef0` - Bias/offset parameter (any finite value)
    ///
    /// # Examples
    /// ```
    /// use lssvm::kernel::SigmoidKernel;
    ///
    /// let kernel = SigmoidKernel::new(0.1, -1.0).unwrap();
    /// assert_eq!(kernel.alpha(), 0.1);
    /// assert_eq!(kernel.coef0(), -1.0);
    /// ```
    pub fn new(alpha: f64, coef0: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(LSSVMError::InvalidParameter(format!(
                "Sigmoid scale alpha must be positive, got: {alpha}"
            )));
        }
        if !coef0.is_finite() {
            return Err(LSSVMError::InvalidParameter(format!(
                "Sigmoid offset must be finite, got: {coef0}"
            )));
        }
        Ok(Self { alpha, coef0 })
    }

    /// Neural network inspired parameters: alpha = 1/n_features, coef0 = -1
    pub fn neural_network(n_features: usize) -> Result<Self> {
        if n_features == 0 {
            return Err(LSSVMError::InvalidParameter(
                "Number of features must be positive".to_string(),
            ));
        }
        Self::new(1.0 / n_features as f64, -1.0)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coef0(&self) -> f64 {
        self.coef0
    }
}

impl Default for SigmoidKernel {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            coef0: 0.0,
        }
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (self.alpha * x.dot(&y) + self.coef0).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_sigmoid_kernel_creation() {
        let kernel = SigmoidKernel::new(0.1, -1.0).unwrap();
        assert_eq!(kernel.alpha(), 0.1);
        assert_eq!(kernel.coef0(), -1.0);

        let nn = SigmoidKernel::neural_network(4).unwrap();
        assert_eq!(nn.alpha(), 0.25);
        assert_eq!(nn.coef0(), -1.0);
    }

    #[test]
    fn test_sigmoid_kernel_invalid_parameters() {
        assert!(matches!(
            SigmoidKernel::new(0.0, 0.0),
            Err(LSSVMError::InvalidParameter(_))
        ));
        assert!(SigmoidKernel::new(-1.0, 0.0).is_err());
        assert!(SigmoidKernel::new(1.0, f64::INFINITY).is_err());
        assert!(SigmoidKernel::neural_network(0).is_err());
    }

    #[test]
    fn test_sigmoid_kernel_computation() {
        let kernel = SigmoidKernel::new(0.5, 0.25).unwrap();
        let x = array![1.0, 2.0];
        let y = array![0.5, -1.0];

        // dot = 0.5 - 2.0 = -1.5, tanh(0.5 * -1.5 + 0.25) = tanh(-0.5)
        assert_relative_eq!(
            kernel.compute(x.view(), y.view()),
            (-0.5_f64).tanh(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sigmoid_kernel_bounded() {
        let kernel = SigmoidKernel::new(10.0, 5.0).unwrap();
        let x = array![100.0, 100.0];
        let y = array![-100.0, 100.0];

        let value = kernel.compute(x.view(), y.view());
        assert!((-1.0..=1.0).contains(&value));
    }

    #[test]
    fn test_sigmoid_kernel_symmetry() {
        let kernel = SigmoidKernel::default();
        let x = array![1.0, 3.0, -2.0];
        let y = array![0.5, -0.5, 4.0];

        assert_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view())
        );
    }
}

//! Linear kernel implementation

use crate::kernel::Kernel;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Linear kernel: K(x, y) = x^T * y
///
/// With this kernel an LS-SVM regressor reduces to ridge regression in the
/// original feature space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.dot(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_kernel_basic() {
        let kernel = LinearKernel::new();

        let x = array![1.0, 0.0, 2.0];
        let y = array![3.0, 1.0, 2.0];

        // 1*3 + 0*1 + 2*2 = 7
        assert_eq!(kernel.compute(x.view(), y.view()), 7.0);
    }

    #[test]
    fn test_linear_kernel_identical() {
        let kernel = LinearKernel::new();
        let x = array![1.0, 2.0, 3.0];

        // x^T * x = 1^2 + 2^2 + 3^2 = 14
        assert_eq!(kernel.compute(x.view(), x.view()), 14.0);
    }

    #[test]
    fn test_linear_kernel_orthogonal() {
        let kernel = LinearKernel::new();
        let x = array![1.0, 0.0];
        let y = array![0.0, 5.0];

        assert_eq!(kernel.compute(x.view(), y.view()), 0.0);
    }

    #[test]
    fn test_linear_kernel_symmetry() {
        let kernel = LinearKernel::new();
        let x = array![0.3, -1.2, 4.5];
        let y = array![-2.0, 0.7, 1.1];

        assert_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view())
        );
    }
}

//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (<x, y> + c)^d
//!
//! Where:
//! - c (coef0): non-negative offset added to the dot product
//! - d (degree): degree of the polynomial, at least 1
//!
//! Common configurations:
//! - Linear kernel: d=1, c=0
//! - Quadratic kernel: d=2, c=1
//! - Cubic kernel: d=3, c=1

use crate::core::{LSSVMError, Result};
use crate::kernel::traits::Kernel;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Polynomial kernel with configurable degree and offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialKernel {
    degree: u32,
    coef0: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel
    ///
    /// # Arguments
    /// * `degree` - Degree of the polynomial (must be > 0)
    /// * `coef0` - Offset added to the dot product (must be >= 0)
    ///
    /// # Examples
    /// ```
    /// use lssvm::kernel::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let kernel = PolynomialKernel::new(2, 1.0).unwrap();
    /// assert_eq!(kernel.degree(), 2);
    ///
    /// assert!(PolynomialKernel::new(0, 1.0).is_err());
    /// ```
    pub fn new(degree: u32, coef0: f64) -> Result<Self> {
        if degree == 0 {
            return Err(LSSVMError::InvalidParameter(
                "Polynomial degree must be positive".to_string(),
            ));
        }
        if !(coef0.is_finite() && coef0 >= 0.0) {
            return Err(LSSVMError::InvalidParameter(format!(
                "Polynomial offset must be non-negative, got: {coef0}"
            )));
        }
        Ok(Self { degree, coef0 })
    }

    /// Creates a quadratic kernel: (<x,y> + 1)²
    pub fn quadratic() -> Self {
        Self {
            degree: 2,
            coef0: 1.0,
        }
    }

    /// Creates a cubic kernel: (<x,y> + 1)³
    pub fn cubic() -> Self {
        Self {
            degree: 3,
            coef0: 1.0,
        }
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn coef0(&self) -> f64 {
        self.coef0
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (x.dot(&y) + self.coef0).powi(self.degree as i32)
    }
}

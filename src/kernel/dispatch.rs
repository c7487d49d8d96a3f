//! Kernel selection and matrix evaluation
//!
//! [`KernelSpec`] is the serialisable, validated choice of kernel a model is
//! fitted with. The free functions here evaluate it on single vector pairs and
//! on whole datasets.

use crate::core::{LSSVMError, Result};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel, SigmoidKernel};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this many rows kernel matrices are filled sequentially
const KERNEL_PARALLEL_THRESHOLD: usize = 128;

/// Kernel choice together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelSpec {
    Linear(LinearKernel),
    Polynomial(PolynomialKernel),
    Rbf(RBFKernel),
    Sigmoid(SigmoidKernel),
}

impl KernelSpec {
    pub fn linear() -> Self {
        KernelSpec::Linear(LinearKernel::new())
    }

    pub fn polynomial(degree: u32, coef0: f64) -> Result<Self> {
        Ok(KernelSpec::Polynomial(PolynomialKernel::new(degree, coef0)?))
    }

    pub fn rbf(sigma: f64) -> Result<Self> {
        Ok(KernelSpec::Rbf(RBFKernel::new(sigma)?))
    }

    pub fn sigmoid(alpha: f64, coef0: f64) -> Result<Self> {
        Ok(KernelSpec::Sigmoid(SigmoidKernel::new(alpha, coef0)?))
    }

    /// Re-check parameter constraints.
    ///
    /// Constructors already enforce them; this catches values that arrived
    /// through deserialization.
    pub fn validate(&self) -> Result<()> {
        match self {
            KernelSpec::Linear(_) => Ok(()),
            KernelSpec::Polynomial(k) => PolynomialKernel::new(k.degree(), k.coef0()).map(|_| ()),
            KernelSpec::Rbf(k) => RBFKernel::new(k.sigma()).map(|_| ()),
            KernelSpec::Sigmoid(k) => SigmoidKernel::new(k.alpha(), k.coef0()).map(|_| ()),
        }
    }

    /// Short lowercase kernel name
    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::Linear(_) => "linear",
            KernelSpec::Polynomial(_) => "polynomial",
            KernelSpec::Rbf(_) => "rbf",
            KernelSpec::Sigmoid(_) => "sigmoid",
        }
    }
}

impl Default for KernelSpec {
    fn default() -> Self {
        KernelSpec::Rbf(RBFKernel::default())
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSpec::Linear(_) => write!(f, "linear"),
            KernelSpec::Polynomial(k) => {
                write!(f, "polynomial(degree={}, coef0={})", k.degree(), k.coef0())
            }
            KernelSpec::Rbf(k) => write!(f, "rbf(sigma={})", k.sigma()),
            KernelSpec::Sigmoid(k) => {
                write!(f, "sigmoid(alpha={}, coef0={})", k.alpha(), k.coef0())
            }
        }
    }
}

impl Kernel for KernelSpec {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        match self {
            KernelSpec::Linear(k) => k.compute(x, y),
            KernelSpec::Polynomial(k) => k.compute(x, y),
            KernelSpec::Rbf(k) => k.compute(x, y),
            KernelSpec::Sigmoid(k) => k.compute(x, y),
        }
    }
}

/// Evaluate the kernel on a single pair of vectors
///
/// # Errors
/// - `InvalidParameter` if the kernel parameters are invalid
/// - `InvalidInput` if the vectors are empty
/// - `DimensionMismatch` if the vectors differ in length
pub fn evaluate(kernel: &KernelSpec, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    kernel.validate()?;
    if a.len() != b.len() {
        return Err(LSSVMError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if a.is_empty() {
        return Err(LSSVMError::InvalidInput(
            "Kernel arguments must be non-empty vectors".to_string(),
        ));
    }
    Ok(kernel.compute(a, b))
}

/// Compute the N×N Gram matrix of a dataset (rows are samples)
///
/// Only the upper triangle is evaluated; the lower triangle is mirrored, so
/// the result is exactly symmetric.
pub fn gram_matrix(kernel: &KernelSpec, x: ArrayView2<f64>) -> Result<Array2<f64>> {
    kernel.validate()?;
    let (n_samples, n_features) = x.dim();
    if n_samples == 0 || n_features == 0 {
        return Err(LSSVMError::InvalidInput(
            "Cannot build a kernel matrix from an empty dataset".to_string(),
        ));
    }

    let upper_row = |i: usize| -> Vec<f64> {
        (i..n_samples)
            .map(|j| kernel.compute(x.row(i), x.row(j)))
            .collect()
    };

    let rows: Vec<Vec<f64>> = if n_samples >= KERNEL_PARALLEL_THRESHOLD {
        (0..n_samples).into_par_iter().map(upper_row).collect()
    } else {
        (0..n_samples).map(upper_row).collect()
    };

    let mut gram = Array2::<f64>::zeros((n_samples, n_samples));
    for (i, row) in rows.into_iter().enumerate() {
        for (offset, value) in row.into_iter().enumerate() {
            let j = i + offset;
            gram[[i, j]] = value;
            gram[[j, i]] = value;
        }
    }

    Ok(gram)
}

/// Compute the kernel block between query rows and training rows
///
/// Entry (q, i) is K(query_q, train_i); the result has shape
/// (query rows, training rows).
pub fn cross_kernel(
    kernel: &KernelSpec,
    train: ArrayView2<f64>,
    query: ArrayView2<f64>,
) -> Result<Array2<f64>> {
    kernel.validate()?;
    if query.ncols() != train.ncols() {
        return Err(LSSVMError::DimensionMismatch {
            expected: train.ncols(),
            actual: query.ncols(),
        });
    }

    let (n_query, n_train) = (query.nrows(), train.nrows());
    let query_row = |q: usize| -> Vec<f64> {
        (0..n_train)
            .map(|i| kernel.compute(query.row(q), train.row(i)))
            .collect()
    };

    let rows: Vec<Vec<f64>> = if n_query >= KERNEL_PARALLEL_THRESHOLD {
        (0..n_query).into_par_iter().map(query_row).collect()
    } else {
        (0..n_query).map(query_row).collect()
    };

    Array2::from_shape_vec((n_query, n_train), rows.into_iter().flatten().collect())
        .map_err(|e| LSSVMError::InvalidInput(format!("Kernel block shape error: {e}")))
}

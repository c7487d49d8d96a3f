//! Augmented LS-SVM linear system
//!
//! For a Gram matrix Ω, targets y and regularization constant γ the dual
//! variables solve
//!
//! ```text
//! [ 0      1ᵀ   ] [ b ]   [ 0 ]
//! [ 1   Ω+γ⁻¹I ] [ α ] = [ y ]
//! ```
//!
//! The equality constraints make this a linear system instead of a QP. The
//! price is sparsity: every training sample ends up with a nonzero α.

use crate::core::{LSSVMError, Result};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

/// Symmetric (N+1)×(N+1) system with its right-hand side.
///
/// Index 0 holds the bias, indices 1..=N the dual coefficients.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    matrix: Array2<f64>,
    rhs: Array1<f64>,
}

impl LinearSystem {
    /// Assemble the augmented system from a Gram matrix
    ///
    /// # Errors
    /// - `DimensionMismatch` if `gram` is not square or its size differs from `targets`
    /// - `InvalidParameter` if `gamma` is not a positive finite number
    /// - `InvalidInput` if there are no samples
    pub fn assemble(gram: ArrayView2<f64>, targets: ArrayView1<f64>, gamma: f64) -> Result<Self> {
        let (rows, cols) = gram.dim();
        if rows != cols {
            return Err(LSSVMError::DimensionMismatch {
                expected: rows,
                actual: cols,
            });
        }
        if targets.len() != rows {
            return Err(LSSVMError::DimensionMismatch {
                expected: rows,
                actual: targets.len(),
            });
        }
        if rows == 0 {
            return Err(LSSVMError::InvalidInput(
                "Cannot assemble a system without samples".to_string(),
            ));
        }
        validate_gamma(gamma)?;

        let n = rows;
        let mut matrix = Array2::<f64>::zeros((n + 1, n + 1));
        matrix.slice_mut(s![0, 1..]).fill(1.0);
        matrix.slice_mut(s![1.., 0]).fill(1.0);
        matrix.slice_mut(s![1.., 1..]).assign(&gram);

        let ridge = 1.0 / gamma;
        for i in 1..=n {
            matrix[[i, i]] += ridge;
        }

        let mut rhs = Array1::<f64>::zeros(n + 1);
        rhs.slice_mut(s![1..]).assign(&targets);

        Ok(Self { matrix, rhs })
    }

    /// Size of the system (N + 1)
    pub fn dim(&self) -> usize {
        self.rhs.len()
    }

    /// Number of training samples (N)
    pub fn n_samples(&self) -> usize {
        self.rhs.len() - 1
    }

    pub fn matrix(&self) -> ArrayView2<f64> {
        self.matrix.view()
    }

    pub fn rhs(&self) -> ArrayView1<f64> {
        self.rhs.view()
    }

    /// Matrix-vector product K·v
    pub fn apply(&self, v: ArrayView1<f64>) -> Array1<f64> {
        self.matrix.dot(&v)
    }

    /// Residual norm ||rhs - K·x|| of a candidate solution
    pub fn residual_norm(&self, solution: ArrayView1<f64>) -> f64 {
        let residual = &self.rhs - &self.apply(solution);
        residual.dot(&residual).sqrt()
    }
}

/// Check that the regularization constant is a positive finite number
pub fn validate_gamma(gamma: f64) -> Result<()> {
    if gamma.is_finite() && gamma > 0.0 {
        Ok(())
    } else {
        Err(LSSVMError::InvalidParameter(format!(
            "Regularization constant gamma must be positive, got: {gamma}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_assemble_layout() {
        let gram = array![[1.0, 0.5], [0.5, 2.0]];
        let targets = array![1.0, -1.0];
        let system = LinearSystem::assemble(gram.view(), targets.view(), 4.0).unwrap();

        let expected = array![
            [0.0, 1.0, 1.0],
            [1.0, 1.25, 0.5],
            [1.0, 0.5, 2.25]
        ];
        assert_eq!(system.matrix(), expected.view());
        assert_eq!(system.rhs(), array![0.0, 1.0, -1.0].view());
        assert_eq!(system.dim(), 3);
        assert_eq!(system.n_samples(), 2);
    }

    #[test]
    fn test_assembled_matrix_is_symmetric() {
        let gram = array![[2.0, 0.3, 0.1], [0.3, 1.0, 0.7], [0.1, 0.7, 3.0]];
        let targets = array![0.5, 1.5, -2.0];
        let system = LinearSystem::assemble(gram.view(), targets.view(), 10.0).unwrap();

        let m = system.matrix();
        assert_eq!(m, m.t());
    }

    #[test]
    fn test_assemble_rejects_non_square_gram() {
        let gram = Array2::<f64>::zeros((2, 3));
        let targets = array![1.0, -1.0];
        assert!(matches!(
            LinearSystem::assemble(gram.view(), targets.view(), 1.0),
            Err(LSSVMError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_assemble_rejects_target_length_mismatch() {
        let gram = Array2::<f64>::eye(3);
        let targets = array![1.0, -1.0];
        assert!(matches!(
            LinearSystem::assemble(gram.view(), targets.view(), 1.0),
            Err(LSSVMError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_assemble_rejects_invalid_gamma() {
        let gram = Array2::<f64>::eye(2);
        let targets = array![1.0, -1.0];
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LinearSystem::assemble(gram.view(), targets.view(), gamma),
                Err(LSSVMError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_residual_norm_of_exact_solution() {
        // With Ω = 0, γ = 1: b + α_i = y_i and Σα = 0
        let gram = Array2::<f64>::zeros((2, 2));
        let targets = array![1.0, -1.0];
        let system = LinearSystem::assemble(gram.view(), targets.view(), 1.0).unwrap();

        let solution = array![0.0, 1.0, -1.0];
        assert_eq!(system.residual_norm(solution.view()), 0.0);
    }
}

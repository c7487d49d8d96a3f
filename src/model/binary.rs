//! Binary LS-SVM model
//!
//! A [`BinaryModel`] owns the fitted state of one two-class classification or
//! one regression problem. Unlike a classic SVM the solution is not sparse:
//! every training sample keeps a dual coefficient and is retained for
//! prediction.

use crate::core::{DualSolution, LSSVMError, Prediction, Result, SolverConfig, SolverOutcome};
use crate::kernel::{cross_kernel, gram_matrix, KernelSpec};
use crate::solver::{validate_gamma, LinearSystem, MinresSolver};
use crate::utils::validation::{check_features, check_query, check_targets};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Fitted state of a binary model
#[derive(Debug, Clone)]
struct FittedState {
    training_features: Array2<f64>,
    dual: DualSolution,
    iterations: usize,
    residual_norm: f64,
}

/// LS-SVM for a single binary classification (targets ±1) or regression
/// (real targets) problem
#[derive(Debug, Clone)]
pub struct BinaryModel {
    kernel: KernelSpec,
    gamma: f64,
    solver: SolverConfig,
    state: Option<FittedState>,
}

impl BinaryModel {
    /// Create an unfitted model
    ///
    /// # Errors
    /// `InvalidParameter` if `gamma` is not positive or the kernel parameters
    /// are invalid
    pub fn new(kernel: KernelSpec, gamma: f64) -> Result<Self> {
        kernel.validate()?;
        validate_gamma(gamma)?;
        Ok(Self {
            kernel,
            gamma,
            solver: SolverConfig::default(),
            state: None,
        })
    }

    /// Use a custom solver configuration
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Rebuild a fitted model from persisted state
    pub fn from_parts(
        kernel: KernelSpec,
        gamma: f64,
        solver: SolverConfig,
        training_features: Array2<f64>,
        dual: DualSolution,
    ) -> Result<Self> {
        solver.validate()?;
        check_features(training_features.view())?;
        if dual.len() != training_features.nrows() {
            return Err(LSSVMError::DimensionMismatch {
                expected: training_features.nrows(),
                actual: dual.len(),
            });
        }

        let mut model = Self::new(kernel, gamma)?.with_solver(solver);
        model.state = Some(FittedState {
            training_features,
            dual,
            iterations: 0,
            residual_norm: 0.0,
        });
        Ok(model)
    }

    /// Fit the model on features `x` (rows are samples) and targets `y`
    ///
    /// For classification the targets are expected to be already mapped to
    /// {+1, -1}. A failed fit leaves any previous fitted state untouched.
    ///
    /// # Errors
    /// - `InvalidInput` for an empty dataset or non-finite values
    /// - `DimensionMismatch` if `y.len()` differs from the number of samples
    /// - `NonConvergence` if the solver hits its iteration cap
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self> {
        self.solver.validate()?;
        check_features(x)?;
        check_targets(y, x.nrows())?;

        let gram = gram_matrix(&self.kernel, x)?;
        let system = LinearSystem::assemble(gram.view(), y, self.gamma)?;
        let SolverOutcome {
            solution,
            iterations,
            residual_norm,
        } = MinresSolver::new(self.solver).solve(&system)?;

        debug!(
            "Fitted binary LS-SVM: n = {}, d = {}, kernel = {}, gamma = {}, bias = {:.6}",
            x.nrows(),
            x.ncols(),
            self.kernel,
            self.gamma,
            solution.bias
        );

        self.state = Some(FittedState {
            training_features: x.to_owned(),
            dual: solution,
            iterations,
            residual_norm,
        });
        Ok(self)
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.state.as_ref().ok_or(LSSVMError::NotFitted)
    }

    /// Raw decision values Σᵢ αᵢ·K(xᵢ, q) + b for every query row
    ///
    /// # Errors
    /// - `NotFitted` before a successful fit
    /// - `DimensionMismatch` if the query feature count differs from training
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let state = self.fitted()?;
        check_query(x, state.training_features.ncols())?;

        let block = cross_kernel(&self.kernel, state.training_features.view(), x)?;
        Ok(block.dot(&state.dual.alpha) + state.dual.bias)
    }

    /// Classify query rows into {+1, -1} (a zero score maps to +1)
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<Prediction>> {
        Ok(self
            .decision_function(x)?
            .iter()
            .map(|&value| Prediction::from_decision(value))
            .collect())
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver
    }

    /// Dual coefficients and bias, if fitted
    pub fn dual(&self) -> Option<&DualSolution> {
        self.state.as_ref().map(|s| &s.dual)
    }

    pub fn bias(&self) -> Option<f64> {
        self.dual().map(|d| d.bias)
    }

    /// Retained training samples, if fitted
    pub fn training_features(&self) -> Option<ArrayView2<f64>> {
        self.state.as_ref().map(|s| s.training_features.view())
    }

    pub fn n_features(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.training_features.ncols())
    }

    /// Every training sample acts as a support vector
    pub fn n_support_vectors(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.dual.len())
    }

    /// Solver iterations used by the last fit (0 for a model rebuilt from parts)
    pub fn iterations(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.iterations)
    }

    pub fn residual_norm(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.residual_norm)
    }
}

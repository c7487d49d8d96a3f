//! Core type definitions for LS-SVM

use crate::core::{LSSVMError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Default relative residual tolerance for the linear solver
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration cap for the linear solver
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Binary prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a prediction from a raw decision value
    pub fn from_decision(decision_value: f64) -> Self {
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Dual variables of a fitted LS-SVM: one coefficient per training sample plus the bias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualSolution {
    /// Dual coefficients (alpha values), one per training sample
    pub alpha: Array1<f64>,
    /// Bias term (b)
    pub bias: f64,
}

impl DualSolution {
    pub fn new(alpha: Array1<f64>, bias: f64) -> Self {
        Self { alpha, bias }
    }

    /// Number of training samples the solution was computed for
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }
}

/// Result of a linear solve
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub solution: DualSolution,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final residual norm ||rhs - K x||
    pub residual_norm: f64,
}

/// Configuration for the iterative linear solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Relative residual tolerance: stop once ||r|| <= tolerance * ||rhs||
    pub tolerance: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self> {
        let config = Self {
            tolerance,
            max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that tolerance and iteration cap are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(LSSVMError::InvalidParameter(format!(
                "Solver tolerance must be positive, got: {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(LSSVMError::InvalidParameter(
                "Solver iteration cap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

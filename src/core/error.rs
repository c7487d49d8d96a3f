//! Error types for the LS-SVM implementation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LSSVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model not fitted")]
    NotFitted,

    #[error("Solver did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence { iterations: usize, residual: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LSSVMError {
    /// Whether the caller can reasonably retry the failed operation,
    /// e.g. with a relaxed tolerance or a larger iteration cap.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LSSVMError::NonConvergence { .. })
    }
}

pub type Result<T> = std::result::Result<T, LSSVMError>;

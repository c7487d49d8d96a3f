//! Rust implementation of Least Squares Support Vector Machines (LS-SVM)
//!
//! Based on "Least Squares Support Vector Machine Classifiers" by Suykens and
//! Vandewalle. Training solves one regularized linear system per binary
//! problem with MINRES instead of a quadratic program.

pub mod api;
pub mod core;
pub mod data;
pub mod hyperparams;
pub mod kernel;
pub mod model;
pub mod persistence;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{
    EvaluationMetrics, ModelInfo, RegressionMetrics, TrainedClassifier, TrainedRegressor, LSSVC,
    LSSVR,
};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::CSVDataset;
pub use crate::kernel::{Kernel, KernelSpec};
pub use crate::model::{BinaryModel, MulticlassModel, Strategy};
pub use crate::persistence::SerializableModel;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

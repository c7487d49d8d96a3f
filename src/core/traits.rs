//! Fit/predict capability contract
//!
//! Any model type implementing [`Estimator`] and [`Predictor`] can be driven
//! uniformly by an external pipeline (cross-validation, grid search, ...)
//! without knowing which concrete learner it is talking to.

use crate::core::Result;
use ndarray::ArrayView2;

/// An unfitted learner configuration
pub trait Estimator: Send + Sync {
    /// Target type: class labels for classifiers, `f64` for regressors
    type Target;

    /// Fitted model produced by [`Estimator::fit`]
    type Fitted: Predictor<Output = Self::Target>;

    /// Fit the learner on a feature matrix (rows are samples) and targets
    fn fit(&self, x: ArrayView2<f64>, targets: &[Self::Target]) -> Result<Self::Fitted>;
}

/// A fitted model
pub trait Predictor: Send + Sync {
    type Output;

    /// Predict one output per row of `x`
    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<Self::Output>>;

    /// Feature dimension the model was fitted on
    fn n_features(&self) -> usize;
}

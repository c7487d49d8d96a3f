//! High-level API for LS-SVM operations
//!
//! This module provides a user-friendly interface for common LS-SVM tasks,
//! including training, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lssvm::api::LSSVC;
//! use lssvm::kernel::KernelSpec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a classifier on CSV data (last column is the class)
//! let model = LSSVC::<String>::new()
//!     .with_kernel(KernelSpec::rbf(0.5)?)
//!     .with_gamma(10.0)
//!     .train_from_csv("train.csv")?;
//!
//! // Evaluate it on held-out data
//! let metrics = model.evaluate_csv("test.csv")?;
//! println!("Accuracy: {:.2}%", metrics.accuracy() * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{Estimator, LSSVMError, Predictor, Result, SolverConfig};
use crate::data::CSVDataset;
use crate::hyperparams::{self, HyperParameter};
use crate::kernel::KernelSpec;
use crate::model::{BinaryModel, MulticlassModel, Strategy};
use crate::utils::scaling::{ScalingMethod, ScalingParams};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, CowArray, Ix2};
use std::marker::PhantomData;
use std::path::Path;

/// Apply fitted scaling parameters to a query, borrowing it when unscaled
fn scaled<'a>(
    scaling: Option<&ScalingParams>,
    x: ArrayView2<'a, f64>,
) -> Result<CowArray<'a, f64, Ix2>> {
    match scaling {
        Some(params) => Ok(CowArray::from(params.transform(x)?)),
        None => Ok(CowArray::from(x)),
    }
}

/// LS-SVM classifier with builder pattern
///
/// `L` is the class label type; any totally ordered label works and the
/// ascending order of the distinct labels defines the class indices.
#[derive(Debug, Clone)]
pub struct LSSVC<L = String> {
    kernel: KernelSpec,
    gamma: f64,
    solver: SolverConfig,
    strategy: Strategy,
    scaling: Option<ScalingMethod>,
    _labels: PhantomData<fn() -> L>,
}

impl<L> LSSVC<L> {
    /// Create a classifier with an RBF kernel (σ = 1), γ = 1 and one-vs-one voting
    pub fn new() -> Self {
        Self {
            kernel: KernelSpec::default(),
            gamma: hyperparams::gamma().default,
            solver: SolverConfig::default(),
            strategy: Strategy::default(),
            scaling: None,
            _labels: PhantomData,
        }
    }

    /// Set the kernel
    pub fn with_kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set regularization parameter γ
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the solver's relative residual tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    /// Set maximum number of solver iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.solver.max_iterations = max_iterations;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the multiclass decomposition
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Scale features before training; the fitted scaling is reapplied to queries
    pub fn with_feature_scaling(mut self, method: ScalingMethod) -> Self {
        self.scaling = Some(method);
        self
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

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Tunable parameters of the classifier
    pub fn hyperparameters() -> Vec<HyperParameter> {
        hyperparams::all()
    }
}

impl<L> Default for LSSVC<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Estimator for LSSVC<L>
where
    L: Clone + Ord + Send + Sync,
{
    type Target = L;
    type Fitted = TrainedClassifier<L>;

    fn fit(&self, x: ArrayView2<f64>, labels: &[L]) -> Result<TrainedClassifier<L>> {
        let scaling = self
            .scaling
            .map(|method| ScalingParams::fit(x, method))
            .transpose()?;
        let x = scaled(scaling.as_ref(), x)?;

        let model = MulticlassModel::fit(
            x.view(),
            labels,
            self.kernel,
            self.gamma,
            self.solver,
            self.strategy,
        )?;
        Ok(TrainedClassifier { model, scaling })
    }
}

impl LSSVC<String> {
    /// Train from CSV file (automatically detects headers)
    pub fn train_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<TrainedClassifier<String>> {
        let dataset = CSVDataset::from_file(path)?;
        self.fit(dataset.features(), dataset.labels())
    }
}

/// Trained classifier with high-level prediction interface
#[derive(Debug, Clone)]
pub struct TrainedClassifier<L> {
    model: MulticlassModel<L>,
    scaling: Option<ScalingParams>,
}

impl<L> TrainedClassifier<L>
where
    L: Clone + Ord + Send + Sync,
{
    /// Reassemble a classifier from a fitted model and optional scaling
    pub fn from_parts(model: MulticlassModel<L>, scaling: Option<ScalingParams>) -> Result<Self> {
        if let Some(params) = &scaling {
            if params.n_features() != model.n_features() {
                return Err(LSSVMError::DimensionMismatch {
                    expected: model.n_features(),
                    actual: params.n_features(),
                });
            }
        }
        Ok(Self { model, scaling })
    }

    /// Per-class scores (vote counts under one-vs-one), shape (rows, classes)
    pub fn class_scores(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let x = scaled(self.scaling.as_ref(), x)?;
        self.model.class_scores(x.view())
    }

    /// Accuracy and confusion matrix against known labels
    pub fn evaluate(&self, x: ArrayView2<f64>, labels: &[L]) -> Result<EvaluationMetrics<L>> {
        let predicted = self.predict(x)?;
        EvaluationMetrics::from_predictions(self.classes(), labels, &predicted)
    }

    pub fn classes(&self) -> &[L] {
        self.model.classes()
    }

    pub fn scaling(&self) -> Option<&ScalingParams> {
        self.scaling.as_ref()
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        let first = &self.model.models()[0];
        ModelInfo {
            n_classes: self.model.classes().len(),
            n_models: self.model.n_models(),
            n_support_vectors: self.model.models().iter().map(BinaryModel::n_support_vectors).sum(),
            n_features: self.model.n_features(),
            kernel: *first.kernel(),
            gamma: first.gamma(),
            strategy: Some(self.model.strategy()),
        }
    }

    /// Get the underlying multiclass model
    pub fn inner(&self) -> &MulticlassModel<L> {
        &self.model
    }
}

impl TrainedClassifier<String> {
    /// Predict labels for every row of a CSV file (its label column is ignored)
    pub fn predict_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        let dataset = CSVDataset::from_file(path)?;
        self.predict(dataset.features())
    }

    /// Evaluate against the labels of a CSV file
    pub fn evaluate_csv<P: AsRef<Path>>(&self, path: P) -> Result<EvaluationMetrics<String>> {
        let dataset = CSVDataset::from_file(path)?;
        self.evaluate(dataset.features(), dataset.labels())
    }
}

impl<L> Predictor for TrainedClassifier<L>
where
    L: Clone + Ord + Send + Sync,
{
    type Output = L;

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>> {
        let x = scaled(self.scaling.as_ref(), x)?;
        self.model.predict(x.view())
    }

    fn n_features(&self) -> usize {
        self.model.n_features()
    }
}

/// LS-SVM regressor with builder pattern
#[derive(Debug, Clone)]
pub struct LSSVR {
    kernel: KernelSpec,
    gamma: f64,
    solver: SolverConfig,
    scaling: Option<ScalingMethod>,
}

impl LSSVR {
    /// Create a regressor with an RBF kernel (σ = 1) and γ = 1
    pub fn new() -> Self {
        Self {
            kernel: KernelSpec::default(),
            gamma: hyperparams::gamma().default,
            solver: SolverConfig::default(),
            scaling: None,
        }
    }

    pub fn with_kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set regularization parameter γ
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.solver.max_iterations = max_iterations;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_feature_scaling(mut self, method: ScalingMethod) -> Self {
        self.scaling = Some(method);
        self
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

    /// Tunable parameters of the regressor
    pub fn hyperparameters() -> Vec<HyperParameter> {
        hyperparams::all()
    }

    /// Train from CSV file; the last column must be numeric
    pub fn train_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<TrainedRegressor> {
        let dataset = CSVDataset::from_file(path)?;
        let targets = dataset.targets()?;
        self.fit(dataset.features(), &targets)
    }
}

impl Default for LSSVR {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for LSSVR {
    type Target = f64;
    type Fitted = TrainedRegressor;

    fn fit(&self, x: ArrayView2<f64>, targets: &[f64]) -> Result<TrainedRegressor> {
        let scaling = self
            .scaling
            .map(|method| ScalingParams::fit(x, method))
            .transpose()?;
        let x = scaled(scaling.as_ref(), x)?;

        let mut model = BinaryModel::new(self.kernel, self.gamma)?.with_solver(self.solver);
        model.fit(x.view(), ArrayView1::from(targets))?;
        Ok(TrainedRegressor { model, scaling })
    }
}

/// Trained regressor
#[derive(Debug, Clone)]
pub struct TrainedRegressor {
    model: BinaryModel,
    scaling: Option<ScalingParams>,
}

impl TrainedRegressor {
    /// Reassemble a regressor from a fitted model and optional scaling
    pub fn from_parts(model: BinaryModel, scaling: Option<ScalingParams>) -> Result<Self> {
        let n_features = model.n_features().ok_or(LSSVMError::NotFitted)?;
        if let Some(params) = &scaling {
            if params.n_features() != n_features {
                return Err(LSSVMError::DimensionMismatch {
                    expected: n_features,
                    actual: params.n_features(),
                });
            }
        }
        Ok(Self { model, scaling })
    }

    /// Error metrics against known targets
    pub fn evaluate(&self, x: ArrayView2<f64>, targets: &[f64]) -> Result<RegressionMetrics> {
        let predicted = self.predict(x)?;
        RegressionMetrics::from_predictions(targets, &predicted)
    }

    /// Evaluate against the numeric last column of a CSV file
    pub fn evaluate_csv<P: AsRef<Path>>(&self, path: P) -> Result<RegressionMetrics> {
        let dataset = CSVDataset::from_file(path)?;
        let targets = dataset.targets()?;
        self.evaluate(dataset.features(), &targets)
    }

    pub fn scaling(&self) -> Option<&ScalingParams> {
        self.scaling.as_ref()
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_classes: 0,
            n_models: 1,
            n_support_vectors: self.model.n_support_vectors(),
            n_features: self.n_features(),
            kernel: *self.model.kernel(),
            gamma: self.model.gamma(),
            strategy: None,
        }
    }

    pub fn inner(&self) -> &BinaryModel {
        &self.model
    }
}

impl Predictor for TrainedRegressor {
    type Output = f64;

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<f64>> {
        let x = scaled(self.scaling.as_ref(), x)?;
        Ok(self.model.decision_function(x.view())?.to_vec())
    }

    fn n_features(&self) -> usize {
        self.model.n_features().unwrap_or(0)
    }
}

/// Classification metrics: accuracy plus a confusion matrix
///
/// Rows of the confusion matrix are true classes, columns predicted classes,
/// both in the model's class order. Samples whose true label was never seen
/// in training count as errors but have no confusion row.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics<L> {
    pub classes: Vec<L>,
    pub confusion: Array2<usize>,
    pub n_samples: usize,
    pub n_correct: usize,
}

impl<L: Clone + Ord> EvaluationMetrics<L> {
    pub fn from_predictions(classes: &[L], actual: &[L], predicted: &[L]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(LSSVMError::DimensionMismatch {
                expected: predicted.len(),
                actual: actual.len(),
            });
        }

        let mut confusion = Array2::zeros((classes.len(), classes.len()));
        let mut n_correct = 0;
        for (truth, guess) in actual.iter().zip(predicted) {
            if truth == guess {
                n_correct += 1;
            }
            if let (Ok(i), Ok(j)) = (classes.binary_search(truth), classes.binary_search(guess)) {
                confusion[[i, j]] += 1;
            }
        }

        Ok(Self {
            classes: classes.to_vec(),
            confusion,
            n_samples: actual.len(),
            n_correct,
        })
    }

    /// Fraction of correctly classified samples
    pub fn accuracy(&self) -> f64 {
        if self.n_samples == 0 {
            0.0
        } else {
            self.n_correct as f64 / self.n_samples as f64
        }
    }

    /// Precision of class index `class`: TP / (TP + FP)
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.confusion.column(class).sum();
        if predicted == 0 {
            0.0
        } else {
            self.confusion[[class, class]] as f64 / predicted as f64
        }
    }

    /// Recall of class index `class`: TP / (TP + FN)
    pub fn recall(&self, class: usize) -> f64 {
        let actual = self.confusion.row(class).sum();
        if actual == 0 {
            0.0
        } else {
            self.confusion[[class, class]] as f64 / actual as f64
        }
    }

    pub fn f1_score(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Unweighted mean F1 over all classes
    pub fn macro_f1(&self) -> f64 {
        let n = self.classes.len();
        if n == 0 {
            return 0.0;
        }
        (0..n).map(|c| self.f1_score(c)).sum::<f64>() / n as f64
    }
}

/// Regression error metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub n_samples: usize,
    /// Mean squared error
    pub mse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn from_predictions(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(LSSVMError::DimensionMismatch {
                expected: predicted.len(),
                actual: actual.len(),
            });
        }
        if actual.is_empty() {
            return Err(LSSVMError::InvalidInput(
                "Cannot evaluate on an empty set".to_string(),
            ));
        }

        let actual = Array1::from(actual.to_vec());
        let errors = &actual - &Array1::from(predicted.to_vec());
        let n = actual.len() as f64;

        let ss_res = errors.mapv(|e| e * e).sum();
        let mean = actual.sum() / n;
        let ss_tot = actual.mapv(|v| (v - mean).powi(2)).sum();
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            n_samples: actual.len(),
            mse: ss_res / n,
            mae: errors.mapv(f64::abs).sum() / n,
            r2,
        })
    }

    /// Root mean squared error
    pub fn rmse(&self) -> f64 {
        self.mse.sqrt()
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Number of classes (0 for a regressor)
    pub n_classes: usize,
    pub n_models: usize,
    /// Training samples retained across all sub-models
    pub n_support_vectors: usize,
    pub n_features: usize,
    pub kernel: KernelSpec,
    pub gamma: f64,
    pub strategy: Option<Strategy>,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use ndarray::Axis;

    /// Deterministic train/test partition of a dataset
    #[derive(Debug, Clone)]
    pub struct Split<T> {
        pub x_train: Array2<f64>,
        pub y_train: Vec<T>,
        pub x_test: Array2<f64>,
        pub y_test: Vec<T>,
    }

    /// Split a dataset with test samples evenly interleaved (no shuffling)
    ///
    /// Interleaving keeps every class represented on both sides when the
    /// input is sorted by label.
    pub fn holdout_split<T: Clone>(
        x: ArrayView2<f64>,
        targets: &[T],
        train_ratio: f64,
    ) -> Result<Split<T>> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(LSSVMError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got: {train_ratio}"
            )));
        }
        if targets.len() != x.nrows() {
            return Err(LSSVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: targets.len(),
            });
        }

        let test_ratio = 1.0 - train_ratio;
        let is_test = |i: &usize| {
            ((*i + 1) as f64 * test_ratio).floor() > (*i as f64 * test_ratio).floor()
        };
        let (test_rows, train_rows): (Vec<usize>, Vec<usize>) =
            (0..x.nrows()).partition(is_test);

        if train_rows.is_empty() || test_rows.is_empty() {
            return Err(LSSVMError::InvalidInput(format!(
                "{} samples are too few for a train ratio of {train_ratio}",
                x.nrows()
            )));
        }

        Ok(Split {
            x_train: x.select(Axis(0), &train_rows),
            y_train: train_rows.iter().map(|&i| targets[i].clone()).collect(),
            x_test: x.select(Axis(0), &test_rows),
            y_test: test_rows.iter().map(|&i| targets[i].clone()).collect(),
        })
    }

    /// Train a classifier on CSV data with default parameters
    pub fn train_csv<P: AsRef<Path>>(path: P) -> Result<TrainedClassifier<String>> {
        LSSVC::<String>::new().train_from_csv(path)
    }

    /// Quick evaluation: train on training file, test on test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<f64> {
        let model = train_csv(train_path)?;
        Ok(model.evaluate_csv(test_path)?.accuracy())
    }

    /// Holdout accuracy of a classifier configuration
    pub fn holdout_accuracy<L>(
        classifier: &LSSVC<L>,
        x: ArrayView2<f64>,
        labels: &[L],
        train_ratio: f64,
    ) -> Result<f64>
    where
        L: Clone + Ord + Send + Sync,
    {
        let split = holdout_split(x, labels, train_ratio)?;
        let model = classifier.fit(split.x_train.view(), &split.y_train)?;
        Ok(model.evaluate(split.x_test.view(), &split.y_test)?.accuracy())
    }

    /// Holdout mean squared error of a regressor configuration
    pub fn holdout_mse(
        regressor: &LSSVR,
        x: ArrayView2<f64>,
        targets: &[f64],
        train_ratio: f64,
    ) -> Result<f64> {
        let split = holdout_split(x, targets, train_ratio)?;
        let model = regressor.fit(split.x_train.view(), &split.y_train)?;
        Ok(model.evaluate(split.x_test.view(), &split.y_test)?.mse)
    }
}

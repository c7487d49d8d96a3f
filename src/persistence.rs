//! Model serialization and persistence
//!
//! A fitted model is stored as a flat, versioned JSON record: the kernel, γ
//! and solver settings, then one record per binary sub-model holding its
//! dichotomy, retained training samples and dual solution. The Gram matrix is
//! never stored; it is recomputed on the next fit.

use crate::api::{TrainedClassifier, TrainedRegressor};
use crate::core::{DualSolution, LSSVMError, Result, SolverConfig};
use crate::kernel::KernelSpec;
use crate::model::{BinaryModel, Dichotomy, MulticlassModel, Strategy};
use crate::solver::validate_gamma;
use crate::utils::scaling::ScalingParams;
use chrono::{DateTime, Utc};
use log::debug;
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Version written by this library; older or newer records are rejected
pub const FORMAT_VERSION: u32 = 1;

/// Learning task a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTask {
    Classification,
    Regression,
}

/// One fitted binary sub-model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubModelRecord {
    /// `None` for the single model of a regressor
    pub dichotomy: Option<Dichotomy>,
    pub training_features: Array2<f64>,
    pub dual: DualSolution,
}

/// Serializable representation of a trained LS-SVM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel<L = String> {
    pub format_version: u32,
    pub task: ModelTask,
    pub kernel: KernelSpec,
    pub gamma: f64,
    pub solver: SolverConfig,
    /// Multiclass decomposition; `None` for regression
    pub strategy: Option<Strategy>,
    /// Classes in canonical order; empty for regression
    pub classes: Vec<L>,
    pub sub_models: Vec<SubModelRecord>,
    pub scaling: Option<ScalingParams>,
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    pub n_features: usize,
    /// Training samples retained across all sub-models
    pub n_support_vectors: usize,
    pub created_at: DateTime<Utc>,
}

impl ModelMetadata {
    fn new(n_features: usize, n_support_vectors: usize) -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            n_features,
            n_support_vectors,
            created_at: Utc::now(),
        }
    }
}

impl SubModelRecord {
    fn from_model(model: &BinaryModel, dichotomy: Option<Dichotomy>) -> Result<Self> {
        let training_features = model
            .training_features()
            .ok_or(LSSVMError::NotFitted)?
            .to_owned();
        let dual = model.dual().ok_or(LSSVMError::NotFitted)?.clone();
        Ok(Self {
            dichotomy,
            training_features,
            dual,
        })
    }

    fn to_model(
        &self,
        kernel: KernelSpec,
        gamma: f64,
        solver: SolverConfig,
    ) -> Result<BinaryModel> {
        BinaryModel::from_parts(
            kernel,
            gamma,
            solver,
            self.training_features.clone(),
            self.dual.clone(),
        )
    }
}

impl<L: Clone> SerializableModel<L> {
    /// Create a serializable record from a trained classifier
    pub fn from_classifier(model: &TrainedClassifier<L>) -> Result<Self>
    where
        L: Ord + Send + Sync,
    {
        let inner = model.inner();
        let first = &inner.models()[0];
        let sub_models = inner
            .models()
            .iter()
            .zip(inner.dichotomies())
            .map(|(m, &d)| SubModelRecord::from_model(m, Some(d)))
            .collect::<Result<Vec<_>>>()?;
        let info = model.info();

        Ok(Self {
            format_version: FORMAT_VERSION,
            task: ModelTask::Classification,
            kernel: *first.kernel(),
            gamma: first.gamma(),
            solver: *first.solver_config(),
            strategy: Some(inner.strategy()),
            classes: inner.classes().to_vec(),
            sub_models,
            scaling: model.scaling().cloned(),
            metadata: ModelMetadata::new(info.n_features, info.n_support_vectors),
        })
    }

    /// Create a serializable record from a trained regressor
    pub fn from_regressor(model: &TrainedRegressor) -> Result<Self> {
        let inner = model.inner();
        let info = model.info();

        Ok(Self {
            format_version: FORMAT_VERSION,
            task: ModelTask::Regression,
            kernel: *inner.kernel(),
            gamma: inner.gamma(),
            solver: *inner.solver_config(),
            strategy: None,
            classes: Vec::new(),
            sub_models: vec![SubModelRecord::from_model(inner, None)?],
            scaling: model.scaling().cloned(),
            metadata: ModelMetadata::new(info.n_features, info.n_support_vectors),
        })
    }

    /// Check the version and hyperparameters of a loaded record
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(LSSVMError::SerializationError(format!(
                "Unsupported model format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        self.kernel.validate()?;
        validate_gamma(self.gamma)?;
        self.solver.validate()?;
        if self.sub_models.is_empty() {
            return Err(LSSVMError::SerializationError(
                "Model record contains no sub-models".to_string(),
            ));
        }
        Ok(())
    }

    fn sub_model_parts(&self) -> Result<Vec<BinaryModel>> {
        self.sub_models
            .iter()
            .map(|record| record.to_model(self.kernel, self.gamma, self.solver))
            .collect()
    }

    /// Rebuild a trained classifier
    pub fn to_classifier(&self) -> Result<TrainedClassifier<L>>
    where
        L: Ord + Send + Sync,
    {
        self.validate()?;
        let strategy = match (self.task, self.strategy) {
            (ModelTask::Classification, Some(strategy)) => strategy,
            _ => {
                return Err(LSSVMError::InvalidInput(
                    "Model record does not hold a classifier".to_string(),
                ))
            }
        };

        let dichotomies = self
            .sub_models
            .iter()
            .map(|record| {
                record.dichotomy.ok_or_else(|| {
                    LSSVMError::SerializationError("Sub-model without a dichotomy".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let model = MulticlassModel::from_parts(
            self.classes.clone(),
            strategy,
            dichotomies,
            self.sub_model_parts()?,
        )?;
        TrainedClassifier::from_parts(model, self.scaling.clone())
    }

    /// Rebuild a trained regressor
    pub fn to_regressor(&self) -> Result<TrainedRegressor> {
        self.validate()?;
        if self.task != ModelTask::Regression || self.sub_models.len() != 1 {
            return Err(LSSVMError::InvalidInput(
                "Model record does not hold a regressor".to_string(),
            ));
        }
        let mut models = self.sub_model_parts()?;
        TrainedRegressor::from_parts(models.remove(0), self.scaling.clone())
    }
}

impl<L: Serialize> SerializableModel<L> {
    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| LSSVMError::SerializationError(e.to_string()))?;
        Ok(())
    }
}

impl<L: Clone + DeserializeOwned> SerializableModel<L> {
    /// Load and validate a model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| LSSVMError::SerializationError(e.to_string()))?;
        model.validate()?;
        debug!(
            "Loaded {:?} model: {} sub-models, kernel {}",
            model.task,
            model.sub_models.len(),
            model.kernel
        );
        Ok(model)
    }
}

impl<L: std::fmt::Display> SerializableModel<L> {
    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== LS-SVM Model Summary ===");
        println!("Task: {:?}", self.task);
        println!("Kernel: {}", self.kernel);
        println!("Gamma: {}", self.gamma);
        if let Some(strategy) = self.strategy {
            let classes: Vec<String> = self.classes.iter().map(|c| c.to_string()).collect();
            println!("Classes ({}): {}", classes.len(), classes.join(", "));
            println!("Strategy: {}", strategy.name());
        }
        println!("Sub-models: {}", self.sub_models.len());
        println!("Features: {}", self.metadata.n_features);
        println!("Support Vectors: {}", self.metadata.n_support_vectors);
        if let Some(scaling) = &self.scaling {
            println!("Feature Scaling: {:?}", scaling.method);
        }
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at.to_rfc3339());
        println!("Solver:");
        println!("  Tolerance: {}", self.solver.tolerance);
        println!("  Max Iterations: {}", self.solver.max_iterations);
    }
}

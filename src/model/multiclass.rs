//! Multiclass LS-SVM coordinator
//!
//! The k distinct labels are sorted into a canonical class order. The chosen
//! [`Strategy`] splits the problem into binary sub-problems (one per class pair
//! for one-vs-one), each sub-model is trained independently on its own subset
//! of the data, and predictions are folded back with a deterministic
//! lowest-index tie-break.

use crate::core::{LSSVMError, Result, SolverConfig};
use crate::kernel::KernelSpec;
use crate::model::decomposition::{argmax_lowest_index, Dichotomy, Strategy};
use crate::model::BinaryModel;
use crate::solver::validate_gamma;
use crate::utils::validation::{check_features, check_query};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Fitted multiclass model: ordered classes plus one binary model per dichotomy
#[derive(Debug, Clone)]
pub struct MulticlassModel<L> {
    classes: Vec<L>,
    strategy: Strategy,
    dichotomies: Vec<Dichotomy>,
    models: Vec<BinaryModel>,
}

impl<L> MulticlassModel<L>
where
    L: Clone + Ord + Send + Sync,
{
    /// Train one binary model per dichotomy of the label set
    ///
    /// Sub-models are trained in parallel; each only reads the shared
    /// feature matrix.
    ///
    /// # Errors
    /// - `InvalidParameter` for invalid gamma, kernel or solver settings
    /// - `InvalidInput` for an empty dataset or fewer than two distinct classes
    /// - `DimensionMismatch` if the label count differs from the sample count
    pub fn fit(
        x: ArrayView2<f64>,
        labels: &[L],
        kernel: KernelSpec,
        gamma: f64,
        solver: SolverConfig,
        strategy: Strategy,
    ) -> Result<Self> {
        kernel.validate()?;
        validate_gamma(gamma)?;
        solver.validate()?;
        check_features(x)?;
        if labels.len() != x.nrows() {
            return Err(LSSVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: labels.len(),
            });
        }

        let classes: Vec<L> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(LSSVMError::InvalidInput(format!(
                "Classification needs at least 2 distinct classes, found {}",
                classes.len()
            )));
        }

        let class_indices: Vec<usize> = labels
            .iter()
            .map(|label| class_index(&classes, label))
            .collect::<Result<_>>()?;

        let n_classes = classes.len();
        let dichotomies = strategy.decomposition(n_classes).dichotomies(n_classes);
        debug!(
            "Training {} {} sub-models for {} classes",
            dichotomies.len(),
            strategy.name(),
            n_classes
        );

        let models = dichotomies
            .par_iter()
            .map(|dichotomy| -> Result<BinaryModel> {
                let (rows, targets): (Vec<usize>, Vec<f64>) = class_indices
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &class)| dichotomy.target(class).map(|t| (i, t)))
                    .unzip();

                let subset = x.select(Axis(0), &rows);
                let targets = Array1::from(targets);

                let mut model = BinaryModel::new(kernel, gamma)?.with_solver(solver);
                model.fit(subset.view(), targets.view())?;
                Ok(model)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classes,
            strategy,
            dichotomies,
            models,
        })
    }

    /// Rebuild a fitted model from persisted parts
    pub fn from_parts(
        classes: Vec<L>,
        strategy: Strategy,
        dichotomies: Vec<Dichotomy>,
        models: Vec<BinaryModel>,
    ) -> Result<Self> {
        if classes.len() < 2 {
            return Err(LSSVMError::InvalidInput(
                "A classifier needs at least 2 classes".to_string(),
            ));
        }
        if classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LSSVMError::InvalidInput(
                "Classes must be distinct and sorted".to_string(),
            ));
        }
        if dichotomies.len() != models.len() {
            return Err(LSSVMError::DimensionMismatch {
                expected: dichotomies.len(),
                actual: models.len(),
            });
        }
        let expected = strategy
            .decomposition(classes.len())
            .dichotomies(classes.len());
        if dichotomies != expected {
            return Err(LSSVMError::InvalidInput(format!(
                "Sub-models do not match the {} layout for {} classes",
                strategy.name(),
                classes.len()
            )));
        }
        if models.iter().any(|m| !m.is_fitted()) {
            return Err(LSSVMError::NotFitted);
        }
        let n_features = models[0].n_features();
        if models.iter().any(|m| m.n_features() != n_features) {
            return Err(LSSVMError::InvalidInput(
                "Sub-models disagree on the feature dimension".to_string(),
            ));
        }

        Ok(Self {
            classes,
            strategy,
            dichotomies,
            models,
        })
    }

    /// Per-class scores for every query row (vote counts for one-vs-one)
    ///
    /// The result has shape (query rows, classes).
    pub fn class_scores(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_query(x, self.n_features())?;

        let decisions = self
            .models
            .iter()
            .map(|model| model.decision_function(x))
            .collect::<Result<Vec<_>>>()?;

        let n_classes = self.classes.len();
        let decomposition = self.strategy.decomposition(n_classes);
        let mut scores = Array2::<f64>::zeros((x.nrows(), n_classes));
        let mut row_decisions = vec![0.0; self.models.len()];

        for (q, mut row) in scores.axis_iter_mut(Axis(0)).enumerate() {
            for (m, decision) in decisions.iter().enumerate() {
                row_decisions[m] = decision[q];
            }
            let class_scores =
                decomposition.class_scores(n_classes, &self.dichotomies, &row_decisions);
            row.assign(&Array1::from(class_scores));
        }

        Ok(scores)
    }

    /// Predicted class index (into [`MulticlassModel::classes`]) per query row
    pub fn predict_indices(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let scores = self.class_scores(x)?;
        Ok(scores
            .axis_iter(Axis(0))
            .map(|row| argmax_lowest_index(&row.to_vec()))
            .collect())
    }

    /// Predicted label per query row
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>> {
        Ok(self
            .predict_indices(x)?
            .into_iter()
            .map(|i| self.classes[i].clone())
            .collect())
    }

    /// Distinct classes in canonical (ascending) order
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn dichotomies(&self) -> &[Dichotomy] {
        &self.dichotomies
    }

    pub fn models(&self) -> &[BinaryModel] {
        &self.models
    }

    /// Number of binary sub-models
    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn n_features(&self) -> usize {
        self.models
            .first()
            .and_then(BinaryModel::n_features)
            .unwrap_or(0)
    }
}

fn class_index<L: Ord>(classes: &[L], label: &L) -> Result<usize> {
    classes
        .binary_search(label)
        .map_err(|_| LSSVMError::InvalidInput("Label outside of the class set".to_string()))
}

//! Multiclass decomposition strategies
//!
//! A decomposition splits a k-class problem into binary sub-problems
//! ([`Dichotomy`]) and folds the sub-models' decision values back into one
//! score per class. The predicted class is the highest score, ties going to
//! the smallest class index.

use serde::{Deserialize, Serialize};

/// One binary sub-problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dichotomy {
    /// Class index mapped to +1
    pub positive: usize,
    /// Class index mapped to -1; `None` means every other class
    pub negative: Option<usize>,
}

impl Dichotomy {
    pub fn pair(positive: usize, negative: usize) -> Self {
        Self {
            positive,
            negative: Some(negative),
        }
    }

    pub fn versus_rest(positive: usize) -> Self {
        Self {
            positive,
            negative: None,
        }
    }

    /// Binary target of a sample of class `class`, or `None` when the sample
    /// does not take part in this sub-problem
    pub fn target(&self, class: usize) -> Option<f64> {
        if class == self.positive {
            Some(1.0)
        } else {
            match self.negative {
                Some(negative) if negative == class => Some(-1.0),
                Some(_) => None,
                None => Some(-1.0),
            }
        }
    }
}

/// Strategy seam for splitting a multiclass problem into binary ones
pub trait Decomposition: Send + Sync {
    /// Binary sub-problems for `n_classes` classes, in a fixed order
    fn dichotomies(&self, n_classes: usize) -> Vec<Dichotomy>;

    /// Per-class scores for a single query from the sub-models' decision values
    /// (`decisions[m]` belongs to `dichotomies[m]`)
    fn class_scores(
        &self,
        n_classes: usize,
        dichotomies: &[Dichotomy],
        decisions: &[f64],
    ) -> Vec<f64>;
}

/// Pairwise decomposition: C(k, 2) models combined by majority vote
#[derive(Debug, Clone, Copy, Default)]
pub struct OneVsOne;

impl Decomposition for OneVsOne {
    fn dichotomies(&self, n_classes: usize) -> Vec<Dichotomy> {
        (0..n_classes)
            .flat_map(|i| ((i + 1)..n_classes).map(move |j| Dichotomy::pair(i, j)))
            .collect()
    }

    fn class_scores(
        &self,
        n_classes: usize,
        dichotomies: &[Dichotomy],
        decisions: &[f64],
    ) -> Vec<f64> {
        let mut votes = vec![0.0; n_classes];
        for (dichotomy, &decision) in dichotomies.iter().zip(decisions) {
            let winner = match dichotomy.negative {
                Some(negative) if decision < 0.0 => negative,
                _ => dichotomy.positive,
            };
            votes[winner] += 1.0;
        }
        votes
    }
}

/// One model per class against all others; the largest decision value wins
#[derive(Debug, Clone, Copy, Default)]
pub struct OneVsRest;

impl Decomposition for OneVsRest {
    fn dichotomies(&self, n_classes: usize) -> Vec<Dichotomy> {
        (0..n_classes).map(Dichotomy::versus_rest).collect()
    }

    fn class_scores(
        &self,
        n_classes: usize,
        dichotomies: &[Dichotomy],
        decisions: &[f64],
    ) -> Vec<f64> {
        let mut scores = vec![f64::NEG_INFINITY; n_classes];
        for (dichotomy, &decision) in dichotomies.iter().zip(decisions) {
            scores[dichotomy.positive] = decision;
        }
        scores
    }
}

/// Serialisable choice of decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    OneVsOne,
    OneVsRest,
}

impl Strategy {
    /// Decomposition used for `n_classes` classes.
    ///
    /// Two classes always use a single pairwise model, whatever the strategy.
    pub fn decomposition(&self, n_classes: usize) -> &'static dyn Decomposition {
        if n_classes <= 2 {
            return &OneVsOne;
        }
        match self {
            Strategy::OneVsOne => &OneVsOne,
            Strategy::OneVsRest => &OneVsRest,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::OneVsOne => "one-vs-one",
            Strategy::OneVsRest => "one-vs-rest",
        }
    }
}

/// Index of the highest score; ties resolve to the smallest index
pub fn argmax_lowest_index(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

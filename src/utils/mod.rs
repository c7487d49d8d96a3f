//! Utility functions for LS-SVM operations

/// Feature scaling utilities
pub mod scaling {
    use crate::core::{LSSVMError, Result};
    use ndarray::{Array2, ArrayView2, Axis};
    use serde::{Deserialize, Serialize};

    /// Feature scaling methods
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub enum ScalingMethod {
        /// Min-Max scaling to [min_val, max_val] range
        MinMax { min_val: f64, max_val: f64 },
        /// Standard (Z-score) normalization: (x - mean) / std
        StandardScore,
        /// Unit scaling: x / max(|x|)
        UnitScale,
    }

    impl Default for ScalingMethod {
        fn default() -> Self {
            Self::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            }
        }
    }

    /// Statistics for a single feature column
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct FeatureStats {
        pub min: f64,
        pub max: f64,
        pub mean: f64,
        pub std: f64,
    }

    /// Feature scaling parameters learned from training data
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ScalingParams {
        pub method: ScalingMethod,
        pub feature_stats: Vec<FeatureStats>,
    }

    impl ScalingParams {
        /// Compute per-column scaling statistics from training data
        pub fn fit(x: ArrayView2<f64>, method: ScalingMethod) -> Result<Self> {
            let n_samples = x.nrows();
            if n_samples == 0 || x.ncols() == 0 {
                return Err(LSSVMError::InvalidInput(
                    "Cannot fit scaling on an empty dataset".to_string(),
                ));
            }

            let feature_stats = x
                .axis_iter(Axis(1))
                .map(|column| {
                    let min = column.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                    let max = column.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                    let mean = column.sum() / n_samples as f64;

                    let variance = if n_samples > 1 {
                        column.iter().map(|&v| (v - mean).powi(2)).sum::<f64>()
                            / (n_samples - 1) as f64
                    } else {
                        0.0
                    };

                    FeatureStats {
                        min,
                        max,
                        mean,
                        std: variance.sqrt(),
                    }
                })
                .collect();

            Ok(Self {
                method,
                feature_stats,
            })
        }

        /// Number of feature columns the parameters were fitted on
        pub fn n_features(&self) -> usize {
            self.feature_stats.len()
        }

        /// Transform a feature matrix using fitted parameters
        pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
            if x.ncols() != self.n_features() {
                return Err(LSSVMError::DimensionMismatch {
                    expected: self.n_features(),
                    actual: x.ncols(),
                });
            }

            let mut scaled = x.to_owned();
            for (mut column, stats) in scaled.axis_iter_mut(Axis(1)).zip(&self.feature_stats) {
                column.mapv_inplace(|value| self.scale_value(value, stats));
            }
            Ok(scaled)
        }

        /// Scale a single value using the appropriate method
        fn scale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
            match self.method {
                ScalingMethod::MinMax { min_val, max_val } => {
                    if (stats.max - stats.min).abs() < 1e-12 {
                        // Constant feature
                        (min_val + max_val) / 2.0
                    } else {
                        let normalized = (value - stats.min) / (stats.max - stats.min);
                        min_val + normalized * (max_val - min_val)
                    }
                }
                ScalingMethod::StandardScore => {
                    if stats.std < 1e-12 {
                        0.0
                    } else {
                        (value - stats.mean) / stats.std
                    }
                }
                ScalingMethod::UnitScale => {
                    let max_abs = stats.max.abs().max(stats.min.abs());
                    if max_abs < 1e-12 {
                        0.0
                    } else {
                        value / max_abs
                    }
                }
            }
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(
        x: ArrayView2<f64>,
        method: ScalingMethod,
    ) -> Result<(Array2<f64>, ScalingParams)> {
        let params = ScalingParams::fit(x, method)?;
        let transformed = params.transform(x)?;
        Ok((transformed, params))
    }
}

/// Input validation shared by the fitting entry points
pub mod validation {
    use crate::core::{LSSVMError, Result};
    use ndarray::{ArrayView1, ArrayView2};

    /// Check that a feature matrix is non-empty and contains only finite values
    pub fn check_features(x: ArrayView2<f64>) -> Result<()> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(LSSVMError::InvalidInput(
                "Dataset contains no samples".to_string(),
            ));
        }
        if n_features == 0 {
            return Err(LSSVMError::InvalidInput(
                "Samples must have at least one feature".to_string(),
            ));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(LSSVMError::InvalidInput(
                "Feature matrix contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that there is exactly one finite target per sample
    pub fn check_targets(y: ArrayView1<f64>, n_samples: usize) -> Result<()> {
        if y.len() != n_samples {
            return Err(LSSVMError::DimensionMismatch {
                expected: n_samples,
                actual: y.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(LSSVMError::InvalidInput(
                "Targets contain NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that a query matrix matches the fitted feature dimension
    pub fn check_query(x: ArrayView2<f64>, n_features: usize) -> Result<()> {
        if x.ncols() != n_features {
            return Err(LSSVMError::DimensionMismatch {
                expected: n_features,
                actual: x.ncols(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(LSSVMError::InvalidInput(
                "Query contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }
}

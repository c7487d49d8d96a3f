//! Hyperparameter declarations
//!
//! Each tunable parameter of the LS-SVM learners is described by a
//! [`HyperParameter`]: its name, whether it is continuous or integer, the
//! range of valid values, the scale on which it is naturally searched and its
//! default. The declarations carry no search logic of their own; a driver
//! (such as the `tune` command of the CLI) enumerates candidates with
//! [`HyperParameter::grid`] and checks values with [`ParamRange::contains`].

use crate::core::{LSSVMError, Result};
use serde::{Deserialize, Serialize};

/// Value domain of a hyperparameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Continuous,
    Integer,
}

/// Spacing used when enumerating candidate values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Linear,
    Log,
}

/// One end of a valid range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
    Unbounded,
}

/// Valid values of a hyperparameter plus the finite window searched by default
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub lower: Bound,
    pub upper: Bound,
    /// Finite `(low, high)` window enumerated by [`ParamRange::grid`]
    pub search: (f64, f64),
}

impl ParamRange {
    /// Strictly positive reals
    pub fn positive(search_low: f64, search_high: f64) -> Self {
        Self {
            lower: Bound::Exclusive(0.0),
            upper: Bound::Unbounded,
            search: (search_low, search_high),
        }
    }

    /// Reals (or integers) greater than or equal to `min`
    pub fn at_least(min: f64, search_high: f64) -> Self {
        Self {
            lower: Bound::Inclusive(min),
            upper: Bound::Unbounded,
            search: (min, search_high),
        }
    }

    /// Any finite real
    pub fn real(search_low: f64, search_high: f64) -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            search: (search_low, search_high),
        }
    }

    /// Whether `value` is finite and inside the valid range
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above = match self.lower {
            Bound::Inclusive(min) => value >= min,
            Bound::Exclusive(min) => value > min,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Inclusive(max) => value <= max,
            Bound::Exclusive(max) => value < max,
            Bound::Unbounded => true,
        };
        above && below
    }

    /// `n` candidate values spread over the search window, in ascending order
    ///
    /// Logarithmic spacing requires a strictly positive window.
    pub fn grid(&self, n: usize, scale: Scale) -> Result<Vec<f64>> {
        let (low, high) = self.search;
        if n == 0 {
            return Err(LSSVMError::InvalidParameter(
                "Grid size must be at least 1".to_string(),
            ));
        }
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(LSSVMError::InvalidParameter(format!(
                "Invalid search window [{low}, {high}]"
            )));
        }
        if scale == Scale::Log && low <= 0.0 {
            return Err(LSSVMError::InvalidParameter(format!(
                "Logarithmic grid needs a positive window, got [{low}, {high}]"
            )));
        }
        if n == 1 {
            return Ok(vec![low]);
        }

        Ok((0..n)
            .map(|i| {
                // Endpoints are exact; interior points carry the rounding of ln/exp
                if i == 0 {
                    return low;
                }
                if i == n - 1 {
                    return high;
                }
                let t = i as f64 / (n - 1) as f64;
                match scale {
                    Scale::Linear => low + t * (high - low),
                    Scale::Log => (low.ln() + t * (high.ln() - low.ln())).exp(),
                }
            })
            .collect())
    }
}

/// Declaration of one tunable parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperParameter {
    pub name: &'static str,
    pub kind: ParamKind,
    pub range: ParamRange,
    pub scale: Scale,
    pub default: f64,
}

impl HyperParameter {
    /// Candidate values on this parameter's own scale
    ///
    /// Integer parameters are rounded and deduplicated, so fewer than `n`
    /// values may come back.
    pub fn grid(&self, n: usize) -> Result<Vec<f64>> {
        let mut values = self.range.grid(n, self.scale)?;
        if self.kind == ParamKind::Integer {
            values.iter_mut().for_each(|v| *v = v.round());
            values.dedup();
        }
        Ok(values)
    }

    /// Check a concrete value against the declaration
    pub fn validate(&self, value: f64) -> Result<()> {
        let integral = self.kind == ParamKind::Continuous || value.fract() == 0.0;
        if self.range.contains(value) && integral {
            Ok(())
        } else {
            Err(LSSVMError::InvalidParameter(format!(
                "{} = {value} is outside its valid range",
                self.name
            )))
        }
    }
}

/// Regularization constant γ
pub fn gamma() -> HyperParameter {
    HyperParameter {
        name: "gamma",
        kind: ParamKind::Continuous,
        range: ParamRange::positive(1e-3, 1e3),
        scale: Scale::Log,
        default: 1.0,
    }
}

/// RBF kernel bandwidth σ
pub fn sigma() -> HyperParameter {
    HyperParameter {
        name: "sigma",
        kind: ParamKind::Continuous,
        range: ParamRange::positive(1e-2, 1e2),
        scale: Scale::Log,
        default: 1.0,
    }
}

/// Polynomial kernel degree
pub fn degree() -> HyperParameter {
    HyperParameter {
        name: "degree",
        kind: ParamKind::Integer,
        range: ParamRange::at_least(1.0, 5.0),
        scale: Scale::Linear,
        default: 3.0,
    }
}

/// Polynomial kernel offset c in (a·b + c)^d
pub fn coef0() -> HyperParameter {
    HyperParameter {
        name: "coef0",
        kind: ParamKind::Continuous,
        range: ParamRange::at_least(0.0, 2.0),
        scale: Scale::Linear,
        default: 1.0,
    }
}

/// Sigmoid kernel slope α in tanh(α·a·b + c)
pub fn sigmoid_alpha() -> HyperParameter {
    HyperParameter {
        name: "sigmoid_alpha",
        kind: ParamKind::Continuous,
        range: ParamRange::positive(1e-3, 1e1),
        scale: Scale::Log,
        default: 0.01,
    }
}

/// Sigmoid kernel offset; unlike the polynomial offset it may be negative
pub fn sigmoid_coef0() -> HyperParameter {
    HyperParameter {
        name: "sigmoid_coef0",
        kind: ParamKind::Continuous,
        range: ParamRange::real(-2.0, 2.0),
        scale: Scale::Linear,
        default: 0.0,
    }
}

/// Every parameter an LS-SVM learner exposes, in a fixed order
pub fn all() -> Vec<HyperParameter> {
    vec![
        gamma(),
        sigma(),
        degree(),
        coef0(),
        sigmoid_alpha(),
        sigmoid_coef0(),
    ]
}

//! Leave-one-out cross-validation of interpolation methods.
//!
//! ## Purpose
//!
//! Scores a method by refitting it without each sample in turn and comparing
//! the estimate at the held-out location to the held-out value.
//!
//! ## Design notes
//!
//! * **Callback**: The fit-and-predict step is supplied by the caller, so this
//!   layer does not depend on method dispatch.
//! * **Fail whole**: A failing fold fails the cross-validation; partial scores
//!   would not be comparable across methods.
//!
//! ## Key concepts
//!
//! * **Residual**: `estimate − held_out`, in input order.
//! * **Scores**: RMSE, MAE and bias (mean residual).
//!
//! ## Non-goals
//!
//! * K-fold or spatially blocked cross-validation.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};

// Internal dependencies
use crate::math::stats;
use crate::primitives::errors::EngineError;
use crate::primitives::sample::{Coord, SampleSet};

/// Leave-one-out scores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossValidation {
    /// Root mean squared residual.
    pub rmse: f64,
    /// Mean absolute residual.
    pub mae: f64,
    /// Mean signed residual.
    pub bias: f64,
    /// Signed residuals `estimate − held_out`, in sample order.
    pub residuals: Vec<f64>,
}

impl CrossValidation {
    /// Scores of a residual vector; `None` when it is empty.
    pub fn from_residuals(residuals: Vec<f64>) -> Option<Self> {
        let bias = stats::mean(&residuals)?;
        let n = residuals.len() as f64;
        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let rmse = (residuals.iter().map(|r| r * r).sum::<f64>() / n).sqrt();
        Some(Self {
            rmse,
            mae,
            bias,
            residuals,
        })
    }
}

impl Display for CrossValidation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "rmse={:.6} mae={:.6} bias={:+.6} (n={})",
            self.rmse,
            self.mae,
            self.bias,
            self.residuals.len()
        )
    }
}

/// Run leave-one-out cross-validation.
///
/// `fit_predict(training, location)` fits on `training` and returns the
/// estimate at `location`.
pub fn leave_one_out<F>(samples: &SampleSet, fit_predict: F) -> Result<CrossValidation, EngineError>
where
    F: Fn(&SampleSet, &Coord) -> Result<f64, EngineError>,
{
    let n = samples.len();
    if n < 2 {
        return Err(EngineError::insufficient(n, 2, "leave-one-out cross-validation"));
    }

    let mut residuals = Vec::with_capacity(n);
    for i in 0..n {
        let training = samples.without(i);
        let estimate = fit_predict(&training, &samples.coord(i))?;
        if !estimate.is_finite() {
            return Err(EngineError::NumericalInstability(format!(
                "non-finite estimate when holding out sample {i}"
            )));
        }
        residuals.push(estimate - samples.values[i]);
    }

    CrossValidation::from_residuals(residuals)
        .ok_or_else(|| EngineError::insufficient(0, 2, "leave-one-out cross-validation"))
}

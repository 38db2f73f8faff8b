//! Side-by-side comparison of interpolation methods.
//!
//! ## Purpose
//!
//! Runs several methods over the same samples and grid, times each one, and
//! scores it by leave-one-out cross-validation.
//!
//! ## Design notes
//!
//! * **Isolation**: A failing method becomes a failed entry; the other
//!   methods still run. This is the only place where errors are recorded
//!   instead of returned.
//! * **Stable keys**: Entries are keyed by method tag in a `BTreeMap`.
//!   Repeated tags get a `#n` suffix (`idw`, `idw#2`, ...) in input order.
//! * **Parallel**: With the `parallel` feature, methods run on rayon workers.
//!   Keys are assigned before the runs, so the report does not depend on
//!   completion order.
//!
//! ## Non-goals
//!
//! * Timeouts or cancellation; callers bound run time themselves.

// Feature-gated imports
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::time::Duration;
use std::collections::BTreeMap;
use std::time::Instant;

// Internal dependencies
use crate::engine::executor::{interpolate, predict};
use crate::engine::registry::InterpolationMethod;
use crate::evaluation::cv::{CrossValidation, leave_one_out};
use crate::primitives::errors::EngineError;
use crate::primitives::grid::{GridResult, GridSpec};
use crate::primitives::sample::{SamplePoint, SampleSet};

// ============================================================================
// Report Types
// ============================================================================

/// Successful run of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRun {
    /// Interpolated grid.
    pub result: GridResult,
    /// Wall-clock time of the grid interpolation.
    pub elapsed: Duration,
    /// Leave-one-out scores, or why they could not be computed.
    pub cross_validation: Result<CrossValidation, EngineError>,
}

/// One method's entry in a [`ComparisonReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    /// Method and parameters that were run.
    pub method: InterpolationMethod,
    /// Run output, or the error that stopped it.
    pub outcome: Result<MethodRun, EngineError>,
}

impl ComparisonEntry {
    /// Cross-validation RMSE, if the method and its cross-validation succeeded.
    pub fn rmse(&self) -> Option<f64> {
        match &self.outcome {
            Ok(MethodRun {
                cross_validation: Ok(cv),
                ..
            }) => Some(cv.rmse),
            _ => None,
        }
    }
}

/// Comparison results keyed by method tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonReport {
    entries: BTreeMap<String, ComparisonEntry>,
}

impl ComparisonReport {
    /// Entry for `key`.
    pub fn get(&self, key: &str) -> Option<&ComparisonEntry> {
        self.entries.get(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComparisonEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no method was compared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of methods whose grid interpolation failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &EngineError)> {
        self.iter()
            .filter_map(|(k, e)| e.outcome.as_ref().err().map(|err| (k, err)))
    }

    /// Key of the method with the lowest cross-validation RMSE.
    /// Ties go to the smaller key.
    pub fn best_by_rmse(&self) -> Option<&str> {
        self.iter()
            .filter_map(|(k, e)| e.rmse().map(|r| (k, r)))
            .fold(None, |best: Option<(&str, f64)>, (k, r)| match best {
                Some((_, b)) if b <= r => best,
                _ => Some((k, r)),
            })
            .map(|(k, _)| k)
    }
}

impl Display for ComparisonReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Method comparison ({} methods):", self.len())?;
        writeln!(
            f,
            "  {:<20} {:>12} {:>12} {:>12} {:>12}",
            "method", "time_ms", "rmse", "mae", "bias"
        )?;
        for (key, entry) in self.iter() {
            match &entry.outcome {
                Ok(run) => {
                    let ms = run.elapsed.as_secs_f64() * 1e3;
                    match &run.cross_validation {
                        Ok(cv) => writeln!(
                            f,
                            "  {key:<20} {ms:>12.3} {:>12.6} {:>12.6} {:>+12.6}",
                            cv.rmse, cv.mae, cv.bias
                        )?,
                        Err(e) => writeln!(f, "  {key:<20} {ms:>12.3}   cv failed: {e}")?,
                    }
                }
                Err(e) => writeln!(f, "  {key:<20}   failed: {e}")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Run every method in `methods` over the same samples and grid.
pub fn compare(
    samples: &[SamplePoint],
    grid: &GridSpec,
    methods: &[InterpolationMethod],
) -> ComparisonReport {
    let keyed = assign_keys(methods);
    let set = SampleSet::from_points(samples);

    let run = |(key, method): &(String, InterpolationMethod)| {
        let entry = run_one(samples, &set, grid, method);
        if let Err(e) = &entry.outcome {
            log::warn!("method {key} failed: {e}");
        }
        (key.clone(), entry)
    };

    #[cfg(feature = "parallel")]
    let entries: Vec<(String, ComparisonEntry)> = keyed.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let entries: Vec<(String, ComparisonEntry)> = keyed.iter().map(run).collect();

    ComparisonReport {
        entries: entries.into_iter().collect(),
    }
}

fn run_one(
    samples: &[SamplePoint],
    set: &SampleSet,
    grid: &GridSpec,
    method: &InterpolationMethod,
) -> ComparisonEntry {
    let start = Instant::now();
    let outcome = interpolate(samples, grid, method).map(|result| {
        let elapsed = start.elapsed();
        let cross_validation = leave_one_out(set, |training, location| {
            predict(training, method, location)
        });
        if let Err(e) = &cross_validation {
            log::warn!("cross-validation of {} failed: {e}", method.id());
        } else {
            log::debug!("{} finished in {elapsed:?}", method.id());
        }
        MethodRun {
            result,
            elapsed,
            cross_validation,
        }
    });
    ComparisonEntry {
        method: *method,
        outcome,
    }
}

/// Method tags with `#n` suffixes on repeats, in input order.
fn assign_keys(methods: &[InterpolationMethod]) -> Vec<(String, InterpolationMethod)> {
    let mut seen: BTreeMap<&'static str, usize> = BTreeMap::new();
    methods
        .iter()
        .map(|m| {
            let count = seen.entry(m.id()).or_insert(0);
            *count += 1;
            let key = if *count == 1 {
                m.id().to_string()
            } else {
                format!("{}#{}", m.id(), count)
            };
            (key, *m)
        })
        .collect()
}

//! Reduction of raw measurements to one sample per location.
//!
//! ## Purpose
//!
//! Field campaigns report several measurements per location (rounds,
//! replicates). Interpolation needs exactly one value per location, so this
//! module groups raw `(location_id, value)` pairs, filters unusable values and
//! reduces each group with an [`AggregationPolicy`].
//!
//! ## Design notes
//!
//! * **Ordered output**: Groups are collected in a `BTreeMap`, so results do
//!   not depend on the arrival order of records.
//! * **Non-detects**: Negative values are below-detection sentinels; a
//!   [`NonDetectPolicy`] decides whether they are dropped or substituted.
//! * **No silent loss**: A location without a centroid, or whose values are all
//!   filtered out, is an error rather than a skipped sample.
//!
//! ## Invariants
//!
//! * Every policy returns the element itself for a single-element group.
//! * `weight_count` equals the number of values that fed the aggregate.
//!
//! ## Non-goals
//!
//! * Compound, round or date filtering (done upstream).
//! * Temporal weighting of measurements.

// External dependencies
use core::fmt::Debug;
use std::collections::BTreeMap;

// Internal dependencies
use crate::math::stats;
use crate::primitives::errors::EngineError;
use crate::primitives::sample::{Coord, SamplePoint};

// ============================================================================
// Policies
// ============================================================================

/// Reduction applied to the values of one location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregationPolicy {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Median (50th percentile).
    Median,
    /// Maximum.
    Max,
    /// Percentile `p ∈ [0, 100]` with linear interpolation between ranks.
    Percentile(f64),
}

impl AggregationPolicy {
    /// Check the policy's parameter range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Self::Percentile(p) = *self {
            if !(0.0..=100.0).contains(&p) {
                return Err(EngineError::invalid_parameter(
                    "percentile",
                    format!("{p} must be within [0, 100]"),
                ));
            }
        }
        Ok(())
    }

    /// Reduce a non-empty slice of finite values; reorders the slice.
    fn reduce(&self, values: &mut [f64]) -> Option<f64> {
        match *self {
            Self::Mean => stats::mean(values),
            Self::Median => stats::median_inplace(values),
            Self::Max => stats::max(values),
            Self::Percentile(p) => stats::percentile_inplace(values, p),
        }
    }
}

/// Treatment of negative (below-detection) measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NonDetectPolicy {
    /// Discard negative values.
    #[default]
    Drop,
    /// Replace negative values by a fixed non-negative substitute.
    Substitute(f64),
}

impl NonDetectPolicy {
    /// Check the substitute value.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Self::Substitute(v) = *self {
            if !(v.is_finite() && v >= 0.0) {
                return Err(EngineError::invalid_parameter(
                    "non_detect",
                    format!("substitute {v} must be finite and non-negative"),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    fn admit(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        match *self {
            _ if v >= 0.0 => Some(v),
            Self::Drop => None,
            Self::Substitute(s) => Some(s),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Reduce the finite values of one group with `policy`.
///
/// Non-finite values are ignored; nothing left is `InvalidMeasurement`.
pub fn aggregate_values(values: &[f64], policy: AggregationPolicy) -> Result<f64, EngineError> {
    policy.validate()?;
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(EngineError::InvalidMeasurement(
            "no finite values to aggregate".into(),
        ));
    }
    policy
        .reduce(&mut finite)
        .ok_or_else(|| EngineError::InvalidMeasurement("aggregation produced no value".into()))
}

/// Group raw `(location_id, value)` pairs and reduce each group to a
/// [`SamplePoint`] located at the location's centroid.
pub fn aggregate<'a, K, I>(
    raw: I,
    centroids: &BTreeMap<K, Coord>,
    policy: AggregationPolicy,
    non_detect: NonDetectPolicy,
) -> Result<BTreeMap<K, SamplePoint>, EngineError>
where
    K: Ord + Clone + Debug + 'a,
    I: IntoIterator<Item = (&'a K, f64)>,
{
    policy.validate()?;
    non_detect.validate()?;

    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (id, value) in raw {
        let group = match groups.get_mut(id) {
            Some(g) => g,
            None => groups.entry(id.clone()).or_default(),
        };
        if let Some(v) = non_detect.admit(value) {
            group.push(v);
        }
    }

    let mut out = BTreeMap::new();
    for (id, mut values) in groups {
        let location = *centroids.get(&id).ok_or_else(|| {
            EngineError::InvalidMeasurement(format!("location {id:?} has no centroid"))
        })?;
        if !location.is_finite() {
            return Err(EngineError::InvalidMeasurement(format!(
                "location {id:?} has a non-finite centroid ({}, {})",
                location.x, location.y
            )));
        }
        if values.is_empty() {
            return Err(EngineError::InvalidMeasurement(format!(
                "location {id:?} has no usable measurements after filtering"
            )));
        }
        let count = values.len();
        let value = policy.reduce(&mut values).ok_or_else(|| {
            EngineError::InvalidMeasurement(format!("location {id:?} could not be aggregated"))
        })?;
        out.insert(id, SamplePoint::new(location, value, count));
    }
    Ok(out)
}

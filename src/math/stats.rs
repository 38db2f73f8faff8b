//! Order statistics and summaries.
//!
//! ## Purpose
//!
//! Mean, median, maximum and percentile reductions used by the sample
//! aggregator, the color scaler and the sample summary.
//!
//! ## Design notes
//!
//! * **Algorithm**: Percentiles use Quickselect (`select_nth_unstable_by`)
//!   rather than a full sort, with linear interpolation between the two
//!   closest ranks: `h = (n - 1)·p/100`, `q = x⌊h⌋ + (h − ⌊h⌋)(x⌊h⌋₊₁ − x⌊h⌋)`.
//! * **In-place**: Selection functions reorder the slice they are given.
//!
//! ## Invariants
//!
//! * For a single-element input every reduction returns that element.
//! * `percentile(0) == min`, `percentile(100) == max`.
//!
//! ## Non-goals
//!
//! * This module does not filter non-finite values; callers do.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

// ============================================================================
// Reductions
// ============================================================================

/// Arithmetic mean; `None` for an empty slice.
pub fn mean<T: Float>(vals: &[T]) -> Option<T> {
    if vals.is_empty() {
        return None;
    }
    let sum = vals.iter().fold(T::zero(), |acc, &v| acc + v);
    let n = T::from(vals.len())?;
    Some(sum / n)
}

/// Maximum; `None` for an empty slice.
pub fn max<T: Float>(vals: &[T]) -> Option<T> {
    vals.iter().copied().reduce(T::max)
}

/// Minimum; `None` for an empty slice.
pub fn min<T: Float>(vals: &[T]) -> Option<T> {
    vals.iter().copied().reduce(T::min)
}

/// Median computed in place.
#[inline]
pub fn median_inplace<T: Float>(vals: &mut [T]) -> Option<T> {
    let hundred = T::from(100.0)?;
    percentile_inplace(vals, hundred / (T::one() + T::one()))
}

/// Percentile `p ∈ [0, 100]` computed in place with linear interpolation.
///
/// Returns `None` for an empty slice or an out-of-range `p`.
pub fn percentile_inplace<T: Float>(vals: &mut [T], p: T) -> Option<T> {
    let n = vals.len();
    let hundred = T::from(100.0)?;
    if n == 0 || !(p >= T::zero() && p <= hundred) {
        return None;
    }
    if n == 1 {
        return Some(vals[0]);
    }

    let h = T::from(n - 1)? * p / hundred;
    let lo = h.floor().to_usize()?.min(n - 1);
    let frac = h - h.floor();

    vals.select_nth_unstable_by(lo, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let lower = vals[lo];
    if lo + 1 >= n || frac == T::zero() {
        return Some(lower);
    }
    // Smallest element of the upper partition is the next order statistic.
    let upper = vals[lo + 1..]
        .iter()
        .copied()
        .fold(T::infinity(), T::min);
    Some(lower + frac * (upper - lower))
}

/// Percentile of a borrowed slice (copies once).
pub fn percentile<T: Float>(vals: &[T], p: T) -> Option<T> {
    let mut scratch = vals.to_vec();
    percentile_inplace(&mut scratch, p)
}

/// Population variance; `None` for an empty slice.
pub fn variance<T: Float>(vals: &[T]) -> Option<T> {
    let m = mean(vals)?;
    let ss = vals.iter().fold(T::zero(), |acc, &v| acc + (v - m) * (v - m));
    Some(ss / T::from(vals.len())?)
}

// ============================================================================
// Summary
// ============================================================================

/// Descriptive statistics of a value set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of finite values summarised.
    pub count: usize,
    /// Mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

/// Summarise the finite values of `vals`; `None` when there are none.
pub fn summarize(vals: &[f64]) -> Option<Summary> {
    let mut finite: Vec<f64> = vals.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(Summary {
        count: finite.len(),
        mean: mean(&finite)?,
        min: min(&finite)?,
        max: max(&finite)?,
        median: median_inplace(&mut finite)?,
        p25: percentile_inplace(&mut finite, 25.0)?,
        p75: percentile_inplace(&mut finite, 75.0)?,
        p95: percentile_inplace(&mut finite, 95.0)?,
    })
}

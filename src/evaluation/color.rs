//! Robust color scaling of interpolated surfaces.
//!
//! ## Purpose
//!
//! Maps grid values onto a color ramp whose ends sit at low/high percentiles
//! of the finite values, so a few extreme cells do not wash out the map.
//!
//! ## Design notes
//!
//! * **Percentiles first**: Bounds are percentiles of the raw values; in log
//!   mode they are then mapped through `log10`, with values at or below zero
//!   clipped to `1e-10`.
//! * **Descriptive**: A [`ColorScale`] never modifies the grid it came from.
//!
//! ## Invariants
//!
//! * `normalize` is monotone non-decreasing and lands in `[0, 1]`.
//! * Without any finite values the scale is `(0, 1)`.

// Internal dependencies
use crate::math::stats;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::GridValues;

/// Floor applied before taking logarithms.
pub const LOG_FLOOR: f64 = 1e-10;

/// Default lower percentile.
pub const DEFAULT_LOW_PCT: f64 = 5.0;

/// Default upper percentile.
pub const DEFAULT_HIGH_PCT: f64 = 95.0;

/// Color ramp bounds; in log mode `low` and `high` are `log10` values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorScale {
    /// Value mapped to the bottom of the ramp.
    pub low: f64,
    /// Value mapped to the top of the ramp.
    pub high: f64,
    /// Whether values are compared on a `log10` scale.
    pub log: bool,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            log: false,
        }
    }
}

impl ColorScale {
    /// Position of `v` on the ramp, clamped to `[0, 1]`. NaN stays NaN.
    pub fn normalize(&self, v: f64) -> f64 {
        if v.is_nan() {
            return f64::NAN;
        }
        let v = if self.log { log_clip(v) } else { v };
        let span = self.high - self.low;
        if span > 0.0 {
            ((v - self.low) / span).clamp(0.0, 1.0)
        } else if v < self.low {
            0.0
        } else if v > self.high {
            1.0
        } else {
            0.5
        }
    }
}

/// `log10(max(v, 1e-10))`.
#[inline]
pub fn log_clip(v: f64) -> f64 {
    v.max(LOG_FLOOR).log10()
}

/// Compute a color scale from the finite values of `values`.
pub fn scale(
    values: &GridValues,
    low_pct: f64,
    high_pct: f64,
    log: bool,
) -> Result<ColorScale, EngineError> {
    if !(0.0..=100.0).contains(&low_pct) || !(0.0..=100.0).contains(&high_pct) || low_pct >= high_pct
    {
        return Err(EngineError::invalid_parameter(
            "color_percentiles",
            format!("({low_pct}, {high_pct}) must satisfy 0 <= low < high <= 100"),
        ));
    }

    let mut finite: Vec<f64> = values.finite_values().collect();
    let (low, high) = match (
        stats::percentile_inplace(&mut finite, low_pct),
        stats::percentile_inplace(&mut finite, high_pct),
    ) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Ok(ColorScale { log, ..ColorScale::default() }),
    };

    Ok(if log {
        ColorScale {
            low: log_clip(low),
            high: log_clip(high),
            log,
        }
    } else {
        ColorScale { low, high, log }
    })
}

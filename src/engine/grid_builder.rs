//! Evaluation grid construction from sample locations.
//!
//! The grid is the bounding box of the locations expanded by a margin
//! fraction of its span on each side. A zero-span axis (all locations share
//! that coordinate) is padded by `margin × other span`, or by half a unit
//! when the margin is zero, so the lattice always has area.

// Internal dependencies
use crate::engine::validator::Validator;
use crate::math::geometry::distinct_count;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::{Bounds, GridSpec};
use crate::primitives::sample::Coord;

/// Default margin as a fraction of the span.
pub const DEFAULT_MARGIN: f64 = 0.05;

/// Default lattice resolution.
pub const DEFAULT_RESOLUTION: (usize, usize) = (100, 100);

/// Padding of a zero-span axis when the margin is zero.
const ZERO_SPAN_PAD: f64 = 0.5;

/// Build a lattice enclosing `locations`.
pub fn build(
    locations: &[Coord],
    resolution: (usize, usize),
    margin_fraction: f64,
) -> Result<GridSpec, EngineError> {
    Validator::validate_resolution(resolution)?;
    Validator::validate_margin(margin_fraction)?;
    if let Some(c) = locations.iter().find(|c| !c.is_finite()) {
        return Err(EngineError::InvalidMeasurement(format!(
            "location ({}, {}) is not finite",
            c.x, c.y
        )));
    }
    let distinct = distinct_count(locations);
    if distinct < 2 {
        return Err(EngineError::insufficient(distinct, 2, "grid generation"));
    }

    let (mut xmin, mut ymin) = (f64::INFINITY, f64::INFINITY);
    let (mut xmax, mut ymax) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in locations {
        xmin = xmin.min(c.x);
        xmax = xmax.max(c.x);
        ymin = ymin.min(c.y);
        ymax = ymax.max(c.y);
    }
    let (w, h) = (xmax - xmin, ymax - ymin);

    let pad = |span: f64, other: f64| {
        if span > 0.0 {
            margin_fraction * span
        } else if margin_fraction > 0.0 {
            margin_fraction * other
        } else {
            ZERO_SPAN_PAD
        }
    };
    let px = pad(w, h);
    let py = pad(h, w);

    GridSpec::new(
        Bounds::new(xmin - px, ymin - py, xmax + px, ymax + py),
        resolution,
    )
}

//! Sample value types.
//!
//! ## Purpose
//!
//! This module defines the point-level data the engine consumes: raw
//! measurement records as delivered by the data loader, aggregated
//! [`SamplePoint`]s, and the columnar [`SampleSet`] the interpolators work on.
//!
//! ## Design notes
//!
//! * **Immutable**: `SamplePoint` has no setters; it is produced once by the
//!   aggregator and consumed by an interpolation run.
//! * **Columnar**: `SampleSet` stores coordinates and values in separate
//!   vectors so distance loops stay contiguous.
//!
//! ## Invariants
//!
//! * A `SampleSet` preserves input order; index `i` is the tie-break rank of
//!   sample `i` everywhere in the engine.

// ============================================================================
// Coordinates
// ============================================================================

/// Planar coordinate in a consistent projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    /// Easting / longitude.
    pub x: f64,
    /// Northing / latitude.
    pub y: f64,
}

impl Coord {
    /// Create a coordinate.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    #[inline]
    pub fn distance(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared Euclidean distance to another coordinate.
    #[inline]
    pub fn distance_squared(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Raw Measurements
// ============================================================================

/// One cleaned measurement record from the data loader.
///
/// Only `location_id` and `value` are consumed; compound, round and date
/// filtering happens upstream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMeasurement<K> {
    /// Location (census tract) identifier.
    pub location_id: K,
    /// Compound name.
    pub compound: String,
    /// Sampling round.
    pub round: u32,
    /// Collection date as delivered by the loader.
    pub date: String,
    /// Measured concentration.
    pub value: f64,
}

impl<K> RawMeasurement<K> {
    /// The `(location_id, value)` pair the aggregator consumes.
    pub fn as_pair(&self) -> (&K, f64) {
        (&self.location_id, self.value)
    }
}

// ============================================================================
// Sample Point
// ============================================================================

/// Aggregated value at one sample location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePoint {
    location: Coord,
    value: f64,
    weight_count: usize,
}

impl SamplePoint {
    /// Create a sample point; `weight_count` is the number of raw values that
    /// fed `value`.
    pub fn new(location: Coord, value: f64, weight_count: usize) -> Self {
        Self {
            location,
            value,
            weight_count,
        }
    }

    /// Convenience constructor for a single-measurement sample.
    pub fn at(x: f64, y: f64, value: f64) -> Self {
        Self::new(Coord::new(x, y), value, 1)
    }

    /// Sample location.
    #[inline]
    pub fn location(&self) -> Coord {
        self.location
    }

    /// Aggregated value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of raw measurements behind the aggregate (diagnostic only).
    #[inline]
    pub fn weight_count(&self) -> usize {
        self.weight_count
    }
}

// ============================================================================
// Sample Set
// ============================================================================

/// Columnar view of a sample slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSet {
    /// x coordinates.
    pub xs: Vec<f64>,
    /// y coordinates.
    pub ys: Vec<f64>,
    /// Values.
    pub values: Vec<f64>,
}

impl SampleSet {
    /// Build from sample points, preserving order.
    pub fn from_points(points: &[SamplePoint]) -> Self {
        let mut set = Self {
            xs: Vec::with_capacity(points.len()),
            ys: Vec::with_capacity(points.len()),
            values: Vec::with_capacity(points.len()),
        };
        for p in points {
            set.xs.push(p.location.x);
            set.ys.push(p.location.y);
            set.values.push(p.value);
        }
        set
    }

    /// Copy of this set with sample `skip` removed.
    pub fn without(&self, skip: usize) -> Self {
        let keep = |v: &[f64]| -> Vec<f64> {
            v.iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &x)| x)
                .collect()
        };
        Self {
            xs: keep(&self.xs),
            ys: keep(&self.ys),
            values: keep(&self.values),
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Location of sample `i`.
    #[inline]
    pub fn coord(&self, i: usize) -> Coord {
        Coord::new(self.xs[i], self.ys[i])
    }

    /// Bounding box `(xmin, ymin, xmax, ymax)`; `None` when empty.
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let fold = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                })
        };
        let (xmin, xmax) = fold(&self.xs);
        let (ymin, ymax) = fold(&self.ys);
        Some((xmin, ymin, xmax, ymax))
    }
}

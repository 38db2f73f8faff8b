//! Grid value types: lattice specification, dense value arrays and results.
//!
//! ## Purpose
//!
//! This module defines [`GridSpec`] (the evaluation lattice), [`GridValues`]
//! (a dense `nx × ny` array), [`Diagnostics`] and [`GridResult`], the value
//! object handed to renderers and exporters.
//!
//! ## Design notes
//!
//! * **Row-major**: `GridValues` stores row `iy` contiguously; cell `(ix, iy)`
//!   lives at `iy * nx + ix`.
//! * **Exact endpoints**: Lattice coordinates follow `linspace`, with the last
//!   node pinned to the upper bound so corner nodes coincide with the bounds.
//! * **Ordered diagnostics**: A `BTreeMap` keeps diagnostic output stable.
//!
//! ## Invariants
//!
//! * `nx >= 2`, `ny >= 2`, `xmin < xmax`, `ymin < ymax` for every `GridSpec`.
//! * `values.shape() == spec.resolution()`; the same holds for `variance`.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use std::collections::BTreeMap;

// Internal dependencies
use crate::primitives::errors::EngineError;
use crate::primitives::sample::Coord;

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned rectangle `(xmin, ymin, xmax, ymax)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Minimum x.
    pub xmin: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Maximum y.
    pub ymax: f64,
}

impl Bounds {
    /// Create bounds from the four edges.
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Whether `c` lies inside or on the rectangle.
    #[inline]
    pub fn contains(&self, c: &Coord) -> bool {
        c.x >= self.xmin && c.x <= self.xmax && c.y >= self.ymin && c.y <= self.ymax
    }

    /// Width along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

// ============================================================================
// Grid Specification
// ============================================================================

/// Regular evaluation lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    bounds: Bounds,
    nx: usize,
    ny: usize,
}

impl GridSpec {
    /// Create a validated lattice specification.
    pub fn new(bounds: Bounds, resolution: (usize, usize)) -> Result<Self, EngineError> {
        let (nx, ny) = resolution;
        if nx < 2 || ny < 2 {
            return Err(EngineError::invalid_parameter(
                "grid_resolution",
                format!("({nx}, {ny}) must be at least 2 in each direction"),
            ));
        }
        let Bounds {
            xmin,
            ymin,
            xmax,
            ymax,
        } = bounds;
        if ![xmin, ymin, xmax, ymax].iter().all(|v| v.is_finite()) {
            return Err(EngineError::invalid_parameter(
                "bounds",
                "all edges must be finite",
            ));
        }
        if xmin >= xmax || ymin >= ymax {
            return Err(EngineError::invalid_parameter(
                "bounds",
                format!("({xmin}, {ymin}, {xmax}, {ymax}) must satisfy min < max on both axes"),
            ));
        }
        Ok(Self { bounds, nx, ny })
    }

    /// Lattice bounds.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// `(nx, ny)`.
    #[inline]
    pub fn resolution(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Always false; a valid lattice has at least four nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// x coordinate of column `ix`.
    #[inline]
    pub fn x_at(&self, ix: usize) -> f64 {
        linspace_node(self.bounds.xmin, self.bounds.xmax, self.nx, ix)
    }

    /// y coordinate of row `iy`.
    #[inline]
    pub fn y_at(&self, iy: usize) -> f64 {
        linspace_node(self.bounds.ymin, self.bounds.ymax, self.ny, iy)
    }

    /// Coordinate of cell `(ix, iy)`.
    #[inline]
    pub fn coord(&self, ix: usize, iy: usize) -> Coord {
        Coord::new(self.x_at(ix), self.y_at(iy))
    }

    /// Coordinate of the cell at flat row-major index `k`.
    #[inline]
    pub fn coord_of_index(&self, k: usize) -> Coord {
        self.coord(k % self.nx, k / self.nx)
    }

    /// Whether every coordinate lies inside the bounds.
    pub fn encloses<'a>(&self, coords: impl IntoIterator<Item = &'a Coord>) -> bool {
        coords.into_iter().all(|c| self.bounds.contains(c))
    }
}

#[inline]
fn linspace_node(lo: f64, hi: f64, n: usize, i: usize) -> f64 {
    if i + 1 >= n {
        hi
    } else {
        lo + (hi - lo) * (i as f64) / ((n - 1) as f64)
    }
}

// ============================================================================
// Dense Values
// ============================================================================

/// Dense `nx × ny` array of `f64`, row-major by `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridValues {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl GridValues {
    /// Wrap a row-major buffer; returns `None` when the length is not `nx * ny`.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == nx * ny).then_some(Self { nx, ny, data })
    }

    /// Array filled with `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// `(nx, ny)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Value at column `ix`, row `iy`.
    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        self.data[iy * self.nx + ix]
    }

    /// Row-major slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterator over the finite values.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied().filter(|v| v.is_finite())
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticValue {
    /// Numeric quantity.
    Number(f64),
    /// Count of items.
    Count(usize),
    /// Free text (model names, policies).
    Text(String),
    /// Boolean flag.
    Flag(bool),
}

impl Display for DiagnosticValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Number(v) => write!(f, "{v:.6}"),
            Self::Count(c) => write!(f, "{c}"),
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for DiagnosticValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<usize> for DiagnosticValue {
    fn from(v: usize) -> Self {
        Self::Count(v)
    }
}

impl From<bool> for DiagnosticValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for DiagnosticValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for DiagnosticValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Ordered map of diagnostic entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagnostics(BTreeMap<String, DiagnosticValue>);

impl Diagnostics {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DiagnosticValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&DiagnosticValue> {
        self.0.get(key)
    }

    /// Numeric entry, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(DiagnosticValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Count entry, if present and a count.
    pub fn count(&self, key: &str) -> Option<usize> {
        match self.0.get(key) {
            Some(DiagnosticValue::Count(c)) => Some(*c),
            _ => None,
        }
    }

    /// Text entry, if present and text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(DiagnosticValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiagnosticValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Move every entry of `other` into `self`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }
}

// ============================================================================
// Grid Result
// ============================================================================

/// One exported cell: `(x, y, estimated_value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRecord {
    /// Cell x coordinate.
    pub x: f64,
    /// Cell y coordinate.
    pub y: f64,
    /// Estimated value (NaN for masked cells).
    pub value: f64,
}

/// Interpolated surface over a [`GridSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridResult {
    /// Lattice the values were evaluated on.
    pub spec: GridSpec,
    /// Estimates, `nx × ny`.
    pub values: GridValues,
    /// Estimation variance, where the method defines one.
    pub variance: Option<GridValues>,
    /// Method-specific diagnostics.
    pub diagnostics: Diagnostics,
}

impl GridResult {
    /// Flattened `(x, y, value)` records, one per cell, row-major.
    pub fn records(&self) -> impl Iterator<Item = GridRecord> + '_ {
        self.values
            .as_slice()
            .iter()
            .enumerate()
            .map(move |(k, &value)| {
                let c = self.spec.coord_of_index(k);
                GridRecord {
                    x: c.x,
                    y: c.y,
                    value,
                }
            })
    }

    /// Value at the lattice node closest to `c`, if `c` is inside the bounds.
    pub fn value_near(&self, c: &Coord) -> Option<f64> {
        let b = self.spec.bounds();
        if !b.contains(c) {
            return None;
        }
        let (nx, ny) = self.spec.resolution();
        let ix = ((c.x - b.xmin) / b.width() * (nx - 1) as f64).round() as usize;
        let iy = ((c.y - b.ymin) / b.height() * (ny - 1) as f64).round() as usize;
        Some(self.values.get(ix.min(nx - 1), iy.min(ny - 1)))
    }

    /// Minimum and maximum of the finite values.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values.finite_values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl Display for GridResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (nx, ny) = self.spec.resolution();
        let b = self.spec.bounds();
        writeln!(f, "Summary:")?;
        writeln!(f, "  Grid:     {nx} x {ny}")?;
        writeln!(
            f,
            "  Bounds:   ({:.4}, {:.4}) - ({:.4}, {:.4})",
            b.xmin, b.ymin, b.xmax, b.ymax
        )?;
        match self.finite_range() {
            Some((lo, hi)) => writeln!(f, "  Range:    [{lo:.6}, {hi:.6}]")?,
            None => writeln!(f, "  Range:    (no finite values)")?,
        }
        if self.variance.is_some() {
            writeln!(f, "  Variance: available")?;
        }
        writeln!(f)?;
        writeln!(f, "Diagnostics:")?;
        for (key, value) in self.diagnostics.iter() {
            writeln!(f, "  {key:<22} {value}")?;
        }
        Ok(())
    }
}

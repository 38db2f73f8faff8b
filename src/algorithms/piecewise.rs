//! Piecewise linear and cubic interpolation over a Delaunay triangulation.
//!
//! ## Purpose
//!
//! Triangulates the distinct sample locations and interpolates inside each
//! triangle: barycentric (linear) or with a cubic Bernstein–Bézier patch.
//!
//! ## Design notes
//!
//! * **Cubic patches**: Vertex gradients are least-squares fits over the
//!   vertex's triangulation neighbours. Edge control points follow from the
//!   gradients; the centre control point is the mean of the six edge points.
//!   Patches are exact at samples, continuous across edges, and reproduce
//!   linear fields.
//! * **Outside the hull**: Cells not covered by any triangle take the nearest
//!   sample's value and are flagged as extrapolated.
//! * **Duplicates**: Repeated locations keep their first occurrence.
//!
//! ## Invariants
//!
//! * Linear estimates inside the hull lie within the vertex values of their
//!   triangle.
//!
//! ## Non-goals
//!
//! * C1 continuity across triangle edges.
//! * Tensor-product interpolation on regular lattices.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};

// Internal dependencies
use crate::algorithms::nearest::NearestSurface;
use crate::algorithms::surface::{Estimate, Scratch, Surface};
use crate::math::geometry::{distinct_indices, spans_plane};
use crate::math::triangulation::Triangulation;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::Diagnostics;
use crate::primitives::sample::{Coord, SampleSet};

/// Interpolant used inside each triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PiecewiseKind {
    /// Barycentric interpolation.
    Linear,
    /// Cubic Bernstein–Bézier patch.
    Cubic,
}

impl Display for PiecewiseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Cubic => f.write_str("cubic"),
        }
    }
}

/// Ten Bernstein control values of one triangle, in the order
/// `c300 c030 c003 c210 c201 c120 c021 c102 c012 c111`.
type CubicPatch = [f64; 10];

/// Fitted piecewise surface.
#[derive(Debug, Clone)]
pub struct PiecewiseSurface {
    kind: PiecewiseKind,
    tri: Triangulation,
    values: Vec<f64>,
    patches: Vec<CubicPatch>,
    fallback: NearestSurface,
    duplicates: usize,
}

impl PiecewiseSurface {
    /// Triangulate `samples` and prepare the interpolant.
    pub fn fit(samples: &SampleSet, kind: PiecewiseKind) -> Result<Self, EngineError> {
        let coords: Vec<Coord> = (0..samples.len()).map(|i| samples.coord(i)).collect();
        let keep = distinct_indices(&coords);
        let context = format!("{kind} triangulation");
        if keep.len() < 3 {
            return Err(EngineError::insufficient(keep.len(), 3, context));
        }

        let points: Vec<Coord> = keep.iter().map(|&i| coords[i]).collect();
        if !spans_plane(&points) {
            return Err(EngineError::insufficient(
                keep.len(),
                3,
                format!("{context}; locations are collinear"),
            ));
        }
        let values: Vec<f64> = keep.iter().map(|&i| samples.values[i]).collect();

        let tri = Triangulation::new(&points)
            .ok_or_else(|| EngineError::insufficient(keep.len(), 3, context))?;

        let distinct = SampleSet {
            xs: points.iter().map(|c| c.x).collect(),
            ys: points.iter().map(|c| c.y).collect(),
            values: values.clone(),
        };
        let fallback = NearestSurface::fit(&distinct)?;

        let patches = match kind {
            PiecewiseKind::Linear => Vec::new(),
            PiecewiseKind::Cubic => {
                let gradients = vertex_gradients(&tri, &values);
                tri.triangles()
                    .iter()
                    .map(|t| cubic_patch(t, tri.points(), &values, &gradients))
                    .collect()
            }
        };

        Ok(Self {
            kind,
            tri,
            values,
            patches,
            fallback,
            duplicates: samples.len() - keep.len(),
        })
    }

    /// Underlying triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }
}

impl Surface for PiecewiseSurface {
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError> {
        let Some((t, [l0, l1, l2])) = self.tri.locate(q) else {
            let mut est = self.fallback.estimate(q, scratch)?;
            est.extrapolated = true;
            return Ok(est);
        };

        let value = match self.kind {
            PiecewiseKind::Linear => {
                let [a, b, c] = self.tri.triangles()[t];
                l0 * self.values[a] + l1 * self.values[b] + l2 * self.values[c]
            }
            PiecewiseKind::Cubic => {
                let c = &self.patches[t];
                c[0] * l0 * l0 * l0
                    + c[1] * l1 * l1 * l1
                    + c[2] * l2 * l2 * l2
                    + 3.0 * c[3] * l0 * l0 * l1
                    + 3.0 * c[4] * l0 * l0 * l2
                    + 3.0 * c[5] * l0 * l1 * l1
                    + 3.0 * c[6] * l1 * l1 * l2
                    + 3.0 * c[7] * l0 * l2 * l2
                    + 3.0 * c[8] * l1 * l2 * l2
                    + 6.0 * c[9] * l0 * l1 * l2
            }
        };
        Ok(Estimate::value(value))
    }

    fn diagnostics(&self) -> Diagnostics {
        let mut d = Diagnostics::new();
        d.insert("triangles", self.tri.triangles().len());
        d.insert("duplicate_locations", self.duplicates);
        d.insert("fallback", "nearest_neighbor");
        d
    }
}

// ============================================================================
// Cubic Construction
// ============================================================================

/// Least-squares gradient at every vertex from its 1-ring, widened to the
/// 2-ring when the 1-ring does not determine a plane.
fn vertex_gradients(tri: &Triangulation, values: &[f64]) -> Vec<[f64; 2]> {
    let adj = tri.vertex_neighbors();
    let pts = tri.points();
    (0..pts.len())
        .map(|i| {
            if let Some(g) = fit_gradient(i, adj[i].iter().copied(), pts, values) {
                return g;
            }
            let mut ring2: Vec<usize> = adj[i]
                .iter()
                .flat_map(|&j| adj[j].iter().copied().chain(core::iter::once(j)))
                .filter(|&j| j != i)
                .collect();
            ring2.sort_unstable();
            ring2.dedup();
            fit_gradient(i, ring2.into_iter(), pts, values).unwrap_or([0.0, 0.0])
        })
        .collect()
}

/// Inverse-square-distance weighted least squares for `∇f` at vertex `i`.
fn fit_gradient(
    i: usize,
    neighbors: impl Iterator<Item = usize>,
    pts: &[Coord],
    values: &[f64],
) -> Option<[f64; 2]> {
    let p = pts[i];
    let (mut sxx, mut sxy, mut syy, mut sxf, mut syf) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for j in neighbors {
        let dx = pts[j].x - p.x;
        let dy = pts[j].y - p.y;
        let d2 = dx * dx + dy * dy;
        if d2 == 0.0 {
            continue;
        }
        let w = 1.0 / d2;
        let df = values[j] - values[i];
        sxx += w * dx * dx;
        sxy += w * dx * dy;
        syy += w * dy * dy;
        sxf += w * dx * df;
        syf += w * dy * df;
    }
    // Weighted direction moments are dimensionless, so the threshold is absolute.
    let det = sxx * syy - sxy * sxy;
    if !(det > 1e-12) {
        return None;
    }
    Some([(syy * sxf - sxy * syf) / det, (sxx * syf - sxy * sxf) / det])
}

fn cubic_patch(t: &[usize; 3], pts: &[Coord], values: &[f64], grads: &[[f64; 2]]) -> CubicPatch {
    let [a, b, c] = *t;
    // Control point one third of the way from vertex `u` towards vertex `v`.
    let edge = |u: usize, v: usize| {
        let dx = pts[v].x - pts[u].x;
        let dy = pts[v].y - pts[u].y;
        values[u] + (grads[u][0] * dx + grads[u][1] * dy) / 3.0
    };
    let c210 = edge(a, b);
    let c201 = edge(a, c);
    let c120 = edge(b, a);
    let c021 = edge(b, c);
    let c102 = edge(c, a);
    let c012 = edge(c, b);
    let c111 = (c210 + c201 + c120 + c021 + c102 + c012) / 6.0;
    [
        values[a], values[b], values[c], c210, c201, c120, c021, c102, c012, c111,
    ]
}

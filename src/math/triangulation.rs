//! Delaunay triangulation of sample locations.
//!
//! ## Purpose
//!
//! The linear and cubic interpolators are piecewise over a triangulated
//! surface. This module builds that triangulation (Bowyer–Watson incremental
//! insertion), locates the triangle containing a query point, and reports the
//! barycentric coordinates inside it.
//!
//! ## Design notes
//!
//! * **Ghost vertex**: Hull edges are closed off by triangles sharing one
//!   symbolic vertex at infinity. A ghost triangle's circumcircle is the open
//!   half-plane beyond its edge plus the edge itself, so thin hull triangles
//!   are created no matter how flat the input is.
//! * **Orientation**: Triangles are stored counter-clockwise so the in-circle
//!   determinant has a fixed sign. New triangles inherit the direction of the
//!   cavity boundary edge they close.
//! * **Deterministic**: Insertion starts from a fixed seed triangle and then
//!   follows input order; cavity edges are collected in a `BTreeSet`.
//!
//! ## Invariants
//!
//! * Input locations must be distinct; callers deduplicate first.
//! * Every returned triangle has strictly positive area.
//!
//! ## Non-goals
//!
//! * Constrained triangulation or exact-arithmetic predicates.

// External dependencies
use std::collections::BTreeSet;

// Internal dependencies
use crate::primitives::sample::Coord;

/// Relative tolerance on barycentric coordinates for edge hits.
const BARYCENTRIC_TOL: f64 = 1e-10;

/// A Delaunay triangulation of planar points.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Coord>,
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Triangulate distinct points. Returns `None` when no triangle with
    /// positive area exists (fewer than 3 points or all collinear).
    pub fn new(points: &[Coord]) -> Option<Self> {
        let n = points.len();
        if n < 3 {
            return None;
        }

        let [s0, s1, s2] = seed_triangle(points)?;
        let ghost = n;

        let mut triangles: Vec<[usize; 3]> =
            vec![[s0, s1, s2], [s1, s0, ghost], [s2, s1, ghost], [s0, s2, ghost]];

        for i in (0..n).filter(|&i| i != s0 && i != s1 && i != s2) {
            let p = points[i];

            let mut cavity = Vec::new();
            triangles.retain(|tri| {
                if in_conflict(points, ghost, tri, &p) {
                    cavity.push(*tri);
                    false
                } else {
                    true
                }
            });

            // Directed edges whose reverse is not in the cavity form its boundary.
            let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
            for tri in &cavity {
                for k in 0..3 {
                    edges.insert((tri[k], tri[(k + 1) % 3]));
                }
            }
            for &(a, b) in edges.iter().filter(|&&(a, b)| !edges.contains(&(b, a))) {
                triangles.push(if a == ghost {
                    [b, i, ghost]
                } else if b == ghost {
                    [i, a, ghost]
                } else {
                    [a, b, i]
                });
            }
        }

        triangles.retain(|t| !t.contains(&ghost));
        triangles.retain(|t| orient(&points[t[0]], &points[t[1]], &points[t[2]]) > 0.0);
        if triangles.is_empty() {
            return None;
        }

        Some(Self {
            points: points.to_vec(),
            triangles,
        })
    }

    /// Vertex coordinates.
    #[inline]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Triangles as counter-clockwise vertex index triples.
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Find the first triangle containing `q` and its barycentric coordinates.
    pub fn locate(&self, q: &Coord) -> Option<(usize, [f64; 3])> {
        self.triangles.iter().enumerate().find_map(|(t, tri)| {
            let b = barycentric(
                &self.points[tri[0]],
                &self.points[tri[1]],
                &self.points[tri[2]],
                q,
            )?;
            b.iter()
                .all(|&w| w >= -BARYCENTRIC_TOL)
                .then_some((t, b))
        })
    }

    /// Undirected vertex adjacency lists derived from the triangles.
    pub fn vertex_neighbors(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.points.len()];
        for tri in &self.triangles {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                if !adj[a].contains(&b) {
                    adj[a].push(b);
                }
                if !adj[b].contains(&a) {
                    adj[b].push(a);
                }
            }
        }
        adj
    }
}

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
#[inline]
pub fn orient(a: &Coord, b: &Coord, c: &Coord) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Barycentric coordinates of `q` with respect to `(a, b, c)`.
pub fn barycentric(a: &Coord, b: &Coord, c: &Coord, q: &Coord) -> Option<[f64; 3]> {
    let det = orient(a, b, c);
    if det.abs() <= f64::MIN_POSITIVE {
        return None;
    }
    let l0 = orient(q, b, c) / det;
    let l1 = orient(a, q, c) / det;
    let l2 = 1.0 - l0 - l1;
    Some([l0, l1, l2])
}

/// Counter-clockwise seed: the first point, the point farthest from it, and
/// the point farthest from the line through both.
fn seed_triangle(points: &[Coord]) -> Option<[usize; 3]> {
    let first = points.first()?;
    let far = (1..points.len()).max_by(|&a, &b| {
        first
            .distance_squared(&points[a])
            .total_cmp(&first.distance_squared(&points[b]))
    })?;
    let (apex, area) = (1..points.len())
        .filter(|&k| k != far)
        .map(|k| (k, orient(first, &points[far], &points[k])))
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
    if area == 0.0 || !area.is_finite() {
        return None;
    }
    Some(if area > 0.0 { [0, far, apex] } else { [0, apex, far] })
}

/// Whether `p` invalidates `tri`. For a ghost triangle `[a, b, ghost]` that
/// means `p` lies left of `a -> b` or on the open segment between them.
fn in_conflict(points: &[Coord], ghost: usize, tri: &[usize; 3], p: &Coord) -> bool {
    if tri[2] != ghost {
        return in_circumcircle(points, tri, p);
    }
    let (a, b) = (&points[tri[0]], &points[tri[1]]);
    let side = orient(a, b, p);
    if side != 0.0 {
        return side > 0.0;
    }
    let t = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
    t > 0.0 && t < a.distance_squared(b)
}

/// In-circle test for a counter-clockwise triangle.
fn in_circumcircle(pts: &[Coord], tri: &[usize; 3], p: &Coord) -> bool {
    let a = &pts[tri[0]];
    let b = &pts[tri[1]];
    let c = &pts[tri[2]];

    let (adx, ady) = (a.x - p.x, a.y - p.y);
    let (bdx, bdy) = (b.x - p.x, b.y - p.y);
    let (cdx, cdy) = (c.x - p.x, c.y - p.y);

    let det = (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
        - (bdx * bdx + bdy * bdy) * (adx * cdy - cdx * ady)
        + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady);
    det > 0.0
}

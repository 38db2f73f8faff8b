//! Planar distance kernels.
//!
//! ## Purpose
//!
//! Every interpolator measures distances from a query coordinate to all
//! samples. This module provides those loops once, vectorised two lanes at a
//! time with `wide::f64x2`.
//!
//! ## Invariants
//!
//! * Distances are non-negative and zero iff the coordinates are identical.
//! * Output order matches sample order.
//!
//! ## Non-goals
//!
//! * Geodesic distances; coordinates are treated as planar.

// External dependencies
use wide::f64x2;

// Internal dependencies
use crate::primitives::sample::Coord;

/// Squared Euclidean distance between two coordinates.
#[inline]
pub fn squared(a: &Coord, b: &Coord) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two coordinates.
#[inline]
pub fn euclidean(a: &Coord, b: &Coord) -> f64 {
    squared(a, b).sqrt()
}

/// Fill `out` with the Euclidean distance from `query` to every `(xs[i], ys[i])`.
pub fn distances_into(query: &Coord, xs: &[f64], ys: &[f64], out: &mut Vec<f64>) {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    out.clear();
    out.reserve(n);

    let qx = f64x2::splat(query.x);
    let qy = f64x2::splat(query.y);

    let mut i = 0;
    while i + 2 <= n {
        let dx = f64x2::new([xs[i], xs[i + 1]]) - qx;
        let dy = f64x2::new([ys[i], ys[i + 1]]) - qy;
        let d = (dx * dx + dy * dy).sqrt().to_array();
        out.push(d[0]);
        out.push(d[1]);
        i += 2;
    }
    if i < n {
        let dx = xs[i] - query.x;
        let dy = ys[i] - query.y;
        out.push((dx * dx + dy * dy).sqrt());
    }
}

/// Pairwise distance matrix (row-major, `n × n`) between sample locations.
pub fn pairwise(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = xs[i] - xs[j];
            let dy = ys[i] - ys[j];
            let d = (dx * dx + dy * dy).sqrt();
            out[i * n + j] = d;
            out[j * n + i] = d;
        }
    }
    out
}

//! Sample geometry checks.
//!
//! Distinct-location counting, duplicate removal and the collinearity test
//! that gates the triangulated, kriging and RBF methods, plus point-in-polygon
//! for boundary clipping.

// Internal dependencies
use crate::math::triangulation::orient;
use crate::primitives::sample::Coord;

/// Relative tolerance for collinearity, scaled by the squared span.
const COLLINEAR_TOL: f64 = 1e-12;

/// Indices of the first occurrence of each distinct location, in input order.
pub fn distinct_indices(coords: &[Coord]) -> Vec<usize> {
    let mut keyed: Vec<(u64, u64, usize)> = coords
        .iter()
        .enumerate()
        .map(|(i, c)| (canonical_bits(c.x), canonical_bits(c.y), i))
        .collect();
    keyed.sort_unstable();
    keyed.dedup_by(|b, a| a.0 == b.0 && a.1 == b.1);
    let mut keep: Vec<usize> = keyed.into_iter().map(|(_, _, i)| i).collect();
    keep.sort_unstable();
    keep
}

/// Number of distinct locations.
pub fn distinct_count(coords: &[Coord]) -> usize {
    distinct_indices(coords).len()
}

/// Whether the locations span a 2D region, i.e. at least three of them are
/// not collinear.
pub fn spans_plane(coords: &[Coord]) -> bool {
    let Some(first) = coords.first() else {
        return false;
    };
    // Farthest point from the first one fixes a reference line.
    let (far, far_d2) = coords
        .iter()
        .map(|c| {
            let dx = c.x - first.x;
            let dy = c.y - first.y;
            (c, dx * dx + dy * dy)
        })
        .fold((first, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_d2 == 0.0 {
        return false;
    }
    coords
        .iter()
        .any(|c| orient(first, far, c).abs() > COLLINEAR_TOL * far_d2)
}

/// Even-odd rule point-in-polygon test. The ring may be open or closed.
pub fn point_in_polygon(p: &Coord, ring: &[Coord]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Bit pattern with `-0.0` folded onto `0.0`.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

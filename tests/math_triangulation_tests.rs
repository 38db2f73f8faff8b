#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use tract_surface::internals::math::geometry::{
    distinct_count, distinct_indices, point_in_polygon, spans_plane,
};
use tract_surface::internals::math::triangulation::{Triangulation, barycentric, orient};
use tract_surface::internals::primitives::sample::Coord;

fn c(x: f64, y: f64) -> Coord {
    Coord::new(x, y)
}

#[test]
fn test_triangulation_square() {
    let pts = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)];
    let tri = Triangulation::new(&pts).unwrap();
    assert_eq!(tri.triangles().len(), 2);
    assert_eq!(tri.points().len(), 4);

    for t in tri.triangles() {
        let area = orient(&pts[t[0]], &pts[t[1]], &pts[t[2]]);
        assert!(area.abs() > 0.0);
    }
}

#[test]
fn test_triangulation_covers_hull() {
    // Square corners plus scattered interior points.
    let mut pts = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)];
    for i in 1..=20 {
        let x = 0.05 + 0.9 * (i as f64 * 0.618_034).fract();
        let y = 0.05 + 0.9 * (i as f64 * 0.414_214).fract();
        pts.push(c(x, y));
    }
    let tri = Triangulation::new(&pts).unwrap();
    // 2n - 2 - h triangles with h = 4 hull vertices.
    assert_eq!(tri.triangles().len(), 2 * pts.len() - 2 - 4);

    let total: f64 = tri
        .triangles()
        .iter()
        .map(|t| 0.5 * orient(&pts[t[0]], &pts[t[1]], &pts[t[2]]))
        .sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);

    assert!(tri.locate(&c(0.37, 0.81)).is_some());
    assert!(tri.locate(&c(1.5, 0.5)).is_none());
}

#[test]
fn test_triangulation_thin_sliver() {
    let pts = [c(0.0, 0.0), c(5.0, -0.01), c(10.0, 0.0)];
    let tri = Triangulation::new(&pts).unwrap();
    assert_eq!(tri.triangles().len(), 1);
    assert!(tri.locate(&c(5.0, -0.005)).is_some());
    assert!(tri.locate(&c(5.0, 0.01)).is_none());
}

#[test]
fn test_triangulation_collinear_hull_points() {
    // 3x3 lattice: four hull vertices sit in the middle of hull edges.
    let pts: Vec<Coord> = (0..3)
        .flat_map(|j| (0..3).map(move |i| c(i as f64, j as f64)))
        .collect();
    let tri = Triangulation::new(&pts).unwrap();
    assert_eq!(tri.triangles().len(), 2 * pts.len() - 2 - 8);

    let total: f64 = tri
        .triangles()
        .iter()
        .map(|t| 0.5 * orient(&pts[t[0]], &pts[t[1]], &pts[t[2]]))
        .sum();
    assert_relative_eq!(total, 4.0, epsilon = 1e-12);

    // Every vertex is used.
    let adj = tri.vertex_neighbors();
    assert!(adj.iter().all(|n| n.len() >= 2));
}

#[test]
fn test_triangulation_rejects_degenerate() {
    assert!(Triangulation::new(&[c(0.0, 0.0), c(1.0, 1.0)]).is_none());
    assert!(Triangulation::new(&[c(0.0, 0.0), c(1.0, 1.0), c(2.0, 2.0), c(3.0, 3.0)]).is_none());
}

#[test]
fn test_locate_barycentric_weights() {
    let pts = [c(0.0, 0.0), c(2.0, 0.0), c(0.0, 2.0)];
    let tri = Triangulation::new(&pts).unwrap();
    let (t, w) = tri.locate(&c(0.5, 0.5)).unwrap();
    assert_eq!(t, 0);
    assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

    // Reconstruct the query from the weights.
    let [a, b, d] = tri.triangles()[t];
    let x = w[0] * pts[a].x + w[1] * pts[b].x + w[2] * pts[d].x;
    let y = w[0] * pts[a].y + w[1] * pts[b].y + w[2] * pts[d].y;
    assert_relative_eq!(x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(y, 0.5, epsilon = 1e-12);
}

#[test]
fn test_barycentric_vertices_and_degenerate() {
    let (a, b, d) = (c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0));
    let w = barycentric(&a, &b, &d, &b).unwrap();
    assert_relative_eq!(w[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(w[0], 0.0, epsilon = 1e-12);
    assert!(barycentric(&a, &b, &c(2.0, 0.0), &b).is_none());
}

#[test]
fn test_vertex_neighbors_symmetric() {
    let pts = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(0.5, 0.4)];
    let tri = Triangulation::new(&pts).unwrap();
    let adj = tri.vertex_neighbors();
    for (i, ns) in adj.iter().enumerate() {
        for &j in ns {
            assert!(adj[j].contains(&i));
        }
    }
    // Interior point connects to all four corners.
    assert_eq!(adj[4].len(), 4);
}

#[test]
fn test_distinct_indices_keeps_first() {
    let pts = [c(1.0, 1.0), c(0.0, 0.0), c(1.0, 1.0), c(-0.0, 0.0)];
    assert_eq!(distinct_indices(&pts), vec![0, 1]);
    assert_eq!(distinct_count(&pts), 2);
}

#[test]
fn test_spans_plane() {
    assert!(!spans_plane(&[]));
    assert!(!spans_plane(&[c(1.0, 1.0), c(1.0, 1.0)]));
    assert!(!spans_plane(&[c(0.0, 0.0), c(1.0, 2.0), c(2.0, 4.0)]));
    assert!(spans_plane(&[c(0.0, 0.0), c(1.0, 2.0), c(2.0, 4.1)]));
}

#[test]
fn test_point_in_polygon() {
    let ring = [c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0), c(2.0, 1.0), c(0.0, 4.0)];
    assert!(point_in_polygon(&c(1.0, 0.5), &ring));
    assert!(!point_in_polygon(&c(2.0, 3.0), &ring));
    assert!(!point_in_polygon(&c(5.0, 1.0), &ring));
    assert!(!point_in_polygon(&c(1.0, 1.0), &ring[..2]));
}

#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use tract_surface::internals::algorithms::idw::{IdwParams, IdwSurface};
use tract_surface::internals::algorithms::nearest::NearestSurface;
use tract_surface::internals::algorithms::surface::{Scratch, Surface};
use tract_surface::internals::primitives::errors::ErrorKind;
use tract_surface::internals::primitives::sample::{Coord, SamplePoint, SampleSet};

fn triangle_samples() -> SampleSet {
    SampleSet::from_points(&[
        SamplePoint::at(0.0, 0.0, 10.0),
        SamplePoint::at(1.0, 0.0, 20.0),
        SamplePoint::at(0.0, 1.0, 30.0),
    ])
}

fn estimate(surface: &impl Surface, n: usize, x: f64, y: f64) -> f64 {
    let mut scratch = Scratch::new(n);
    surface.estimate(&Coord::new(x, y), &mut scratch).unwrap().value
}

#[test]
fn test_idw_exact_at_samples() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(&set, IdwParams::default()).unwrap();
    assert_eq!(estimate(&idw, 3, 0.0, 0.0), 10.0);
    assert_eq!(estimate(&idw, 3, 1.0, 0.0), 20.0);
    assert_eq!(estimate(&idw, 3, 0.0, 1.0), 30.0);
}

#[test]
fn test_idw_weighted_mean() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(&set, IdwParams::default()).unwrap();
    // Distances √2, 1, 1 give weights 1/2, 1, 1.
    assert_relative_eq!(estimate(&idw, 3, 1.0, 1.0), 22.0, epsilon = 1e-12);
}

#[test]
fn test_idw_bounded_by_sample_range() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(&set, IdwParams::default()).unwrap();
    for i in 0..10 {
        for j in 0..10 {
            let v = estimate(&idw, 3, -2.0 + 0.5 * i as f64, -2.0 + 0.5 * j as f64);
            assert!((10.0..=30.0).contains(&v), "{v} outside sample range");
        }
    }
}

#[test]
fn test_idw_large_power_tends_to_nearest() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(
        &set,
        IdwParams {
            power: 200.0,
            max_neighbors: None,
            smoothing: 0.0,
        },
    )
    .unwrap();
    let nn = NearestSurface::fit(&set).unwrap();
    for (x, y) in [(0.1, 0.1), (0.8, 0.1), (0.2, 0.7), (2.0, -1.0)] {
        assert_relative_eq!(
            estimate(&idw, 3, x, y),
            estimate(&nn, 3, x, y),
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_idw_max_neighbors() {
    let set = SampleSet::from_points(&[
        SamplePoint::at(0.0, 0.0, 1.0),
        SamplePoint::at(2.0, 0.0, 3.0),
        SamplePoint::at(10.0, 0.0, 100.0),
    ]);
    let idw = IdwSurface::fit(
        &set,
        IdwParams {
            power: 2.0,
            max_neighbors: Some(2),
            smoothing: 0.0,
        },
    )
    .unwrap();
    // Only the two nearest samples contribute, at equal distance.
    assert_relative_eq!(estimate(&idw, 3, 1.0, 0.0), 2.0, epsilon = 1e-12);

    let diag = idw.diagnostics();
    assert_eq!(diag.count("max_neighbors"), Some(2));
    assert_eq!(diag.number("power"), Some(2.0));
}

#[test]
fn test_idw_single_neighbor_matches_nearest() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(
        &set,
        IdwParams {
            power: 2.0,
            max_neighbors: Some(1),
            smoothing: 0.0,
        },
    )
    .unwrap();
    assert_eq!(estimate(&idw, 3, 0.9, 0.2), 20.0);
}

#[test]
fn test_idw_invalid_params() {
    let set = triangle_samples();
    for power in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = IdwSurface::fit(
            &set,
            IdwParams {
                power,
                max_neighbors: None,
                smoothing: 0.0,
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
    let err = IdwSurface::fit(
        &set,
        IdwParams {
            power: 2.0,
            max_neighbors: Some(0),
            smoothing: 0.0,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_idw_smoothing_offsets_distances() {
    let set = triangle_samples();
    let idw = IdwSurface::fit(
        &set,
        IdwParams {
            power: 1.0,
            max_neighbors: None,
            smoothing: 1.0,
        },
    )
    .unwrap();
    // At (0, 0) the offset distances are 1, 2, 2: weights 1, 1/2, 1/2.
    assert_relative_eq!(estimate(&idw, 3, 0.0, 0.0), 17.5, epsilon = 1e-12);
    assert_eq!(idw.diagnostics().number("smoothing"), Some(1.0));

    for smoothing in [-0.5, f64::NAN, f64::INFINITY] {
        let err = IdwSurface::fit(
            &set,
            IdwParams {
                smoothing,
                ..IdwParams::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}

#[test]
fn test_idw_empty_samples() {
    let set = SampleSet::from_points(&[]);
    let err = IdwSurface::fit(&set, IdwParams::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_nearest_ties_prefer_first() {
    let set = SampleSet::from_points(&[
        SamplePoint::at(0.0, 0.0, 1.0),
        SamplePoint::at(2.0, 0.0, 2.0),
    ]);
    let nn = NearestSurface::fit(&set).unwrap();
    assert_eq!(estimate(&nn, 2, 1.0, 0.0), 1.0);
    assert_eq!(estimate(&nn, 2, 1.5, 0.0), 2.0);
}

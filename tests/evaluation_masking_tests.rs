use tract_surface::prelude::*;

fn flat_result(nx: usize, ny: usize) -> GridResult {
    let spec = GridSpec::new(Bounds::new(0.0, 0.0, 10.0, 10.0), (nx, ny)).unwrap();
    GridResult {
        spec,
        values: GridValues::filled(nx, ny, 1.0),
        variance: Some(GridValues::filled(nx, ny, 0.5)),
        diagnostics: Diagnostics::new(),
    }
}

#[test]
fn test_mask_beyond_distance() {
    let mut result = flat_result(11, 11);
    let samples = SampleSet::from_points(&[SamplePoint::at(0.0, 0.0, 1.0)]);

    let masked = result.mask_beyond(&samples, 3.0).unwrap();
    // Cells strictly closer than 3 to the origin on a unit lattice.
    let kept = (0..=3)
        .flat_map(|i| (0..=3).map(move |j| (i, j)))
        .filter(|&(i, j)| i * i + j * j < 9)
        .count();
    assert_eq!(kept, 9);
    assert_eq!(masked, 121 - kept);
    assert_eq!(result.values.finite_values().count(), kept);
    assert_eq!(result.diagnostics.count("masked_cells"), Some(masked));
    assert_eq!(result.diagnostics.number("mask_distance"), Some(3.0));

    // Exactly at the cutoff counts as beyond it.
    assert!(result.values.get(3, 0).is_nan());
    assert!(result.values.get(0, 3).is_nan());
    assert_eq!(result.values.get(2, 2), 1.0);

    let variance = result.variance.as_ref().unwrap();
    assert!(variance.get(10, 10).is_nan());
    assert_eq!(variance.get(0, 0), 0.5);

    // Masking again touches nothing new.
    assert_eq!(result.mask_beyond(&samples, 3.0).unwrap(), 0);
    assert_eq!(result.diagnostics.count("masked_cells"), Some(masked));
}

#[test]
fn test_clip_to_polygon() {
    let mut result = flat_result(11, 11);
    let ring = [
        Coord::new(-0.5, -0.5),
        Coord::new(4.5, -0.5),
        Coord::new(4.5, 4.5),
        Coord::new(-0.5, 4.5),
    ];
    let clipped = result.clip_to_polygon(&ring).unwrap();
    assert_eq!(clipped, 121 - 25);
    assert_eq!(result.values.get(2, 2), 1.0);
    assert!(result.values.get(7, 2).is_nan());
    assert_eq!(result.diagnostics.count("clipped_cells"), Some(clipped));
}

#[test]
fn test_mask_invalid_arguments() {
    let mut result = flat_result(3, 3);
    let samples = SampleSet::from_points(&[SamplePoint::at(0.0, 0.0, 1.0)]);
    for d in [0.0, -1.0, f64::NAN] {
        let err = result.mask_beyond(&samples, d).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
    let err = result
        .mask_beyond(&SampleSet::from_points(&[]), 1.0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let err = result
        .clip_to_polygon(&[Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

use approx::assert_relative_eq;
use std::collections::BTreeMap;
use tract_surface::prelude::*;

fn corner_samples() -> Vec<SamplePoint> {
    vec![
        SamplePoint::at(0.0, 0.0, 10.0),
        SamplePoint::at(1.0, 0.0, 20.0),
        SamplePoint::at(0.0, 1.0, 30.0),
    ]
}

fn field_samples() -> Vec<SamplePoint> {
    (0..30)
        .map(|i| {
            let x = 10.0 * (i as f64 * 0.618_034).fract();
            let y = 10.0 * (i as f64 * 0.414_214).fract();
            SamplePoint::at(x, y, 2.0 + 0.5 * x + (0.4 * y).sin())
        })
        .collect()
}

#[test]
fn test_idw_grid_corners() {
    let engine = Engine::builder()
        .method(InterpolationMethod::Idw(IdwParams::default()))
        .grid_resolution(3, 3)
        .margin_fraction(0.0)
        .build()
        .unwrap();
    let result = engine.compute(&corner_samples()).unwrap();

    assert_eq!(result.values.shape(), (3, 3));
    assert_eq!(result.values.get(0, 0), 10.0);
    assert_eq!(result.values.get(2, 0), 20.0);
    assert_eq!(result.values.get(0, 2), 30.0);
    assert_relative_eq!(result.values.get(2, 2), 22.0, epsilon = 1e-12);
    assert!(result.variance.is_none());
    assert_eq!(result.diagnostics.text("method"), Some("idw"));
    assert_eq!(result.diagnostics.count("samples"), Some(3));
    assert_eq!(result.diagnostics.count("cells"), Some(9));

    let records: Vec<GridRecord> = result.records().collect();
    assert_eq!(records.len(), 9);
    assert_eq!((records[2].x, records[2].y, records[2].value), (1.0, 0.0, 20.0));
}

#[test]
fn test_every_method_produces_full_grid() {
    let samples = field_samples();
    for (tag, _) in registry() {
        let engine = Engine::builder()
            .method_tag(tag)
            .unwrap()
            .grid_resolution(16, 12)
            .build()
            .unwrap();
        let result = engine
            .compute(&samples)
            .unwrap_or_else(|e| panic!("{tag} failed: {e}"));
        assert_eq!(result.values.shape(), (16, 12));
        let locs: Vec<Coord> = samples.iter().map(SamplePoint::location).collect();
        assert!(result.spec.encloses(&locs));
        assert_eq!(
            result.variance.is_some(),
            tag.starts_with("kriging"),
            "{tag} variance presence"
        );
    }
}

#[test]
fn test_exact_methods_reproduce_samples_on_grid() {
    // Samples placed on grid nodes of a 0..4 lattice with 5x5 resolution.
    let samples: Vec<SamplePoint> = [(0, 0), (4, 0), (0, 4), (4, 4), (1, 3), (3, 1), (2, 2)]
        .iter()
        .map(|&(i, j)| {
            let (x, y) = (i as f64, j as f64);
            SamplePoint::at(x, y, x * x - y + 3.0)
        })
        .collect();
    let locs: Vec<Coord> = samples.iter().map(SamplePoint::location).collect();
    let grid = build_grid(&locs, (5, 5), 0.0).unwrap();

    for tag in ["idw", "nearest", "linear", "cubic", "rbf_multiquadric", "kriging_ordinary"] {
        let method: InterpolationMethod = tag.parse().unwrap();
        let result = interpolate(&samples, &grid, &method).unwrap();
        for s in &samples {
            let c = s.location();
            let v = result.values.get(c.x as usize, c.y as usize);
            assert_relative_eq!(v, s.value(), epsilon = 1e-6);
        }
    }
}

#[test]
fn test_triangulation_methods_need_planar_support() {
    let engine = Engine::builder().method_tag("linear").unwrap().build().unwrap();
    let collinear = vec![
        SamplePoint::at(0.0, 0.0, 1.0),
        SamplePoint::at(1.0, 1.0, 2.0),
        SamplePoint::at(2.0, 2.0, 3.0),
    ];
    let err = engine.compute(&collinear).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let two = vec![SamplePoint::at(0.0, 0.0, 1.0), SamplePoint::at(1.0, 0.0, 2.0)];
    for tag in ["cubic", "rbf_gaussian", "kriging_ordinary"] {
        let engine = Engine::builder().method_tag(tag).unwrap().build().unwrap();
        let err = engine.compute(&two).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData, "{tag}");
    }
}

#[test]
fn test_idw_and_nearest_accept_two_samples() {
    let two = vec![SamplePoint::at(0.0, 0.0, 1.0), SamplePoint::at(1.0, 0.0, 2.0)];
    for tag in ["idw", "nearest"] {
        let engine = Engine::builder().method_tag(tag).unwrap().build().unwrap();
        assert!(engine.compute(&two).is_ok());
    }
}

#[test]
fn test_invalid_samples() {
    let engine = Engine::builder().build().unwrap();
    let err = engine.compute(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let bad = vec![
        SamplePoint::at(0.0, 0.0, f64::NAN),
        SamplePoint::at(1.0, 0.0, 2.0),
    ];
    let err = engine.compute(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);
}

#[test]
fn test_grid_must_enclose_samples() {
    let grid = GridSpec::new(Bounds::new(0.0, 0.0, 0.5, 0.5), (4, 4)).unwrap();
    let err = interpolate(
        &corner_samples(),
        &grid,
        &InterpolationMethod::NearestNeighbor,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_builder_defaults() {
    let engine = Engine::builder().build().unwrap();
    let config = engine.config();
    assert_eq!(*config, EngineConfig::default());
    assert_eq!(config.grid_resolution, (100, 100));
    assert_relative_eq!(config.margin_fraction, 0.05);
    assert_eq!((config.color_low_pct, config.color_high_pct), (5.0, 95.0));
    assert_eq!(config.aggregation, AggregationPolicy::Mean);
    assert_eq!(config.non_detect, NonDetectPolicy::Drop);
    assert!(!config.log_scale);
}

#[test]
fn test_builder_duplicate_parameter() {
    let err = Engine::builder()
        .grid_resolution(10, 10)
        .log_scale(true)
        .grid_resolution(20, 20)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidParameter {
            parameter: "grid_resolution",
            reason: "set more than once on the builder".to_string(),
        }
    );
}

#[test]
fn test_builder_validates_values() {
    let cases = [
        Engine::builder().grid_resolution(1, 50).build(),
        Engine::builder().margin_fraction(-0.5).build(),
        Engine::builder().color_percentiles(90.0, 10.0).build(),
        Engine::builder()
            .aggregation(AggregationPolicy::Percentile(150.0))
            .build(),
        Engine::builder()
            .method(InterpolationMethod::Idw(IdwParams {
                power: 0.0,
                max_neighbors: None,
                smoothing: 0.0,
            }))
            .build(),
    ];
    for result in cases {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    let err = Engine::builder().method_tag("spline").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
}

#[test]
fn test_run_full_pipeline() {
    let centroids: BTreeMap<String, Coord> = [
        ("A", 0.0, 0.0),
        ("B", 4.0, 0.0),
        ("C", 0.0, 4.0),
        ("D", 4.0, 4.0),
    ]
    .iter()
    .map(|&(id, x, y)| (id.to_string(), Coord::new(x, y)))
    .collect();

    let raw: Vec<RawMeasurement<String>> = [
        ("A", 1.0),
        ("A", 3.0),
        ("B", 5.0),
        ("C", -1.0),
        ("C", 7.0),
        ("D", 9.0),
    ]
    .iter()
    .enumerate()
    .map(|(round, &(id, value))| RawMeasurement {
        location_id: id.to_string(),
        compound: "benzene".to_string(),
        round: round as u32,
        date: "2024-01-15".to_string(),
        value,
    })
    .collect();

    let engine = Engine::builder()
        .method_tag("linear")
        .unwrap()
        .grid_resolution(9, 9)
        .margin_fraction(0.0)
        .color_percentiles(0.0, 100.0)
        .build()
        .unwrap();
    let out = engine.run(&raw, &centroids).unwrap();

    assert_eq!(out.samples.len(), 4);
    assert_relative_eq!(out.samples["A"].value(), 2.0);
    assert_relative_eq!(out.samples["C"].value(), 7.0);
    assert_eq!(out.samples["C"].weight_count(), 1);

    assert_eq!(out.grid.values.shape(), (9, 9));
    assert_relative_eq!(out.grid.values.get(0, 0), 2.0, epsilon = 1e-12);
    assert_relative_eq!(out.color_scale.low, 2.0, epsilon = 1e-12);
    assert_relative_eq!(out.color_scale.high, 9.0, epsilon = 1e-12);

    let summary = out.summary.unwrap();
    assert_eq!(summary.count, 4);
    assert_relative_eq!(summary.mean, 23.0 / 4.0);
}

#[test]
fn test_log_scale_engine() {
    let engine = Engine::builder()
        .log_scale(true)
        .grid_resolution(10, 10)
        .build()
        .unwrap();
    let result = engine.compute(&corner_samples()).unwrap();
    let colors = engine.color_scale(&result).unwrap();
    assert!(colors.log);
    assert!(colors.low >= 1.0 && colors.high <= 30.0f64.log10() + 1e-12);
}

#[test]
fn test_compute_free_function_matches_engine() {
    let config = EngineConfig {
        grid_resolution: (8, 6),
        ..EngineConfig::default()
    };
    let samples = field_samples();
    let a = compute(&samples, &config).unwrap();
    let b = Engine::from_config(config).unwrap().compute(&samples).unwrap();
    assert_eq!(a.values, b.values);
}

#[test]
fn test_fingerprint() {
    let samples = corner_samples();
    let config = EngineConfig::default();
    let base = fingerprint(&samples, &config);
    assert_eq!(base, fingerprint(&samples, &config));

    let mut moved = samples.clone();
    moved[1] = SamplePoint::at(1.0, 0.0, 20.5);
    assert_ne!(base, fingerprint(&moved, &config));

    let log = EngineConfig {
        log_scale: true,
        ..config
    };
    assert_ne!(base, fingerprint(&samples, &log));

    let power = EngineConfig {
        method: InterpolationMethod::Idw(IdwParams {
            power: 2.5,
            max_neighbors: None,
            smoothing: 0.0,
        }),
        ..config
    };
    assert_ne!(base, fingerprint(&samples, &power));
}

#[test]
fn test_engine_compare() {
    let engine = Engine::builder().grid_resolution(10, 10).build().unwrap();
    let methods = [
        InterpolationMethod::Idw(IdwParams::default()),
        InterpolationMethod::Linear,
        InterpolationMethod::NearestNeighbor,
    ];
    let report = engine.compare(&field_samples(), &methods).unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(report.failures().count(), 0);
    for (_, entry) in report.iter() {
        let run = entry.outcome.as_ref().unwrap();
        let cv = run.cross_validation.as_ref().unwrap();
        assert_eq!(cv.residuals.len(), 30);
    }
}

#[test]
fn test_piecewise_reports_extrapolated_cells() {
    let engine = Engine::builder()
        .method_tag("linear")
        .unwrap()
        .grid_resolution(20, 20)
        .margin_fraction(0.2)
        .build()
        .unwrap();
    let result = engine.compute(&corner_samples()).unwrap();
    let extrapolated = result.diagnostics.count("extrapolated_cells").unwrap();
    assert!(extrapolated > 0 && extrapolated < 400);
    assert!(result.values.as_slice().iter().all(|v| v.is_finite()));
}

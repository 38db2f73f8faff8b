use tract_surface::prelude::*;

fn samples() -> Vec<SamplePoint> {
    let mut pts = Vec::new();
    for j in 0..4 {
        for i in 0..4 {
            let (x, y) = (i as f64, j as f64 + 0.1 * i as f64);
            pts.push(SamplePoint::at(x, y, 1.0 + x + 0.5 * y));
        }
    }
    pts
}

fn grid(samples: &[SamplePoint]) -> GridSpec {
    let locs: Vec<Coord> = samples.iter().map(SamplePoint::location).collect();
    build_grid(&locs, (12, 12), 0.05).unwrap()
}

#[test]
fn test_compare_runs_every_method() {
    let pts = samples();
    let methods: Vec<InterpolationMethod> = registry()
        .iter()
        .map(|(tag, _)| tag.parse().unwrap())
        .collect();
    let report = compare(&pts, &grid(&pts), &methods);

    assert_eq!(report.len(), 10);
    for (key, entry) in report.iter() {
        assert_eq!(entry.method.id(), key);
    }
    let idw = report.get("idw").unwrap();
    let run = idw.outcome.as_ref().unwrap();
    assert_eq!(run.result.values.shape(), (12, 12));
    assert!(idw.rmse().unwrap() >= 0.0);
    assert!(report.best_by_rmse().is_some());
}

#[test]
fn test_compare_repeated_tags_get_suffixes() {
    let pts = samples();
    let methods = [
        InterpolationMethod::Idw(IdwParams::default()),
        InterpolationMethod::Idw(IdwParams {
            power: 4.0,
            max_neighbors: None,
            smoothing: 0.0,
        }),
        InterpolationMethod::NearestNeighbor,
    ];
    let report = compare(&pts, &grid(&pts), &methods);
    let keys: Vec<&str> = report.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["idw", "idw#2", "nearest"]);
    match report.get("idw#2").unwrap().method {
        InterpolationMethod::Idw(p) => assert_eq!(p.power, 4.0),
        other => panic!("unexpected method {other:?}"),
    }
}

#[test]
fn test_compare_isolates_failures() {
    // Collinear samples: triangulation-based methods fail, IDW does not.
    let pts: Vec<SamplePoint> = (0..6)
        .map(|i| SamplePoint::at(i as f64, 2.0 * i as f64, i as f64))
        .collect();
    let locs: Vec<Coord> = pts.iter().map(SamplePoint::location).collect();
    let grid = build_grid(&locs, (8, 8), 0.05).unwrap();
    let methods = [
        InterpolationMethod::Linear,
        InterpolationMethod::Idw(IdwParams::default()),
    ];
    let report = compare(&pts, &grid, &methods);

    let failures: Vec<(&str, &EngineError)> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "linear");
    assert_eq!(failures[0].1.kind(), ErrorKind::InsufficientData);
    assert!(report.get("idw").unwrap().outcome.is_ok());
    assert_eq!(report.best_by_rmse(), Some("idw"));

    let table = report.to_string();
    assert!(table.contains("failed"));
    assert!(table.contains("idw"));
}

#[test]
fn test_compare_empty_method_list() {
    let pts = samples();
    let report = compare(&pts, &grid(&pts), &[]);
    assert!(report.is_empty());
    assert_eq!(report.best_by_rmse(), None);
}

#[test]
fn test_cross_validation_folds_need_planar_support() {
    // Holding out the off-line sample leaves three collinear locations.
    let pts = vec![
        SamplePoint::at(0.0, 0.0, 1.0),
        SamplePoint::at(1.5, 0.0, 2.0),
        SamplePoint::at(3.0, 0.0, 3.0),
        SamplePoint::at(1.5, 1.2, 5.0),
    ];
    let tags = [
        "rbf_multiquadric",
        "rbf_gaussian",
        "rbf_thin_plate",
        "rbf_linear",
        "kriging_ordinary",
        "kriging_universal",
        "idw",
    ];
    let methods: Vec<InterpolationMethod> = tags.iter().map(|t| t.parse().unwrap()).collect();
    let report = compare(&pts, &grid(&pts), &methods);

    for tag in &tags[..6] {
        let run = report
            .get(tag)
            .unwrap()
            .outcome
            .as_ref()
            .unwrap_or_else(|e| panic!("{tag} failed: {e}"));
        let err = run.cross_validation.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData, "{tag}");
    }
    assert!(report.get("idw").unwrap().rmse().is_some());
}

use approx::assert_relative_eq;
use std::collections::BTreeMap;
use tract_surface::prelude::*;

fn centroids() -> BTreeMap<&'static str, Coord> {
    BTreeMap::from([
        ("06001400100", Coord::new(-122.23, 37.86)),
        ("06001400200", Coord::new(-122.25, 37.85)),
        ("06001400300", Coord::new(-122.26, 37.84)),
    ])
}

#[test]
fn test_aggregate_values_policies() {
    let v = [5.0, 15.0, 25.0];
    assert_relative_eq!(aggregate_values(&v, AggregationPolicy::Mean).unwrap(), 15.0);
    assert_relative_eq!(aggregate_values(&v, AggregationPolicy::Median).unwrap(), 15.0);
    assert_relative_eq!(aggregate_values(&v, AggregationPolicy::Max).unwrap(), 25.0);
    assert_relative_eq!(
        aggregate_values(&v, AggregationPolicy::Percentile(75.0)).unwrap(),
        20.0
    );
    assert_relative_eq!(
        aggregate_values(&v, AggregationPolicy::Percentile(0.0)).unwrap(),
        5.0
    );
}

#[test]
fn test_aggregate_values_ignores_non_finite() {
    let v = [1.0, f64::NAN, 3.0];
    assert_relative_eq!(aggregate_values(&v, AggregationPolicy::Mean).unwrap(), 2.0);

    let err = aggregate_values(&[f64::NAN], AggregationPolicy::Mean).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);
}

#[test]
fn test_percentile_out_of_range() {
    for p in [-1.0, 100.5, f64::NAN] {
        let err = aggregate_values(&[1.0], AggregationPolicy::Percentile(p)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}

#[test]
fn test_aggregate_groups_by_location() {
    let raw = [
        ("06001400100", 5.0),
        ("06001400200", 1.0),
        ("06001400100", 15.0),
        ("06001400100", 25.0),
    ];
    let out = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Drop,
    )
    .unwrap();

    assert_eq!(out.len(), 2);
    let a = out["06001400100"];
    assert_relative_eq!(a.value(), 15.0);
    assert_eq!(a.weight_count(), 3);
    assert_eq!(a.location(), Coord::new(-122.23, 37.86));
    assert_eq!(out["06001400200"].weight_count(), 1);
}

#[test]
fn test_non_detect_policies() {
    let raw = [("06001400100", -1.0), ("06001400100", 4.0)];

    let dropped = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Drop,
    )
    .unwrap();
    assert_relative_eq!(dropped["06001400100"].value(), 4.0);
    assert_eq!(dropped["06001400100"].weight_count(), 1);

    let substituted = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Substitute(0.5),
    )
    .unwrap();
    assert_relative_eq!(substituted["06001400100"].value(), 2.25);

    let err = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Substitute(-1.0),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_group_empty_after_filtering() {
    let raw = [("06001400300", -2.0), ("06001400300", f64::NAN)];
    let err = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Drop,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);
}

#[test]
fn test_missing_or_bad_centroid() {
    let raw = [("06009999999", 1.0)];
    let err = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &centroids(),
        AggregationPolicy::Mean,
        NonDetectPolicy::Drop,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);

    let mut bad = centroids();
    bad.insert("06001400100", Coord::new(f64::NAN, 37.0));
    let raw = [("06001400100", 1.0)];
    let err = aggregate(
        raw.iter().map(|(k, v)| (k, *v)),
        &bad,
        AggregationPolicy::Mean,
        NonDetectPolicy::Drop,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);
}

#[test]
fn test_raw_measurement_pairs() {
    let raw = vec![
        RawMeasurement {
            location_id: 7u32,
            compound: "benzene".to_string(),
            round: 1,
            date: "2023-05-01".to_string(),
            value: 2.0,
        },
        RawMeasurement {
            location_id: 7u32,
            compound: "benzene".to_string(),
            round: 2,
            date: "2023-08-01".to_string(),
            value: 6.0,
        },
    ];
    let centroids = BTreeMap::from([(7u32, Coord::new(1.0, 2.0))]);
    let out = aggregate(
        raw.iter().map(RawMeasurement::as_pair),
        &centroids,
        AggregationPolicy::Max,
        NonDetectPolicy::Drop,
    )
    .unwrap();
    assert_relative_eq!(out[&7].value(), 6.0);
}

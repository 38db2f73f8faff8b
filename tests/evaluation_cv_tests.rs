#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use tract_surface::internals::evaluation::cv::{CrossValidation, leave_one_out};
use tract_surface::internals::primitives::errors::{EngineError, ErrorKind};
use tract_surface::internals::primitives::sample::{SamplePoint, SampleSet};

fn samples() -> SampleSet {
    SampleSet::from_points(&[
        SamplePoint::at(0.0, 0.0, 1.0),
        SamplePoint::at(1.0, 0.0, 2.0),
        SamplePoint::at(0.0, 1.0, 3.0),
        SamplePoint::at(1.0, 1.0, 6.0),
    ])
}

#[test]
fn test_scores_from_residuals() {
    let cv = CrossValidation::from_residuals(vec![1.0, -1.0, 3.0, -3.0]).unwrap();
    assert_relative_eq!(cv.bias, 0.0);
    assert_relative_eq!(cv.mae, 2.0);
    assert_relative_eq!(cv.rmse, 5.0f64.sqrt());
    assert!(CrossValidation::from_residuals(Vec::new()).is_none());
}

#[test]
fn test_leave_one_out_mean_predictor() {
    let set = samples();
    let cv = leave_one_out(&set, |training, _| {
        assert_eq!(training.len(), 3);
        Ok(training.values.iter().sum::<f64>() / training.len() as f64)
    })
    .unwrap();
    // Holding out v from total 12 predicts (12 - v) / 3.
    let expected: Vec<f64> = [1.0, 2.0, 3.0, 6.0]
        .iter()
        .map(|v| (12.0 - v) / 3.0 - v)
        .collect();
    for (got, want) in cv.residuals.iter().zip(&expected) {
        assert_relative_eq!(*got, *want, epsilon = 1e-12);
    }
    assert!(cv.to_string().starts_with("rmse="));
}

#[test]
fn test_leave_one_out_perfect_predictor() {
    let set = samples();
    let truth = set.clone();
    let cv = leave_one_out(&set, |_, loc| {
        let i = (0..truth.len())
            .find(|&i| truth.coord(i) == *loc)
            .unwrap();
        Ok(truth.values[i])
    })
    .unwrap();
    assert_eq!(cv.rmse, 0.0);
}

#[test]
fn test_leave_one_out_errors() {
    let one = SampleSet::from_points(&[SamplePoint::at(0.0, 0.0, 1.0)]);
    let err = leave_one_out(&one, |_, _| Ok(0.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let err = leave_one_out(&samples(), |_, _| Ok(f64::NAN)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NumericalInstability);

    let err = leave_one_out(&samples(), |_, _| {
        Err(EngineError::UnsupportedMethod("x".to_string()))
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
}

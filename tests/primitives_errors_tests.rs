#![cfg(feature = "dev")]

use tract_surface::internals::primitives::errors::{EngineError, ErrorKind};

#[test]
fn test_engine_error_display() {
    let err = EngineError::InvalidMeasurement("tract 12 has no centroid".to_string());
    assert_eq!(
        format!("{}", err),
        "Invalid measurement: tract 12 has no centroid"
    );

    let err = EngineError::InsufficientData {
        got: 2,
        min: 3,
        context: "Linear Interpolation".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "Insufficient data: got 2 usable locations, need at least 3 (Linear Interpolation)"
    );

    let err = EngineError::InvalidParameter {
        parameter: "power",
        reason: "-1 must be finite and positive".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "Invalid parameter 'power': -1 must be finite and positive"
    );

    let err = EngineError::NumericalInstability("pivot ratio 1e-16".to_string());
    assert_eq!(format!("{}", err), "Numerical instability: pivot ratio 1e-16");

    let err = EngineError::UnsupportedMethod("spline".to_string());
    assert_eq!(format!("{}", err), "Unsupported method: 'spline'");
}

#[test]
fn test_engine_error_kind() {
    let cases = [
        (
            EngineError::InvalidMeasurement(String::new()),
            ErrorKind::InvalidMeasurement,
        ),
        (
            EngineError::InsufficientData {
                got: 0,
                min: 1,
                context: String::new(),
            },
            ErrorKind::InsufficientData,
        ),
        (
            EngineError::InvalidParameter {
                parameter: "sill",
                reason: String::new(),
            },
            ErrorKind::InvalidParameter,
        ),
        (
            EngineError::NumericalInstability(String::new()),
            ErrorKind::NumericalInstability,
        ),
        (
            EngineError::UnsupportedMethod(String::new()),
            ErrorKind::UnsupportedMethod,
        ),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn test_error_kind_display() {
    assert_eq!(ErrorKind::InsufficientData.to_string(), "insufficient data");
    assert_eq!(
        ErrorKind::NumericalInstability.to_string(),
        "numerical instability"
    );
}

#[test]
fn test_engine_error_is_std_error() {
    let err: Box<dyn std::error::Error> =
        Box::new(EngineError::UnsupportedMethod("x".to_string()));
    assert!(err.to_string().contains("'x'"));
}

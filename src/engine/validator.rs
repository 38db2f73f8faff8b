//! Input validation for interpolation runs.
//!
//! ## Purpose
//!
//! This module checks samples, grids and configuration before any method
//! runs, so algorithms can assume well-formed input.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive; geometry
//!   checks run last and only for methods that need them.
//!
//! ## Invariants
//!
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not repair input (no deduplication or clamping).

// Internal dependencies
use crate::engine::registry::InterpolationMethod;
use crate::math::geometry::{distinct_count, spans_plane};
use crate::primitives::errors::EngineError;
use crate::primitives::grid::GridSpec;
use crate::primitives::sample::{Coord, SamplePoint, SampleSet};

/// Validation utility for engine input.
///
/// All methods return `Result<(), EngineError>` and fail fast on the first
/// violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Sample Validation
    // ========================================================================

    /// Samples must be non-empty with finite coordinates and values.
    pub fn validate_samples(samples: &[SamplePoint]) -> Result<(), EngineError> {
        if samples.is_empty() {
            return Err(EngineError::insufficient(0, 1, "interpolation"));
        }
        for (i, s) in samples.iter().enumerate() {
            let c = s.location();
            if !c.is_finite() {
                return Err(EngineError::InvalidMeasurement(format!(
                    "sample {i} has non-finite location ({}, {})",
                    c.x, c.y
                )));
            }
            if !s.value().is_finite() {
                return Err(EngineError::InvalidMeasurement(format!(
                    "sample {i} has non-finite value {}",
                    s.value()
                )));
            }
        }
        Ok(())
    }

    /// At least three distinct locations that are not all collinear.
    pub fn validate_planar_support(
        locations: &[Coord],
        context: &str,
    ) -> Result<(), EngineError> {
        let distinct = distinct_count(locations);
        if distinct < 3 {
            return Err(EngineError::insufficient(distinct, 3, context));
        }
        if !spans_plane(locations) {
            return Err(EngineError::insufficient(
                distinct,
                3,
                format!("{context}; all locations are collinear"),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Grid Validation
    // ========================================================================

    /// Every sample must lie inside the grid bounds.
    pub fn validate_grid_encloses(grid: &GridSpec, locations: &[Coord]) -> Result<(), EngineError> {
        if let Some(c) = locations.iter().find(|c| !grid.bounds().contains(c)) {
            let b = grid.bounds();
            return Err(EngineError::invalid_parameter(
                "bounds",
                format!(
                    "({}, {}, {}, {}) do not enclose sample at ({}, {})",
                    b.xmin, b.ymin, b.xmax, b.ymax, c.x, c.y
                ),
            ));
        }
        Ok(())
    }

    /// Resolution must be at least 2 in each direction.
    pub fn validate_resolution(resolution: (usize, usize)) -> Result<(), EngineError> {
        let (nx, ny) = resolution;
        if nx < 2 || ny < 2 {
            return Err(EngineError::invalid_parameter(
                "grid_resolution",
                format!("({nx}, {ny}) must be at least 2 in each direction"),
            ));
        }
        Ok(())
    }

    /// Margin fraction must be finite and non-negative.
    pub fn validate_margin(margin: f64) -> Result<(), EngineError> {
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(EngineError::invalid_parameter(
                "margin_fraction",
                format!("{margin} must be finite and non-negative"),
            ));
        }
        Ok(())
    }

    /// `0 <= low < high <= 100`.
    pub fn validate_color_percentiles(low: f64, high: f64) -> Result<(), EngineError> {
        if !((0.0..=100.0).contains(&low) && (0.0..=100.0).contains(&high) && low < high) {
            return Err(EngineError::invalid_parameter(
                "color_percentiles",
                format!("({low}, {high}) must satisfy 0 <= low < high <= 100"),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Run Validation
    // ========================================================================

    /// Full pre-dispatch check of one interpolation run.
    pub fn validate_run(
        samples: &[SamplePoint],
        grid: &GridSpec,
        method: &InterpolationMethod,
    ) -> Result<(), EngineError> {
        Self::validate_samples(samples)?;
        method.validate()?;
        let locations: Vec<Coord> = samples.iter().map(SamplePoint::location).collect();
        Self::validate_grid_encloses(grid, &locations)?;
        if method.needs_planar_support() {
            Self::validate_planar_support(&locations, method.description())?;
        }
        Ok(())
    }

    /// Checks a refit on a subset of already validated samples must pass,
    /// such as a leave-one-out training fold.
    pub fn validate_refit(
        training: &SampleSet,
        method: &InterpolationMethod,
    ) -> Result<(), EngineError> {
        if training.is_empty() {
            return Err(EngineError::insufficient(0, 1, "interpolation"));
        }
        if method.needs_planar_support() {
            let locations: Vec<Coord> = (0..training.len()).map(|i| training.coord(i)).collect();
            Self::validate_planar_support(&locations, method.description())?;
        }
        Ok(())
    }
}

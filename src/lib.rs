//! # tract-surface: spatial interpolation and aggregation for sampled fields
//!
//! Turns scattered point measurements (concentrations sampled at census-tract
//! centroids, for example) into continuous gridded surfaces suitable for
//! contour rendering and export.
//!
//! ## What it does
//!
//! 1. **Aggregate** raw `(location_id, value)` records into one
//!    [`SamplePoint`](prelude::SamplePoint) per location (mean, median, max or
//!    a percentile), with explicit handling of below-detection values.
//! 2. **Grid** the sample extent with a configurable margin and resolution.
//! 3. **Interpolate** with one of ten registered methods:
//!
//! | Tag                 | Method                                       | Variance |
//! |---------------------|----------------------------------------------|----------|
//! | `idw`               | Inverse distance weighting                   | no       |
//! | `nearest`           | Nearest neighbour                            | no       |
//! | `linear`            | Barycentric over a Delaunay triangulation    | no       |
//! | `cubic`             | Bernstein–Bézier patches over a triangulation| no       |
//! | `rbf_multiquadric`  | Radial basis functions, multiquadric kernel  | no       |
//! | `rbf_gaussian`      | Radial basis functions, Gaussian kernel      | no       |
//! | `rbf_thin_plate`    | Radial basis functions, thin-plate kernel    | no       |
//! | `rbf_linear`        | Radial basis functions, linear kernel        | no       |
//! | `kriging_ordinary`  | Ordinary kriging with a fitted variogram     | yes      |
//! | `kriging_universal` | Universal kriging with polynomial drift      | yes      |
//!
//! 4. **Scale colors** robustly from grid percentiles, optionally in log10.
//! 5. **Compare** methods side by side with timings and leave-one-out
//!    cross-validation.
//!
//! ## Quick start
//!
//! ```
//! use tract_surface::prelude::*;
//!
//! let samples = vec![
//!     SamplePoint::at(0.0, 0.0, 10.0),
//!     SamplePoint::at(1.0, 0.0, 20.0),
//!     SamplePoint::at(0.0, 1.0, 30.0),
//! ];
//!
//! let engine = Engine::builder()
//!     .method(InterpolationMethod::Idw(IdwParams::default()))
//!     .grid_resolution(20, 20)
//!     .build()?;
//!
//! let grid = engine.compute(&samples)?;
//! let colors = engine.color_scale(&grid)?;
//!
//! assert_eq!(grid.values.shape(), (20, 20));
//! assert!(colors.low <= colors.high);
//! # Ok::<(), EngineError>(())
//! ```
//!
//! ## Errors
//!
//! Every operation returns a typed [`EngineError`](prelude::EngineError). The
//! engine never substitutes another method on failure; the comparison
//! harness is the only place failures are recorded instead of returned.
//!
//! ## Features
//!
//! * `parallel` (default): evaluate grid rows and compared methods on rayon.
//! * `serde`: `Serialize`/`Deserialize` for configuration and value types.
//! * `dev`: expose internal modules under `internals` for testing.

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - value types and buffers.
//
// Contains the error taxonomy, sample and grid containers, diagnostics and
// reusable search buffers.
mod primitives;

// Layer 2: Math - pure numerical building blocks.
//
// Contains distances, order statistics, the KD-tree, Delaunay triangulation,
// geometry predicates and dense factorisations.
mod math;

// Layer 3: Algorithms - interpolation methods.
//
// Contains aggregation, IDW, nearest neighbour, piecewise linear/cubic,
// variograms, kriging and radial basis functions.
mod algorithms;

// Layer 4: Evaluation - post-processing.
//
// Contains color scaling, leave-one-out cross-validation and grid masking.
mod evaluation;

// Layer 5: Engine - orchestration.
//
// Contains validation, the method registry, grid generation, dispatch and
// the comparison harness.
mod engine;

// High-level fluent API.
//
// Provides the `Engine` builder and pipeline entry points.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use tract_surface::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        AggregationPolicy, Bounds, ColorScale, ComparisonEntry, ComparisonReport, Coord,
        CrossValidation, DiagnosticValue, Diagnostics, DriftOrder, Engine, EngineBuilder,
        EngineConfig, EngineError, ErrorKind, GridRecord, GridResult, GridSpec, GridValues,
        IdwParams, InterpolationMethod, KrigingParams, MethodRun, NonDetectPolicy, RawMeasurement,
        RbfKernel, RbfParams, SampleSet, SamplePoint, Summary, SurfaceOutput, Variogram,
        VariogramFit, VariogramModel, aggregate, aggregate_values, build_grid, compare, compute,
        fingerprint, interpolate, registry, scale, summarize,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal interpolation algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal evaluation helpers.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal API module.
    pub mod api {
        pub use crate::api::*;
    }
}

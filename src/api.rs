//! High-level API for surface interpolation.
//!
//! ## Purpose
//!
//! This module is the primary user-facing entry point. It provides a fluent
//! builder that produces an immutable [`EngineConfig`], and an [`Engine`]
//! that runs the aggregation → grid → interpolation → color scale pipeline.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with defaults for every parameter.
//! * **Validated**: Parameters are validated once, in `.build()`.
//! * **Stateless**: An `Engine` only holds its configuration; every call
//!   recomputes from its inputs.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create an [`EngineBuilder`] via `Engine::builder()`.
//! 2. Chain configuration methods (`.method()`, `.grid_resolution()`, etc.).
//! 3. Call `.build()` to validate and obtain an [`Engine`].
//!
//! ### Caching
//!
//! The engine keeps no cache. Callers that memoise results key them on
//! [`fingerprint`], which covers the samples and every configuration field.

// External dependencies
use core::fmt::Debug;
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Internal dependencies
use crate::engine::grid_builder::{DEFAULT_MARGIN, DEFAULT_RESOLUTION};
use crate::engine::validator::Validator;
use crate::evaluation::color::{DEFAULT_HIGH_PCT, DEFAULT_LOW_PCT};

// Publicly re-exported types
pub use crate::algorithms::aggregation::{
    AggregationPolicy, NonDetectPolicy, aggregate, aggregate_values,
};
pub use crate::algorithms::idw::IdwParams;
pub use crate::algorithms::kriging::{DriftOrder, KrigingParams};
pub use crate::algorithms::rbf::{RbfKernel, RbfParams};
pub use crate::algorithms::variogram::{Variogram, VariogramFit, VariogramModel};
pub use crate::engine::comparison::{ComparisonEntry, ComparisonReport, MethodRun, compare};
pub use crate::engine::executor::interpolate;
pub use crate::engine::grid_builder::build as build_grid;
pub use crate::engine::registry::{InterpolationMethod, registry};
pub use crate::evaluation::color::{ColorScale, scale};
pub use crate::evaluation::cv::CrossValidation;
pub use crate::math::stats::{Summary, summarize};
pub use crate::primitives::errors::{EngineError, ErrorKind};
pub use crate::primitives::grid::{
    Bounds, DiagnosticValue, Diagnostics, GridRecord, GridResult, GridSpec, GridValues,
};
pub use crate::primitives::sample::{Coord, RawMeasurement, SamplePoint, SampleSet};

// ============================================================================
// Configuration
// ============================================================================

/// Validated engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Interpolation method and parameters.
    pub method: InterpolationMethod,
    /// Per-location reduction of raw measurements.
    pub aggregation: AggregationPolicy,
    /// Treatment of below-detection (negative) values.
    pub non_detect: NonDetectPolicy,
    /// Grid resolution `(nx, ny)`.
    pub grid_resolution: (usize, usize),
    /// Grid margin as a fraction of the sample span.
    pub margin_fraction: f64,
    /// Lower color percentile.
    pub color_low_pct: f64,
    /// Upper color percentile.
    pub color_high_pct: f64,
    /// Log-scaled colors.
    pub log_scale: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::default(),
            aggregation: AggregationPolicy::default(),
            non_detect: NonDetectPolicy::default(),
            grid_resolution: DEFAULT_RESOLUTION,
            margin_fraction: DEFAULT_MARGIN,
            color_low_pct: DEFAULT_LOW_PCT,
            color_high_pct: DEFAULT_HIGH_PCT,
            log_scale: false,
        }
    }
}

impl EngineConfig {
    /// Check every field.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.method.validate()?;
        self.aggregation.validate()?;
        self.non_detect.validate()?;
        Validator::validate_resolution(self.grid_resolution)?;
        Validator::validate_margin(self.margin_fraction)?;
        Validator::validate_color_percentiles(self.color_low_pct, self.color_high_pct)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    method: Option<InterpolationMethod>,
    aggregation: Option<AggregationPolicy>,
    non_detect: Option<NonDetectPolicy>,
    grid_resolution: Option<(usize, usize)>,
    margin_fraction: Option<f64>,
    color_percentiles: Option<(f64, f64)>,
    log_scale: Option<bool>,

    /// First parameter that was set more than once.
    duplicate_param: Option<&'static str>,
}

/// Record `name` as duplicated when the field is already set, then set it.
macro_rules! set_once {
    ($self:ident, $field:ident, $value:expr, $name:literal) => {{
        if $self.$field.is_some() && $self.duplicate_param.is_none() {
            $self.duplicate_param = Some($name);
        }
        $self.$field = Some($value);
        $self
    }};
}

impl EngineBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpolation method.
    pub fn method(mut self, method: InterpolationMethod) -> Self {
        set_once!(self, method, method, "method")
    }

    /// Set the method from a registry tag (`idw`, `kriging_ordinary`, ...).
    pub fn method_tag(self, tag: &str) -> Result<Self, EngineError> {
        Ok(self.method(tag.parse()?))
    }

    /// Set the aggregation policy.
    pub fn aggregation(mut self, policy: AggregationPolicy) -> Self {
        set_once!(self, aggregation, policy, "aggregation")
    }

    /// Set the non-detect policy.
    pub fn non_detect(mut self, policy: NonDetectPolicy) -> Self {
        set_once!(self, non_detect, policy, "non_detect")
    }

    /// Set the grid resolution.
    pub fn grid_resolution(mut self, nx: usize, ny: usize) -> Self {
        set_once!(self, grid_resolution, (nx, ny), "grid_resolution")
    }

    /// Set the grid margin fraction.
    pub fn margin_fraction(mut self, margin: f64) -> Self {
        set_once!(self, margin_fraction, margin, "margin_fraction")
    }

    /// Set the color scale percentiles.
    pub fn color_percentiles(mut self, low: f64, high: f64) -> Self {
        set_once!(self, color_percentiles, (low, high), "color_percentiles")
    }

    /// Enable or disable log-scaled colors.
    pub fn log_scale(mut self, enabled: bool) -> Self {
        set_once!(self, log_scale, enabled, "log_scale")
    }

    /// Validate and build the engine.
    pub fn build(self) -> Result<Engine, EngineError> {
        if let Some(name) = self.duplicate_param {
            return Err(EngineError::invalid_parameter(
                name,
                "set more than once on the builder",
            ));
        }
        let defaults = EngineConfig::default();
        let (color_low_pct, color_high_pct) = self
            .color_percentiles
            .unwrap_or((defaults.color_low_pct, defaults.color_high_pct));
        let config = EngineConfig {
            method: self.method.unwrap_or(defaults.method),
            aggregation: self.aggregation.unwrap_or(defaults.aggregation),
            non_detect: self.non_detect.unwrap_or(defaults.non_detect),
            grid_resolution: self.grid_resolution.unwrap_or(defaults.grid_resolution),
            margin_fraction: self.margin_fraction.unwrap_or(defaults.margin_fraction),
            color_low_pct,
            color_high_pct,
            log_scale: self.log_scale.unwrap_or(defaults.log_scale),
        };
        Engine::from_config(config)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Output of the full pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOutput<K> {
    /// Aggregated samples keyed by location.
    pub samples: BTreeMap<K, SamplePoint>,
    /// Interpolated grid.
    pub grid: GridResult,
    /// Color scale for rendering `grid`.
    pub color_scale: ColorScale,
    /// Summary of the aggregated sample values.
    pub summary: Option<Summary>,
}

/// Interpolation engine bound to one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Start a builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Engine from an explicit configuration.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Grid enclosing `samples` at the configured resolution and margin.
    pub fn grid_for(&self, samples: &[SamplePoint]) -> Result<GridSpec, EngineError> {
        let locations: Vec<Coord> = samples.iter().map(SamplePoint::location).collect();
        build_grid(
            &locations,
            self.config.grid_resolution,
            self.config.margin_fraction,
        )
    }

    /// Interpolate `samples` on a grid generated from their locations.
    pub fn compute(&self, samples: &[SamplePoint]) -> Result<GridResult, EngineError> {
        Validator::validate_samples(samples)?;
        let grid = self.grid_for(samples)?;
        interpolate(samples, &grid, &self.config.method)
    }

    /// Interpolate `samples` on a caller-supplied grid.
    pub fn compute_on(
        &self,
        samples: &[SamplePoint],
        grid: &GridSpec,
    ) -> Result<GridResult, EngineError> {
        interpolate(samples, grid, &self.config.method)
    }

    /// Color scale of `result` with the configured percentiles.
    pub fn color_scale(&self, result: &GridResult) -> Result<ColorScale, EngineError> {
        scale(
            &result.values,
            self.config.color_low_pct,
            self.config.color_high_pct,
            self.config.log_scale,
        )
    }

    /// Full pipeline: aggregate raw measurements, build the grid, interpolate
    /// and derive the color scale.
    pub fn run<K>(
        &self,
        raw: &[RawMeasurement<K>],
        centroids: &BTreeMap<K, Coord>,
    ) -> Result<SurfaceOutput<K>, EngineError>
    where
        K: Ord + Clone + Debug,
    {
        let samples = aggregate(
            raw.iter().map(RawMeasurement::as_pair),
            centroids,
            self.config.aggregation,
            self.config.non_detect,
        )?;
        let points: Vec<SamplePoint> = samples.values().copied().collect();
        let grid = self.compute(&points)?;
        let color_scale = self.color_scale(&grid)?;
        let values: Vec<f64> = points.iter().map(SamplePoint::value).collect();
        log::debug!(
            "pipeline: {} raw records -> {} samples -> {:?} grid",
            raw.len(),
            points.len(),
            grid.spec.resolution()
        );
        Ok(SurfaceOutput {
            samples,
            grid,
            color_scale,
            summary: summarize(&values),
        })
    }

    /// Compare `methods` on a grid generated from the samples.
    pub fn compare(
        &self,
        samples: &[SamplePoint],
        methods: &[InterpolationMethod],
    ) -> Result<ComparisonReport, EngineError> {
        Validator::validate_samples(samples)?;
        let grid = self.grid_for(samples)?;
        Ok(compare(samples, &grid, methods))
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Interpolate `samples` with `config`; equivalent to
/// `Engine::from_config(*config)?.compute(samples)`.
pub fn compute(samples: &[SamplePoint], config: &EngineConfig) -> Result<GridResult, EngineError> {
    Engine::from_config(*config)?.compute(samples)
}

/// Cache key over the samples and every configuration field.
///
/// Equal inputs always produce equal keys within one build of the crate.
pub fn fingerprint(samples: &[SamplePoint], config: &EngineConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    samples.len().hash(&mut hasher);
    for s in samples {
        let c = s.location();
        c.x.to_bits().hash(&mut hasher);
        c.y.to_bits().hash(&mut hasher);
        s.value().to_bits().hash(&mut hasher);
    }
    // Debug output of f64 round-trips, so it distinguishes every parameter.
    format!("{config:?}").hash(&mut hasher);
    hasher.finish()
}

//! Method dispatch and grid evaluation.
//!
//! ## Purpose
//!
//! This module turns an [`InterpolationMethod`] into a fitted surface and
//! evaluates it over a [`GridSpec`], producing a [`GridResult`].
//!
//! ## Design notes
//!
//! * **Closed dispatch**: [`FittedSurface`] is an enum over the concrete
//!   surfaces; fitting is an exhaustive `match` on the method.
//! * **Fit once**: Trees, triangulations and factorisations are built before
//!   the grid loop; the loop only calls `estimate`.
//! * **Parallel rows**: With the `parallel` feature, grid rows are evaluated
//!   on rayon workers, each with its own [`Scratch`]. Row results are
//!   reassembled in order, so output does not depend on scheduling.
//!
//! ## Invariants
//!
//! * Result shapes equal the grid resolution.
//! * Input is validated before any fitting.
//!
//! ## Non-goals
//!
//! * Caching fitted surfaces across calls.
//! * Falling back to another method on failure.

// Feature-gated imports
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::algorithms::idw::IdwSurface;
use crate::algorithms::kriging::{KrigingKind, KrigingSurface};
use crate::algorithms::nearest::NearestSurface;
use crate::algorithms::piecewise::{PiecewiseKind, PiecewiseSurface};
use crate::algorithms::rbf::RbfSurface;
use crate::algorithms::surface::{Estimate, Scratch, Surface};
use crate::engine::registry::InterpolationMethod;
use crate::engine::validator::Validator;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::{Diagnostics, GridResult, GridSpec, GridValues};
use crate::primitives::sample::{Coord, SamplePoint, SampleSet};

// ============================================================================
// Fitted Surface
// ============================================================================

/// A fitted surface of any registered method.
#[derive(Debug, Clone)]
pub enum FittedSurface {
    /// Inverse distance weighting.
    Idw(IdwSurface),
    /// Nearest neighbour.
    Nearest(NearestSurface),
    /// Triangulation-based linear or cubic.
    Piecewise(PiecewiseSurface),
    /// Ordinary or universal kriging.
    Kriging(KrigingSurface),
    /// Radial basis functions.
    Rbf(RbfSurface),
}

impl FittedSurface {
    /// Fit `method` to `samples`. Does not validate beyond what each method
    /// needs to build its structures.
    pub fn fit(samples: &SampleSet, method: &InterpolationMethod) -> Result<Self, EngineError> {
        let surface = match *method {
            InterpolationMethod::Idw(params) => Self::Idw(IdwSurface::fit(samples, params)?),
            InterpolationMethod::NearestNeighbor => Self::Nearest(NearestSurface::fit(samples)?),
            InterpolationMethod::Linear => {
                Self::Piecewise(PiecewiseSurface::fit(samples, PiecewiseKind::Linear)?)
            }
            InterpolationMethod::Cubic => {
                Self::Piecewise(PiecewiseSurface::fit(samples, PiecewiseKind::Cubic)?)
            }
            InterpolationMethod::OrdinaryKriging(ref params) => Self::Kriging(
                KrigingSurface::fit(samples, params, KrigingKind::Ordinary)?,
            ),
            InterpolationMethod::UniversalKriging { ref params, drift } => Self::Kriging(
                KrigingSurface::fit(samples, params, KrigingKind::Universal(drift))?,
            ),
            InterpolationMethod::Rbf(params) => Self::Rbf(RbfSurface::fit(samples, params)?),
        };
        Ok(surface)
    }

    fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Idw(s) => s,
            Self::Nearest(s) => s,
            Self::Piecewise(s) => s,
            Self::Kriging(s) => s,
            Self::Rbf(s) => s,
        }
    }
}

impl Surface for FittedSurface {
    #[inline]
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError> {
        self.as_surface().estimate(q, scratch)
    }

    fn diagnostics(&self) -> Diagnostics {
        self.as_surface().diagnostics()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Interpolate `samples` onto `grid` with `method`.
pub fn interpolate(
    samples: &[SamplePoint],
    grid: &GridSpec,
    method: &InterpolationMethod,
) -> Result<GridResult, EngineError> {
    Validator::validate_run(samples, grid, method)?;
    let set = SampleSet::from_points(samples);
    let surface = FittedSurface::fit(&set, method)?;
    log::debug!(
        "interpolating {} samples onto {:?} grid with {}",
        set.len(),
        grid.resolution(),
        method.id()
    );
    evaluate(&surface, &set, grid, method)
}

/// Fit `method` to `training` and estimate at `location`.
///
/// The training set gets the same support checks as a full run, so a fold
/// that `interpolate` would refuse fails here too.
pub fn predict(
    training: &SampleSet,
    method: &InterpolationMethod,
    location: &Coord,
) -> Result<f64, EngineError> {
    Validator::validate_refit(training, method)?;
    let surface = FittedSurface::fit(training, method)?;
    let mut scratch = Scratch::new(training.len());
    Ok(surface.estimate(location, &mut scratch)?.value)
}

// ============================================================================
// Grid Evaluation
// ============================================================================

fn evaluate(
    surface: &FittedSurface,
    samples: &SampleSet,
    grid: &GridSpec,
    method: &InterpolationMethod,
) -> Result<GridResult, EngineError> {
    let (nx, ny) = grid.resolution();
    let n = samples.len();

    let row = |scratch: &mut Scratch, iy: usize| -> Result<Vec<Estimate>, EngineError> {
        (0..nx)
            .map(|ix| surface.estimate(&grid.coord(ix, iy), scratch))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<Estimate>> = (0..ny)
        .into_par_iter()
        .map_init(|| Scratch::new(n), row)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<Estimate>> = {
        let mut scratch = Scratch::new(n);
        (0..ny)
            .map(|iy| row(&mut scratch, iy))
            .collect::<Result<_, _>>()?
    };

    let mut values = Vec::with_capacity(nx * ny);
    let mut variance = Vec::with_capacity(nx * ny);
    let mut has_variance = false;
    let mut extrapolated = 0usize;
    for est in rows.into_iter().flatten() {
        values.push(est.value);
        match est.variance {
            Some(v) => {
                has_variance = true;
                variance.push(v);
            }
            None => variance.push(f64::NAN),
        }
        if est.extrapolated {
            extrapolated += 1;
        }
    }

    let mut diagnostics = Diagnostics::new();
    diagnostics.insert("method", method.id());
    diagnostics.insert("samples", n);
    diagnostics.insert("cells", nx * ny);
    let fitted = surface.diagnostics();
    let has_fallback = fitted.contains("fallback");
    diagnostics.extend(fitted);
    if has_fallback {
        diagnostics.insert("extrapolated_cells", extrapolated);
    }

    let shape_error =
        || EngineError::NumericalInstability("grid evaluation produced a mis-shaped result".into());
    let values = GridValues::from_vec(nx, ny, values).ok_or_else(shape_error)?;
    let variance = if has_variance {
        Some(GridValues::from_vec(nx, ny, variance).ok_or_else(shape_error)?)
    } else {
        None
    };

    Ok(GridResult {
        spec: *grid,
        values,
        variance,
        diagnostics,
    })
}

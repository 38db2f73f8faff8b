//! Ordinary and universal kriging.
//!
//! ## Purpose
//!
//! Best linear unbiased prediction under a fitted semivariogram. Ordinary
//! kriging assumes an unknown constant mean; universal kriging models the mean
//! as a low-order polynomial drift in the coordinates.
//!
//! ## Design notes
//!
//! * **System**: `[Γ F; Fᵀ 0] [w; μ] = [γ₀; f₀]` with `Γᵢⱼ = γ(|xᵢ − xⱼ|)`
//!   and `F` the drift basis at the samples (a single column of ones for
//!   ordinary kriging).
//! * **Scaling**: `Γ` is divided by the sill and drift coordinates are centred
//!   and scaled to `[-1, 1]`, so pivot magnitudes reflect geometry rather than
//!   units.
//! * **Factorise once**: The LHS does not depend on the query, so one LU
//!   factorisation serves every grid cell and held-out location.
//! * **Variance**: `σ² = Σ wᵢγᵢ₀ + Σ μₖfₖ(x₀)`, clamped to `≥ 0`.
//!
//! ## Invariants
//!
//! * Weights sum to one (unbiasedness); universal weights also reproduce the
//!   drift basis exactly.
//! * With `exact_values`, queries on a sample return its value and zero
//!   variance.
//!
//! ## Non-goals
//!
//! * Local (moving-neighbourhood) kriging.
//! * Block kriging or external drift.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use nalgebra::DMatrix;

// Internal dependencies
use crate::algorithms::surface::{Estimate, Scratch, Surface};
use crate::algorithms::variogram::{FittedVariogram, Variogram};
use crate::math::distance::{distances_into, pairwise};
use crate::math::linalg::{DEFAULT_PIVOT_RATIO, FactorizedSystem, SystemStructure};
use crate::primitives::errors::EngineError;
use crate::primitives::grid::Diagnostics;
use crate::primitives::sample::{Coord, SampleSet};

/// Distance below which a query is treated as sitting on a sample.
const COINCIDENT: f64 = 1e-12;

// ============================================================================
// Parameters
// ============================================================================

/// Polynomial order of the universal kriging drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriftOrder {
    /// `1, x, y`.
    #[default]
    Linear,
    /// `1, x, y, x², xy, y²`.
    Quadratic,
}

impl DriftOrder {
    /// Number of drift basis functions, including the constant.
    #[inline]
    pub fn terms(&self) -> usize {
        match self {
            Self::Linear => 3,
            Self::Quadratic => 6,
        }
    }
}

impl Display for DriftOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Quadratic => f.write_str("quadratic"),
        }
    }
}

/// Mean model of a kriging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KrigingKind {
    /// Unknown constant mean.
    Ordinary,
    /// Polynomial drift.
    Universal(DriftOrder),
}

impl KrigingKind {
    /// Number of unbiasedness constraints.
    #[inline]
    pub fn drift_terms(&self) -> usize {
        match self {
            Self::Ordinary => 1,
            Self::Universal(order) => order.terms(),
        }
    }
}

/// Kriging parameters shared by both variants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KrigingParams {
    /// Variogram model and fitting strategy.
    pub variogram: Variogram,
    /// Return sample values verbatim at sample locations.
    pub exact_values: bool,
}

impl Default for KrigingParams {
    fn default() -> Self {
        Self {
            variogram: Variogram::default(),
            exact_values: true,
        }
    }
}

// ============================================================================
// Drift Basis
// ============================================================================

/// Maps coordinates to the centred, scaled drift basis.
#[derive(Debug, Clone, Copy)]
struct DriftBasis {
    terms: usize,
    cx: f64,
    cy: f64,
    scale: f64,
}

impl DriftBasis {
    fn new(samples: &SampleSet, terms: usize) -> Self {
        let (xmin, ymin, xmax, ymax) = samples.extent().unwrap_or((0.0, 0.0, 0.0, 0.0));
        let half = 0.5 * (xmax - xmin).max(ymax - ymin);
        Self {
            terms,
            cx: 0.5 * (xmin + xmax),
            cy: 0.5 * (ymin + ymax),
            scale: if half > 0.0 { 1.0 / half } else { 1.0 },
        }
    }

    fn fill(&self, c: &Coord, out: &mut [f64]) {
        let u = (c.x - self.cx) * self.scale;
        let v = (c.y - self.cy) * self.scale;
        let all = [1.0, u, v, u * u, u * v, v * v];
        out[..self.terms].copy_from_slice(&all[..self.terms]);
    }
}

// ============================================================================
// Fitted Surface
// ============================================================================

/// Kriging surface with a factorised system.
#[derive(Debug, Clone)]
pub struct KrigingSurface {
    samples: SampleSet,
    kind: KrigingKind,
    exact_values: bool,
    variogram: FittedVariogram,
    drift: DriftBasis,
    system: FactorizedSystem,
}

impl KrigingSurface {
    /// Fit the variogram, assemble and factorise the kriging system.
    pub fn fit(
        samples: &SampleSet,
        params: &KrigingParams,
        kind: KrigingKind,
    ) -> Result<Self, EngineError> {
        let n = samples.len();
        let m = kind.drift_terms();
        if n <= m {
            return Err(EngineError::insufficient(
                n,
                m + 1,
                format!("kriging with {m} drift terms"),
            ));
        }

        let variogram = params.variogram.fit(samples)?;
        let sill = variogram.sill;
        let drift = DriftBasis::new(samples, m);

        let dist = pairwise(&samples.xs, &samples.ys);
        let size = n + m;
        let mut lhs = DMatrix::<f64>::zeros(size, size);
        for i in 0..n {
            for j in (i + 1)..n {
                let g = variogram.gamma(dist[i * n + j]) / sill;
                lhs[(i, j)] = g;
                lhs[(j, i)] = g;
            }
        }
        let mut f = [0.0; 6];
        for i in 0..n {
            drift.fill(&samples.coord(i), &mut f);
            for k in 0..m {
                lhs[(i, n + k)] = f[k];
                lhs[(n + k, i)] = f[k];
            }
        }

        let system = FactorizedSystem::factor(lhs, SystemStructure::General, DEFAULT_PIVOT_RATIO)?;
        log::debug!(
            "kriging system factorised: n={n} drift_terms={m} pivot_ratio={:.3e}",
            system.pivot_ratio()
        );

        Ok(Self {
            samples: samples.clone(),
            kind,
            exact_values: params.exact_values,
            variogram,
            drift,
            system,
        })
    }

    /// Fitted variogram.
    pub fn variogram(&self) -> &FittedVariogram {
        &self.variogram
    }
}

impl Surface for KrigingSurface {
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError> {
        let n = self.samples.len();
        let m = self.kind.drift_terms();
        let sill = self.variogram.sill;

        distances_into(q, &self.samples.xs, &self.samples.ys, &mut scratch.distances);
        if self.exact_values {
            if let Some(i) = scratch.distances.iter().position(|&d| d < COINCIDENT) {
                return Ok(Estimate {
                    value: self.samples.values[i],
                    variance: Some(0.0),
                    extrapolated: false,
                });
            }
        }

        let rhs = &mut scratch.rhs;
        rhs.clear();
        rhs.ensure_capacity(n + m);
        rhs.extend(
            scratch
                .distances
                .iter()
                .map(|&d| self.variogram.gamma(d) / sill),
        );
        rhs.resize(n + m, 0.0);
        self.drift.fill(q, &mut rhs[n..]);

        let sol = self.system.solve(rhs.as_slice())?;
        let value: f64 = sol[..n]
            .iter()
            .zip(&self.samples.values)
            .map(|(w, v)| w * v)
            .sum();
        let variance: f64 = sol.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum();

        Ok(Estimate {
            value,
            variance: Some((variance * sill).max(0.0)),
            extrapolated: false,
        })
    }

    fn diagnostics(&self) -> Diagnostics {
        let v = &self.variogram;
        let mut d = Diagnostics::new();
        d.insert("variogram_model", v.model.to_string());
        d.insert("nugget", v.nugget);
        d.insert("sill", v.sill);
        d.insert("range", v.range);
        d.insert("variogram_rss", v.rss);
        d.insert("drift_terms", self.kind.drift_terms());
        if let KrigingKind::Universal(order) = self.kind {
            d.insert("drift", order.to_string());
        }
        d.insert("pivot_ratio", self.system.pivot_ratio());
        d
    }
}

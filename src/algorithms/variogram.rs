//! Empirical and model semivariograms.
//!
//! ## Purpose
//!
//! Kriging weights are driven by a semivariogram `γ(h)`. This module bins
//! the empirical semivariance of the samples by lag and fits one of the
//! standard model families to it, or validates caller-fixed parameters.
//!
//! ## Design notes
//!
//! * **Practical range**: Exponential and Gaussian models reach 95% of the
//!   partial sill at `h = range` (`exp(-3h/a)`, `exp(-3h²/a²)`).
//! * **Fitting**: Pair-count-weighted least squares over `(nugget, sill,
//!   range)`. A coarse grid is searched first, then a few refinement passes
//!   shrink the grid around the incumbent. Deterministic, derivative-free.
//! * **Degenerate data**: Constant sample values have zero semivariance
//!   everywhere; the fit falls back to a unit sill so the kriging system
//!   stays regular (weights do not depend on the sill scale).
//! * **Gaussian nugget floor**: Automatic Gaussian fits keep a nugget of at
//!   least `GAUSSIAN_MIN_NUGGET` of the sill. Fixed parameters are used as
//!   given.
//!
//! ## Invariants
//!
//! * `γ(0) = 0`, `0 ≤ nugget ≤ sill`, `range > 0` for every fitted model.
//! * Model semivariance is non-decreasing in `h`.
//!
//! ## Non-goals
//!
//! * Anisotropic or nested models.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};

// Internal dependencies
use crate::math::stats;
use crate::primitives::errors::EngineError;
use crate::primitives::sample::SampleSet;

/// Default number of lag bins.
pub const DEFAULT_LAGS: usize = 6;

/// Nugget floor of automatically fitted Gaussian models, relative to the sill.
/// A Gaussian model without nugget makes the kriging system numerically
/// singular once the range exceeds the sample spacing.
pub const GAUSSIAN_MIN_NUGGET: f64 = 1e-3;

/// Refinement passes after the coarse search.
const REFINE_PASSES: usize = 6;

/// Candidates per parameter in each refinement pass.
const REFINE_STEPS: usize = 5;

// ============================================================================
// Model Family
// ============================================================================

/// Variogram model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariogramModel {
    /// Spherical; reaches the sill exactly at `range`.
    Spherical,
    /// Exponential.
    Exponential,
    /// Gaussian.
    #[default]
    Gaussian,
}

impl VariogramModel {
    /// Normalised structure function in `[0, 1]` at lag `h` for range `a`.
    #[inline]
    pub fn shape(&self, h: f64, a: f64) -> f64 {
        let r = h / a;
        match self {
            Self::Spherical => {
                if r >= 1.0 {
                    1.0
                } else {
                    1.5 * r - 0.5 * r * r * r
                }
            }
            Self::Exponential => 1.0 - (-3.0 * r).exp(),
            Self::Gaussian => 1.0 - (-3.0 * r * r).exp(),
        }
    }

    /// Smallest nugget, as a fraction of the sill, the automatic fit may pick.
    #[inline]
    fn min_nugget_fraction(&self) -> f64 {
        match self {
            Self::Gaussian => GAUSSIAN_MIN_NUGGET,
            Self::Spherical | Self::Exponential => 0.0,
        }
    }
}

impl Display for VariogramModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Spherical => f.write_str("spherical"),
            Self::Exponential => f.write_str("exponential"),
            Self::Gaussian => f.write_str("gaussian"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// How variogram parameters are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariogramFit {
    /// Fit to the empirical variogram.
    #[default]
    Auto,
    /// Use caller-supplied parameters.
    Fixed {
        /// Semivariance discontinuity at the origin.
        nugget: f64,
        /// Total sill.
        sill: f64,
        /// (Practical) range.
        range: f64,
    },
}

/// Variogram specification used by the kriging methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variogram {
    /// Model family.
    pub model: VariogramModel,
    /// Fitting strategy.
    pub fit: VariogramFit,
    /// Number of lag bins of the empirical variogram.
    pub n_lags: usize,
}

impl Default for Variogram {
    fn default() -> Self {
        Self {
            model: VariogramModel::default(),
            fit: VariogramFit::Auto,
            n_lags: DEFAULT_LAGS,
        }
    }
}

impl Variogram {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.n_lags == 0 {
            return Err(EngineError::invalid_parameter(
                "n_lags",
                "must be at least 1",
            ));
        }
        if let VariogramFit::Fixed {
            nugget,
            sill,
            range,
        } = self.fit
        {
            if !(nugget.is_finite() && nugget >= 0.0) {
                return Err(EngineError::invalid_parameter(
                    "nugget",
                    format!("{nugget} must be finite and non-negative"),
                ));
            }
            if !(sill.is_finite() && sill > 0.0) {
                return Err(EngineError::invalid_parameter(
                    "sill",
                    format!("{sill} must be finite and positive"),
                ));
            }
            if nugget > sill {
                return Err(EngineError::invalid_parameter(
                    "nugget",
                    format!("{nugget} exceeds sill {sill}"),
                ));
            }
            if !(range.is_finite() && range > 0.0) {
                return Err(EngineError::invalid_parameter(
                    "range",
                    format!("{range} must be finite and positive"),
                ));
            }
        }
        Ok(())
    }

    /// Produce model parameters for `samples`.
    pub fn fit(&self, samples: &SampleSet) -> Result<FittedVariogram, EngineError> {
        self.validate()?;
        let emp = EmpiricalVariogram::compute(samples, self.n_lags);
        let fitted = match self.fit {
            VariogramFit::Fixed {
                nugget,
                sill,
                range,
            } => FittedVariogram {
                model: self.model,
                nugget,
                sill,
                range,
                rss: 0.0,
            },
            VariogramFit::Auto => fit_auto(self.model, &emp, samples)?,
        };
        let rss = emp.weighted_rss(&fitted);
        log::debug!(
            "variogram {}: nugget={:.4e} sill={:.4e} range={:.4e} rss={:.4e} ({} lags)",
            fitted.model,
            fitted.nugget,
            fitted.sill,
            fitted.range,
            rss,
            emp.lags.len()
        );
        Ok(FittedVariogram { rss, ..fitted })
    }
}

// ============================================================================
// Fitted Model
// ============================================================================

/// A variogram model with concrete parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedVariogram {
    /// Model family.
    pub model: VariogramModel,
    /// Nugget.
    pub nugget: f64,
    /// Total sill.
    pub sill: f64,
    /// Range.
    pub range: f64,
    /// Pair-count-weighted residual sum of squares against the empirical bins.
    pub rss: f64,
}

impl FittedVariogram {
    /// Semivariance at lag `h`; zero at the origin.
    #[inline]
    pub fn gamma(&self, h: f64) -> f64 {
        if h <= 0.0 {
            return 0.0;
        }
        self.nugget + (self.sill - self.nugget) * self.model.shape(h, self.range)
    }
}

// ============================================================================
// Empirical Variogram
// ============================================================================

/// Binned empirical semivariance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmpiricalVariogram {
    /// Mean pair distance per non-empty bin.
    pub lags: Vec<f64>,
    /// Mean semivariance `½(vᵢ − vⱼ)²` per bin.
    pub semivariance: Vec<f64>,
    /// Pair count per bin.
    pub counts: Vec<usize>,
}

impl EmpiricalVariogram {
    /// Bin all sample pairs with positive separation into `n_lags` equal-width
    /// bins spanning `[min, max]` pair distance. Empty bins are skipped.
    pub fn compute(samples: &SampleSet, n_lags: usize) -> Self {
        let n = samples.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = samples.coord(i).distance(&samples.coord(j));
                if d > 0.0 {
                    let dv = samples.values[i] - samples.values[j];
                    pairs.push((d, 0.5 * dv * dv));
                }
            }
        }
        if pairs.is_empty() || n_lags == 0 {
            return Self::default();
        }

        let (dmin, dmax) = pairs
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &(d, _)| (lo.min(d), hi.max(d)));
        let width = (dmax - dmin) / n_lags as f64;

        let mut sum_d = vec![0.0; n_lags];
        let mut sum_g = vec![0.0; n_lags];
        let mut counts = vec![0usize; n_lags];
        for &(d, g) in &pairs {
            let bin = if width > 0.0 {
                (((d - dmin) / width) as usize).min(n_lags - 1)
            } else {
                0
            };
            sum_d[bin] += d;
            sum_g[bin] += g;
            counts[bin] += 1;
        }

        let mut out = Self::default();
        for b in 0..n_lags {
            if counts[b] > 0 {
                let c = counts[b] as f64;
                out.lags.push(sum_d[b] / c);
                out.semivariance.push(sum_g[b] / c);
                out.counts.push(counts[b]);
            }
        }
        out
    }

    /// Number of non-empty bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.lags.len()
    }

    /// True when no pair had positive separation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// `Σ countₖ (γ̂ₖ − γ(hₖ))²`.
    pub fn weighted_rss(&self, model: &FittedVariogram) -> f64 {
        self.lags
            .iter()
            .zip(&self.semivariance)
            .zip(&self.counts)
            .map(|((&h, &g), &c)| {
                let r = g - model.gamma(h);
                c as f64 * r * r
            })
            .sum()
    }
}

// ============================================================================
// Automatic Fit
// ============================================================================

fn fit_auto(
    model: VariogramModel,
    emp: &EmpiricalVariogram,
    samples: &SampleSet,
) -> Result<FittedVariogram, EngineError> {
    if emp.is_empty() {
        return Err(EngineError::insufficient(
            1,
            2,
            "variogram estimation needs two distinct locations",
        ));
    }
    let max_lag = emp.lags.iter().copied().fold(0.0_f64, f64::max);
    let variance = stats::variance(&samples.values).unwrap_or(0.0);
    let max_gamma = emp.semivariance.iter().copied().fold(0.0_f64, f64::max);
    let scale = variance.max(max_gamma);

    let min_frac = model.min_nugget_fraction();

    if !(scale > 0.0) {
        return Ok(FittedVariogram {
            model,
            nugget: min_frac,
            sill: 1.0,
            range: max_lag,
            rss: 0.0,
        });
    }

    // Search space: sill = s·scale, nugget = f·sill, range = r·max_lag.
    let cost = |s: f64, f: f64, r: f64| {
        emp.weighted_rss(&FittedVariogram {
            model,
            nugget: f * s * scale,
            sill: s * scale,
            range: r * max_lag,
            rss: 0.0,
        })
    };

    let sills = linspace(0.2, 2.0, 10);
    let fracs: Vec<f64> = linspace(0.0, 0.8, 9)
        .into_iter()
        .map(|f| f.max(min_frac))
        .collect();
    let ranges = linspace(0.1, 2.0, 20);

    let mut best = (f64::INFINITY, 1.0, min_frac, 1.0);
    for &s in &sills {
        for &f in &fracs {
            for &r in &ranges {
                let c = cost(s, f, r);
                if c < best.0 {
                    best = (c, s, f, r);
                }
            }
        }
    }

    let (mut ds, mut df, mut dr) = (0.2, 0.1, 0.1);
    for _ in 0..REFINE_PASSES {
        let (_, s0, f0, r0) = best;
        for s in around(s0, ds, 1e-6, f64::INFINITY) {
            for f in around(f0, df, min_frac, 1.0) {
                for r in around(r0, dr, 1e-6, f64::INFINITY) {
                    let c = cost(s, f, r);
                    if c < best.0 {
                        best = (c, s, f, r);
                    }
                }
            }
        }
        ds *= 0.5;
        df *= 0.5;
        dr *= 0.5;
    }

    let (rss, s, f, r) = best;
    Ok(FittedVariogram {
        model,
        nugget: f * s * scale,
        sill: s * scale,
        range: r * max_lag,
        rss,
    })
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}

/// `REFINE_STEPS` candidates centred on `centre`, clamped to `[lo, hi]`.
fn around(centre: f64, step: f64, lo: f64, hi: f64) -> impl Iterator<Item = f64> {
    let half = (REFINE_STEPS / 2) as f64;
    (0..REFINE_STEPS).map(move |k| (centre + (k as f64 - half) * step).clamp(lo, hi))
}

//! Inverse Distance Weighting.
//!
//! ## Purpose
//!
//! Estimates each location as a weighted mean of sample values with weights
//! `wᵢ = 1 / (dᵢ + smoothing)^power`, optionally restricted to the `k`
//! nearest samples.
//!
//! ## Design notes
//!
//! * **Relative weights**: Weights are computed as `(d_min / dᵢ)^power`, which
//!   is the same estimate scaled by a constant. The nearest sample always gets
//!   weight 1, so large powers cannot overflow and the estimate converges to
//!   the nearest sample as `power → ∞`.
//! * **Exactness**: Without smoothing, a query coincident with a sample
//!   returns that sample's value (the first one, in input order, when
//!   locations repeat). A positive smoothing offset blends that sample with
//!   its neighbours.
//!
//! ## Invariants
//!
//! * Estimates lie within `[min(values), max(values)]`.

// Internal dependencies
use crate::algorithms::surface::{Estimate, Scratch, Surface};
use crate::math::distance::distances_into;
use crate::math::neighborhood::KdTree;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::Diagnostics;
use crate::primitives::sample::{Coord, SampleSet};

/// Distance below which a query is treated as sitting on a sample.
const COINCIDENT: f64 = 1e-12;

/// IDW parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdwParams {
    /// Distance exponent (> 0).
    pub power: f64,
    /// Restrict to the k nearest samples; `None` uses all of them.
    pub max_neighbors: Option<usize>,
    /// Offset added to every distance before weighting (>= 0).
    pub smoothing: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            max_neighbors: None,
            smoothing: 0.0,
        }
    }
}

impl IdwParams {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.power.is_finite() && self.power > 0.0) {
            return Err(EngineError::invalid_parameter(
                "power",
                format!("{} must be finite and positive", self.power),
            ));
        }
        if !(self.smoothing.is_finite() && self.smoothing >= 0.0) {
            return Err(EngineError::invalid_parameter(
                "smoothing",
                format!("{} must be finite and non-negative", self.smoothing),
            ));
        }
        if self.max_neighbors == Some(0) {
            return Err(EngineError::invalid_parameter(
                "max_neighbors",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Fitted IDW surface.
#[derive(Debug, Clone)]
pub struct IdwSurface {
    samples: SampleSet,
    params: IdwParams,
    tree: Option<KdTree>,
}

impl IdwSurface {
    /// Prepare an IDW surface; builds a KD-tree only when a neighbour cap
    /// smaller than the sample count is set.
    pub fn fit(samples: &SampleSet, params: IdwParams) -> Result<Self, EngineError> {
        params.validate()?;
        if samples.is_empty() {
            return Err(EngineError::insufficient(0, 1, "inverse distance weighting"));
        }
        let tree = match params.max_neighbors {
            Some(k) if k < samples.len() => Some(KdTree::new(&samples.xs, &samples.ys)),
            _ => None,
        };
        Ok(Self {
            samples: samples.clone(),
            params,
            tree,
        })
    }

    /// Weighted mean over `(sample index, distance)` pairs.
    fn weighted(&self, pairs: impl Iterator<Item = (usize, f64)> + Clone) -> f64 {
        let s = self.params.smoothing;
        let pairs = pairs.map(move |(i, d)| (i, d + s));
        let mut nearest: Option<(usize, f64)> = None;
        for (i, d) in pairs.clone() {
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }
        let Some((first, d_min)) = nearest else {
            return f64::NAN;
        };
        if d_min < COINCIDENT {
            return self.samples.values[first];
        }

        let p = self.params.power;
        let (mut num, mut den) = (0.0, 0.0);
        for (i, d) in pairs {
            let w = (d_min / d).powf(p);
            num += w * self.samples.values[i];
            den += w;
        }
        num / den
    }
}

impl Surface for IdwSurface {
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError> {
        let value = match (&self.tree, self.params.max_neighbors) {
            (Some(tree), Some(k)) => {
                tree.find_k_nearest(q, k, &mut scratch.search, &mut scratch.neighborhood);
                let nbh = &scratch.neighborhood;
                self.weighted(nbh.indices.iter().copied().zip(nbh.distances.iter().copied()))
            }
            _ => {
                distances_into(q, &self.samples.xs, &self.samples.ys, &mut scratch.distances);
                self.weighted(scratch.distances.iter().copied().enumerate())
            }
        };
        Ok(Estimate::value(value))
    }

    fn diagnostics(&self) -> Diagnostics {
        let mut d = Diagnostics::new();
        d.insert("power", self.params.power);
        if self.params.smoothing > 0.0 {
            d.insert("smoothing", self.params.smoothing);
        }
        if let Some(k) = self.params.max_neighbors {
            d.insert("max_neighbors", k);
        }
        d
    }
}

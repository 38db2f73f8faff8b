//! Nearest-neighbour interpolation.
//!
//! Each location takes the value of the closest sample; equidistant samples
//! resolve to the one that comes first in the input. Also used as the
//! out-of-hull fallback of the piecewise methods.

// Internal dependencies
use crate::algorithms::surface::{Estimate, Scratch, Surface};
use crate::math::neighborhood::KdTree;
use crate::primitives::errors::EngineError;
use crate::primitives::sample::{Coord, SampleSet};

/// Fitted nearest-neighbour surface.
#[derive(Debug, Clone)]
pub struct NearestSurface {
    values: Vec<f64>,
    tree: KdTree,
}

impl NearestSurface {
    /// Index the samples.
    pub fn fit(samples: &SampleSet) -> Result<Self, EngineError> {
        if samples.is_empty() {
            return Err(EngineError::insufficient(0, 1, "nearest neighbour"));
        }
        Ok(Self {
            values: samples.values.clone(),
            tree: KdTree::new(&samples.xs, &samples.ys),
        })
    }

    /// Index and value of the sample closest to `q`.
    pub fn nearest(&self, q: &Coord, scratch: &mut Scratch) -> Option<(usize, f64)> {
        self.tree
            .find_k_nearest(q, 1, &mut scratch.search, &mut scratch.neighborhood);
        scratch
            .neighborhood
            .indices
            .first()
            .map(|&i| (i, self.values[i]))
    }
}

impl Surface for NearestSurface {
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError> {
        let value = self.nearest(q, scratch).map_or(f64::NAN, |(_, v)| v);
        Ok(Estimate::value(value))
    }
}

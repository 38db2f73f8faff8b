//! Common contract of fitted interpolation surfaces.
//!
//! ## Purpose
//!
//! Every method is split into a fit step (build trees, triangulations or
//! factorised systems once) and an estimate step evaluated per grid cell or
//! per held-out location. [`Surface`] is the seam between the two.
//!
//! ## Key concepts
//!
//! * **Estimate**: Value, optional estimation variance, and whether the value
//!   came from an extrapolation fallback.
//! * **Scratch**: Per-worker buffers handed to every `estimate` call.

// Internal dependencies
use crate::math::neighborhood::{Neighborhood, NodeDistance};
use crate::primitives::buffer::{NeighborhoodSearchBuffer, Slot};
use crate::primitives::errors::EngineError;
use crate::primitives::grid::Diagnostics;
use crate::primitives::sample::Coord;

/// Result of evaluating a surface at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Estimated value.
    pub value: f64,
    /// Estimation variance, for methods that define one.
    pub variance: Option<f64>,
    /// The value came from the nearest-neighbour fallback.
    pub extrapolated: bool,
}

impl Estimate {
    /// Plain estimate without variance.
    #[inline]
    pub fn value(value: f64) -> Self {
        Self {
            value,
            variance: None,
            extrapolated: false,
        }
    }
}

/// Per-worker evaluation buffers.
#[derive(Debug, Clone)]
pub struct Scratch {
    /// Distances from the query to each sample.
    pub distances: Slot<f64>,
    /// Right-hand side / weight vector.
    pub rhs: Slot<f64>,
    /// k-nearest result.
    pub neighborhood: Neighborhood,
    /// KD-tree traversal state.
    pub search: NeighborhoodSearchBuffer<NodeDistance>,
}

impl Scratch {
    /// Buffers sized for `n` samples.
    pub fn new(n: usize) -> Self {
        Self {
            distances: Slot::new(n),
            rhs: Slot::new(n),
            neighborhood: Neighborhood::with_capacity(n.min(64)),
            search: NeighborhoodSearchBuffer::new(n.min(64)),
        }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A fitted surface that can be evaluated anywhere in the plane.
pub trait Surface {
    /// Evaluate at `q`.
    fn estimate(&self, q: &Coord, scratch: &mut Scratch) -> Result<Estimate, EngineError>;

    /// Fit-time diagnostics (e.g. fitted variogram parameters).
    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new()
    }
}

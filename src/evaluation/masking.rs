//! Post-processing masks for interpolated grids.
//!
//! Cells far from every sample, or outside a boundary polygon, carry values
//! the data does not support. These helpers set such cells to NaN in place
//! (variance included) and record how many were touched.

// Internal dependencies
use crate::math::geometry::point_in_polygon;
use crate::math::neighborhood::KdTree;
use crate::primitives::errors::EngineError;
use crate::primitives::grid::GridResult;
use crate::primitives::sample::{Coord, SampleSet};

impl GridResult {
    /// Set cells whose nearest sample is `max_distance` or farther away to NaN.
    ///
    /// Returns the number of newly masked cells; the running total is kept in
    /// the `masked_cells` diagnostic.
    pub fn mask_beyond(
        &mut self,
        samples: &SampleSet,
        max_distance: f64,
    ) -> Result<usize, EngineError> {
        if !(max_distance.is_finite() && max_distance > 0.0) {
            return Err(EngineError::invalid_parameter(
                "max_distance",
                format!("{max_distance} must be finite and positive"),
            ));
        }
        if samples.is_empty() {
            return Err(EngineError::insufficient(0, 1, "distance masking"));
        }
        let tree = KdTree::new(&samples.xs, &samples.ys);
        let spec = self.spec;
        let masked = self.mask_where(|c| {
            tree.nearest(&c).map_or(true, |(_, d)| d >= max_distance)
        });
        let total = self.diagnostics.count("masked_cells").unwrap_or(0) + masked;
        self.diagnostics.insert("masked_cells", total);
        self.diagnostics.insert("mask_distance", max_distance);
        log::debug!(
            "masked {masked} of {} cells beyond {max_distance}",
            spec.len()
        );
        Ok(masked)
    }

    /// Set cells outside the polygon `ring` to NaN.
    ///
    /// Returns the number of newly clipped cells, also accumulated in the
    /// `clipped_cells` diagnostic.
    pub fn clip_to_polygon(&mut self, ring: &[Coord]) -> Result<usize, EngineError> {
        if ring.len() < 3 || ring.iter().any(|c| !c.is_finite()) {
            return Err(EngineError::invalid_parameter(
                "polygon",
                format!("needs at least 3 finite vertices, got {}", ring.len()),
            ));
        }
        let clipped = self.mask_where(|c| !point_in_polygon(&c, ring));
        let total = self.diagnostics.count("clipped_cells").unwrap_or(0) + clipped;
        self.diagnostics.insert("clipped_cells", total);
        Ok(clipped)
    }

    /// NaN every cell not already NaN whose coordinate satisfies `outside`.
    fn mask_where(&mut self, outside: impl Fn(Coord) -> bool) -> usize {
        let spec = self.spec;
        let mut count = 0;
        let values = self.values.as_mut_slice();
        for (k, v) in values.iter_mut().enumerate() {
            if v.is_nan() || !outside(spec.coord_of_index(k)) {
                continue;
            }
            *v = f64::NAN;
            count += 1;
            if let Some(var) = self.variance.as_mut() {
                var.as_mut_slice()[k] = f64::NAN;
            }
        }
        count
    }
}

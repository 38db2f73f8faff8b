//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! The interpolation methods and the sample aggregator. Each method follows
//! a fit / estimate split behind the [`surface::Surface`] trait:
//! - Aggregation of raw measurements into sample points
//! - Inverse distance weighting and nearest neighbour
//! - Piecewise linear and cubic over a Delaunay triangulation
//! - Variogram fitting, ordinary and universal kriging
//! - Radial basis functions
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Fitted surface contract and evaluation buffers.
pub mod surface;

/// Raw measurement aggregation.
pub mod aggregation;

/// Inverse distance weighting.
pub mod idw;

/// Nearest-neighbour interpolation.
pub mod nearest;

/// Triangulation-based linear and cubic interpolation.
pub mod piecewise;

/// Empirical and model variograms.
pub mod variogram;

/// Ordinary and universal kriging.
pub mod kriging;

/// Radial basis functions.
pub mod rbf;

//! Layer 2: Math
//!
//! # Purpose
//!
//! Pure numerical building blocks with no method-specific logic:
//! - Distances (scalar and SIMD batch)
//! - Order statistics and summaries
//! - KD-tree neighbour search
//! - Delaunay triangulation
//! - Geometry predicates
//! - Dense linear system factorisation
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Euclidean distances.
pub mod distance;

/// Mean, median, percentiles and summaries.
pub mod stats;

/// KD-tree k-nearest search.
pub mod neighborhood;

/// Delaunay triangulation and barycentric location.
pub mod triangulation;

/// Distinct locations, collinearity and point-in-polygon.
pub mod geometry;

/// Cholesky / LU factorisation with conditioning checks.
pub mod linalg;

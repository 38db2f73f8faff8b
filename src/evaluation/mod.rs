//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! Post-fit assessment and presentation helpers:
//! - Robust percentile color scaling
//! - Leave-one-out cross-validation
//! - Distance and polygon masking of result grids
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Percentile color scaling.
pub mod color;

/// Leave-one-out cross-validation.
pub mod cv;

/// Grid masking.
pub mod masking;

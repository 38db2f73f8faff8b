//! Layer 1: Primitives
//!
//! # Purpose
//!
//! Value types shared by every other layer: the error taxonomy, sample and
//! grid containers, and reusable search buffers.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error taxonomy.
pub mod errors;

/// Raw measurements, sample points and columnar sample sets.
pub mod sample;

/// Grid specification, dense values and results.
pub mod grid;

/// Reusable buffers for neighbourhood search.
pub mod buffer;

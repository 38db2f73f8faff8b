//! Layer 5: Engine
//!
//! # Purpose
//!
//! Orchestration of interpolation runs:
//! - Input validation
//! - Method registry and dispatch
//! - Grid construction
//! - Method comparison
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input validation.
pub mod validator;

/// Method registry.
pub mod registry;

/// Grid generation from sample locations.
pub mod grid_builder;

/// Fitting and grid evaluation.
pub mod executor;

/// Method comparison harness.
pub mod comparison;

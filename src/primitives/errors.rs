//! Error types for interpolation engine operations.
//!
//! ## Purpose
//!
//! This module defines the failure taxonomy of the engine: unusable raw
//! measurements, degenerate sample geometry, out-of-range parameters,
//! ill-conditioned linear systems and unknown method tags.
//!
//! ## Design notes
//!
//! * **Contextual**: Every variant carries a message naming the offending value.
//! * **Typed**: Callers branch on [`ErrorKind`] to decide on fallbacks
//!   (e.g. retry with IDW after a kriging failure); the engine never does.
//! * **Cloneable**: Errors are stored inside comparison reports, so they are
//!   `Clone` and `PartialEq`.
//!
//! ## Invariants
//!
//! * Display messages are stable and start with the kind's label.
//!
//! ## Non-goals
//!
//! * This module does not perform validation itself (see `engine::validator`).
//! * This module does not provide recovery or fallback strategies.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use std::error::Error;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raw data unusable after filtering.
    InvalidMeasurement,
    /// Too few or degenerate sample locations.
    InsufficientData,
    /// Method or scaling parameter out of range.
    InvalidParameter,
    /// Singular or ill-conditioned linear system.
    NumericalInstability,
    /// Unknown method tag.
    UnsupportedMethod,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let label = match self {
            Self::InvalidMeasurement => "invalid measurement",
            Self::InsufficientData => "insufficient data",
            Self::InvalidParameter => "invalid parameter",
            Self::NumericalInstability => "numerical instability",
            Self::UnsupportedMethod => "unsupported method",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Error type for interpolation engine operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A measurement group is empty after filtering, or references a location
    /// without a usable centroid.
    InvalidMeasurement(String),

    /// Fewer sample locations than the operation needs, or they are degenerate
    /// (duplicated or collinear).
    InsufficientData {
        /// Number of distinct locations provided.
        got: usize,
        /// Minimum number required.
        min: usize,
        /// What the locations were needed for.
        context: String,
    },

    /// A parameter lies outside its documented range.
    InvalidParameter {
        /// Name of the parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A kriging or RBF system is singular or too ill-conditioned to solve.
    NumericalInstability(String),

    /// The method tag is not in the registry.
    UnsupportedMethod(String),
}

impl EngineError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMeasurement(_) => ErrorKind::InvalidMeasurement,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::NumericalInstability(_) => ErrorKind::NumericalInstability,
            Self::UnsupportedMethod(_) => ErrorKind::UnsupportedMethod,
        }
    }

    pub(crate) fn invalid_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(got: usize, min: usize, context: impl Into<String>) -> Self {
        Self::InsufficientData {
            got,
            min,
            context: context.into(),
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidMeasurement(msg) => write!(f, "Invalid measurement: {msg}"),
            Self::InsufficientData { got, min, context } => {
                write!(
                    f,
                    "Insufficient data: got {got} usable locations, need at least {min} ({context})"
                )
            }
            Self::InvalidParameter { parameter, reason } => {
                write!(f, "Invalid parameter '{parameter}': {reason}")
            }
            Self::NumericalInstability(msg) => write!(f, "Numerical instability: {msg}"),
            Self::UnsupportedMethod(tag) => write!(f, "Unsupported method: '{tag}'"),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for EngineError {}

//! Closed registry of interpolation methods.
//!
//! ## Purpose
//!
//! [`InterpolationMethod`] is the single tagged variant every caller uses to
//! pick a method and its parameters. Dispatch is an exhaustive `match`; adding
//! a method means adding a variant and the compiler points at every place
//! that must handle it.
//!
//! ## Key concepts
//!
//! * **Tags**: Stable string identifiers (`idw`, `kriging_ordinary`, ...) used
//!   for configuration files, report keys and UI selection.
//! * **Descriptions**: Human-readable method names for display.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;

// Internal dependencies
use crate::algorithms::idw::IdwParams;
use crate::algorithms::kriging::{DriftOrder, KrigingParams};
use crate::algorithms::rbf::{RbfKernel, RbfParams};
use crate::primitives::errors::EngineError;

/// Interpolation method with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMethod {
    /// Inverse distance weighting.
    Idw(IdwParams),
    /// Ordinary kriging.
    OrdinaryKriging(KrigingParams),
    /// Universal kriging with polynomial drift.
    UniversalKriging {
        /// Variogram and exactness settings.
        params: KrigingParams,
        /// Drift order.
        drift: DriftOrder,
    },
    /// Radial basis functions.
    Rbf(RbfParams),
    /// Piecewise linear over a Delaunay triangulation.
    Linear,
    /// Piecewise cubic over a Delaunay triangulation.
    Cubic,
    /// Nearest sample value.
    NearestNeighbor,
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        Self::Idw(IdwParams::default())
    }
}

/// Every registry tag, in display order.
pub const METHOD_TAGS: [&str; 10] = [
    "idw",
    "linear",
    "cubic",
    "nearest",
    "rbf_multiquadric",
    "rbf_gaussian",
    "rbf_thin_plate",
    "rbf_linear",
    "kriging_ordinary",
    "kriging_universal",
];

impl InterpolationMethod {
    /// Registry tag of this method.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Idw(_) => "idw",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::NearestNeighbor => "nearest",
            Self::Rbf(p) => match p.kernel {
                RbfKernel::Multiquadric => "rbf_multiquadric",
                RbfKernel::Gaussian => "rbf_gaussian",
                RbfKernel::ThinPlate => "rbf_thin_plate",
                RbfKernel::Linear => "rbf_linear",
            },
            Self::OrdinaryKriging(_) => "kriging_ordinary",
            Self::UniversalKriging { .. } => "kriging_universal",
        }
    }

    /// Human-readable method name.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idw(_) => "Inverse Distance Weighting",
            Self::Linear => "Linear Interpolation",
            Self::Cubic => "Cubic Interpolation",
            Self::NearestNeighbor => "Nearest Neighbor",
            Self::Rbf(p) => match p.kernel {
                RbfKernel::Multiquadric => "RBF (Multiquadric)",
                RbfKernel::Gaussian => "RBF (Gaussian)",
                RbfKernel::ThinPlate => "RBF (Thin Plate Spline)",
                RbfKernel::Linear => "RBF (Linear)",
            },
            Self::OrdinaryKriging(_) => "Ordinary Kriging",
            Self::UniversalKriging { .. } => "Universal Kriging",
        }
    }

    /// Whether the method needs at least three distinct, non-collinear
    /// locations.
    pub fn needs_planar_support(&self) -> bool {
        !matches!(self, Self::Idw(_) | Self::NearestNeighbor)
    }

    /// Check the method's parameter ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self {
            Self::Idw(p) => p.validate(),
            Self::OrdinaryKriging(p) | Self::UniversalKriging { params: p, .. } => {
                p.variogram.validate()
            }
            Self::Rbf(p) => p.validate(),
            Self::Linear | Self::Cubic | Self::NearestNeighbor => Ok(()),
        }
    }
}

impl Display for InterpolationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.id())
    }
}

impl FromStr for InterpolationMethod {
    type Err = EngineError;

    /// Parse a registry tag into the method with default parameters.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let method = match tag.trim() {
            "idw" => Self::Idw(IdwParams::default()),
            "linear" => Self::Linear,
            "cubic" => Self::Cubic,
            "nearest" => Self::NearestNeighbor,
            "rbf_multiquadric" => Self::Rbf(RbfParams::with_kernel(RbfKernel::Multiquadric)),
            "rbf_gaussian" => Self::Rbf(RbfParams::with_kernel(RbfKernel::Gaussian)),
            "rbf_thin_plate" => Self::Rbf(RbfParams::with_kernel(RbfKernel::ThinPlate)),
            "rbf_linear" => Self::Rbf(RbfParams::with_kernel(RbfKernel::Linear)),
            "kriging_ordinary" => Self::OrdinaryKriging(KrigingParams::default()),
            "kriging_universal" => Self::UniversalKriging {
                params: KrigingParams::default(),
                drift: DriftOrder::default(),
            },
            other => return Err(EngineError::UnsupportedMethod(other.to_string())),
        };
        Ok(method)
    }
}

/// Every registered method with default parameters, paired with its
/// description, in display order.
pub fn registry() -> Vec<(&'static str, &'static str)> {
    METHOD_TAGS
        .iter()
        .filter_map(|tag| tag.parse::<InterpolationMethod>().ok())
        .map(|m| (m.id(), m.description()))
        .collect()
}

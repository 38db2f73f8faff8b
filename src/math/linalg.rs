//! Dense linear system factorisation for kriging and RBF solves.
//!
//! ## Purpose
//!
//! Kriging and RBF fitting both reduce to a dense square system that is
//! factorised once and then solved for many right-hand sides (one per grid
//! cell for kriging, one in total for RBF). This module wraps the nalgebra
//! backend behind a small API that reports ill-conditioning as a typed error.
//!
//! ## Design notes
//!
//! * **Cholesky** for systems the caller declares symmetric positive definite;
//!   failure of the decomposition means the matrix is not numerically SPD.
//! * **LU with partial pivoting** for everything else (kriging systems with
//!   Lagrange rows are symmetric indefinite).
//! * **Conditioning**: The ratio of the smallest to the largest pivot
//!   magnitude is compared against a threshold before any solve. This is a
//!   cheap lower-bound proxy for the reciprocal condition number.
//!
//! ## Invariants
//!
//! * A `FactorizedSystem` only exists for systems that passed the check.
//! * `solve` never returns non-finite values; it errors instead.
//!
//! ## Non-goals
//!
//! * Sparse or iterative solvers.

// External dependencies
use nalgebra::{Cholesky, DMatrix, DVector, Dyn, LU};

// Internal dependencies
use crate::primitives::errors::EngineError;

/// Default minimum pivot-magnitude ratio.
pub const DEFAULT_PIVOT_RATIO: f64 = 1e-12;

/// Declared structure of a system matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStructure {
    /// Symmetric positive definite; factorised with Cholesky.
    SymmetricPositiveDefinite,
    /// Any non-singular square matrix; factorised with pivoted LU.
    General,
}

#[derive(Debug, Clone)]
enum Factor {
    Cholesky(Cholesky<f64, Dyn>),
    Lu(LU<f64, Dyn, Dyn>),
}

/// A factorised, well-conditioned square system.
#[derive(Debug, Clone)]
pub struct FactorizedSystem {
    factor: Factor,
    dim: usize,
    pivot_ratio: f64,
}

impl FactorizedSystem {
    /// Factorise `matrix`, rejecting singular or ill-conditioned systems.
    ///
    /// `min_pivot_ratio` is the smallest accepted `min|pᵢ| / max|pᵢ|` over the
    /// factor's pivots (for Cholesky, the squared ratio of `L`'s diagonal).
    pub fn factor(
        matrix: DMatrix<f64>,
        structure: SystemStructure,
        min_pivot_ratio: f64,
    ) -> Result<Self, EngineError> {
        let dim = matrix.nrows();
        if dim == 0 || matrix.ncols() != dim {
            return Err(EngineError::NumericalInstability(format!(
                "system matrix must be square and non-empty, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::NumericalInstability(
                "system matrix contains non-finite entries".into(),
            ));
        }

        let (factor, pivot_ratio) = match structure {
            SystemStructure::SymmetricPositiveDefinite => {
                let chol = matrix.cholesky().ok_or_else(|| {
                    EngineError::NumericalInstability(
                        "Cholesky factorisation failed; matrix is not positive definite".into(),
                    )
                })?;
                let ratio = diagonal_ratio(chol.l_dirty().diagonal().iter().copied());
                (Factor::Cholesky(chol), ratio * ratio)
            }
            SystemStructure::General => {
                let lu = matrix.lu();
                let ratio = diagonal_ratio(lu.u().diagonal().iter().copied());
                (Factor::Lu(lu), ratio)
            }
        };

        if !(pivot_ratio > min_pivot_ratio) {
            return Err(EngineError::NumericalInstability(format!(
                "system of size {dim} is singular or ill-conditioned \
                 (pivot ratio {pivot_ratio:e} <= {min_pivot_ratio:e}); \
                 duplicate or collinear locations are the usual cause"
            )));
        }

        Ok(Self {
            factor,
            dim,
            pivot_ratio,
        })
    }

    /// System dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Pivot-magnitude ratio measured at factorisation time.
    #[inline]
    pub fn pivot_ratio(&self) -> f64 {
        self.pivot_ratio
    }

    /// Solve for one right-hand side.
    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, EngineError> {
        if rhs.len() != self.dim {
            return Err(EngineError::NumericalInstability(format!(
                "right-hand side has length {}, system has dimension {}",
                rhs.len(),
                self.dim
            )));
        }
        let b = DVector::from_column_slice(rhs);
        let x = match &self.factor {
            Factor::Cholesky(chol) => Some(chol.solve(&b)),
            Factor::Lu(lu) => lu.solve(&b),
        }
        .ok_or_else(|| EngineError::NumericalInstability("LU solve failed".into()))?;

        if x.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::NumericalInstability(
                "solution contains non-finite values".into(),
            ));
        }
        Ok(x.iter().copied().collect())
    }
}

/// `min|dᵢ| / max|dᵢ|`, or 0 for an all-zero diagonal.
fn diagonal_ratio(diag: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = diag.fold((f64::INFINITY, 0.0_f64), |(lo, hi), d| {
        let a = d.abs();
        (lo.min(a), hi.max(a))
    });
    if hi > 0.0 && hi.is_finite() { lo / hi } else { 0.0 }
}

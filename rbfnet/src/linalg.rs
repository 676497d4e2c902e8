/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds helper linear algebra routines, including the SVD based minimum-norm solve.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! Helper linear algebra functionality.
//!
//! The training matrix of an RBF network can be singular (duplicate inputs,
//! thin plate spline zeros) or badly conditioned (wide Gaussians). The
//! [`SvdSolver`] therefore solves `A w = b` in the minimum-norm least squares
//! sense, zeroing singular values below a cut-off, and reports the
//! conditioning of `A` through a [`ConditionReport`].

use faer::{Col, Mat, MatRef};
use serde::{Deserialize, Serialize};

/// The decomposition of a training matrix failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FactorizationError {
    #[error("singular value decomposition of the {size}x{size} system did not converge")]
    NoConvergence { size: usize },
}

/// Conditioning diagnostics of a solved system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    /// Largest singular value.
    pub sval_max: f64,

    /// Smallest singular value.
    pub sval_min: f64,

    /// Reciprocal condition number `sval_min / sval_max`, or `0` when either
    /// value is not positive.
    pub rcond: f64,
}

impl ConditionReport {
    pub fn from_singular_values(singular_values: &[f64]) -> Self {
        let sval_max = singular_values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let sval_min = singular_values.iter().copied().fold(f64::INFINITY, f64::min);

        let rcond = match sval_max <= 0.0 || sval_min <= 0.0 || singular_values.is_empty() {
            true => 0.0,
            false => sval_min / sval_max,
        };

        Self {
            sval_max,
            sval_min,
            rcond,
        }
    }
}

/// Singular value decomposition `A = U diag(s) V^T` of a square system.
pub struct SvdSolver {
    u: Mat<f64>,
    s: Vec<f64>,
    v: Mat<f64>,
}

impl SvdSolver {
    /// Decomposes `a`.
    pub fn try_new(a: MatRef<'_, f64>) -> Result<Self, FactorizationError> {
        let svd = a
            .svd()
            .map_err(|_| FactorizationError::NoConvergence { size: a.nrows() })?;

        Ok(Self {
            u: svd.U().to_owned(),
            s: svd.S().column_vector().iter().copied().collect(),
            v: svd.V().to_owned(),
        })
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.s
    }

    pub fn condition_report(&self) -> ConditionReport {
        ConditionReport::from_singular_values(&self.s)
    }

    /// Default singular value cut-off, `s_max * n * f64::EPSILON`.
    pub fn default_tolerance(&self) -> f64 {
        let sval_max = self.s.iter().copied().fold(0.0, f64::max);
        sval_max * self.u.nrows().max(self.v.nrows()) as f64 * f64::EPSILON
    }

    /// Minimum-norm least squares solution of `A x = b`.
    ///
    /// Singular values at or below `tolerance` (default
    /// [`SvdSolver::default_tolerance`]) are treated as zero, so the
    /// corresponding directions contribute nothing to `x`.
    pub fn solve(&self, b: &Col<f64>, tolerance: Option<f64>) -> Col<f64> {
        let tolerance = tolerance.unwrap_or_else(|| self.default_tolerance());
        let k = self.s.len();

        // Pseudo-inverse of diag(s), zeroing the truncated directions
        let s_inv = Col::<f64>::from_fn(k, |i| match self.s[i] > tolerance {
            true => 1.0 / self.s[i],
            false => 0.0,
        });

        // x = V diag(s+) U^T b
        let coeffs = self.u.as_ref().subcols(0, k).transpose() * b.as_ref();
        let scaled = s_inv.as_diagonal() * coeffs.as_ref();
        self.v.as_ref().subcols(0, k) * scaled.as_ref()
    }
}

/// Relative residual `||A x - b|| / ||b||`, or the absolute residual when `b` is zero.
pub fn relative_residual(a: MatRef<'_, f64>, x: &Col<f64>, b: &Col<f64>) -> f64 {
    let ax = a * x.as_ref();
    let residual = ax.as_ref() - b.as_ref();

    let b_norm = b.norm_l2();
    match b_norm > 0.0 {
        true => residual.norm_l2() / b_norm,
        false => residual.norm_l2(),
    }
}

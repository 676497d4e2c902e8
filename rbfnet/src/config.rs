/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for preconditioning and the direct SVD solve.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for preconditioning and the direct SVD solve.
use serde::{Deserialize, Serialize};

/// Preconditioner applied to the training system before it is solved.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Preconditioner {
    /// The system is solved as assembled.
    #[default]
    None,

    /// Rows of `A` and `b` are scaled by the inverse diagonal of `A`.
    /// Rows with a zero diagonal are left unscaled.
    Jacobi,
}

#[doc = include_str!("../docs/solver_params.md")]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct SolverParams {
    /// Preconditioner applied before the decomposition.
    pub preconditioner: Preconditioner,

    /// Absolute cut-off below which singular values are treated as zero.
    ///
    /// `None` uses `s_max * n * f64::EPSILON`.
    pub singular_value_tolerance: Option<f64>,

    /// Whether to compute and report the relative residual of the solve.
    pub report_residual: bool,

    /// Reciprocal condition number below which a warning is logged.
    pub rcond_warning_threshold: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams::builder().build()
    }
}

impl SolverParams {
    /// Returns a new [`SolverParamsBuilder`] holding the default values.
    pub fn builder() -> SolverParamsBuilder {
        SolverParamsBuilder::new()
    }
}

/// A convenience builder for constructing a [`SolverParams`] instance.
///
/// The builder should be called via the [`SolverParams::builder`] method.
///
/// See [`SolverParams`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct SolverParamsBuilder {
    pub preconditioner: Preconditioner,
    pub singular_value_tolerance: Option<f64>,
    pub report_residual: bool,
    pub rcond_warning_threshold: f64,
}

impl SolverParamsBuilder {
    fn new() -> Self {
        Self {
            preconditioner: Preconditioner::None,
            singular_value_tolerance: None,
            report_residual: false,
            rcond_warning_threshold: 1e-12,
        }
    }

    /// Sets the preconditioner.
    pub fn preconditioner(mut self, preconditioner: Preconditioner) -> Self {
        self.preconditioner = preconditioner;
        self
    }

    /// Sets an absolute singular value cut-off.
    pub fn singular_value_tolerance(mut self, tolerance: f64) -> Self {
        self.singular_value_tolerance = Some(tolerance);
        self
    }

    /// Enables or disables the residual report.
    pub fn report_residual(mut self, report_residual: bool) -> Self {
        self.report_residual = report_residual;
        self
    }

    /// Sets the reciprocal condition number that triggers a warning.
    pub fn rcond_warning_threshold(mut self, threshold: f64) -> Self {
        self.rcond_warning_threshold = threshold;
        self
    }

    /// Builds and returns a [`SolverParams`] instance.
    pub fn build(self) -> SolverParams {
        SolverParams {
            preconditioner: self.preconditioner,
            singular_value_tolerance: self.singular_value_tolerance,
            report_residual: self.report_residual,
            rcond_warning_threshold: self.rcond_warning_threshold,
        }
    }
}

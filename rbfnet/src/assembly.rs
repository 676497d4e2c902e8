/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles the dense linear system solved when training an RBF network.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::sample_table::SampleTable;
use faer::{Col, Mat};
use rbfnet_utils::{get_a_matrix_symmetric, KernelParams};

/// Dense training system `A w = b`.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// `A_ij = phi(|x_i - x_j|)`, symmetric.
    pub a: Mat<f64>,

    /// Right hand side.
    pub b: Col<f64>,
}

/// Builds `A` and `b` for the samples in `table`.
///
/// For a plain network `b_i = y_i`. For a normalized network each output is
/// weighted by its kernel row sum, `b_i = y_i * sum_j A_ij`.
pub fn assemble(table: &SampleTable, kernel_params: &KernelParams, normalized: bool) -> LinearSystem {
    let a = get_a_matrix_symmetric(table.samples(), kernel_params);

    let b = Col::from_fn(table.len(), |i| {
        let y = table.samples()[i].y();
        match normalized {
            true => y * a.row(i).iter().sum::<f64>(),
            false => y,
        }
    });

    LinearSystem { a, b }
}

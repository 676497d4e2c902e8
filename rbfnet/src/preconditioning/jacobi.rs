/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements diagonal (Jacobi) scaling of the RBF training system.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::assembly::LinearSystem;

/// Diagonal of `P = diag(1 / A_ii)`, with `1` wherever `A_ii` is zero or not finite.
pub fn jacobi_factors(system: &LinearSystem) -> Vec<f64> {
    (0..system.a.nrows())
        .map(|i| {
            let d = system.a[(i, i)];
            match d != 0.0 && d.is_finite() {
                true => 1.0 / d,
                false => 1.0,
            }
        })
        .collect()
}

/// Replaces `A, b` with `P A, P b`.
///
/// Row scaling leaves the solution of `A w = b` unchanged for a
/// non-singular `A`.
pub fn jacobi_scale(system: &mut LinearSystem) {
    let factors = jacobi_factors(system);

    for (i, p) in factors.iter().enumerate() {
        for j in 0..system.a.ncols() {
            system.a[(i, j)] *= p;
        }
        system.b[i] *= p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_table::SampleTable;
    use equator::assert;
    use rbfnet_utils::{KernelParams, KernelType};

    #[test]
    fn unit_diagonal_for_gaussian() {
        let mut table = SampleTable::new();
        for x in [0.0, 0.3, 1.1] {
            table.add_sample(vec![x], x * x).unwrap();
        }
        let params = KernelParams::builder(KernelType::Gaussian).shape(2.0).build();
        let mut system = crate::assembly::assemble(&table, &params, false);
        let original_b = system.b.clone();

        system.a[(1, 1)] = 4.0;
        jacobi_scale(&mut system);

        assert!(system.a[(0, 0)] == 1.0);
        assert!(system.a[(1, 1)] == 1.0);
        assert!(system.b[1] == original_b[1] / 4.0);
    }

    #[test]
    fn zero_diagonal_rows_are_untouched() {
        let mut table = SampleTable::new();
        for x in [0.0, 2.0, 3.0] {
            table.add_sample(vec![x], x).unwrap();
        }
        let params = KernelParams::from(KernelType::ThinPlateSpline);
        let mut system = crate::assembly::assemble(&table, &params, false);
        let before = system.a.clone();

        assert!(jacobi_factors(&system) == vec![1.0, 1.0, 1.0]);
        jacobi_scale(&mut system);
        assert!(system.a == before);
    }
}

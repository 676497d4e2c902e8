/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides benchmark test functions for validating and demonstrating RBF network quality.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::{Col, Mat};

/// Struct that implements 1D and 2D functions to generate values for testing RBF
/// networks.
pub struct RBFTestFunctions;

impl RBFTestFunctions {
    /// Franke's two-dimensional test function:
    /// <div>
    /// $$
    /// \begin{aligned}
    /// F(x,y) &=
    /// \tfrac{3}{4}\exp\!\left[
    ///     -\frac{(9x-2)^2 + (9y-2)^2}{4}
    /// \right] \\[6pt]
    /// &\quad+ \tfrac{3}{4}\exp\!\left[
    ///     -\frac{(9x+1)^2}{49}
    ///     -\frac{(9y+1)^2}{10}
    /// \right] \\[6pt]
    /// &\quad+ \tfrac{1}{2}\exp\!\left[
    ///     -\frac{(9x-7)^2 + (9y-3)^2}{4}
    /// \right] \\[6pt]
    /// &\quad- \tfrac{1}{5}\exp\!\left[
    ///     -(9x-4)^2 - (9y-7)^2
    /// \right]
    /// \end{aligned}
    /// $$
    /// </div>
    pub fn franke_2d(points: &Mat<f64>) -> Col<f64> {
        assert_eq!(points.ncols(), 2);

        Col::from_fn(points.nrows(), |i| Self::franke(points[(i, 0)], points[(i, 1)]))
    }

    /// Runge's function `1 / (1 + 25 x^2)`, evaluated on the first column.
    pub fn runge_1d(points: &Mat<f64>) -> Col<f64> {
        assert_eq!(points.ncols(), 1);

        Col::from_fn(points.nrows(), |i| {
            let x = points[(i, 0)];
            1.0 / (1.0 + 25.0 * x * x)
        })
    }

    fn franke(x: f64, y: f64) -> f64 {
        let nx = 9.0 * x;
        let ny = 9.0 * y;

        let term1 = 0.75 * (-((nx - 2.0).powi(2) + (ny - 2.0).powi(2)) / 4.0).exp();
        let term2 = 0.75 * (-(nx + 1.0).powi(2) / 49.0 - (ny + 1.0).powi(2) / 10.0).exp();
        let term3 = 0.5 * (-((nx - 7.0).powi(2) + (ny - 3.0).powi(2)) / 4.0).exp();
        let term4 = -0.2 * (-(nx - 4.0).powi(2) - (ny - 7.0).powi(2)).exp();

        term1 + term2 + term3 + term4
    }
}

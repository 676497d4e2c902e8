/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the common interface of trained function approximants.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::NetworkResult;
use faer::Mat;

/// Step used by the finite difference helpers.
pub const CENTRAL_DIFFERENCE_STEP: f64 = 1e-5;

/// A scalar function of `num_variables` inputs that can be evaluated and
/// differentiated.
///
/// Only [`Approximant::evaluate`] is required. Gradients default to central
/// differences and the Hessian to central differences of the gradient.
pub trait Approximant {
    fn num_variables(&self) -> usize;

    fn evaluate(&self, x: &[f64]) -> NetworkResult<f64>;

    /// Gradient as a `1 x d` matrix.
    fn eval_jacobian(&self, x: &[f64]) -> NetworkResult<Mat<f64>> {
        self.central_difference(x)
    }

    /// Numeric gradient as a `1 x d` matrix.
    fn central_difference(&self, x: &[f64]) -> NetworkResult<Mat<f64>> {
        let h = CENTRAL_DIFFERENCE_STEP;
        let mut probe = x.to_vec();
        let mut jac = Mat::<f64>::zeros(1, x.len());

        for i in 0..x.len() {
            probe[i] = x[i] + h;
            let forward = self.evaluate(&probe)?;
            probe[i] = x[i] - h;
            let backward = self.evaluate(&probe)?;
            probe[i] = x[i];

            jac[(0, i)] = (forward - backward) / (2.0 * h);
        }

        Ok(jac)
    }

    /// Hessian as a `d x d` matrix, from central differences of
    /// [`Approximant::eval_jacobian`], symmetrised.
    fn eval_hessian(&self, x: &[f64]) -> NetworkResult<Mat<f64>> {
        let h = CENTRAL_DIFFERENCE_STEP;
        let d = x.len();
        let mut probe = x.to_vec();
        let mut hess = Mat::<f64>::zeros(d, d);

        for i in 0..d {
            probe[i] = x[i] + h;
            let forward = self.eval_jacobian(&probe)?;
            probe[i] = x[i] - h;
            let backward = self.eval_jacobian(&probe)?;
            probe[i] = x[i];

            for j in 0..d {
                hess[(i, j)] = (forward[(0, j)] - backward[(0, j)]) / (2.0 * h);
            }
        }

        for i in 0..d {
            for j in (i + 1)..d {
                let avg = 0.5 * (hess[(i, j)] + hess[(j, i)]);
                hess[(i, j)] = avg;
                hess[(j, i)] = avg;
            }
        }

        Ok(hess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use equator::assert;
    use rbfnet_utils::DimensionMismatch;

    /// f(x, y) = x^2 + 3xy - y
    struct Quadratic;

    impl Approximant for Quadratic {
        fn num_variables(&self) -> usize {
            2
        }

        fn evaluate(&self, x: &[f64]) -> NetworkResult<f64> {
            if x.len() != 2 {
                return Err(NetworkError::DimensionMismatch(DimensionMismatch {
                    expected: 2,
                    found: x.len(),
                }));
            }
            Ok(x[0] * x[0] + 3.0 * x[0] * x[1] - x[1])
        }
    }

    #[test]
    fn default_gradient_and_hessian() {
        let x = [0.5, -2.0];

        let jac = Quadratic.eval_jacobian(&x).unwrap();
        assert!((jac[(0, 0)] - (2.0 * 0.5 + 3.0 * -2.0)).abs() < 1e-8);
        assert!((jac[(0, 1)] - (3.0 * 0.5 - 1.0)).abs() < 1e-8);

        let hess = Quadratic.eval_hessian(&x).unwrap();
        assert!((hess[(0, 0)] - 2.0).abs() < 1e-4);
        assert!((hess[(0, 1)] - 3.0).abs() < 1e-4);
        assert!((hess[(1, 0)] - 3.0).abs() < 1e-4);
        assert!(hess[(1, 1)].abs() < 1e-4);
    }

    #[test]
    fn errors_propagate() {
        assert!(Quadratic.eval_hessian(&[1.0]).is_err());
    }
}

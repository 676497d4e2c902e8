/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the concrete RBF kernel functions and their radial derivatives.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialKernel};

/// Gaussian RBF kernel with `phi(r) = exp(-(e r)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct GaussianRbfKernel {
    e2: f64,
}

impl GaussianRbfKernel {
    #[inline(always)]
    pub fn new(shape: f64) -> Self {
        Self { e2: shape * shape }
    }
}

impl RadialKernel for GaussianRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        (-self.e2 * r * r).exp()
    }

    #[inline(always)]
    fn dphi(&self, r: f64) -> f64 {
        -2.0 * self.e2 * r * (-self.e2 * r * r).exp()
    }
}

impl KernelFromParams for GaussianRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape)
    }
}

/// Multiquadric RBF kernel with `phi(r) = sqrt(1 + (e r)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct MultiquadricRbfKernel {
    e2: f64,
}

impl MultiquadricRbfKernel {
    #[inline(always)]
    pub fn new(shape: f64) -> Self {
        Self { e2: shape * shape }
    }
}

impl RadialKernel for MultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        (1.0 + self.e2 * r * r).sqrt()
    }

    #[inline(always)]
    fn dphi(&self, r: f64) -> f64 {
        self.e2 * r / (1.0 + self.e2 * r * r).sqrt()
    }
}

impl KernelFromParams for MultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape)
    }
}

/// Inverse quadric RBF kernel with `phi(r) = 1 / (1 + (e r)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct InverseQuadricRbfKernel {
    e2: f64,
}

impl InverseQuadricRbfKernel {
    #[inline(always)]
    pub fn new(shape: f64) -> Self {
        Self { e2: shape * shape }
    }
}

impl RadialKernel for InverseQuadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        1.0 / (1.0 + self.e2 * r * r)
    }

    #[inline(always)]
    fn dphi(&self, r: f64) -> f64 {
        let t = 1.0 + self.e2 * r * r;
        -2.0 * self.e2 * r / (t * t)
    }
}

impl KernelFromParams for InverseQuadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape)
    }
}

/// Inverse multiquadric RBF kernel with `phi(r) = 1 / sqrt(1 + (e r)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct InverseMultiquadricRbfKernel {
    e2: f64,
}

impl InverseMultiquadricRbfKernel {
    #[inline(always)]
    pub fn new(shape: f64) -> Self {
        Self { e2: shape * shape }
    }
}

impl RadialKernel for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        1.0 / (1.0 + self.e2 * r * r).sqrt()
    }

    #[inline(always)]
    fn dphi(&self, r: f64) -> f64 {
        let t = 1.0 + self.e2 * r * r;
        -self.e2 * r / (t * t.sqrt())
    }
}

impl KernelFromParams for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape)
    }
}

/// Thin plate spline RBF kernel with `phi(r) = r^2 log r`.
///
/// Has no shape parameter. Both `phi` and its derivative are taken as `0` at the origin.
#[derive(Clone, Debug, Copy)]
pub struct ThinPlateSplineRbfKernel;

impl RadialKernel for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r.abs() < f64::EPSILON {
            true => 0.0,
            false => r.powi(2) * r.ln(),
        }
    }

    #[inline(always)]
    fn dphi(&self, r: f64) -> f64 {
        match r.abs() < f64::EPSILON {
            true => 0.0,
            false => 2.0 * r * r.ln() + r,
        }
    }
}

impl KernelFromParams for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn from_params(_: &KernelParams) -> Self {
        ThinPlateSplineRbfKernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn central_difference<K: RadialKernel>(kernel: &K, r: f64) -> f64 {
        let h = 1e-6;
        (kernel.phi(r + h) - kernel.phi(r - h)) / (2.0 * h)
    }

    #[test]
    fn values_at_origin_are_finite() {
        assert_eq!(GaussianRbfKernel::new(1.0).phi(0.0), 1.0);
        assert_eq!(MultiquadricRbfKernel::new(1.0).phi(0.0), 1.0);
        assert_eq!(InverseQuadricRbfKernel::new(1.0).phi(0.0), 1.0);
        assert_eq!(InverseMultiquadricRbfKernel::new(1.0).phi(0.0), 1.0);
        assert_eq!(ThinPlateSplineRbfKernel.phi(0.0), 0.0);
        assert_eq!(ThinPlateSplineRbfKernel.dphi(0.0), 0.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        for r in [0.1, 0.5, 1.0, 1.7, 3.2] {
            for shape in [0.5, 1.0, 2.0] {
                let g = GaussianRbfKernel::new(shape);
                let mq = MultiquadricRbfKernel::new(shape);
                let iq = InverseQuadricRbfKernel::new(shape);
                let imq = InverseMultiquadricRbfKernel::new(shape);

                assert!((g.dphi(r) - central_difference(&g, r)).abs() < 1e-6);
                assert!((mq.dphi(r) - central_difference(&mq, r)).abs() < 1e-6);
                assert!((iq.dphi(r) - central_difference(&iq, r)).abs() < 1e-6);
                assert!((imq.dphi(r) - central_difference(&imq, r)).abs() < 1e-6);
            }

            let tps = ThinPlateSplineRbfKernel;
            assert!((tps.dphi(r) - central_difference(&tps, r)).abs() < 1e-5);
        }
    }

    #[test]
    fn thin_plate_spline_known_values() {
        let tps = ThinPlateSplineRbfKernel;
        assert_eq!(tps.phi(1.0), 0.0);
        assert!((tps.phi(2.0) - 4.0 * 2f64.ln()).abs() < 1e-15);
    }
}

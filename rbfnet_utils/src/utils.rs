/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies distances, the kernel registry, and dense kernel-matrix builders.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialKernel};
use faer::Mat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two vectors that must share a length do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dimension mismatch: expected {expected}, found {found}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Calculates the euclidean distance between two points.
///
/// Extra coordinates on the longer input are ignored; use [`try_get_distance`]
/// when the lengths are not already known to agree.
///
/// # Examples
///
/// ```
/// use rbfnet_utils::get_distance;
///
/// let dist = get_distance(&[1.0, 2.0], &[4.0, 6.0]);
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: &[f64], source: &[f64]) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

/// Calculates the euclidean distance between two points of equal dimension.
///
/// # Examples
///
/// ```
/// use rbfnet_utils::try_get_distance;
///
/// assert!(try_get_distance(&[0.0, 0.0], &[3.0, 4.0]).is_ok());
/// assert!(try_get_distance(&[0.0, 0.0], &[3.0]).is_err());
/// ```
#[inline]
pub fn try_get_distance(target: &[f64], source: &[f64]) -> Result<f64, DimensionMismatch> {
    if target.len() != source.len() {
        return Err(DimensionMismatch {
            expected: target.len(),
            found: source.len(),
        });
    }
    Ok(get_distance(target, source))
}

/// Builds a dense kernel matrix using a typed kernel function.
///
/// Row `i` corresponds to `target_points[i]`, column `j` to `source_points[j]`.
#[inline(always)]
pub fn get_a_matrix_typed<K, P>(target_points: &[P], source_points: &[P], kernel_function: &K) -> Mat<f64>
where
    K: RadialKernel,
    P: AsRef<[f64]>,
{
    let m = target_points.len();
    let n = source_points.len();

    let mut a_matrix = Mat::<f64>::zeros(m, n);

    for (j, source) in source_points.iter().enumerate() {
        for (i, target) in target_points.iter().enumerate() {
            a_matrix[(i, j)] = kernel_function.phi(get_distance(target.as_ref(), source.as_ref()));
        }
    }

    a_matrix
}

/// Builds a symmetric kernel matrix between a set of points and itself.
///
/// Each unordered pair is evaluated once and written to both triangles.
#[inline(always)]
pub fn get_a_matrix_symmetric_typed<K, P>(points: &[P], kernel_function: &K) -> Mat<f64>
where
    K: RadialKernel,
    P: AsRef<[f64]>,
{
    let n = points.len();

    let mut a_matrix = Mat::<f64>::zeros(n, n);

    for j in 0..n {
        let source = points[j].as_ref();

        for i in j..n {
            let k_val = kernel_function.phi(get_distance(points[i].as_ref(), source));

            // Write both symmetric entries
            a_matrix[(i, j)] = k_val;
            a_matrix[(j, i)] = k_val;
        }
    }

    a_matrix
}

// K-free dispatcher generated from the kernel registry below.
// Assumes each kernel type implements `KernelFromParams` and `RadialKernel`.
macro_rules! for_each_kernel {
    ( registry = [ $( ($V:ident, $Kty:path, $name:literal) ),* $(,)? ] ) => {

        /// Runtime kernel selector built from the kernel registry.
        ///
        /// The declaration order fixes the tag written by the binary serializer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KernelType {
            $( $V, )*
        }

        impl KernelType {
            /// Every kernel variant, in tag order.
            pub const ALL: &'static [KernelType] = &[ $( KernelType::$V, )* ];

            /// Human readable kernel name.
            pub fn description(&self) -> &'static str {
                match self {
                    $( KernelType::$V => $name, )*
                }
            }

            /// Stable one-byte tag of this variant.
            pub fn tag(&self) -> u8 {
                *self as u8
            }

            /// Inverse of [`KernelType::tag`].
            pub fn from_tag(tag: u8) -> Option<Self> {
                Self::ALL.get(tag as usize).copied()
            }
        }

        /// Builds a dense kernel matrix for the selected [`KernelType`].
        #[inline(always)]
        pub fn get_a_matrix<P: AsRef<[f64]>>(
            target_points: &[P],
            source_points: &[P],
            params: &KernelParams,
        ) -> Mat<f64> {
            match params.kernel_type {
                $(
                    KernelType::$V => {
                        // Convert uniform params -> concrete kernel type
                        let k = <$Kty as KernelFromParams>::from_params(params);
                        get_a_matrix_typed(target_points, source_points, &k)
                    }
                ),*
            }
        }

        /// Builds the symmetric kernel matrix of a point set with itself.
        #[inline(always)]
        pub fn get_a_matrix_symmetric<P: AsRef<[f64]>>(
            points: &[P],
            params: &KernelParams,
        ) -> Mat<f64> {
            match params.kernel_type {
                $(
                    KernelType::$V => {
                        let k = <$Kty as KernelFromParams>::from_params(params);
                        get_a_matrix_symmetric_typed(points, &k)
                    }
                ),*
            }
        }

        /// Evaluates the selected kernel function at distance `r`.
        #[inline(always)]
        pub fn kernel_phi(r: f64, params: &KernelParams) -> f64 {
            match params.kernel_type {
                $(
                    KernelType::$V => {
                        <$Kty as KernelFromParams>::from_params(params).phi(r)
                    }
                ),*
            }
        }

        /// Evaluates the derivative of the selected kernel function at distance `r`.
        #[inline(always)]
        pub fn kernel_dphi(r: f64, params: &KernelParams) -> f64 {
            match params.kernel_type {
                $(
                    KernelType::$V => {
                        <$Kty as KernelFromParams>::from_params(params).dphi(r)
                    }
                ),*
            }
        }
    };
}

for_each_kernel! {
    registry = [
        (Gaussian,            crate::kernels::GaussianRbfKernel,            "Gaussian"),
        (Multiquadric,        crate::kernels::MultiquadricRbfKernel,        "Multiquadric"),
        (InverseQuadric,      crate::kernels::InverseQuadricRbfKernel,      "Inverse quadric"),
        (InverseMultiquadric, crate::kernels::InverseMultiquadricRbfKernel, "Inverse multiquadric"),
        (ThinPlateSpline,     crate::kernels::ThinPlateSplineRbfKernel,     "Thin plate spline"),
    ]
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides parameter and builder types for configuring RBF kernels.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use crate::utils::KernelType;

/// Shape parameter used when none is given. Reproduces the classic,
/// unscaled forms of the kernels.
pub const DEFAULT_SHAPE_PARAMETER: f64 = 1.0;

/// Defines the [`KernelType`] to use, along with its shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// KernelType enum variant to use.
    pub kernel_type: KernelType,

    /// Shape parameter `e` scaling the distance as `e * r`.
    ///
    /// Larger values make each basis function more local. Ignored by the
    /// thin plate spline kernel.
    pub shape: f64,
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> KernelParamsBuilder {
        KernelParamsBuilder {
            kernel_type,
            shape: DEFAULT_SHAPE_PARAMETER,
        }
    }
}

impl From<KernelType> for KernelParams {
    fn from(kernel_type: KernelType) -> Self {
        KernelParams::builder(kernel_type).build()
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    kernel_type: KernelType,
    shape: f64,
}

impl KernelParamsBuilder {
    /// Sets the `shape` parameter on the builder.
    pub fn shape(mut self, v: f64) -> Self {
        self.shape = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    ///
    /// # Panics
    /// If the shape parameter is not a positive, finite number.
    pub fn build(self) -> KernelParams {
        assert!(self.shape.is_finite() && self.shape > 0.0);
        KernelParams {
            kernel_type: self.kernel_type,
            shape: self.shape,
        }
    }
}

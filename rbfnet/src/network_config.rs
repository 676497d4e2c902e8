/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies kernel and normalization options for configuring RBF networks.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies kernel and normalization options for configuring RBF networks.
use crate::serializer::binary_fields;
use rbfnet_utils::{KernelParams, KernelType, DEFAULT_SHAPE_PARAMETER};
use serde::{Deserialize, Serialize};

#[doc = include_str!("../docs/network_settings.md")]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Kernel variant and shape parameter.
    pub kernel_params: KernelParams,

    /// Whether the network is a normalized RBF network.
    pub normalized: bool,
}

binary_fields!(NetworkSettings {
    kernel_params: KernelParams,
    normalized: bool,
});

impl NetworkSettings {
    /// Returns a new [`NetworkSettingsBuilder`] for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> NetworkSettingsBuilder {
        NetworkSettingsBuilder::new(kernel_type)
    }

    pub fn kernel_type(&self) -> KernelType {
        self.kernel_params.kernel_type
    }
}

impl From<KernelType> for NetworkSettings {
    fn from(kernel_type: KernelType) -> Self {
        NetworkSettings::builder(kernel_type).build()
    }
}

/// A convenience builder for constructing a [`NetworkSettings`] instance.
///
/// The builder should be called via the [`NetworkSettings::builder`] method.
///
/// See [`NetworkSettings`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct NetworkSettingsBuilder {
    pub kernel_type: KernelType,
    pub shape: f64,
    pub normalized: bool,
}

impl NetworkSettingsBuilder {
    fn new(kernel_type: KernelType) -> Self {
        Self {
            kernel_type,
            shape: DEFAULT_SHAPE_PARAMETER,
            normalized: false,
        }
    }

    /// Sets the kernel shape parameter.
    pub fn shape(mut self, shape: f64) -> Self {
        self.shape = shape;
        self
    }

    /// Enables or disables normalization.
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Builds and returns a [`NetworkSettings`] instance.
    ///
    /// # Panics
    /// If the shape parameter is not a positive, finite number.
    pub fn build(self) -> NetworkSettings {
        NetworkSettings {
            kernel_params: KernelParams::builder(self.kernel_type)
                .shape(self.shape)
                .build(),
            normalized: self.normalized,
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel types, distances, and dense kernel-matrix builders used across the rbfnet crates.
//
// Created on: 15 Nov 2025     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the `rbfnet` crate
//!
//! Holds the closed set of radial basis kernels, the Euclidean distance they are
//! evaluated on, and the dense kernel ("A") matrix builders used when training
//! and evaluating a network.
mod rbf_kernels;
mod traits;
mod utils;
mod kernel_helpers;

/// Implemented radial basis kernels.
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    kernel_helpers::{KernelParams, KernelParamsBuilder, DEFAULT_SHAPE_PARAMETER},
    utils::{
        DimensionMismatch, KernelType, get_a_matrix, get_a_matrix_symmetric, get_distance,
        kernel_dphi, kernel_phi, try_get_distance,
    },
    traits::{KernelFromParams, RadialKernel},
};

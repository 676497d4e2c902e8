/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the radial kernel trait and the shared kernel parameter conversion.
//
// Created on: 15 Nov 2025     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::kernel_helpers::KernelParams;

/// Converts a shared [`KernelParams`] configuration into a concrete kernel type.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> Self;
}

/// A radial function `phi(r)` of the distance `r >= 0` from a centre, together
/// with its derivative with respect to `r`.
///
/// Both methods must return finite values at `r = 0`.
pub trait RadialKernel {
    fn phi(&self, r: f64) -> f64;

    fn dphi(&self, r: f64) -> f64;
}

/////////////////////////////////////////////////////////////////////////////////////////////
//
// Groups the modules that precondition the dense RBF training system.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

pub mod jacobi;

use crate::{assembly::LinearSystem, config::Preconditioner};

impl Preconditioner {
    /// Applies this preconditioner to `system` in place.
    pub fn apply(&self, system: &mut LinearSystem) {
        match self {
            Preconditioner::None => {}
            Preconditioner::Jacobi => jacobi::jacobi_scale(system),
        }
    }
}

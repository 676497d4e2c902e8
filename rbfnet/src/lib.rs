/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for dense RBF networks.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Dense Radial Basis Function (RBF) networks.
//!
//! An RBF network approximates a scalar function of several variables from
//! scattered samples `(x_i, y_i)` as a weighted sum of radial kernels centred
//! on the samples:
//!
//! ```text
//! f(x) = sum_i w_i phi(|x - x_i|)
//! ```
//!
//! The weights are found by solving the dense system `A w = y` with
//! `A_ij = phi(|x_i - x_j|)`. A normalized network instead evaluates
//! `sum_i w_i phi_i(x) / sum_i phi_i(x)` and trains against the kernel row
//! sums accordingly.
//!
//! The system is solved directly with a singular value decomposition, so
//! assembly costs **O(N²)** memory and the solve **O(N³)** operations. Singular
//! systems (duplicate inputs, thin plate spline zeros) yield the minimum-norm
//! least squares weights rather than an error, and the conditioning is reported
//! alongside the trained network.
//!
//! # Features
//! - Gaussian, multiquadric, inverse quadric, inverse multiquadric and thin
//!   plate spline kernels, with a shape parameter
//! - Plain and normalized networks in any number of dimensions
//! - Analytic gradients, numeric Hessians
//! - Raw binary persistence, plus a versioned JSON model format
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) for linear algebra
//!
//! # Examples
//!
//! ```
//! use rbfnet::{
//!     RBFNetwork, SampleTable, RBFTestFunctions, generate_random_points,
//!     network_config::NetworkSettings,
//!     KernelType,
//! };
//!
//! // Generate some random data in the unit square
//! let points = generate_random_points(30, 2, Some(42));
//!
//! // Assign some values to the points using Franke's function
//! let values = RBFTestFunctions::franke_2d(&points);
//! let values: Vec<f64> = values.iter().copied().collect();
//! let samples = SampleTable::from_points(points.as_ref(), &values)?;
//!
//! // Train an inverse multiquadric network
//! let settings = NetworkSettings::builder(KernelType::InverseMultiquadric)
//!     .shape(3.0)
//!     .build();
//! let net = RBFNetwork::builder(samples, settings).build()?;
//!
//! // The network reproduces the training data
//! for sample in net.samples().iter() {
//!     assert!((net.evaluate(sample.x())? - sample.y()).abs() < 1e-6);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # References
//! 1.  Fasshauer, G., 2007. Meshfree Approximation Methods with Matlab. World Scientific Publishing Co.
pub mod network_config;

mod common;

mod rbf;

mod assembly;

pub mod approximant;

pub mod config;

pub mod error;

pub mod linalg;

pub mod preconditioning;

pub mod progress;

pub mod sample_table;

pub mod serializer;

mod rbf_test_functions;

pub use {
    approximant::Approximant,
    assembly::{assemble, LinearSystem},
    common::{create_evaluation_grid, generate_random_points, point_values_to_csv},
    config::{Preconditioner, SolverParams},
    error::NetworkError,
    linalg::ConditionReport,
    network_config::NetworkSettings,
    rbf::{ModelIOError, RBFNetwork, RBFNetworkBuilder},
    rbf_test_functions::RBFTestFunctions,
    rbfnet_utils::{KernelParams, KernelType},
    sample_table::{Sample, SampleTable, SampleTableError},
    serializer::{BinaryCodec, Serializer, SerializerError},
};

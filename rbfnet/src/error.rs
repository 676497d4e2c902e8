/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type shared by network training, evaluation, and binary persistence.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    linalg::FactorizationError, sample_table::SampleTableError, serializer::SerializerError,
};
pub use rbfnet_utils::DimensionMismatch;

/// Errors returned while training, evaluating, saving or loading an
/// [`RBFNetwork`](crate::RBFNetwork).
///
/// Numerical ill-conditioning is not an error; it is reported through the
/// [`ConditionReport`](crate::linalg::ConditionReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// An input vector or point matrix has the wrong number of variables.
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    /// Training was requested on a table without samples.
    #[error("cannot build a network from an empty sample table")]
    EmptySampleTable,

    /// The sample table rejected the training request.
    #[error(transparent)]
    SampleTable(#[from] SampleTableError),

    /// The decomposition of the training matrix failed.
    #[error(transparent)]
    Decomposition(#[from] FactorizationError),

    /// Reading or writing the binary stream failed.
    #[error(transparent)]
    Serializer(#[from] SerializerError),
}

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

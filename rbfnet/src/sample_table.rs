/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the sample table holding (input vector, output scalar) training pairs.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Training samples for an [`RBFNetwork`](crate::RBFNetwork).
//!
//! A [`SampleTable`] stores `(x, y)` pairs where every `x` has the same number
//! of input variables. The first sample fixes that number. Alongside the
//! samples the table tracks, per input variable, the sorted set of distinct
//! coordinates seen so far. This grid is what
//! [`SampleTable::is_grid_complete`] checks the samples against.

use crate::serializer::{binary_fields, SerializerError};
use csv::{ReaderBuilder, Writer};
use faer::{Col, Mat, MatRef};
use itertools::Itertools;
use rbfnet_utils::DimensionMismatch;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// Errors raised while building, checking, or transferring a [`SampleTable`].
#[derive(Debug, thiserror::Error)]
pub enum SampleTableError {
    /// A sample has a different number of inputs than the table.
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    /// A sample with no input variables was offered.
    #[error("a sample needs at least one input variable")]
    NoInputs,

    /// The input vector is already in a table that does not allow duplicates.
    #[error("duplicate sample at {x:?}")]
    DuplicateSample { x: Vec<f64> },

    /// The samples do not cover every point of the grid.
    #[error("incomplete grid: {found} distinct samples, {expected} grid points")]
    IncompleteGrid { expected: usize, found: usize },

    /// The points and values handed in together differ in length.
    #[error("{points} points but {values} values")]
    LengthMismatch { points: usize, values: usize },

    /// Error reported by the CSV reader or writer.
    #[error("csv error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// Failed to flush a CSV file to disk.
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A CSV field is not a number.
    #[error("{}:{line}: cannot parse {value:?} as a number", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A CSV record has a different number of columns than the first record.
    #[error("{}:{line}: expected {expected} columns, found {found}", path.display())]
    InconsistentColumns {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
}

pub type SampleTableResult<T> = std::result::Result<T, SampleTableError>;

/// One training pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    x: Vec<f64>,
    y: f64,
}

impl Sample {
    pub fn new(x: Vec<f64>, y: f64) -> Self {
        Self { x, y }
    }

    /// Input vector.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Output value.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Number of input variables.
    pub fn dim(&self) -> usize {
        self.x.len()
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.x
    }
}

binary_fields!(Sample {
    x: Vec<f64>,
    y: f64,
});

/// Ordered collection of training samples.
///
/// Samples keep their insertion order, which is also the order of the
/// network weights trained from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    allow_duplicates: bool,
    allow_incomplete_grid: bool,
    num_duplicates: usize,
    num_variables: usize,
    samples: Vec<Sample>,
    grid: Vec<Vec<f64>>,
}

impl Default for SampleTable {
    fn default() -> Self {
        Self::new()
    }
}

binary_fields!(SampleTable {
    allow_duplicates: bool,
    allow_incomplete_grid: bool,
    num_duplicates: usize,
    num_variables: usize,
    samples: Vec<Sample>,
    grid: Vec<Vec<f64>>,
} check SampleTable::validate_decoded);

impl SampleTable {
    /// Creates an empty table that rejects duplicate inputs and accepts
    /// scattered (non-grid) samples.
    pub fn new() -> Self {
        Self::with_options(false, true)
    }

    /// Creates an empty table with explicit duplicate and grid policies.
    pub fn with_options(allow_duplicates: bool, allow_incomplete_grid: bool) -> Self {
        Self {
            allow_duplicates,
            allow_incomplete_grid,
            num_duplicates: 0,
            num_variables: 0,
            samples: Vec::new(),
            grid: Vec::new(),
        }
    }

    /// Builds a table from an `n x d` point matrix and `n` output values.
    pub fn from_points(points: MatRef<'_, f64>, values: &[f64]) -> SampleTableResult<Self> {
        if points.nrows() != values.len() {
            return Err(SampleTableError::LengthMismatch {
                points: points.nrows(),
                values: values.len(),
            });
        }

        let mut table = Self::new();
        for (i, y) in values.iter().enumerate() {
            table.add_sample(points.row(i).iter().copied().collect::<Vec<f64>>(), *y)?;
        }
        Ok(table)
    }

    /// Appends a sample.
    ///
    /// The first sample fixes the number of input variables. Exact repeats of
    /// an existing input vector are rejected unless the table allows
    /// duplicates, in which case they are counted.
    pub fn add_sample<X: Into<Vec<f64>>>(&mut self, x: X, y: f64) -> SampleTableResult<()> {
        self.add(Sample::new(x.into(), y))
    }

    /// Appends an already constructed [`Sample`].
    pub fn add(&mut self, sample: Sample) -> SampleTableResult<()> {
        if sample.dim() == 0 {
            return Err(SampleTableError::NoInputs);
        }

        if self.samples.is_empty() {
            self.num_variables = sample.dim();
            self.grid = vec![Vec::new(); sample.dim()];
        } else if sample.dim() != self.num_variables {
            return Err(DimensionMismatch {
                expected: self.num_variables,
                found: sample.dim(),
            }
            .into());
        }

        if self.samples.iter().any(|s| s.x == sample.x) {
            if !self.allow_duplicates {
                return Err(SampleTableError::DuplicateSample { x: sample.x });
            }
            self.num_duplicates += 1;
        }

        for (values, &coord) in self.grid.iter_mut().zip(sample.x.iter()) {
            if let Err(pos) = values.binary_search_by(|v| v.total_cmp(&coord)) {
                values.insert(pos, coord);
            }
        }

        self.samples.push(sample);
        Ok(())
    }

    /// Number of samples, duplicates included.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of input variables, or `0` for an empty table.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of samples whose input repeats an earlier one.
    pub fn num_duplicates(&self) -> usize {
        self.num_duplicates
    }

    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    pub fn allows_incomplete_grid(&self) -> bool {
        self.allow_incomplete_grid
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Sorted distinct coordinates per input variable.
    pub fn grid(&self) -> &[Vec<f64>] {
        &self.grid
    }

    /// Number of points in the tensor grid spanned by [`SampleTable::grid`].
    ///
    /// Saturates at `usize::MAX` when the grid is too large to count.
    pub fn grid_size(&self) -> usize {
        match self.grid.is_empty() {
            true => 0,
            false => self
                .grid
                .iter()
                .try_fold(1usize, |acc, axis| acc.checked_mul(axis.len()))
                .unwrap_or(usize::MAX),
        }
    }

    /// Whether the distinct samples fill every point of the grid.
    pub fn is_grid_complete(&self) -> bool {
        !self.samples.is_empty() && self.samples.len() - self.num_duplicates == self.grid_size()
    }

    /// Fails with [`SampleTableError::IncompleteGrid`] when the table requires
    /// a complete grid and does not have one.
    pub fn grid_complete_guard(&self) -> SampleTableResult<()> {
        if self.allow_incomplete_grid || self.is_grid_complete() {
            return Ok(());
        }
        Err(SampleTableError::IncompleteGrid {
            expected: self.grid_size(),
            found: self.samples.len() - self.num_duplicates,
        })
    }

    /// Grid points with no sample, in lexicographic order.
    pub fn missing_grid_points(&self) -> Vec<Vec<f64>> {
        if self.grid.is_empty() {
            return Vec::new();
        }

        let present: HashSet<Vec<u64>> = self.samples.iter().map(|s| coordinate_key(&s.x)).collect();

        self.grid
            .iter()
            .map(|values| values.iter().copied())
            .multi_cartesian_product()
            .filter(|point| !present.contains(&coordinate_key(point)))
            .collect()
    }

    /// Input vectors as an `n x d` matrix, one sample per row.
    pub fn points(&self) -> Mat<f64> {
        Mat::from_fn(self.samples.len(), self.num_variables, |i, j| self.samples[i].x[j])
    }

    /// Output values in sample order.
    pub fn values(&self) -> Col<f64> {
        Col::from_fn(self.samples.len(), |i| self.samples[i].y)
    }

    /// Reads samples from a CSV file. The last column is the output value and
    /// every preceding column an input variable.
    pub fn from_csv<P: AsRef<Path>>(path: P, has_headers: bool) -> SampleTableResult<Self> {
        let path_ref = path.as_ref();
        let csv_error = |source: csv::Error| SampleTableError::Csv {
            path: path_ref.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_path(path_ref)
            .map_err(csv_error)?;

        let mut table = Self::new();
        let mut num_cols = 0;

        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let line = record.position().map_or(0, |p| p.line());

            if num_cols == 0 {
                num_cols = record.len();
            } else if record.len() != num_cols {
                return Err(SampleTableError::InconsistentColumns {
                    path: path_ref.to_path_buf(),
                    line,
                    expected: num_cols,
                    found: record.len(),
                });
            }

            let mut row = Vec::with_capacity(record.len());
            for value in record.iter() {
                let parsed = value.trim().parse::<f64>().map_err(|_| SampleTableError::Parse {
                    path: path_ref.to_path_buf(),
                    line,
                    value: value.to_string(),
                })?;
                row.push(parsed);
            }

            // Separate the output value from the inputs
            let y = row.pop().unwrap_or(f64::NAN);
            table.add_sample(row, y)?;
        }

        Ok(table)
    }

    /// Writes the samples to a CSV file with an `x0, .., y` header.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> SampleTableResult<()> {
        let path_ref = path.as_ref();
        let csv_error = |source: csv::Error| SampleTableError::Csv {
            path: path_ref.to_path_buf(),
            source,
        };

        let mut wtr = Writer::from_path(path_ref).map_err(csv_error)?;

        let mut headers: Vec<String> = (0..self.num_variables).map(|i| format!("x{i}")).collect();
        headers.push("y".to_string());
        wtr.write_record(&headers).map_err(csv_error)?;

        for sample in &self.samples {
            let mut record: Vec<String> = sample.x.iter().map(|c| c.to_string()).collect();
            record.push(sample.y.to_string());
            wtr.write_record(&record).map_err(csv_error)?;
        }

        wtr.flush().map_err(|e| SampleTableError::Write {
            path: path_ref.to_path_buf(),
            source: e,
        })
    }

    fn validate_decoded(self) -> Result<Self, SerializerError> {
        self.check_consistency()?;
        Ok(self)
    }

    /// Checks that a table read from storage agrees with its own bookkeeping.
    pub(crate) fn check_consistency(&self) -> Result<(), SerializerError> {
        let invalid = |msg: String| Err(SerializerError::InvalidModel(msg));

        if self.samples.iter().any(|s| s.dim() != self.num_variables) {
            return invalid(format!(
                "sample table declares {} variables but holds samples of another size",
                self.num_variables
            ));
        }
        if !self.samples.is_empty() && self.grid.len() != self.num_variables {
            return invalid(format!(
                "sample table grid has {} dimensions, expected {}",
                self.grid.len(),
                self.num_variables
            ));
        }
        if self.num_duplicates > self.samples.len() {
            return invalid(format!(
                "{} duplicates recorded for {} samples",
                self.num_duplicates,
                self.samples.len()
            ));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SampleTable {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Hashable identity of a coordinate vector. Treats `-0.0` and `0.0` as equal.
fn coordinate_key(x: &[f64]) -> Vec<u64> {
    x.iter()
        .map(|v| if *v == 0.0 { 0 } else { v.to_bits() })
        .collect()
}

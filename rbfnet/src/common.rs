/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for random point generation, evaluation grids, and CSV output.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use csv::Writer;
use faer::{Col, Mat, MatRef};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Generate a matrix of random points in the unit hypercube.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `d`: Number of dimensions per point (columns in the output matrix).
/// - `seed`: Optional random seed. `Some(seed)` gives the same points on every
///   run; `None` seeds the generator from the operating system.
///
/// # Example
/// ```
/// use rbfnet::generate_random_points;
///
/// // Generate 100 reproducible 3D points
/// let pts = generate_random_points(100, 3, Some(42));
/// assert_eq!(pts.ncols(), 3);
/// ```
pub fn generate_random_points(n: usize, d: usize, seed: Option<u64>) -> Mat<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Mat::from_fn(n, d, |_, _| rng.random_range(0.0..1.0))
}

/// `count` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count as f64 - 1.0);
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Create a regular evaluation grid from per-dimension ranges and sample counts.
///
/// Rows are ordered lexicographically, with the last dimension varying fastest.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`.
///
/// # Example
/// ```
/// use rbfnet::create_evaluation_grid;
///
/// let grid = create_evaluation_grid(&[(0.0, 1.0), (0.0, 2.0)], &[2, 3]);
/// assert_eq!(grid.nrows(), 6);
/// assert_eq!(grid[(1, 1)], 1.0);
/// ```
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> Mat<f64> {
    assert_eq!(ranges.len(), counts.len());

    let axes: Vec<Vec<f64>> = ranges
        .iter()
        .zip(counts.iter())
        .map(|(&(start, end), &count)| linspace(start, end, count))
        .collect();

    let rows: Vec<Vec<f64>> = match axes.is_empty() {
        true => Vec::new(),
        false => axes
            .iter()
            .map(|axis| axis.iter().copied())
            .multi_cartesian_product()
            .collect(),
    };

    Mat::from_fn(rows.len(), ranges.len(), |i, j| rows[i][j])
}

/// Write point coordinates and associated values to a CSV file.
///
/// Columns are headed `x0, .., x{d-1}` followed by `value_header`.
pub fn point_values_to_csv<P: AsRef<Path>>(
    points: MatRef<'_, f64>,
    values: &Col<f64>,
    value_header: &str,
    path: P,
) -> Result<(), csv::Error> {
    assert_eq!(points.nrows(), values.nrows(), "Points and values must have same length.");

    let mut wtr = Writer::from_path(path)?;

    let mut headers: Vec<String> = (0..points.ncols()).map(|j| format!("x{j}")).collect();
    headers.push(value_header.to_string());
    wtr.write_record(&headers)?;

    for i in 0..points.nrows() {
        let mut record: Vec<String> = points.row(i).iter().map(|c| c.to_string()).collect();
        record.push(values[i].to_string());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn random_points_are_reproducible() {
        let a = generate_random_points(10, 2, Some(3));
        let b = generate_random_points(10, 2, Some(3));
        assert!(a == b);
        assert!(a.col(0).iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn grid_ordering_and_endpoints() {
        let grid = create_evaluation_grid(&[(-1.0, 1.0), (0.0, 1.0)], &[3, 2]);

        assert!(grid.nrows() == 6);
        assert!(grid.ncols() == 2);
        assert!(grid[(0, 0)] == -1.0);
        assert!(grid[(0, 1)] == 0.0);
        assert!(grid[(1, 1)] == 1.0);
        assert!(grid[(2, 0)] == 0.0);
        assert!(grid[(5, 0)] == 1.0);

        let single = create_evaluation_grid(&[(0.5, 2.0)], &[1]);
        assert!(single.nrows() == 1);
        assert!(single[(0, 0)] == 0.5);
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");

        let points = create_evaluation_grid(&[(0.0, 1.0)], &[3]);
        let values = Col::from_fn(3, |i| i as f64);
        point_values_to_csv(points.as_ref(), &values, "value", &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() == 4);
        assert!(lines[0] == "x0,value");
        assert!(lines[3] == "1,2");
    }
}

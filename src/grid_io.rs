/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds regular input grid generation and plain-text matrix file writing utilities.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Sampling grids over the input domain and the whitespace-delimited matrix
//! files used to export them.
use faer::{Mat, MatRef};
use std::{
    error::Error,
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Generate a regular grid of input points spanning `[min, max]` per dimension.
///
/// The first dimension varies fastest; each subsequent dimension strides over
/// the product of the preceding sample counts. A dimension with a single
/// sample is pinned to its `min` value.
///
/// # Arguments
/// * `min` - Lower bound per dimension.
/// * `max` - Upper bound per dimension; must match `min` in length.
/// * `n_samples_per_dim` - Number of grid samples per dimension, each at least 1.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension,
/// with `n_samples_per_dim.iter().product()` rows in total.
pub fn generate_inputs_grid(min: &[f64], max: &[f64], n_samples_per_dim: &[usize]) -> Mat<f64> {
    assert_eq!(min.len(), max.len(), "min and max must have the same length");
    assert_eq!(
        min.len(),
        n_samples_per_dim.len(),
        "n_samples_per_dim must have one entry per dimension"
    );
    assert!(
        n_samples_per_dim.iter().all(|&count| count >= 1),
        "every dimension needs at least one sample"
    );

    let total_points: usize = n_samples_per_dim.iter().product();
    let num_dimensions = min.len();

    Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = n_samples_per_dim[col_idx];
        let step = match dim_points > 1 {
            true => (max[col_idx] - min[col_idx]) / (dim_points as f64 - 1.0),
            false => 0.0,
        };

        let stride: usize = n_samples_per_dim[..col_idx].iter().product();
        let index_in_dim = (row_idx / stride) % dim_points;
        min[col_idx] + step * index_in_dim as f64
    })
}

/// Write a matrix to `directory/filename` as whitespace-delimited rows of
/// floating-point numbers, one matrix row per line.
///
/// The directory is created if it does not exist. When `overwrite` is `false`
/// and the target file already exists, the write is refused with
/// [`GridIOError::AlreadyExists`].
///
/// # Errors
/// Returns a [`GridIOError`] describing the failing path on any filesystem
/// error. A failed write may leave a partial file behind; no rollback is
/// attempted.
pub fn save_matrix(
    directory: &Path,
    filename: &str,
    matrix: MatRef<f64>,
    overwrite: bool,
) -> Result<(), GridIOError> {
    fs::create_dir_all(directory).map_err(|e| GridIOError::CreateDir {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let path = directory.join(filename);
    if path.exists() && !overwrite {
        return Err(GridIOError::AlreadyExists { path });
    }

    let file = File::create(&path).map_err(|e| GridIOError::Create {
        path: path.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    for i in 0..matrix.nrows() {
        let mut line = String::new();
        for j in 0..matrix.ncols() {
            if j > 0 {
                line.push(' ');
            }
            line.push_str(&matrix[(i, j)].to_string());
        }
        writeln!(writer, "{}", line).map_err(|e| GridIOError::Write {
            path: path.clone(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| GridIOError::Flush {
        path: path.clone(),
        source: e,
    })
}

/// Errors that can occur when writing grid data artifacts to disk.
#[derive(Debug)]
pub enum GridIOError {
    /// Failed to create the target directory.
    CreateDir { path: PathBuf, source: io::Error },

    /// The target file already exists and overwriting was not permitted.
    AlreadyExists { path: PathBuf },

    /// Failed to create the target file before writing.
    Create { path: PathBuf, source: io::Error },

    /// Low-level write error while streaming matrix rows to disk.
    Write { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    Flush { path: PathBuf, source: io::Error },
}

impl fmt::Display for GridIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridIOError::CreateDir { path, source } => {
                write!(f, "creating directory {}: {}", path.display(), source)
            }
            GridIOError::AlreadyExists { path } => {
                write!(
                    f,
                    "{} already exists and overwrite was not permitted",
                    path.display()
                )
            }
            GridIOError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            GridIOError::Write { path, source } => {
                write!(f, "writing {}: {}", path.display(), source)
            }
            GridIOError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for GridIOError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GridIOError::CreateDir { source, .. }
            | GridIOError::Create { source, .. }
            | GridIOError::Write { source, .. }
            | GridIOError::Flush { source, .. } => Some(source),
            GridIOError::AlreadyExists { .. } => None,
        }
    }
}

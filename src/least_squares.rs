/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the regularized (ridge) least-squares solver used to fit linear models.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Implements the regularized (ridge) least-squares solver used to fit linear models.
use faer::{prelude::*, Mat, Side};
use std::{error::Error, fmt};

/// Solve the ridge-regularized least-squares problem
/// `min_w ||X w - Y||^2 + lambda ||w||^2` in closed form.
///
/// The normal equations `(X^T X + lambda I) w = X^T Y` are assembled and
/// solved with a Cholesky factorization. Any `lambda > 0` makes the system
/// strictly positive definite, so underdetermined problems (`N < B`) are
/// handled without failure. With `lambda = 0` this degrades to ordinary least
/// squares, which fails on rank-deficient `X`; that failure is reported, not
/// worked around.
///
/// # Arguments
/// * `inputs` - Design matrix `X`, shape `(N, B)`.
/// * `targets` - Target matrix `Y`, shape `(N, K)`.
/// * `use_offset` - When `true`, a constant offset column is appended to `X`.
///   The offset coefficient is not regularized.
/// * `regularization` - Ridge penalty `lambda >= 0`.
///
/// # Returns
/// The weight matrix of shape `(B, K)`, or `(B + 1, K)` when `use_offset` is
/// `true` (the offset coefficients occupy the last row).
///
/// # Errors
/// Returns [`LeastSquaresError::SingularSystem`] when the normal equations
/// are not positive definite (rank-deficient `X` with `lambda = 0`).
///
/// # Panics
/// Panics if `inputs` and `targets` disagree on row count or if
/// `regularization` is negative.
pub fn solve(
    inputs: &Mat<f64>,
    targets: &Mat<f64>,
    use_offset: bool,
    regularization: f64,
) -> Result<Mat<f64>, LeastSquaresError> {
    assert_eq!(
        inputs.nrows(),
        targets.nrows(),
        "inputs and targets must have the same number of rows"
    );
    assert!(
        regularization >= 0.0,
        "regularization must be non-negative, got {}",
        regularization
    );

    let num_features = inputs.ncols();

    let design = match use_offset {
        true => Mat::from_fn(inputs.nrows(), num_features + 1, |i, j| {
            if j < num_features {
                inputs[(i, j)]
            } else {
                1.0
            }
        }),
        false => inputs.clone(),
    };

    let design_transposed = design.transpose().to_owned();
    let mut gram = &design_transposed * &design;
    let rhs = &design_transposed * targets;

    // The offset coefficient, when present, occupies the last row and is
    // left unregularized.
    for i in 0..num_features {
        gram[(i, i)] += regularization;
    }

    let cholesky = gram
        .llt(Side::Lower)
        .map_err(|_| LeastSquaresError::SingularSystem {
            rows: inputs.nrows(),
            cols: design.ncols(),
        })?;

    Ok(cholesky.solve(&rhs))
}

/// Error returned when the least-squares system cannot be solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeastSquaresError {
    /// The normal equations are singular (or numerically indefinite). This
    /// occurs for rank-deficient design matrices in the zero-regularization
    /// limit.
    SingularSystem { rows: usize, cols: usize },
}

impl fmt::Display for LeastSquaresError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeastSquaresError::SingularSystem { rows, cols } => write!(
                f,
                "singular least-squares system for a {}x{} design matrix; \
                 a positive regularization is required for rank-deficient systems",
                rows, cols
            ),
        }
    }
}

impl Error for LeastSquaresError {}

/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the cosine basis function activations for random Fourier features.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Evaluation of the cosine feature projection `cos(period · x + phase)`.
use faer::Mat;

/// Evaluate the cosine basis function activations of a set of inputs.
///
/// Each basis function `j` is defined by a period row `periods.row(j)` and a
/// phase `phase[(j, 0)]`, and its activation at input row `x` is
/// `cos(periods.row(j) · x + phase[(j, 0)])`.
///
/// # Arguments
/// * `periods` - Basis function periods, shape `(B, D)`.
/// * `phase` - Basis function phases as a column, shape `(B, 1)`.
/// * `inputs` - Input points, one row per point, shape `(N, D)`.
///
/// # Returns
/// The activation matrix of shape `(N, B)`.
///
/// Pure function: defined for any `D >= 1`, `B >= 1`, `N >= 0`, with no
/// hidden state.
pub fn cosine_activations(periods: &Mat<f64>, phase: &Mat<f64>, inputs: &Mat<f64>) -> Mat<f64> {
    assert_eq!(
        periods.ncols(),
        inputs.ncols(),
        "periods and inputs must have the same number of columns"
    );
    assert_eq!(
        phase.nrows(),
        periods.nrows(),
        "phase must have one entry per basis function"
    );
    assert_eq!(phase.ncols(), 1, "phase must be a column vector");

    let mut activations = inputs * periods.transpose();

    activations.col_iter_mut().enumerate().for_each(|(j, col)| {
        let phase_j = phase[(j, 0)];
        col.iter_mut().for_each(|value| *value = (*value + phase_j).cos());
    });

    activations
}

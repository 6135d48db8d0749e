/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the lifecycle trait shared by all function approximator families.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares the lifecycle trait shared by all function approximator families.
use crate::grid_io::GridIOError;
use crate::least_squares::LeastSquaresError;
use faer::Mat;
use std::path::Path;

/// Lifecycle contract for interchangeable function approximators.
///
/// An approximator starts `untrained`, becomes `trained` through a single
/// [`train`](FunctionApproximator::train) call, and thereafter serves
/// predictions. Repeated-call misuse (training twice, predicting before
/// training) is handled softly: the call becomes a warned no-op rather than a
/// fault. Contract violations such as mismatched matrix shapes panic.
///
/// Each implementation holds its concrete parameter kinds directly, so
/// cloning an approximator can never mix parameters across families; an
/// incompatible combination is a compile-time type error.
pub trait FunctionApproximator {
    /// Fit the approximator to `inputs` (N×D) and `targets` (N×K).
    ///
    /// Training is single-shot: a second call on a trained instance warns and
    /// does nothing, leaving the model untouched. Use
    /// [`retrain`](FunctionApproximator::retrain) to bypass the guard.
    fn train(&mut self, inputs: &Mat<f64>, targets: &Mat<f64>) -> Result<(), LeastSquaresError>;

    /// Discard any fitted model and fit again from the retained meta
    /// parameters.
    fn retrain(&mut self, inputs: &Mat<f64>, targets: &Mat<f64>)
        -> Result<(), LeastSquaresError>;

    /// Predict outputs (M×K) for `inputs` (M×D). Returns `None`, with a
    /// warning, when the approximator has not been trained.
    fn predict(&self, inputs: &Mat<f64>) -> Option<Mat<f64>>;

    /// Whether a fitted model is installed.
    fn is_trained(&self) -> bool;

    /// The input dimensionality this approximator accepts, fixed at
    /// construction.
    fn expected_input_dim(&self) -> usize;

    /// Sample the fitted model over a regular grid and persist the grid
    /// artifacts into `directory`. An empty `directory` is a successful
    /// no-op.
    fn save_grid_data(
        &self,
        min: &[f64],
        max: &[f64],
        n_samples_per_dim: &[usize],
        directory: &Path,
        overwrite: bool,
    ) -> Result<(), GridIOError>;

    /// Produce a deep, independent copy of this approximator in the same
    /// lifecycle state, usable through the trait object interface.
    fn clone_approximator(&self) -> Box<dyn FunctionApproximator>;
}

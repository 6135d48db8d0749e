/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the fitted model parameters: weights, random feature periods, and phases.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Defines the fitted model parameters: weights, random feature periods, and phases.
use crate::basis_function;
use faer::{Mat, MatRef};
use serde::{Deserialize, Serialize};

/// Parameters of a fitted random Fourier feature model.
///
/// A model is created exactly once, atomically, at the end of a successful
/// training call and is immutable thereafter. It bundles the fitted linear
/// weights together with the random feature parameters (periods and phases)
/// that were drawn during that training call, so that prediction is fully
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Fitted linear weights, shape `(B, K)` for `K` output dimensions.
    weights: Mat<f64>,

    /// Random feature periods, shape `(B, D)`.
    periods: Mat<f64>,

    /// Random feature phases, shape `(B, 1)`.
    phase: Mat<f64>,
}

impl ModelParameters {
    /// Creates a new [`ModelParameters`] instance.
    ///
    /// # Panics
    /// Panics unless `weights`, `periods`, and `phase` agree on the number of
    /// basis functions (their row counts) and `phase` is a column vector.
    pub fn new(weights: Mat<f64>, periods: Mat<f64>, phase: Mat<f64>) -> Self {
        assert_eq!(
            weights.nrows(),
            periods.nrows(),
            "weights and periods must have one row per basis function"
        );
        assert_eq!(
            phase.nrows(),
            periods.nrows(),
            "phase must have one entry per basis function"
        );
        assert_eq!(phase.ncols(), 1, "phase must be a column vector");
        assert!(periods.ncols() >= 1, "periods must have at least one column");

        Self {
            weights,
            periods,
            phase,
        }
    }

    /// The fitted linear weights, shape `(B, K)`.
    pub fn weights(&self) -> MatRef<f64> {
        self.weights.as_ref()
    }

    /// The random feature periods, shape `(B, D)`.
    pub fn periods(&self) -> MatRef<f64> {
        self.periods.as_ref()
    }

    /// The random feature phases, shape `(B, 1)`.
    pub fn phase(&self) -> MatRef<f64> {
        self.phase.as_ref()
    }

    /// Number of basis functions `B` in the model.
    pub fn num_basis_functions(&self) -> usize {
        self.periods.nrows()
    }

    /// Number of input dimensions `D` the model was fitted for.
    pub fn input_dim(&self) -> usize {
        self.periods.ncols()
    }

    /// Number of output dimensions `K` the model predicts.
    pub fn output_dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Evaluate the cosine activations of `inputs` against this model's own
    /// periods and phases. Returns a matrix of shape `(N, B)`.
    pub fn cosine_activations(&self, inputs: &Mat<f64>) -> Mat<f64> {
        basis_function::cosine_activations(&self.periods, &self.phase, inputs)
    }
}

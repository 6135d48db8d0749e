/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the meta parameter (hyperparameter) types controlling random feature generation.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Hyperparameters for the random feature draw and the ridge fit, with a
//! validating builder.
use serde::{Deserialize, Serialize};

/// Hyperparameters controlling how an [`RrffApproximator`](crate::RrffApproximator)
/// draws its random Fourier features and fits its linear model.
///
/// # Overview
/// Training draws `number_of_basis_functions` cosine basis functions whose
/// periods are sampled i.i.d. from `Normal(0, sqrt(2 * gamma))` and whose
/// phases are sampled uniformly in `[0, 2π)`. The fitted weights are then the
/// ridge-regularized least-squares solution against the training targets.
///
/// Meta parameters are immutable once built and are consumed by a single
/// training call. Construct them through [`MetaParameters::builder`].
///
/// # Reproducibility
/// When `seed` is `Some`, the feature draw is fully deterministic across runs
/// and platforms. When `None`, the generator is seeded from the operating
/// system's randomness source and every training call draws fresh features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetaParameters {
    /// Number of input dimensions the approximator accepts. Fixed at
    /// construction; training inputs must have exactly this many columns.
    pub expected_input_dim: usize,

    /// Number of cosine basis functions to draw during training.
    pub number_of_basis_functions: usize,

    /// Controls the frequency spread of the random features. Periods are
    /// drawn from a zero-mean normal with standard deviation `sqrt(2 * gamma)`.
    pub gamma: f64,

    /// Ridge penalty applied when fitting the linear model. Zero degrades to
    /// ordinary least squares, which may fail on rank-deficient feature
    /// matrices.
    pub regularization: f64,

    /// Optional random seed for the feature draw.
    pub seed: Option<u64>,
}

impl MetaParameters {
    /// Returns a new [`MetaParametersBuilder`] for an approximator expecting
    /// `expected_input_dim` input dimensions.
    pub fn builder(expected_input_dim: usize) -> MetaParametersBuilder {
        MetaParametersBuilder::new(expected_input_dim)
    }
}

/// A convenience builder for constructing a [`MetaParameters`] instance.
///
/// The builder should be called via the [`MetaParameters::builder`] method.
///
/// See [`MetaParameters`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct MetaParametersBuilder {
    pub expected_input_dim: usize,
    pub number_of_basis_functions: usize,
    pub gamma: f64,
    pub regularization: f64,
    pub seed: Option<u64>,
}

impl MetaParametersBuilder {
    /// Creates a new builder with default hyperparameters.
    fn new(expected_input_dim: usize) -> Self {
        Self {
            expected_input_dim,
            number_of_basis_functions: 25,
            gamma: 5.0,
            regularization: 0.2,
            seed: None,
        }
    }

    /// Sets the number of cosine basis functions.
    pub fn number_of_basis_functions(mut self, number_of_basis_functions: usize) -> Self {
        self.number_of_basis_functions = number_of_basis_functions;
        self
    }

    /// Sets the frequency spread parameter.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the ridge penalty.
    pub fn regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    /// Sets the random seed for the feature draw.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds and returns a validated [`MetaParameters`] instance.
    ///
    /// # Panics
    /// Panics if any hyperparameter is out of range: `expected_input_dim` and
    /// `number_of_basis_functions` must be at least 1, `gamma` must be a
    /// positive finite value, and `regularization` a non-negative finite value.
    pub fn build(self) -> MetaParameters {
        assert!(
            self.expected_input_dim >= 1,
            "expected_input_dim must be at least 1"
        );
        assert!(
            self.number_of_basis_functions >= 1,
            "number_of_basis_functions must be at least 1"
        );
        assert!(
            self.gamma.is_finite() && self.gamma > 0.0,
            "gamma must be positive and finite, got {}",
            self.gamma
        );
        assert!(
            self.regularization.is_finite() && self.regularization >= 0.0,
            "regularization must be non-negative and finite, got {}",
            self.regularization
        );

        MetaParameters {
            expected_input_dim: self.expected_input_dim,
            number_of_basis_functions: self.number_of_basis_functions,
            gamma: self.gamma,
            regularization: self.regularization,
            seed: self.seed,
        }
    }
}

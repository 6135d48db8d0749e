/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for random Fourier feature regression.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Random Radial/Ridge Fourier Features (RRFF) regression.
//!
//! Fitting a continuous input→output mapping (for example a recorded
//! trajectory in movement-primitive learning) with an explicit kernel
//! expansion is expensive: a kernel machine over `N` samples costs **O(N²)**
//! memory before the solve even starts. Random Fourier features sidestep this
//! by projecting the inputs through a *fixed, randomly drawn* bank of cosine
//! basis functions and fitting an ordinary ridge-regularized linear model
//! over the projections:
//!
//! - **Feature draw** - `B` periods sampled from `Normal(0, sqrt(2 * gamma))`
//!   and `B` phases from `Uniform(0, 2π)` define the basis
//!   `cos(period · x + phase)`.
//! - **Closed-form fit** - the weights solve the `B × B` normal equations
//!   `(ΦᵀΦ + λI) w = ΦᵀY` with a single Cholesky factorization, built on
//!   [`faer`](https://docs.rs/faer/latest/faer/) for linear algebra.
//!
//! Prediction reuses the stored features deterministically, so a trained
//! approximator is a plain value: cloneable, serializable, and independent of
//! any randomness source.
//!
//! # Features
//! - Supports any input and output dimensionality
//! - Single-shot training with an explicit, separate retraining entry point
//! - Optional seed injection for bit-reproducible feature draws
//! - Grid sampling of the fitted model to plain-text artifacts for external
//!   plotting tools
//! - Versioned JSON model persistence
//! - Soft handling of repeated-call misuse: training twice or predicting
//!   before training warns and does nothing instead of faulting
//!
//! # Examples
//!
//! ```
//! use ferreus_rrff::{MetaParameters, RrffApproximator};
//! use faer::Mat;
//!
//! // Sample a smooth 1D target function.
//! let inputs = Mat::from_fn(200, 1, |i, _| i as f64 / 199.0);
//! let targets = Mat::from_fn(200, 1, |i, _| {
//!     (2.0 * std::f64::consts::PI * (i as f64 / 199.0)).sin()
//! });
//!
//! // Configure the feature draw; a fixed seed makes training reproducible.
//! let meta = MetaParameters::builder(1)
//!     .number_of_basis_functions(50)
//!     .gamma(8.0)
//!     .regularization(1e-6)
//!     .seed(Some(42))
//!     .build();
//!
//! let mut approximator = RrffApproximator::new(meta);
//! approximator.train(&inputs, &targets)?;
//!
//! let outputs = approximator.predict(&inputs).unwrap();
//! assert_eq!(outputs.nrows(), 200);
//! # Ok::<(), ferreus_rrff::LeastSquaresError>(())
//! ```
//!
//! # References
//! 1.  A. Rahimi and B. Recht. Random features for large-scale kernel
//!     machines. In Advances in Neural Information Processing Systems 20,
//!     2007.
//! 2.  F. Stulp and O. Sigaud. Many regression algorithms, one unified model:
//!     a review. Neural Networks, 69:60-79, 2015.
pub mod config;

mod approximator;

mod basis_function;

mod common;

mod grid_io;

pub mod least_squares;

mod model_parameters;

pub mod progress;

mod rrff;

pub use {
    approximator::FunctionApproximator,
    basis_function::cosine_activations,
    common::csv_to_training_data,
    config::{MetaParameters, MetaParametersBuilder},
    grid_io::{generate_inputs_grid, save_matrix, GridIOError},
    least_squares::LeastSquaresError,
    model_parameters::ModelParameters,
    rrff::{ModelIOError, RrffApproximator},
};

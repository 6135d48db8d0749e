/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the random Fourier feature approximator: training, prediction, and grid export.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    approximator::FunctionApproximator,
    basis_function,
    config::MetaParameters,
    grid_io::{self, GridIOError},
    least_squares::{self, LeastSquaresError},
    model_parameters::ModelParameters,
    progress::{ProgressMsg, ProgressSink},
};

use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    f64::consts::PI,
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

const TRAIN_TWICE_WARNING: &str = "You may not call RrffApproximator::train more than once. \
     Doing nothing. (If you really want to retrain, call the retrain function instead.)";

const PREDICT_UNTRAINED_WARNING: &str =
    "You may not call RrffApproximator::predict if you have not trained yet. Doing nothing.";

const GRID_UNTRAINED_WARNING: &str =
    "You may not call RrffApproximator::save_grid_data if you have not trained yet. Doing nothing.";

/// Lifecycle state of an [`RrffApproximator`].
///
/// The trained/untrained duality is an explicit sum type so that a trained
/// approximator without a model is unrepresentable. The meta parameters are
/// retained after training to support retraining; an approximator built
/// directly from a model has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum State {
    Untrained {
        meta: MetaParameters,
    },
    Trained {
        meta: Option<MetaParameters>,
        model: ModelParameters,
    },
}

/// Random Radial/Ridge Fourier Features (RRFF) function approximator.
///
/// # Overview
/// Training draws a set of random cosine basis functions - periods sampled
/// from `Normal(0, sqrt(2 * gamma))`, phases from `Uniform(0, 2π)` - projects
/// the training inputs through them, and fits a linear model over the
/// projections by ridge-regularized least squares. Prediction projects new
/// inputs through the same stored features and multiplies by the fitted
/// weights, so it is fully deterministic once a model is installed.
///
/// Training is single-shot: a second `train` call warns and does nothing.
/// [`RrffApproximator::retrain`] explicitly discards the model and fits again.
///
/// # Construction
/// - [`RrffApproximator::new`] takes [`MetaParameters`] and starts untrained.
/// - [`RrffApproximator::from_model`] takes fitted [`ModelParameters`] and
///   starts trained (e.g. a model loaded from disk).
///
/// Instances are deep-cloneable; a clone is independent of its source.
///
/// # Concurrency
/// All operations are synchronous and blocking, with no internal locking.
/// Callers sharing an instance across threads must serialize access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrffApproximator {
    state: State,

    /// Optional sink for warnings and training events.
    /// Skipped during serialization.
    #[serde(skip, default)]
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RrffApproximator {
    /// Creates an untrained approximator from the given meta parameters.
    pub fn new(meta: MetaParameters) -> Self {
        Self {
            state: State::Untrained { meta },
            progress_callback: None,
        }
    }

    /// Creates a trained approximator directly from fitted model parameters.
    ///
    /// The resulting instance serves predictions immediately but cannot be
    /// retrained, as it retains no meta parameters.
    pub fn from_model(model: ModelParameters) -> Self {
        Self {
            state: State::Trained { meta: None, model },
            progress_callback: None,
        }
    }

    /// Attaches a sink for warnings and training events.
    ///
    /// Without a sink, misuse warnings are printed to stderr so they remain
    /// visible to the caller.
    pub fn with_progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Whether a fitted model is installed.
    pub fn is_trained(&self) -> bool {
        matches!(self.state, State::Trained { .. })
    }

    /// The input dimensionality this approximator accepts, fixed at
    /// construction.
    pub fn expected_input_dim(&self) -> usize {
        match &self.state {
            State::Untrained { meta } => meta.expected_input_dim,
            State::Trained { model, .. } => model.input_dim(),
        }
    }

    /// The fitted model parameters, if trained.
    pub fn model_parameters(&self) -> Option<&ModelParameters> {
        match &self.state {
            State::Trained { model, .. } => Some(model),
            State::Untrained { .. } => None,
        }
    }

    /// Installs `model`, replacing any previous model and marking the
    /// approximator trained. Retained meta parameters are kept for later
    /// retraining.
    ///
    /// # Panics
    /// Panics if the model's input dimensionality disagrees with this
    /// approximator's.
    pub fn set_model_parameters(&mut self, model: ModelParameters) {
        assert_eq!(
            model.input_dim(),
            self.expected_input_dim(),
            "model input dimensionality does not match the approximator"
        );

        let meta = match &self.state {
            State::Untrained { meta } => Some(*meta),
            State::Trained { meta, .. } => *meta,
        };
        self.state = State::Trained { meta, model };
    }

    /// Fit the approximator to `inputs` (N×D) and `targets` (N×K).
    ///
    /// Draws the random features, projects the inputs through the cosine
    /// basis, solves the regularized least-squares system, and atomically
    /// installs the resulting model. Training is single-shot: calling `train`
    /// on a trained instance warns and returns `Ok(())` without touching the
    /// model.
    ///
    /// # Errors
    /// Propagates [`LeastSquaresError`] when the linear system is singular
    /// (rank-deficient features with zero regularization). No model is
    /// installed in that case.
    ///
    /// # Panics
    /// Panics if `inputs` and `targets` disagree on row count, or if `inputs`
    /// does not have [`expected_input_dim`](Self::expected_input_dim) columns.
    pub fn train(
        &mut self,
        inputs: &Mat<f64>,
        targets: &Mat<f64>,
    ) -> Result<(), LeastSquaresError> {
        let meta = match &self.state {
            State::Trained { .. } => {
                self.warn(TRAIN_TWICE_WARNING);
                return Ok(());
            }
            State::Untrained { meta } => *meta,
        };

        assert_eq!(
            inputs.nrows(),
            targets.nrows(),
            "inputs and targets must have the same number of rows"
        );
        assert_eq!(
            inputs.ncols(),
            meta.expected_input_dim,
            "inputs have {} columns but the approximator expects {}",
            inputs.ncols(),
            meta.expected_input_dim
        );

        let num_basis_functions = meta.number_of_basis_functions;

        let mut rng = match meta.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // gamma > 0 is validated when the meta parameters are built.
        let period_distribution = Normal::new(0.0, (2.0 * meta.gamma).sqrt()).unwrap();
        let periods = Mat::from_fn(num_basis_functions, meta.expected_input_dim, |_, _| {
            period_distribution.sample(&mut rng)
        });
        let phase =
            Mat::from_fn(num_basis_functions, 1, |_, _| rng.random_range(0.0..2.0 * PI));

        let projected_inputs = basis_function::cosine_activations(&periods, &phase, inputs);

        let use_offset = false;
        let weights =
            least_squares::solve(&projected_inputs, targets, use_offset, meta.regularization)?;

        self.state = State::Trained {
            meta: Some(meta),
            model: ModelParameters::new(weights, periods, phase),
        };

        if let Some(sink) = &self.progress_callback {
            sink.emit(ProgressMsg::Trained {
                num_samples: inputs.nrows(),
                num_basis_functions,
            });
        }

        Ok(())
    }

    /// Discard any fitted model and fit again from the retained meta
    /// parameters.
    ///
    /// This is the explicit retraining entry point that bypasses the
    /// single-shot guard of [`train`](Self::train).
    ///
    /// # Panics
    /// Panics when called on an approximator built from bare model parameters,
    /// which retains no meta parameters to retrain from.
    pub fn retrain(
        &mut self,
        inputs: &Mat<f64>,
        targets: &Mat<f64>,
    ) -> Result<(), LeastSquaresError> {
        let meta = match &self.state {
            State::Untrained { meta } => *meta,
            State::Trained { meta, .. } => meta
                .expect("retraining requires an approximator constructed with meta parameters"),
        };

        self.state = State::Untrained { meta };
        self.train(inputs, targets)
    }

    /// Predict outputs (M×K) for `inputs` (M×D).
    ///
    /// Returns `None`, with a warning, when no model has been trained yet;
    /// callers must treat the absence of output as a non-fatal no-op.
    /// Deterministic given a trained model.
    ///
    /// # Panics
    /// Panics if `inputs` does not have
    /// [`expected_input_dim`](Self::expected_input_dim) columns.
    pub fn predict(&self, inputs: &Mat<f64>) -> Option<Mat<f64>> {
        let model = match &self.state {
            State::Trained { model, .. } => model,
            State::Untrained { .. } => {
                self.warn(PREDICT_UNTRAINED_WARNING);
                return None;
            }
        };

        assert_eq!(
            inputs.ncols(),
            model.input_dim(),
            "inputs have {} columns but the approximator expects {}",
            inputs.ncols(),
            model.input_dim()
        );

        let activations = model.cosine_activations(inputs);
        Some(&activations * model.weights())
    }

    /// Sample the fitted model over a regular grid and write the grid
    /// artifacts into `directory`:
    ///
    /// - `n_samples_per_dim.txt` - the per-dimension sample counts,
    /// - `inputs_grid.txt` - the raw grid points,
    /// - `activations_grid.txt` - the cosine activations over the grid,
    /// - `activations_weighted_grid.txt` - each activation column scaled by
    ///   its fitted weight,
    /// - `predictions_grid.txt` - the row sums of the weighted activations.
    ///
    /// For multi-output models the first output dimension is exported.
    ///
    /// An empty `directory` is a successful no-op with no filesystem writes.
    /// Calling on an untrained approximator warns and does nothing.
    ///
    /// # Errors
    /// Any write failure propagates as a [`GridIOError`]; earlier artifacts
    /// may remain on disk (no rollback). With `overwrite = false` a
    /// pre-existing artifact fails the write rather than being clobbered.
    pub fn save_grid_data(
        &self,
        min: &[f64],
        max: &[f64],
        n_samples_per_dim: &[usize],
        directory: &Path,
        overwrite: bool,
    ) -> Result<(), GridIOError> {
        if directory.as_os_str().is_empty() {
            return Ok(());
        }

        let model = match &self.state {
            State::Trained { model, .. } => model,
            State::Untrained { .. } => {
                self.warn(GRID_UNTRAINED_WARNING);
                return Ok(());
            }
        };

        assert_eq!(
            min.len(),
            model.input_dim(),
            "grid bounds must have one entry per input dimension"
        );

        let inputs_grid = grid_io::generate_inputs_grid(min, max, n_samples_per_dim);
        let activations_grid = model.cosine_activations(&inputs_grid);

        let n_samples = Mat::from_fn(n_samples_per_dim.len(), 1, |i, _| {
            n_samples_per_dim[i] as f64
        });

        grid_io::save_matrix(directory, "n_samples_per_dim.txt", n_samples.as_ref(), overwrite)?;
        grid_io::save_matrix(directory, "inputs_grid.txt", inputs_grid.as_ref(), overwrite)?;
        grid_io::save_matrix(
            directory,
            "activations_grid.txt",
            activations_grid.as_ref(),
            overwrite,
        )?;

        // Weight each basis function's activation column.
        let weights = model.weights();
        let mut weighted_activations = activations_grid;
        weighted_activations
            .col_iter_mut()
            .enumerate()
            .for_each(|(b, col)| {
                let weight = weights[(b, 0)];
                col.iter_mut().for_each(|value| *value *= weight);
            });
        grid_io::save_matrix(
            directory,
            "activations_weighted_grid.txt",
            weighted_activations.as_ref(),
            overwrite,
        )?;

        // Sum over the weighted basis functions.
        let predictions_grid = Mat::from_fn(weighted_activations.nrows(), 1, |i, _| {
            weighted_activations.row(i).iter().sum::<f64>()
        });
        grid_io::save_matrix(
            directory,
            "predictions_grid.txt",
            predictions_grid.as_ref(),
            overwrite,
        )?;

        if let Some(sink) = &self.progress_callback {
            sink.emit(ProgressMsg::GridDataSaved {
                directory: directory.to_path_buf(),
                num_grid_points: inputs_grid.nrows(),
            });
        }

        Ok(())
    }

    /// Save this approximator to a **JSON envelope** `{ format, version, ... }`.
    ///
    /// The on-disk format is versioned; files produced here are intended to
    /// be read back with [`RrffApproximator::load_model`].
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Create, Serialize, Flush}` on I/O or
    ///   serialization failures.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let envelope = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut writer, &envelope).map_err(|e| {
            ModelIOError::Serialize {
                path: path_ref.to_path_buf(),
                source: e,
            }
        })?;
        writer.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load an approximator from a versioned **JSON envelope**, validating
    /// format and version.
    ///
    /// If `progress` is `Some`, installs the sink on the returned instance so
    /// subsequent operations can report warnings and events.
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch}`
    ///   as appropriate.
    pub fn load_model<P: AsRef<Path>>(
        path: P,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> ModelIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ModelIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let envelope: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if envelope.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: envelope.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if envelope.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: envelope.version,
                expected: JSON_VERSION,
            });
        }

        let mut approximator = envelope.model;
        if let Some(sink) = progress {
            approximator.progress_callback = Some(sink);
        }
        Ok(approximator)
    }

    fn warn(&self, message: &str) {
        match &self.progress_callback {
            Some(sink) => sink.emit(ProgressMsg::Warning {
                message: message.to_string(),
            }),
            None => eprintln!("WARNING: {}", message),
        }
    }
}

impl FunctionApproximator for RrffApproximator {
    fn train(&mut self, inputs: &Mat<f64>, targets: &Mat<f64>) -> Result<(), LeastSquaresError> {
        RrffApproximator::train(self, inputs, targets)
    }

    fn retrain(
        &mut self,
        inputs: &Mat<f64>,
        targets: &Mat<f64>,
    ) -> Result<(), LeastSquaresError> {
        RrffApproximator::retrain(self, inputs, targets)
    }

    fn predict(&self, inputs: &Mat<f64>) -> Option<Mat<f64>> {
        RrffApproximator::predict(self, inputs)
    }

    fn is_trained(&self) -> bool {
        RrffApproximator::is_trained(self)
    }

    fn expected_input_dim(&self) -> usize {
        RrffApproximator::expected_input_dim(self)
    }

    fn save_grid_data(
        &self,
        min: &[f64],
        max: &[f64],
        n_samples_per_dim: &[usize],
        directory: &Path,
        overwrite: bool,
    ) -> Result<(), GridIOError> {
        RrffApproximator::save_grid_data(self, min, max, n_samples_per_dim, directory, overwrite)
    }

    fn clone_approximator(&self) -> Box<dyn FunctionApproximator> {
        Box::new(self.clone())
    }
}

const JSON_FORMAT_NAME: &str = "ferreus_rrff.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the model).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    model: &'a T,
}

/// Owning envelope for LOAD (generic over the concrete model).
#[derive(Serialize, Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    model: T,
}

type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors that can occur when saving or loading an [`RrffApproximator`] model.
///
/// This is the error type returned by [`RrffApproximator::save_model`] and
/// [`RrffApproximator::load_model`], wrapping lower-level I/O and JSON
/// serialization issues as well as format/version validation failures.
#[derive(Debug)]
pub enum ModelIOError {
    /// Failed to create the target file before writing a model.
    Create { path: PathBuf, source: io::Error },

    /// Failed to open an existing model file for reading.
    Open { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    Flush { path: PathBuf, source: io::Error },

    /// Error serializing the in-memory model to JSON.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error parsing JSON when reading a model from disk.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The JSON `format` field does not match the expected model format.
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The JSON `version` field does not match the supported version.
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

impl fmt::Display for ModelIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIOError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            ModelIOError::Open { path, source } => {
                write!(f, "opening {}: {}", path.display(), source)
            }
            ModelIOError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
            ModelIOError::Serialize { path, source } => {
                write!(f, "serializing JSON to {}: {}", path.display(), source)
            }
            ModelIOError::Parse { path, source } => {
                write!(f, "parsing JSON in {}: {}", path.display(), source)
            }
            ModelIOError::FormatMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported format {:?} (expected {:?}) in {}",
                found,
                expected,
                path.display()
            ),
            ModelIOError::VersionMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported version {} (expected {}) in {}",
                found,
                expected,
                path.display()
            ),
        }
    }
}

impl Error for ModelIOError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelIOError::Create { source, .. }
            | ModelIOError::Open { source, .. }
            | ModelIOError::Flush { source, .. } => Some(source),
            ModelIOError::Serialize { source, .. } | ModelIOError::Parse { source, .. } => {
                Some(source)
            }
            ModelIOError::FormatMismatch { .. } | ModelIOError::VersionMismatch { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::closure_sink;
    use std::fs;
    use std::sync::Mutex;

    /// Smooth 1D training set: y = sin(2 pi x) sampled on [0, 1].
    fn sine_training_data(num_samples: usize) -> (Mat<f64>, Mat<f64>) {
        let inputs = Mat::from_fn(num_samples, 1, |i, _| {
            i as f64 / (num_samples as f64 - 1.0)
        });
        let targets = Mat::from_fn(num_samples, 1, |i, _| {
            (2.0 * PI * inputs[(i, 0)]).sin()
        });
        (inputs, targets)
    }

    fn seeded_meta(num_basis_functions: usize, regularization: f64) -> MetaParameters {
        MetaParameters::builder(1)
            .number_of_basis_functions(num_basis_functions)
            .gamma(5.0)
            .regularization(regularization)
            .seed(Some(5))
            .build()
    }

    fn rms_residual(predictions: &Mat<f64>, targets: &Mat<f64>) -> f64 {
        let mut sum = 0.0;
        for i in 0..targets.nrows() {
            for j in 0..targets.ncols() {
                let diff = predictions[(i, j)] - targets[(i, j)];
                sum += diff * diff;
            }
        }
        (sum / (targets.nrows() * targets.ncols()) as f64).sqrt()
    }

    #[test]
    fn predict_before_train_returns_none() {
        let approximator = RrffApproximator::new(seeded_meta(10, 0.1));
        let inputs = Mat::from_fn(3, 1, |i, _| i as f64);

        assert!(!approximator.is_trained());
        assert!(approximator.predict(&inputs).is_none());
    }

    #[test]
    fn train_then_predict_fits_smooth_function() {
        let (inputs, targets) = sine_training_data(200);
        let mut approximator = RrffApproximator::new(seeded_meta(100, 1e-8));

        approximator.train(&inputs, &targets).unwrap();
        assert!(approximator.is_trained());

        let predictions = approximator.predict(&inputs).unwrap();
        assert_eq!(predictions.nrows(), 200);
        assert_eq!(predictions.ncols(), 1);
        assert!(rms_residual(&predictions, &targets) < 0.2);
    }

    #[test]
    fn second_train_call_is_a_warned_noop() {
        let (inputs, targets) = sine_training_data(50);
        let mut approximator = RrffApproximator::new(seeded_meta(20, 0.1));

        approximator.train(&inputs, &targets).unwrap();
        let weights_before = approximator
            .model_parameters()
            .unwrap()
            .weights()
            .to_owned();

        // Different targets; the guard must leave the model untouched.
        let other_targets = Mat::from_fn(50, 1, |i, _| i as f64);
        approximator.train(&inputs, &other_targets).unwrap();

        let weights_after = approximator.model_parameters().unwrap().weights();
        for i in 0..weights_before.nrows() {
            assert_eq!(weights_before[(i, 0)], weights_after[(i, 0)]);
        }
    }

    #[test]
    fn training_residual_monotone_in_regularization() {
        let (inputs, targets) = sine_training_data(100);

        // Identical seeds mean identical features, so the training residual
        // is exactly nondecreasing in the ridge penalty.
        let mut weakly_regularized = RrffApproximator::new(seeded_meta(50, 1e-9));
        let mut strongly_regularized = RrffApproximator::new(seeded_meta(50, 10.0));

        weakly_regularized.train(&inputs, &targets).unwrap();
        strongly_regularized.train(&inputs, &targets).unwrap();

        let weak_rms = rms_residual(&weakly_regularized.predict(&inputs).unwrap(), &targets);
        let strong_rms = rms_residual(&strongly_regularized.predict(&inputs).unwrap(), &targets);

        assert!(
            weak_rms <= strong_rms,
            "weak {} vs strong {}",
            weak_rms,
            strong_rms
        );
    }

    #[test]
    fn more_basis_functions_reduce_training_residual() {
        let (inputs, targets) = sine_training_data(200);

        let mut small = RrffApproximator::new(seeded_meta(10, 1e-8));
        let mut large = RrffApproximator::new(seeded_meta(100, 1e-8));

        small.train(&inputs, &targets).unwrap();
        large.train(&inputs, &targets).unwrap();

        let small_rms = rms_residual(&small.predict(&inputs).unwrap(), &targets);
        let large_rms = rms_residual(&large.predict(&inputs).unwrap(), &targets);

        assert!(
            large_rms <= small_rms,
            "large {} vs small {}",
            large_rms,
            small_rms
        );
    }

    #[test]
    fn clone_predicts_identically_and_is_independent() {
        let (inputs, targets) = sine_training_data(60);
        let mut original = RrffApproximator::new(seeded_meta(30, 1e-6));
        original.train(&inputs, &targets).unwrap();

        let mut copy = original.clone();

        let from_original = original.predict(&inputs).unwrap();
        let from_copy = copy.predict(&inputs).unwrap();
        for i in 0..inputs.nrows() {
            assert_eq!(from_original[(i, 0)], from_copy[(i, 0)]);
        }

        // Retraining the copy on different targets must not affect the original.
        let other_targets = Mat::from_fn(60, 1, |i, _| (i as f64 * 0.1).cos());
        copy.retrain(&inputs, &other_targets).unwrap();

        let from_original_after = original.predict(&inputs).unwrap();
        for i in 0..inputs.nrows() {
            assert_eq!(from_original[(i, 0)], from_original_after[(i, 0)]);
        }
    }

    #[test]
    fn retrain_refits_to_new_targets() {
        let (inputs, targets) = sine_training_data(100);
        let mut approximator = RrffApproximator::new(seeded_meta(80, 1e-8));
        approximator.train(&inputs, &targets).unwrap();

        let new_targets = Mat::from_fn(100, 1, |i, _| 0.5 * inputs[(i, 0)] - 0.25);
        approximator.retrain(&inputs, &new_targets).unwrap();

        let predictions = approximator.predict(&inputs).unwrap();
        assert!(rms_residual(&predictions, &new_targets) < 0.2);
    }

    #[test]
    #[should_panic(expected = "retraining requires an approximator constructed with meta")]
    fn retrain_without_meta_parameters_panics() {
        let model = ModelParameters::new(
            Mat::from_fn(1, 1, |_, _| 2.0),
            Mat::<f64>::zeros(1, 1),
            Mat::<f64>::zeros(1, 1),
        );
        let mut approximator = RrffApproximator::from_model(model);

        let inputs = Mat::from_fn(2, 1, |i, _| i as f64);
        let targets = Mat::from_fn(2, 1, |i, _| i as f64);
        let _ = approximator.retrain(&inputs, &targets);
    }

    #[test]
    fn from_model_predicts_without_training() {
        // Zero period and phase activate to cos(0) = 1, so the prediction is
        // the bare weight everywhere.
        let model = ModelParameters::new(
            Mat::from_fn(1, 1, |_, _| 2.0),
            Mat::<f64>::zeros(1, 1),
            Mat::<f64>::zeros(1, 1),
        );
        let approximator = RrffApproximator::from_model(model);

        assert!(approximator.is_trained());
        let inputs = Mat::from_fn(4, 1, |i, _| i as f64 * 7.0);
        let predictions = approximator.predict(&inputs).unwrap();
        for i in 0..4 {
            assert_eq!(predictions[(i, 0)], 2.0);
        }
    }

    #[test]
    fn set_model_parameters_replaces_the_model() {
        let (inputs, targets) = sine_training_data(40);
        let mut approximator = RrffApproximator::new(seeded_meta(10, 0.1));
        approximator.train(&inputs, &targets).unwrap();

        let replacement = ModelParameters::new(
            Mat::from_fn(1, 1, |_, _| -1.5),
            Mat::<f64>::zeros(1, 1),
            Mat::<f64>::zeros(1, 1),
        );
        approximator.set_model_parameters(replacement);

        let predictions = approximator.predict(&inputs).unwrap();
        for i in 0..inputs.nrows() {
            assert_eq!(predictions[(i, 0)], -1.5);
        }
    }

    #[test]
    #[should_panic(expected = "same number of rows")]
    fn mismatched_row_counts_panic() {
        let mut approximator = RrffApproximator::new(seeded_meta(5, 0.1));
        let inputs = Mat::<f64>::zeros(4, 1);
        let targets = Mat::<f64>::zeros(3, 1);
        let _ = approximator.train(&inputs, &targets);
    }

    #[test]
    #[should_panic(expected = "expects")]
    fn wrong_input_dimensionality_panics() {
        let mut approximator = RrffApproximator::new(seeded_meta(5, 0.1));
        let inputs = Mat::<f64>::zeros(4, 2);
        let targets = Mat::<f64>::zeros(4, 1);
        let _ = approximator.train(&inputs, &targets);
    }

    #[test]
    fn save_grid_data_with_empty_directory_is_a_noop() {
        let (inputs, targets) = sine_training_data(30);
        let mut approximator = RrffApproximator::new(seeded_meta(10, 0.1));
        approximator.train(&inputs, &targets).unwrap();

        approximator
            .save_grid_data(&[0.0], &[1.0], &[5], Path::new(""), false)
            .unwrap();

        assert!(!Path::new("n_samples_per_dim.txt").exists());
    }

    #[test]
    fn save_grid_data_on_untrained_approximator_is_a_noop() {
        let approximator = RrffApproximator::new(seeded_meta(10, 0.1));
        let dir = tempfile::tempdir().unwrap();

        approximator
            .save_grid_data(&[0.0], &[1.0], &[5], dir.path(), false)
            .unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_grid_data_writes_all_artifacts() {
        let (inputs, targets) = sine_training_data(50);
        let mut approximator = RrffApproximator::new(seeded_meta(15, 1e-4));
        approximator.train(&inputs, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        approximator
            .save_grid_data(&[0.0], &[1.0], &[11], dir.path(), false)
            .unwrap();

        for filename in [
            "n_samples_per_dim.txt",
            "inputs_grid.txt",
            "activations_grid.txt",
            "activations_weighted_grid.txt",
            "predictions_grid.txt",
        ] {
            assert!(dir.path().join(filename).exists(), "{} missing", filename);
        }

        // The persisted grid predictions must agree with the predict path.
        let grid = grid_io::generate_inputs_grid(&[0.0], &[1.0], &[11]);
        let expected = approximator.predict(&grid).unwrap();
        let contents = fs::read_to_string(dir.path().join("predictions_grid.txt")).unwrap();
        let first_line: f64 = contents.lines().next().unwrap().parse().unwrap();
        assert!((first_line - expected[(0, 0)]).abs() < 1e-12);
        assert_eq!(contents.lines().count(), 11);
    }

    #[test]
    fn save_grid_data_refuses_overwrite_when_not_permitted() {
        let (inputs, targets) = sine_training_data(30);
        let mut approximator = RrffApproximator::new(seeded_meta(10, 0.1));
        approximator.train(&inputs, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        approximator
            .save_grid_data(&[0.0], &[1.0], &[5], dir.path(), false)
            .unwrap();

        let second = approximator.save_grid_data(&[0.0], &[1.0], &[5], dir.path(), false);
        assert!(matches!(second, Err(GridIOError::AlreadyExists { .. })));

        approximator
            .save_grid_data(&[0.0], &[1.0], &[5], dir.path(), true)
            .unwrap();
    }

    #[test]
    fn model_io_roundtrip_preserves_predictions() {
        let (inputs, targets) = sine_training_data(40);
        let mut approximator = RrffApproximator::new(seeded_meta(20, 1e-4));
        approximator.train(&inputs, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rrff_model.json");
        approximator.save_model(&path).unwrap();

        let loaded = RrffApproximator::load_model(&path, None).unwrap();
        assert!(loaded.is_trained());

        // The persisted parameters must survive the JSON round-trip
        // bit-exactly; predictions then agree without tolerance.
        let saved_model = approximator.model_parameters().unwrap();
        let loaded_model = loaded.model_parameters().unwrap();
        for b in 0..saved_model.num_basis_functions() {
            assert_eq!(saved_model.weights()[(b, 0)], loaded_model.weights()[(b, 0)]);
            assert_eq!(saved_model.periods()[(b, 0)], loaded_model.periods()[(b, 0)]);
            assert_eq!(saved_model.phase()[(b, 0)], loaded_model.phase()[(b, 0)]);
        }

        let expected = approximator.predict(&inputs).unwrap();
        let actual = loaded.predict(&inputs).unwrap();
        for i in 0..inputs.nrows() {
            assert_eq!(expected[(i, 0)], actual[(i, 0)]);
        }
    }

    #[test]
    fn load_model_rejects_unknown_format() {
        let (inputs, targets) = sine_training_data(20);
        let mut approximator = RrffApproximator::new(seeded_meta(5, 0.1));
        approximator.train(&inputs, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rrff_model.json");
        approximator.save_model(&path).unwrap();

        let tampered = fs::read_to_string(&path)
            .unwrap()
            .replace(JSON_FORMAT_NAME, "bogus.json");
        fs::write(&path, tampered).unwrap();

        let result = RrffApproximator::load_model(&path, None);
        assert!(matches!(result, Err(ModelIOError::FormatMismatch { .. })));
    }

    #[test]
    fn load_model_rejects_unsupported_version() {
        let (inputs, targets) = sine_training_data(20);
        let mut approximator = RrffApproximator::new(seeded_meta(5, 0.1));
        approximator.train(&inputs, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rrff_model.json");
        approximator.save_model(&path).unwrap();

        let tampered = fs::read_to_string(&path).unwrap().replace(
            &format!("\"version\": {}", JSON_VERSION),
            &format!("\"version\": {}", JSON_VERSION + 1),
        );
        fs::write(&path, tampered).unwrap();

        let result = RrffApproximator::load_model(&path, None);
        match result {
            Err(ModelIOError::VersionMismatch { found, expected, .. }) => {
                assert_eq!(found, JSON_VERSION + 1);
                assert_eq!(expected, JSON_VERSION);
            }
            other => panic!("expected a version mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn misuse_warnings_are_reported_through_the_sink() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&received);
        let (sink, handle) = closure_sink(32, move |msg| {
            captured.lock().unwrap().push(msg);
        });

        let (inputs, targets) = sine_training_data(30);
        let mut approximator =
            RrffApproximator::new(seeded_meta(10, 0.1)).with_progress_callback(sink);

        // Predict before training, then train twice.
        assert!(approximator.predict(&inputs).is_none());
        approximator.train(&inputs, &targets).unwrap();
        approximator.train(&inputs, &targets).unwrap();

        drop(approximator);
        handle.join().unwrap();

        let messages = received.lock().unwrap();
        let warnings: Vec<_> = messages
            .iter()
            .filter(|msg| matches!(msg, ProgressMsg::Warning { .. }))
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(messages
            .iter()
            .any(|msg| matches!(msg, ProgressMsg::Trained { .. })));
    }

    #[test]
    fn trait_object_clone_predicts_identically() {
        let (inputs, targets) = sine_training_data(40);
        let mut approximator = RrffApproximator::new(seeded_meta(15, 1e-4));
        approximator.train(&inputs, &targets).unwrap();

        let boxed: Box<dyn FunctionApproximator> = approximator.clone_approximator();
        assert!(boxed.is_trained());
        assert_eq!(boxed.expected_input_dim(), 1);

        let expected = approximator.predict(&inputs).unwrap();
        let actual = boxed.predict(&inputs).unwrap();
        for i in 0..inputs.nrows() {
            assert_eq!(expected[(i, 0)], actual[(i, 0)]);
        }
    }
}

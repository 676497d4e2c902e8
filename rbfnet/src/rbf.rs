/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the RBF network: training, evaluation, gradients, and model persistence.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    approximant::Approximant,
    assembly,
    config::{Preconditioner, SolverParams},
    error::{NetworkError, NetworkResult},
    linalg::{self, ConditionReport, SvdSolver},
    network_config::NetworkSettings,
    progress::{self, ProgressMsg, ProgressSink},
    sample_table::SampleTable,
    serializer::{binary_fields, Serializer, SerializerError},
};

use faer::{Col, Mat, MatRef};
use rbfnet_utils::{get_distance, kernel_dphi, kernel_phi, DimensionMismatch, KernelParams, KernelType};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

/// Builder for [`RBFNetwork`].
///
/// The builder should be called via the [`RBFNetwork::builder`] method.
pub struct RBFNetworkBuilder {
    samples: SampleTable,
    settings: NetworkSettings,
    params: SolverParams,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RBFNetworkBuilder {
    /// Creates a new builder with the required inputs:
    /// - `samples`: training pairs, copied into the network.
    /// - `settings`: kernel and normalization options.
    ///
    /// Default [`SolverParams`] are used unless replaced with [`RBFNetworkBuilder::params`].
    fn new(samples: SampleTable, settings: NetworkSettings) -> Self {
        Self {
            samples,
            settings,
            params: SolverParams::default(),
            progress_callback: None,
        }
    }

    /// Sets custom solver parameters.
    pub fn params(mut self, params: SolverParams) -> Self {
        self.params = params;
        self
    }

    /// Optional callback receiving training diagnostics.
    ///
    /// Skipped during serialization.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Trains and returns the configured [`RBFNetwork`].
    ///
    /// ### Errors
    /// - [`NetworkError::EmptySampleTable`] when there are no samples.
    /// - [`NetworkError::SampleTable`] when the table requires a complete grid
    ///   and does not have one.
    /// - [`NetworkError::Decomposition`] when the SVD fails.
    pub fn build(self) -> NetworkResult<RBFNetwork> {
        RBFNetwork::train(self.samples, self.settings, self.params, self.progress_callback)
    }
}

#[doc = include_str!("../docs/rbf_network.md")]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RBFNetwork {
    /// Kernel and normalization options.
    settings: NetworkSettings,

    /// Whether the system was Jacobi scaled before the solve.
    preconditioned: bool,

    num_variables: usize,
    num_samples: usize,

    /// Owned copy of the training samples.
    samples: SampleTable,

    /// One weight per sample, in sample order.
    #[serde(with = "col_serde")]
    weights: Col<f64>,

    /// Conditioning of the training solve. Not part of the binary format.
    #[serde(default)]
    condition: Option<ConditionReport>,

    /// Optional callback for reporting training diagnostics.
    #[serde(skip)]
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

binary_fields!(RBFNetwork {
    settings: NetworkSettings,
    preconditioned: bool,
    num_variables: usize,
    num_samples: usize,
    samples: SampleTable,
    weights: Col<f64>,
} skip { condition, progress_callback } check RBFNetwork::validate_decoded);

impl RBFNetwork {
    /// Trains a plain (unnormalized) network with the default shape parameter.
    ///
    /// ### Example
    /// ```
    /// use rbfnet::{RBFNetwork, SampleTable, KernelType};
    ///
    /// let mut samples = SampleTable::new();
    /// samples.add_sample(vec![0.0], 1.0)?;
    /// samples.add_sample(vec![1.0], 2.0)?;
    ///
    /// let net = RBFNetwork::new(&samples, KernelType::Gaussian)?;
    /// assert!((net.evaluate(&[1.0])? - 2.0).abs() < 1e-12);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(samples: &SampleTable, kernel_type: KernelType) -> NetworkResult<Self> {
        Self::builder(samples.clone(), NetworkSettings::from(kernel_type)).build()
    }

    /// Trains a normalized network with the default shape parameter.
    pub fn new_normalized(samples: &SampleTable, kernel_type: KernelType) -> NetworkResult<Self> {
        let settings = NetworkSettings::builder(kernel_type).normalized(true).build();
        Self::builder(samples.clone(), settings).build()
    }

    /// Creates a new [`RBFNetworkBuilder`].
    pub fn builder(samples: SampleTable, settings: NetworkSettings) -> RBFNetworkBuilder {
        RBFNetworkBuilder::new(samples, settings)
    }

    fn train(
        samples: SampleTable,
        settings: NetworkSettings,
        params: SolverParams,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> NetworkResult<Self> {
        if samples.is_empty() {
            return Err(NetworkError::EmptySampleTable);
        }
        samples.grid_complete_guard()?;

        let num_samples = samples.len();
        let num_variables = samples.num_variables();

        log::debug!(
            "training {} network on {num_samples} samples of {num_variables} variables",
            settings.kernel_type()
        );
        progress::emit(&progress_callback, || ProgressMsg::TrainingStarted {
            num_samples,
            num_variables,
        });

        let mut system = assembly::assemble(&samples, &settings.kernel_params, settings.normalized);
        params.preconditioner.apply(&mut system);

        let solver = SvdSolver::try_new(system.a.as_ref())?;
        let condition = solver.condition_report();

        log::debug!(
            "svalmax = {:e}, svalmin = {:e}, rcond = {:e}",
            condition.sval_max,
            condition.sval_min,
            condition.rcond
        );
        if condition.rcond < params.rcond_warning_threshold {
            log::warn!(
                "training system is ill-conditioned (rcond = {:e}); weights are a minimum-norm solution",
                condition.rcond
            );
        }
        progress::emit(&progress_callback, || ProgressMsg::Conditioning {
            sval_max: condition.sval_max,
            sval_min: condition.sval_min,
            rcond: condition.rcond,
        });

        let weights = solver.solve(&system.b, params.singular_value_tolerance);

        if params.report_residual {
            let relative_error = linalg::relative_residual(system.a.as_ref(), &weights, &system.b);
            log::debug!("relative residual = {relative_error:e}");
            progress::emit(&progress_callback, || ProgressMsg::Residual { relative_error });
        }

        progress::emit(&progress_callback, || ProgressMsg::Message {
            message: "training complete".to_string(),
        });

        Ok(Self {
            settings,
            preconditioned: params.preconditioner == Preconditioner::Jacobi,
            num_variables,
            num_samples,
            samples,
            weights,
            condition: Some(condition),
            progress_callback,
        })
    }

    fn check_input(&self, x: &[f64]) -> Result<(), DimensionMismatch> {
        match x.len() == self.num_variables {
            true => Ok(()),
            false => Err(DimensionMismatch {
                expected: self.num_variables,
                found: x.len(),
            }),
        }
    }

    /// Returns `(sum_i w_i phi_i(x), sum_i phi_i(x))`.
    fn weighted_sums(&self, x: &[f64]) -> (f64, f64) {
        let params = &self.settings.kernel_params;
        let mut sumw = 0.0;
        let mut sum = 0.0;

        for (sample, w) in self.samples.iter().zip(self.weights.iter()) {
            let fval = kernel_phi(get_distance(x, sample.x()), params);
            sumw += w * fval;
            sum += fval;
        }

        (sumw, sum)
    }

    /// Evaluates the network at `x`.
    ///
    /// For a normalized network the weighted kernel sum is divided by the plain
    /// kernel sum. A zero kernel sum is not guarded and yields the IEEE result.
    ///
    /// ### Errors
    /// [`NetworkError::DimensionMismatch`] if `x.len()` is not the number of variables.
    pub fn evaluate(&self, x: &[f64]) -> NetworkResult<f64> {
        self.check_input(x)?;

        let (sumw, sum) = self.weighted_sums(x);
        Ok(match self.settings.normalized {
            true => sumw / sum,
            false => sumw,
        })
    }

    /// Kernel values `phi(|x - x_i|)` for every sample, divided by their sum
    /// when the network is normalized.
    pub fn eval_basis(&self, x: &[f64]) -> NetworkResult<Col<f64>> {
        self.check_input(x)?;

        let params = &self.settings.kernel_params;
        let mut basis = Col::from_fn(self.num_samples, |i| {
            kernel_phi(get_distance(x, self.samples.samples()[i].x()), params)
        });

        if self.settings.normalized {
            let sum: f64 = basis.iter().sum();
            for value in basis.iter_mut() {
                *value /= sum;
            }
        }

        Ok(basis)
    }

    /// Analytic gradient at `x` as a `1 x d` matrix.
    ///
    /// A sample exactly at `x` contributes no directional term, since the
    /// direction `(x - x_i) / r` is undefined at `r = 0`.
    pub fn eval_jacobian(&self, x: &[f64]) -> NetworkResult<Mat<f64>> {
        self.check_input(x)?;

        let params = &self.settings.kernel_params;
        let d = self.num_variables;

        let mut sumw = 0.0;
        let mut sum = 0.0;
        let mut sumw_d = vec![0.0; d];
        let mut sum_d = vec![0.0; d];

        for (sample, w) in self.samples.iter().zip(self.weights.iter()) {
            let r = get_distance(x, sample.x());
            let fval = kernel_phi(r, params);
            sumw += w * fval;
            sum += fval;

            if r == 0.0 {
                continue;
            }

            let dfdr = kernel_dphi(r, params);
            for i in 0..d {
                let drdx = (x[i] - sample.x()[i]) / r;
                let val = dfdr * drdx;
                sumw_d[i] += w * val;
                sum_d[i] += val;
            }
        }

        let normalized = self.settings.normalized;
        Ok(Mat::from_fn(1, d, |_, i| match normalized {
            true => (sum * sumw_d[i] - sum_d[i] * sumw) / (sum * sum),
            false => sumw_d[i],
        }))
    }

    /// Evaluates every row of an `m x d` point matrix.
    pub fn evaluate_many(&self, points: MatRef<'_, f64>) -> NetworkResult<Col<f64>> {
        if points.ncols() != self.num_variables {
            return Err(DimensionMismatch {
                expected: self.num_variables,
                found: points.ncols(),
            }
            .into());
        }

        let mut x = vec![0.0; self.num_variables];
        let mut out = Col::<f64>::zeros(points.nrows());

        for i in 0..points.nrows() {
            for (j, value) in x.iter_mut().enumerate() {
                *value = points[(i, j)];
            }
            out[i] = self.evaluate(&x)?;
        }

        Ok(out)
    }

    /// Human readable description, `"RadialBasisFunction of type <kernel>"`.
    pub fn description(&self) -> String {
        format!(
            "RadialBasisFunction of type {}",
            self.settings.kernel_type().description()
        )
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn kernel_type(&self) -> KernelType {
        self.settings.kernel_type()
    }

    pub fn kernel_params(&self) -> &KernelParams {
        &self.settings.kernel_params
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    pub fn is_normalized(&self) -> bool {
        self.settings.normalized
    }

    pub fn is_preconditioned(&self) -> bool {
        self.preconditioned
    }

    pub fn samples(&self) -> &SampleTable {
        &self.samples
    }

    pub fn weights(&self) -> &Col<f64> {
        &self.weights
    }

    /// Conditioning of the training solve, if this network was trained in
    /// this process or loaded from a JSON model.
    pub fn condition_report(&self) -> Option<&ConditionReport> {
        self.condition.as_ref()
    }

    /// Installs or removes the diagnostics sink.
    pub fn set_progress_callback(&mut self, progress_callback: Option<Arc<dyn ProgressSink>>) {
        self.progress_callback = progress_callback;
    }

    /// Encodes the network into its raw binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut s = Serializer::new();
        s.serialize(self);
        s.into_bytes()
    }

    /// Decodes a network from its raw binary form.
    ///
    /// The whole buffer must be consumed.
    pub fn from_bytes(bytes: Vec<u8>) -> NetworkResult<Self> {
        let mut s = Serializer::from_bytes(bytes);
        let network: Self = s.deserialize()?;
        s.finish()?;
        Ok(network)
    }

    /// Writes the network to `path` in the raw binary format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> NetworkResult<()> {
        let mut s = Serializer::new();
        s.serialize(self);
        s.save_to_file(path)?;
        Ok(())
    }

    /// Reads a network written by [`RBFNetwork::save`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> NetworkResult<Self> {
        let mut s = Serializer::load_from_file(path)?;
        let network: Self = s.deserialize()?;
        s.finish()?;
        Ok(network)
    }

    /// Replaces this network with one read from `path`, keeping the installed
    /// diagnostics sink.
    ///
    /// The network is consumed, so a failed load leaves no model behind.
    pub fn load<P: AsRef<Path>>(self, path: P) -> NetworkResult<Self> {
        let mut network = Self::from_file(path)?;
        network.progress_callback = self.progress_callback;
        Ok(network)
    }

    fn validate_decoded(self) -> Result<Self, SerializerError> {
        self.samples.check_consistency()?;

        let invalid = |msg: String| Err(SerializerError::InvalidModel(msg));
        let shape = self.settings.kernel_params.shape;

        if !(shape.is_finite() && shape > 0.0) {
            return invalid(format!("shape parameter {shape} is not positive"));
        }
        if self.num_samples == 0 {
            return invalid("network has no samples".to_string());
        }
        if self.samples.len() != self.num_samples {
            return invalid(format!(
                "{} samples stored, {} declared",
                self.samples.len(),
                self.num_samples
            ));
        }
        if self.samples.num_variables() != self.num_variables {
            return invalid(format!(
                "samples have {} variables, {} declared",
                self.samples.num_variables(),
                self.num_variables
            ));
        }
        if self.weights.nrows() != self.num_samples {
            return invalid(format!(
                "{} weights for {} samples",
                self.weights.nrows(),
                self.num_samples
            ));
        }
        Ok(self)
    }

    /// Save this network to a **JSON envelope** `{ format, version, model }`.
    ///
    /// The on-disk format is versioned via `JSON_FORMAT_NAME` and `JSON_VERSION`.
    /// Files produced here are intended to be read back with [`RBFNetwork::load_model`].
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Create, Serialize, Flush}` on I/O or serialization
    ///   failures.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ModelIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load a network from a versioned **JSON envelope**, validating format & version.
    ///
    /// If `progress` is `Some`, the sink is installed on the returned model.
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch, Invalid}`
    ///   as appropriate.
    ///
    /// ### Example
    /// ```no_run
    /// # use rbfnet::{RBFNetwork, progress::{closure_sink, ProgressMsg}};
    /// let (sink, _listener) = closure_sink(256, |msg: ProgressMsg| { /* handle */ });
    /// let net = RBFNetwork::load_model("network.json", Some(sink))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
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

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        // Validate envelope
        if env.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if env.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        let mut model = env.model.validate_decoded().map_err(|e| ModelIOError::Invalid {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        model.progress_callback = progress;
        Ok(model)
    }
}

impl Approximant for RBFNetwork {
    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn evaluate(&self, x: &[f64]) -> NetworkResult<f64> {
        RBFNetwork::evaluate(self, x)
    }

    fn eval_jacobian(&self, x: &[f64]) -> NetworkResult<Mat<f64>> {
        RBFNetwork::eval_jacobian(self, x)
    }
}

const JSON_FORMAT_NAME: &str = "rbfnet.json";
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

/// Stores a weight column as a plain JSON array.
mod col_serde {
    use faer::Col;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(col: &Col<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(col.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Col<f64>, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        Ok(Col::from_fn(values.len(), |i| values[i]))
    }
}

pub type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors that can occur when saving or loading an [`RBFNetwork`] JSON model.
///
/// This is the error type returned by [`RBFNetwork::save_model`] and
/// [`RBFNetwork::load_model`], wrapping lower-level I/O and JSON
/// serialization issues as well as format/version validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ModelIOError {
    /// Failed to create the target file before writing a model.
    #[error("creating {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Failed to open an existing model file for reading.
    #[error("opening {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    #[error("flushing {}: {source}", path.display())]
    Flush { path: PathBuf, source: io::Error },

    /// Error serializing the in-memory model to JSON.
    #[error("serializing JSON to {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error parsing JSON when reading a model from disk.
    #[error("parsing JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The JSON `format` field does not match the expected model format.
    #[error("unsupported format {found:?} (expected {expected:?}) in {}", path.display())]
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The JSON `version` field does not match the supported version.
    #[error("unsupported version {found} (expected {expected}) in {}", path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The parsed model is internally inconsistent.
    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: SerializerError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::generate_random_points, progress::closure_sink, RBFTestFunctions};
    use equator::assert;

    fn franke_table(n: usize, seed: u64) -> SampleTable {
        let points = generate_random_points(n, 2, Some(seed));
        let values = RBFTestFunctions::franke_2d(&points);
        let values: Vec<f64> = values.iter().copied().collect();
        SampleTable::from_points(points.as_ref(), &values).unwrap()
    }

    fn settings(kernel_type: KernelType, shape: f64, normalized: bool) -> NetworkSettings {
        NetworkSettings::builder(kernel_type)
            .shape(shape)
            .normalized(normalized)
            .build()
    }

    fn train(table: &SampleTable, settings: NetworkSettings) -> RBFNetwork {
        RBFNetwork::builder(table.clone(), settings).build().unwrap()
    }

    const SMOOTH_KERNELS: [KernelType; 4] = [
        KernelType::Gaussian,
        KernelType::Multiquadric,
        KernelType::InverseQuadric,
        KernelType::InverseMultiquadric,
    ];

    #[test]
    fn interpolates_the_samples() {
        let table = franke_table(12, 42);

        for kernel_type in SMOOTH_KERNELS {
            let net = train(&table, settings(kernel_type, 3.0, false));
            for sample in table.iter() {
                let fitted = net.evaluate(sample.x()).unwrap();
                assert!((fitted - sample.y()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn normalized_network_interpolates_and_basis_sums_to_one() {
        let table = franke_table(10, 7);
        let net = train(&table, settings(KernelType::Gaussian, 4.0, true));

        for sample in table.iter() {
            assert!((net.evaluate(sample.x()).unwrap() - sample.y()).abs() < 1e-6);
        }

        for x in [[0.1, 0.9], [0.5, 0.5], [2.0, -1.0]] {
            let basis = net.eval_basis(&x).unwrap();
            let total: f64 = basis.iter().sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn basis_is_kernel_row_when_not_normalized() {
        let table = franke_table(5, 3);
        let net = train(&table, settings(KernelType::InverseQuadric, 1.0, false));
        let x = [0.25, 0.75];

        let basis = net.eval_basis(&x).unwrap();
        let expected: f64 = basis.iter().zip(net.weights().iter()).map(|(b, w)| b * w).sum();
        assert!((net.evaluate(&x).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let table = franke_table(6, 1);
        let net = train(&table, settings(KernelType::Gaussian, 2.0, false));

        let err = net.evaluate(&[0.5]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::DimensionMismatch(DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(net.eval_jacobian(&[0.5, 0.5, 0.5]).is_err());
        assert!(net.eval_basis(&[]).is_err());
        assert!(net.evaluate_many(Mat::<f64>::zeros(3, 1).as_ref()).is_err());
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = RBFNetwork::new(&SampleTable::new(), KernelType::Gaussian).unwrap_err();
        assert!(matches!(err, NetworkError::EmptySampleTable));
    }

    #[test]
    fn incomplete_grid_is_rejected_when_required() {
        let mut table = SampleTable::with_options(false, false);
        table.add_sample(vec![0.0, 0.0], 1.0).unwrap();
        table.add_sample(vec![1.0, 1.0], 2.0).unwrap();

        let err = RBFNetwork::new(&table, KernelType::Gaussian).unwrap_err();
        assert!(matches!(err, NetworkError::SampleTable(_)));
    }

    #[test]
    fn jacobian_matches_central_differences() {
        let table = franke_table(10, 11);

        for normalized in [false, true] {
            for kernel_type in SMOOTH_KERNELS {
                let net = train(&table, settings(kernel_type, 2.0, normalized));
                for x in [[0.13, 0.57], [0.71, 0.29], [1.3, -0.2]] {
                    let analytic = net.eval_jacobian(&x).unwrap();
                    let numeric = net.central_difference(&x).unwrap();

                    assert!(analytic.nrows() == 1);
                    assert!(analytic.ncols() == 2);
                    for i in 0..2 {
                        let scale = analytic[(0, i)].abs().max(1.0);
                        assert!((analytic[(0, i)] - numeric[(0, i)]).abs() < 1e-4 * scale);
                    }
                }
            }
        }
    }

    #[test]
    fn jacobian_at_a_sample_skips_its_direction() {
        let mut table = SampleTable::new();
        table.add_sample(vec![0.0], 1.0).unwrap();
        let net = train(&table, settings(KernelType::Gaussian, 1.0, false));

        let jac = net.eval_jacobian(&[0.0]).unwrap();
        assert!(jac[(0, 0)] == 0.0);
    }

    #[test]
    fn thin_plate_spline_three_points() {
        let mut table = SampleTable::new();
        table.add_sample(vec![0.0], 0.0).unwrap();
        table.add_sample(vec![1.0], 1.0).unwrap();
        table.add_sample(vec![2.0], 0.0).unwrap();

        let params = SolverParams::builder().report_residual(true).build();
        let net = RBFNetwork::builder(table.clone(), KernelType::ThinPlateSpline.into())
            .params(params)
            .build()
            .unwrap();

        assert!(net.weights().nrows() == 3);
        assert!(net.weights().iter().all(|w| w.is_finite()));

        // phi(1) = 0, so A has rank two and the middle sample is out of reach
        let report = net.condition_report().unwrap();
        assert!(report.rcond < 1e-12);
        assert!(net.evaluate(&[0.0]).unwrap().abs() < 1e-12);
        assert!(net.evaluate(&[2.0]).unwrap().abs() < 1e-12);
        assert!(net.evaluate(&[1.0]).unwrap().is_finite());
    }

    #[test]
    fn duplicate_inputs_give_least_squares_weights() {
        let mut table = SampleTable::with_options(true, true);
        table.add_sample(vec![0.0], 0.0).unwrap();
        table.add_sample(vec![0.0], 1.0).unwrap();
        table.add_sample(vec![1.0], 2.0).unwrap();

        let net = RBFNetwork::new(&table, KernelType::Gaussian).unwrap();

        assert!(net.weights().iter().all(|w| w.is_finite()));
        assert!((net.weights()[0] - net.weights()[1]).abs() < 1e-9);
        assert!((net.evaluate(&[0.0]).unwrap() - 0.5).abs() < 1e-9);
        assert!((net.evaluate(&[1.0]).unwrap() - 2.0).abs() < 1e-9);
        assert!(net.condition_report().unwrap().rcond < 1e-12);
    }

    #[test]
    fn binary_round_trip_for_every_kernel() {
        let dir = tempfile::tempdir().unwrap();
        let table = franke_table(9, 5);
        let probes = generate_random_points(20, 2, Some(99));

        for (k, kernel_type) in KernelType::ALL.iter().enumerate() {
            for normalized in [false, true] {
                let net = train(&table, settings(*kernel_type, 1.5, normalized));
                let path = dir.path().join(format!("net_{k}_{normalized}.bin"));
                net.save(&path).unwrap();

                let loaded = RBFNetwork::from_file(&path).unwrap();
                assert!(loaded.kernel_type() == *kernel_type);
                assert!(loaded.is_normalized() == normalized);
                assert!(loaded.samples() == net.samples());
                assert!(loaded.weights() == net.weights());
                assert!(loaded.condition_report().is_none());

                let before = net.evaluate_many(probes.as_ref()).unwrap();
                let after = loaded.evaluate_many(probes.as_ref()).unwrap();
                assert!(before == after);
            }
        }
    }

    #[test]
    fn load_replaces_state_and_keeps_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.bin");

        let gaussian = train(&franke_table(6, 2), settings(KernelType::Gaussian, 2.0, false));
        gaussian.save(&path).unwrap();

        let (sink, _listener) = closure_sink(4, |_| {});
        let other = RBFNetwork::builder(franke_table(4, 8), KernelType::Multiquadric.into())
            .progress_callback(sink)
            .build()
            .unwrap();

        let loaded = other.load(&path).unwrap();
        assert!(loaded.kernel_type() == KernelType::Gaussian);
        assert!(loaded.num_samples() == 6);
        assert!(loaded.progress_callback.is_some());

        let missing = loaded.load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(missing, NetworkError::Serializer(SerializerError::Open { .. })));
    }

    #[test]
    fn binary_layout_and_malformed_streams() {
        let table = franke_table(4, 6);
        let net = train(&table, settings(KernelType::InverseMultiquadric, 0.5, true));
        let bytes = net.to_bytes();

        let usize_len = std::mem::size_of::<usize>();
        assert!(bytes[0] == KernelType::InverseMultiquadric.tag());
        assert!(bytes[0] == 3);
        assert!(f64::from_ne_bytes(bytes[1..9].try_into().unwrap()) == 0.5);
        assert!(bytes[9] == 1);
        assert!(bytes[10] == 0);
        assert!(usize::from_ne_bytes(bytes[11..11 + usize_len].try_into().unwrap()) == 2);

        assert!(RBFNetwork::from_bytes(bytes.clone()).is_ok());

        let mut truncated = bytes.clone();
        truncated.truncate(bytes.len() - 1);
        assert!(matches!(
            RBFNetwork::from_bytes(truncated).unwrap_err(),
            NetworkError::Serializer(SerializerError::UnexpectedEnd { .. })
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(
            RBFNetwork::from_bytes(trailing).unwrap_err(),
            NetworkError::Serializer(SerializerError::TrailingBytes { remaining: 1 })
        ));

        let mut bad_tag = bytes.clone();
        bad_tag[0] = 42;
        assert!(matches!(
            RBFNetwork::from_bytes(bad_tag).unwrap_err(),
            NetworkError::Serializer(SerializerError::InvalidData(_))
        ));
    }

    #[test]
    fn inconsistent_weights_are_rejected() {
        let table = franke_table(3, 4);

        let mut s = Serializer::new();
        s.serialize(&NetworkSettings::from(KernelType::Gaussian));
        s.serialize(&false);
        s.serialize(&2usize);
        s.serialize(&3usize);
        s.serialize(&table);
        s.serialize(&Col::<f64>::zeros(2));

        let err = RBFNetwork::from_bytes(s.into_bytes()).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Serializer(SerializerError::InvalidModel(_))
        ));
    }

    #[test]
    fn json_model_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");

        let net = train(&franke_table(8, 21), settings(KernelType::Multiquadric, 2.0, false));
        net.save_model(&path).unwrap();

        let loaded = RBFNetwork::load_model(&path, None).unwrap();
        assert!(loaded.weights() == net.weights());
        assert!(loaded.samples() == net.samples());
        assert!(loaded.condition_report() == net.condition_report());
        assert!(loaded.evaluate(&[0.3, 0.3]).unwrap() == net.evaluate(&[0.3, 0.3]).unwrap());

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replacen("rbfnet.json", "other.json", 1)).unwrap();
        assert!(matches!(
            RBFNetwork::load_model(&path, None).unwrap_err(),
            ModelIOError::FormatMismatch { .. }
        ));
    }

    #[test]
    fn json_model_with_short_sample_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");

        let net = train(&franke_table(4, 3), settings(KernelType::Gaussian, 1.0, false));
        net.save_model(&path).unwrap();

        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["samples"]["samples"][1]["x"] = serde_json::json!([1.0]);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        assert!(matches!(
            RBFNetwork::load_model(&path, None).unwrap_err(),
            ModelIOError::Invalid {
                source: SerializerError::InvalidModel(_),
                ..
            }
        ));
    }

    #[test]
    fn jacobi_preconditioning_gives_the_same_interpolant() {
        let table = franke_table(10, 17);
        let plain = train(&table, settings(KernelType::InverseQuadric, 3.0, false));
        let scaled = RBFNetwork::builder(table.clone(), settings(KernelType::InverseQuadric, 3.0, false))
            .params(SolverParams::builder().preconditioner(Preconditioner::Jacobi).build())
            .build()
            .unwrap();

        assert!(scaled.is_preconditioned());
        assert!(!plain.is_preconditioned());
        for x in [[0.2, 0.4], [0.9, 0.1]] {
            let a = plain.evaluate(&x).unwrap();
            let b = scaled.evaluate(&x).unwrap();
            assert!((a - b).abs() < 1e-8);
        }

        let loaded = RBFNetwork::from_bytes(scaled.to_bytes()).unwrap();
        assert!(loaded.is_preconditioned());
    }

    #[test]
    fn diagnostics_reach_the_sink() {
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));
        let store = Arc::clone(&received);
        let (sink, listener) = closure_sink(16, move |msg| store.lock().unwrap().push(msg));

        let net = RBFNetwork::builder(franke_table(5, 9), KernelType::Gaussian.into())
            .params(SolverParams::builder().report_residual(true).build())
            .progress_callback(sink)
            .build()
            .unwrap();
        drop(net);
        listener.join().unwrap();

        let received = received.lock().unwrap();
        assert!(
            received[0]
                == ProgressMsg::TrainingStarted {
                    num_samples: 5,
                    num_variables: 2
                }
        );
        assert!(received.iter().any(|m| matches!(m, ProgressMsg::Conditioning { .. })));
        assert!(received.iter().any(|m| matches!(m, ProgressMsg::Residual { .. })));
    }

    #[test]
    fn description_names_the_kernel() {
        let net = train(&franke_table(3, 0), KernelType::InverseQuadric.into());
        assert!(net.description() == "RadialBasisFunction of type Inverse quadric");
    }
}

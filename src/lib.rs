//! Sobol variance-based sensitivity indices from precomputed model outputs.
//!
//! Given the outputs of a model evaluated on a Sobol/Saltelli sample design, this
//! crate estimates for every uncertain input parameter:
//!
//! - the **first-order index** `S_i`: the share of output variance explained by
//!   parameter `i` varying alone, and
//! - the **total-order index** `ST_i`: the share explained by parameter `i`
//!   including all of its interactions with the other parameters.
//!
//! Sample generation and model evaluation happen elsewhere.  The crate consumes
//! only the parameter count `D`, the base sample count `N`, and the `N * (D + 2)`
//! outputs in the block order described in [`partition`].
//!
//! # Pipeline
//!
//! 1. Standardize the output with its mean and unbiased standard deviation.
//! 2. [`partition::split`] the standardized output into A, B and AB.
//! 3. Apply [`estimators::first_order`] and [`estimators::total_order`] to each
//!    AB column.
//!
//! # Example
//!
//! ```
//! use sobol_indices::{analyze, Problem};
//!
//! // D = 2 parameters, N = 3 blocks of D + 2 = 4 outputs each.
//! let output = [
//!     1.0, 2.0, 0.5, 3.0,
//!     4.0, 3.5, 5.0, 2.0,
//!     0.0, 1.5, -1.0, 6.0,
//! ];
//! let problem = Problem::new(2, 3).unwrap();
//! let si = analyze(&problem, &output).unwrap();
//!
//! assert_eq!(si.firstorder.len(), 2);
//! assert!((si.totalorder[0] - 0.15).abs() < 1e-9);
//! ```

use std::cmp::Ordering;

use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod estimators;
pub mod partition;
pub mod stats;

use estimators::{first_order_effect, pooled_variance, total_order_effect};
use partition::{check_dimensions, BlockLayout, Partition};
use stats::Standardization;

/// Default relative tolerance below which the output counts as constant.
pub const DEFAULT_VARIANCE_TOL: f64 = 1e-12;

/// Errors returned by the analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SobolError {
    /// `D` or `N` is zero.
    #[error("invalid problem: num_params = {num_params}, num_samples = {num_samples} (both must be at least 1)")]
    InvalidProblem {
        num_params: usize,
        num_samples: usize,
    },
    /// The output length is not `N * (D + 2)`.
    #[error("output length {len} does not match the sample design (block stride {stride}, expected length {expected})")]
    DimensionMismatch {
        len: usize,
        stride: usize,
        expected: usize,
    },
    /// The output (or the pooled A/B sample) has no variance to decompose.
    #[error("model output has zero variance; sensitivity indices are undefined")]
    DegenerateInput,
    /// An output value was NaN or infinite.
    #[error("model output at index {index} is not finite")]
    NonFinite { index: usize },
    /// A multi-output matrix was given zero columns.
    #[error("output matrix must have at least one column")]
    NoOutputs,
}

/// The parameter space, reduced to what the estimators need.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    num_params: usize,
    num_samples: usize,
    names: Vec<String>,
}

impl Problem {
    /// `num_params` uncertain parameters (D), `num_samples` base samples (N).
    pub fn new(num_params: usize, num_samples: usize) -> Result<Self, SobolError> {
        if num_params == 0 || num_samples == 0 {
            return Err(SobolError::InvalidProblem {
                num_params,
                num_samples,
            });
        }
        Ok(Self {
            num_params,
            num_samples,
            names: (0..num_params).map(|i| format!("x{i}")).collect(),
        })
    }

    /// Infer N from the length of an output array.
    ///
    /// Fails with [`SobolError::DimensionMismatch`] unless `len` is a positive
    /// multiple of `num_params + 2`.
    pub fn from_output_len(num_params: usize, len: usize) -> Result<Self, SobolError> {
        if num_params == 0 {
            return Err(SobolError::InvalidProblem {
                num_params,
                num_samples: 0,
            });
        }
        let stride = BlockLayout::new(num_params).stride();
        if len == 0 || len % stride != 0 {
            return Err(SobolError::DimensionMismatch {
                len,
                stride,
                expected: len.div_ceil(stride).max(1) * stride,
            });
        }
        Self::new(num_params, len / stride)
    }

    /// Set parameter names (e.g. `["alpha", "beta"]`), one per parameter.
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), self.num_params);
        self.names = names;
        self
    }

    /// Number of parameters (D).
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// Number of base samples (N).
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Required output length, `N * (D + 2)`.
    pub fn output_len(&self) -> usize {
        BlockLayout::new(self.num_params).expected_len(self.num_samples)
    }
}

/// First- and total-order indices, one entry per parameter in problem order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityIndices {
    pub firstorder: Vec<f64>,
    pub totalorder: Vec<f64>,
}

impl SensitivityIndices {
    pub fn num_params(&self) -> usize {
        self.firstorder.len()
    }

    pub fn first_order(&self, i: usize) -> Option<f64> {
        self.firstorder.get(i).copied()
    }

    pub fn total_order(&self, i: usize) -> Option<f64> {
        self.totalorder.get(i).copied()
    }

    /// `ST_i - S_i`: the part of parameter `i`'s effect that comes from
    /// interactions.  Returns `None` if `i` is out of bounds.
    pub fn interaction(&self, i: usize) -> Option<f64> {
        Some(self.total_order(i)? - self.first_order(i)?)
    }

    /// `(name, first_order, total_order)` per parameter.
    pub fn labeled<'p>(&self, problem: &'p Problem) -> Vec<(&'p str, f64, f64)> {
        problem
            .names()
            .iter()
            .zip(self.firstorder.iter().zip(&self.totalorder))
            .map(|(name, (&s, &st))| (name.as_str(), s, st))
            .collect()
    }

    /// Parameter indices ordered by decreasing total-order index.
    pub fn ranking(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.totalorder.len()).collect();
        idx.sort_by(|&a, &b| {
            self.totalorder[b]
                .partial_cmp(&self.totalorder[a])
                .unwrap_or(Ordering::Equal)
        });
        idx
    }
}

/// Runs the analysis.  Holds configuration only; no state carries over between calls.
#[derive(Debug, Clone, Copy)]
pub struct SobolAnalyzer {
    variance_tol: f64,
}

impl Default for SobolAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SobolAnalyzer {
    pub fn new() -> Self {
        Self {
            variance_tol: DEFAULT_VARIANCE_TOL,
        }
    }

    /// Tolerance for the two degeneracy checks.
    ///
    /// - The raw output is rejected when its unbiased standard deviation is not
    ///   above `tol * max|y|`.
    /// - After standardization (unit sample variance), the pooled `[A; B]` sample
    ///   is rejected when its population variance is not above `tol`.  Both
    ///   estimators divide by that variance.
    pub fn with_variance_tol(mut self, tol: f64) -> Self {
        self.variance_tol = tol;
        self
    }

    pub fn variance_tol(&self) -> f64 {
        self.variance_tol
    }

    /// Estimate first- and total-order indices for every parameter of `problem`.
    ///
    /// `output` must hold `problem.output_len()` finite values in block order.
    /// The caller's slice is not modified.
    pub fn analyze(&self, problem: &Problem, output: &[f64]) -> Result<SensitivityIndices, SobolError> {
        let (num_params, num_samples) = (problem.num_params(), problem.num_samples());
        tracing::debug!(num_params, num_samples, len = output.len(), "starting Sobol analysis");

        if let Err(err) = check_dimensions(output.len(), num_samples, num_params) {
            tracing::warn!(%err, "rejecting model output");
            return Err(err);
        }
        if let Some(index) = output.iter().position(|v| !v.is_finite()) {
            tracing::warn!(index, "model output contains a non-finite value");
            return Err(SobolError::NonFinite { index });
        }

        let scale = Standardization::from_values(output);
        tracing::debug!(
            mean = scale.mean(),
            std = scale.std(),
            max_abs = scale.max_abs(),
            "output standardization"
        );
        let rel_std = scale.relative_std();
        if !rel_std.is_finite() || rel_std <= self.variance_tol {
            tracing::warn!(std = scale.std(), "model output is constant");
            return Err(SobolError::DegenerateInput);
        }

        let normalized = scale.apply(output);
        let partition = partition::split(&normalized, num_samples, num_params)?;
        self.estimate(&partition)
    }

    /// Analyze several outputs at once.
    ///
    /// `output` is a row-major `rows x width` matrix: one row per model evaluation
    /// (in block order), one column per model output.  Each column is analyzed
    /// independently; the result holds one entry per column.
    pub fn analyze_columns(
        &self,
        problem: &Problem,
        output: &[f64],
        width: usize,
    ) -> Result<Vec<SensitivityIndices>, SobolError> {
        if width == 0 {
            return Err(SobolError::NoOutputs);
        }
        let layout = BlockLayout::new(problem.num_params());
        let expected = problem.output_len() * width;
        if output.len() != expected {
            let err = SobolError::DimensionMismatch {
                len: output.len(),
                stride: layout.stride() * width,
                expected,
            };
            tracing::warn!(%err, width, "rejecting output matrix");
            return Err(err);
        }
        if let Some(index) = output.iter().position(|v| !v.is_finite()) {
            return Err(SobolError::NonFinite { index });
        }

        (0..width)
            .map(|c| {
                let column: Vec<f64> = output.iter().skip(c).step_by(width).copied().collect();
                self.analyze(problem, &column)
            })
            .collect()
    }

    /// Apply both estimators to every AB column of an already-normalized partition.
    fn estimate(&self, partition: &Partition) -> Result<SensitivityIndices, SobolError> {
        let (a, b) = (partition.a(), partition.b());
        let variance = pooled_variance(a, b);
        if variance.is_nan() || variance <= self.variance_tol {
            tracing::warn!(variance, "pooled A/B sample has no variance");
            return Err(SobolError::DegenerateInput);
        }

        let per_param = |i: usize| {
            let ab_i = partition.ab_column(i);
            let s = first_order_effect(a, ab_i, b) / variance;
            let st = total_order_effect(a, ab_i) / variance;
            tracing::trace!(param = i, first_order = s, total_order = st, "indices");
            (s, st)
        };

        #[cfg(feature = "parallel")]
        let pairs: Vec<(f64, f64)> = (0..partition.num_params())
            .into_par_iter()
            .map(per_param)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let pairs: Vec<(f64, f64)> = (0..partition.num_params()).map(per_param).collect();

        let (firstorder, totalorder) = pairs.into_iter().unzip();
        Ok(SensitivityIndices {
            firstorder,
            totalorder,
        })
    }
}

/// Analyze with default settings.  See [`SobolAnalyzer::analyze`].
pub fn analyze(problem: &Problem, output: &[f64]) -> Result<SensitivityIndices, SobolError> {
    SobolAnalyzer::new().analyze(problem, output)
}

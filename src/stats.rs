//! Mean and variance helpers.
//!
//! Two variance conventions appear in the Sobol pipeline and they are not
//! interchangeable:
//!
//! - The orchestrator standardizes the raw model output with the **unbiased**
//!   (sample, divide by `n - 1`) standard deviation.
//! - The index estimators normalize by the **biased** (population, divide by `n`)
//!   variance of the pooled `[A; B]` sample.
//!
//! Each convention gets its own named function so a call site states which one
//! it means.

/// Arithmetic mean.  Returns `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from the mean.
fn sum_sq_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|&v| (v - m) * (v - m)).sum()
}

/// Population variance: `sum((x - mean)^2) / n`.
pub fn variance_biased(values: &[f64]) -> f64 {
    sum_sq_dev(values) / values.len() as f64
}

/// Sample variance: `sum((x - mean)^2) / (n - 1)`.
///
/// Returns `NaN` when `values.len() < 2`.
pub fn variance_unbiased(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    sum_sq_dev(values) / (n - 1) as f64
}

/// Sample standard deviation (square root of [`variance_unbiased`]).
pub fn std_unbiased(values: &[f64]) -> f64 {
    variance_unbiased(values).sqrt()
}

/// Largest absolute value, `0.0` for an empty slice.
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

/// Location and scale used to standardize a model output vector.
///
/// The moments are taken over `values / max|values|`, so sums of squares stay
/// finite for any finite input, however large.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardization {
    max_abs: f64,
    rel_mean: f64,
    rel_std: f64,
}

impl Standardization {
    /// Mean and unbiased standard deviation of `values`.
    pub fn from_values(values: &[f64]) -> Self {
        let max_abs = max_abs(values);
        if max_abs == 0.0 || !max_abs.is_finite() {
            return Self {
                max_abs,
                rel_mean: 0.0,
                rel_std: 0.0,
            };
        }
        let scaled: Vec<f64> = values.iter().map(|&v| v / max_abs).collect();
        Self {
            max_abs,
            rel_mean: mean(&scaled),
            rel_std: std_unbiased(&scaled),
        }
    }

    pub fn mean(&self) -> f64 {
        self.rel_mean * self.max_abs
    }

    pub fn std(&self) -> f64 {
        self.rel_std * self.max_abs
    }

    pub fn max_abs(&self) -> f64 {
        self.max_abs
    }

    /// Standard deviation as a fraction of `max|values|`.  Zero for constant input.
    pub fn relative_std(&self) -> f64 {
        self.rel_std
    }

    /// Fresh standardized copy: `(y - mean) / std`.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&v| (v / self.max_abs - self.rel_mean) / self.rel_std)
            .collect()
    }
}

/// Standardize `values` to zero mean and unit (unbiased) standard deviation.
///
/// Shorthand for `Standardization::from_values(values).apply(values)`.  The input
/// is left untouched.  No degeneracy check happens here; a constant input yields
/// `NaN`s.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    Standardization::from_values(values).apply(values)
}

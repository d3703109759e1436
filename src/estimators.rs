//! First-order and total-order index estimators.
//!
//! Both follow Saltelli et al. (2010), "Variance based sensitivity analysis of
//! model output. Design and estimator for the total sensitivity index":
//!
//! ```text
//!   S_i  = mean(B * (AB_i - A))       / V      (estimator b)
//!   ST_i = 0.5 * mean((A - AB_i)^2)   / V      (estimator f)
//!
//!   V    = variance_biased([A; B])
//! ```
//!
//! `V` is the population variance (divide by `2N`) over the pooled A and B
//! samples.  Estimates are Monte Carlo noisy: negative values or values above 1
//! are legitimate for small N and are returned as computed.

use crate::stats::{mean, variance_biased};

/// Biased variance of the concatenation `[a; b]`.
pub fn pooled_variance(a: &[f64], b: &[f64]) -> f64 {
    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    variance_biased(&pooled)
}

/// Unnormalized first-order effect: `mean(B .* (AB_i - A))`.
pub(crate) fn first_order_effect(a: &[f64], ab_i: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), ab_i.len());
    debug_assert_eq!(a.len(), b.len());
    let terms: Vec<f64> = a
        .iter()
        .zip(ab_i)
        .zip(b)
        .map(|((&a, &ab), &b)| b * (ab - a))
        .collect();
    mean(&terms)
}

/// Unnormalized total-order effect: `0.5 * mean((A - AB_i)^2)`.
pub(crate) fn total_order_effect(a: &[f64], ab_i: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), ab_i.len());
    let terms: Vec<f64> = a
        .iter()
        .zip(ab_i)
        .map(|(&a, &ab)| (a - ab) * (a - ab))
        .collect();
    0.5 * mean(&terms)
}

/// First-order Sobol index of one parameter.
///
/// `a`, `ab_i` and `b` must have the same length.  Returns a non-finite value
/// when `[a; b]` has zero variance; [`crate::analyze`] rejects that case before
/// calling in.
pub fn first_order(a: &[f64], ab_i: &[f64], b: &[f64]) -> f64 {
    first_order_effect(a, ab_i, b) / pooled_variance(a, b)
}

/// Total-order Sobol index of one parameter.
///
/// Same input contract as [`first_order`].
pub fn total_order(a: &[f64], ab_i: &[f64], b: &[f64]) -> f64 {
    total_order_effect(a, ab_i) / pooled_variance(a, b)
}

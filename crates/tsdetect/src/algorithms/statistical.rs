//! Statistical-family anomaly detectors.
//!
//! ## Purpose
//!
//! This module implements detectors that derive a normal range from summary
//! statistics of the valid values and flag everything outside it:
//!
//! * **3-sigma (Z-score)**: `|x - mu| > k * sigma`.
//! * **IQR**: `x < Q1 - m * IQR` or `x > Q3 + m * IQR`.
//!
//! ## Invariants
//!
//! * Inputs are the compacted finite values of a series.
//! * A zero spread (constant series) flags nothing.
//! * Raising the threshold multiplier never flags more points.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::stats::{mean_and_std, percentile_sorted, sorted};

// ============================================================================
// Three Sigma
// ============================================================================

/// Fitted 3-sigma detector over a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaFit<T> {
    /// Per-value anomaly flags.
    pub flags: Vec<bool>,

    /// Sample mean.
    pub mean: T,

    /// Population standard deviation.
    pub std: T,

    /// `mean + k * std`.
    pub upper_bound: T,

    /// `mean - k * std`.
    pub lower_bound: T,
}

/// Flag values more than `sigma_threshold` standard deviations from the mean.
pub fn three_sigma<T: Float>(values: &[T], sigma_threshold: T) -> SigmaFit<T> {
    let (mu, sigma) = mean_and_std(values);
    let spread = sigma_threshold * sigma;

    let flags = if sigma > T::zero() {
        values.iter().map(|&v| (v - mu).abs() > spread).collect()
    } else {
        vec![false; values.len()]
    };

    SigmaFit {
        flags,
        mean: mu,
        std: sigma,
        upper_bound: mu + spread,
        lower_bound: mu - spread,
    }
}

// ============================================================================
// Interquartile Range
// ============================================================================

/// Fitted IQR detector over a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct IqrFit<T> {
    /// Per-value anomaly flags.
    pub flags: Vec<bool>,

    /// First quartile.
    pub q1: T,

    /// Median.
    pub q2: T,

    /// Third quartile.
    pub q3: T,

    /// `q3 - q1`.
    pub iqr: T,

    /// `q1 - m * iqr`.
    pub lower_bound: T,

    /// `q3 + m * iqr`.
    pub upper_bound: T,
}

/// Flag values beyond `iqr_multiplier` interquartile ranges from the quartiles.
pub fn iqr<T: Float>(values: &[T], iqr_multiplier: T) -> IqrFit<T> {
    let ordered = sorted(values);
    let pct = |p: f64| percentile_sorted(&ordered, T::from(p).unwrap_or(T::zero()));

    let q1 = pct(25.0);
    let q2 = pct(50.0);
    let q3 = pct(75.0);
    let range = q3 - q1;
    let lower_bound = q1 - iqr_multiplier * range;
    let upper_bound = q3 + iqr_multiplier * range;

    let flags = values
        .iter()
        .map(|&v| v < lower_bound || v > upper_bound)
        .collect();

    IqrFit {
        flags,
        q1,
        q2,
        q3,
        iqr: range,
        lower_bound,
        upper_bound,
    }
}

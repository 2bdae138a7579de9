//! Discrete Gaussian kernel for index-space smoothing.
//!
//! ## Purpose
//!
//! This module provides the weights used by Gaussian smoothing. Weights are a
//! function of the signed index offset from the center point, so they can be
//! precomputed once per window size and reused at every index.
//!
//! ## Design notes
//!
//! * **Bandwidth**: The standard deviation is `window_size / 2`.
//! * **Truncation**: Weights beyond `±window_size` samples are exactly zero.
//! * **Normalization**: Weights are *not* normalized here; the smoother
//!   renormalizes over the in-bounds, finite subset at each point.
//!
//! ## Invariants
//!
//! * Weights are strictly positive inside the support and symmetric.
//! * The center weight is 1.
//!
//! ## Non-goals
//!
//! * This module does not apply the weights to data.

// External dependencies
use num_traits::Float;

// ============================================================================
// Gaussian Kernel
// ============================================================================

/// Truncated Gaussian kernel `K(d) = exp(-d^2 / (2 sigma^2))` over integer offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel<T> {
    /// Standard deviation in samples.
    sigma: T,

    /// Largest offset with a non-zero weight.
    radius: usize,

    /// Weights for offsets `-radius..=radius`.
    weights: Vec<T>,
}

impl<T: Float> GaussianKernel<T> {
    /// Build the kernel for a smoothing window size.
    ///
    /// `window_size` must be at least 1.
    pub fn for_window(window_size: usize) -> Self {
        debug_assert!(window_size >= 1, "for_window: window_size must be >= 1");

        let two = T::one() + T::one();
        let sigma = T::from(window_size).unwrap_or(T::one()) / two;
        let radius = window_size;
        let denom = two * sigma * sigma;

        let weights = (0..=2 * radius)
            .map(|k| {
                let d = T::from(k as isize - radius as isize).unwrap_or(T::zero());
                (-(d * d) / denom).exp()
            })
            .collect();

        Self {
            sigma,
            radius,
            weights,
        }
    }

    /// Standard deviation in samples.
    #[inline]
    pub fn sigma(&self) -> T {
        self.sigma
    }

    /// Largest offset with a non-zero weight.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Weight for a signed offset from the center.
    #[inline]
    pub fn weight(&self, offset: isize) -> T {
        if offset.unsigned_abs() > self.radius {
            return T::zero();
        }
        self.weights[(offset + self.radius as isize) as usize]
    }

    /// All weights for offsets `-radius..=radius`.
    #[inline]
    pub fn weights(&self) -> &[T] {
        &self.weights
    }
}

//! Smoothing algorithms for series preprocessing.
//!
//! ## Purpose
//!
//! This module implements the three smoothers behind the `smooth` stage:
//! a centered moving average, exponential smoothing, and Gaussian-weighted
//! smoothing. Each maps a value sequence to a new sequence of equal length.
//!
//! ## Design notes
//!
//! * **Edges**: Windows are clipped to the array; partial windows average the
//!   in-bounds subset only. Nothing is padded or extrapolated.
//! * **Missing values**: Non-finite positions are copied through unchanged and
//!   are excluded from every neighbour's average.
//! * **Ordering**: Moving average and Gaussian smoothing are independent per
//!   index and may run in parallel. Exponential smoothing is a sequential scan.
//!
//! ## Invariants
//!
//! * Output length equals input length.
//! * Moving-average and Gaussian outputs lie within the min/max of the finite
//!   values in their local window.
//! * Exponential output satisfies `s[i] = a * x[i] + (1 - a) * s[i-1]` with
//!   `a = 2 / (window_size + 1)`.
//!
//! ## Non-goals
//!
//! * This module does not validate `window_size`; the engine does.

// External dependencies
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::math::kernel::GaussianKernel;
use crate::primitives::window::Window;

/// Below this many points the parallel path is not worth the fork/join cost.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

// ============================================================================
// Smoothing Method
// ============================================================================

/// Smoothing algorithm selected by the `method` parameter of a `smooth` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMethod {
    /// Centered moving average over `floor(window_size / 2)` neighbours per side.
    #[default]
    MovingAverage,

    /// Exponentially weighted moving average with `a = 2 / (window_size + 1)`.
    Exponential,

    /// Gaussian-weighted average with `sigma = window_size / 2`.
    Gaussian,
}

impl SmoothingMethod {
    /// All smoothing methods in catalogue order.
    pub const ALL: [SmoothingMethod; 3] = [
        SmoothingMethod::MovingAverage,
        SmoothingMethod::Exponential,
        SmoothingMethod::Gaussian,
    ];

    /// Wire key of the method.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            SmoothingMethod::MovingAverage => "moving_average",
            SmoothingMethod::Exponential => "exponential",
            SmoothingMethod::Gaussian => "gaussian",
        }
    }

    /// Human-readable label.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            SmoothingMethod::MovingAverage => "Moving average",
            SmoothingMethod::Exponential => "Exponential smoothing",
            SmoothingMethod::Gaussian => "Gaussian smoothing",
        }
    }

    /// Resolve a wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Smooth `values` with this method.
    pub fn smooth<T>(&self, values: &[T], window_size: usize, parallel: bool) -> Vec<T>
    where
        T: Float + Send + Sync,
    {
        match self {
            SmoothingMethod::MovingAverage => moving_average(values, window_size, parallel),
            SmoothingMethod::Exponential => exponential(values, window_size),
            SmoothingMethod::Gaussian => gaussian(values, window_size, parallel),
        }
    }
}

// ============================================================================
// Smoothers
// ============================================================================

/// Centered moving average with edge-clipped windows.
pub fn moving_average<T>(values: &[T], window_size: usize, parallel: bool) -> Vec<T>
where
    T: Float + Send + Sync,
{
    let n = values.len();
    let radius = Window::radius_for(window_size.max(1));

    map_indices(n, parallel, |i| {
        let center = values[i];
        if !center.is_finite() {
            return center;
        }

        let local = &values[Window::centered(i, radius, n).range()];
        let (lo, hi, count) = local
            .iter()
            .filter(|v| v.is_finite())
            .fold((center, center, 0usize), |(lo, hi, c), &v| {
                (lo.min(v), hi.max(v), c + 1)
            });

        // Scale each term first so a window of huge values cannot overflow.
        let count = T::from(count).unwrap_or(T::one());
        let avg = local
            .iter()
            .filter(|v| v.is_finite())
            .fold(T::zero(), |acc, &v| acc + v / count);

        clamp(avg, lo, hi)
    })
}

/// Exponential smoothing as a sequential scan.
///
/// Non-finite inputs are passed through and do not advance the state; the
/// first finite value seeds the recurrence.
pub fn exponential<T: Float>(values: &[T], window_size: usize) -> Vec<T> {
    let alpha = exponential_alpha::<T>(window_size);
    let beta = T::one() - alpha;

    values
        .iter()
        .scan(None, |state: &mut Option<T>, &v| {
            if !v.is_finite() {
                return Some(v);
            }
            let next = match *state {
                None => v,
                Some(prev) => alpha * v + beta * prev,
            };
            *state = Some(next);
            Some(next)
        })
        .collect()
}

/// Smoothing factor used by [`exponential`]: `2 / (window_size + 1)`.
#[inline]
pub fn exponential_alpha<T: Float>(window_size: usize) -> T {
    let two = T::one() + T::one();
    two / T::from(window_size + 1).unwrap_or(two)
}

/// Gaussian-weighted smoothing, renormalized over the in-bounds finite subset.
pub fn gaussian<T>(values: &[T], window_size: usize, parallel: bool) -> Vec<T>
where
    T: Float + Send + Sync,
{
    let n = values.len();
    let kernel = GaussianKernel::<T>::for_window(window_size.max(1));

    map_indices(n, parallel, |i| {
        let center = values[i];
        if !center.is_finite() {
            return center;
        }

        let window = Window::centered(i, kernel.radius(), n);
        let (lo, hi, den) = window
            .offsets(i)
            .filter(|&(j, _)| values[j].is_finite())
            .fold((center, center, T::zero()), |(lo, hi, den), (j, d)| {
                let v = values[j];
                (lo.min(v), hi.max(v), den + kernel.weight(d))
            });

        let avg = window
            .offsets(i)
            .filter(|&(j, _)| values[j].is_finite())
            .fold(T::zero(), |acc, (j, d)| acc + kernel.weight(d) / den * values[j]);

        clamp(avg, lo, hi)
    })
}

// ============================================================================
// Execution Helpers
// ============================================================================

// Pin a rounded weighted average back into the envelope of its inputs.
#[inline]
fn clamp<T: Float>(value: T, lo: T, hi: T) -> T {
    value.max(lo).min(hi)
}

// Evaluate an independent per-index function over `0..n`.
#[inline]
fn map_indices<T, F>(n: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    if parallel && n >= PARALLEL_THRESHOLD {
        return (0..n).into_par_iter().map(f).collect();
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    (0..n).map(f).collect()
}

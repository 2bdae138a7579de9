//! Descriptive statistics over finite samples.
//!
//! Mean, population standard deviation, linearly interpolated percentiles,
//! and the contamination threshold used by the distance detectors. Callers
//! pass only finite values; empty inputs yield zero.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

// Arithmetic mean; zero for an empty slice.
#[inline]
pub fn mean<T: Float>(vals: &[T]) -> T {
    if vals.is_empty() {
        return T::zero();
    }
    let n = T::from(vals.len()).unwrap_or(T::one());
    vals.iter().fold(T::zero(), |acc, &v| acc + v) / n
}

// Population standard deviation (divides by n); zero for an empty slice.
#[inline]
pub fn population_std<T: Float>(vals: &[T]) -> T {
    if vals.is_empty() {
        return T::zero();
    }
    let mu = mean(vals);
    let n = T::from(vals.len()).unwrap_or(T::one());
    let ss = vals.iter().fold(T::zero(), |acc, &v| {
        let d = v - mu;
        acc + d * d
    });
    (ss / n).sqrt()
}

// Mean and population standard deviation with zero spread decided by
// `min == max`. A constant keeps its exact value as mean and a zero std no
// matter how its sum rounds.
pub fn mean_and_std<T: Float>(vals: &[T]) -> (T, T) {
    match min_max(vals) {
        Some((lo, hi)) if lo < hi => (mean(vals).max(lo).min(hi), population_std(vals)),
        Some((lo, _)) => (lo, T::zero()),
        None => (T::zero(), T::zero()),
    }
}

// Ascending copy of the values.
#[inline]
pub fn sorted<T: Float>(vals: &[T]) -> Vec<T> {
    let mut out = vals.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Equal));
    out
}

// Percentile `p` in [0, 100] of ascending data, interpolating linearly
// between the two closest order statistics.
pub fn percentile_sorted<T: Float>(sorted: &[T], p: T) -> T {
    let n = sorted.len();
    if n == 0 {
        return T::zero();
    }
    if n == 1 {
        return sorted[0];
    }

    let hundred = T::from(100.0).unwrap_or(T::one());
    let p = p.max(T::zero()).min(hundred);
    let pos = p / hundred * T::from(n - 1).unwrap_or(T::zero());
    let lo = pos.floor().to_usize().unwrap_or(0).min(n - 1);
    let hi = pos.ceil().to_usize().unwrap_or(n - 1).min(n - 1);
    let frac = pos - T::from(lo).unwrap_or(T::zero());

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// Score cut-off such that roughly a `contamination` fraction of the scores
// lies strictly above it: `sorted[floor(n * (1 - c))]`, or the maximum when
// that index falls past the end.
pub fn contamination_threshold<T: Float>(scores: &[T], contamination: T) -> T {
    if scores.is_empty() {
        return T::zero();
    }
    let ordered = sorted(scores);
    let n = ordered.len();
    let keep = (T::from(n).unwrap_or(T::zero()) * (T::one() - contamination))
        .floor()
        .to_usize()
        .unwrap_or(n);

    if keep < n {
        ordered[keep]
    } else {
        ordered[n - 1]
    }
}

// Minimum and maximum of a slice; `None` when empty.
#[inline]
pub fn min_max<T: Float>(vals: &[T]) -> Option<(T, T)> {
    let first = *vals.first()?;
    Some(
        vals.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

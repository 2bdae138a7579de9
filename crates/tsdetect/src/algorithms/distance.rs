//! Distance-family anomaly detectors.
//!
//! ## Purpose
//!
//! This module implements detectors that score each point by how isolated it
//! is from its nearest neighbours in value space:
//!
//! * **KNN**: mean absolute distance to the `k` nearest neighbours.
//! * **LOF**: local outlier factor, the ratio of the neighbours' local
//!   reachability density to the point's own.
//! * **DBSCAN**: density clustering of z-scored values; points no cluster
//!   reaches are noise.
//!
//! KNN and LOF flag a point when its score exceeds the threshold chosen by
//! [`ThresholdMode`]. DBSCAN flags its noise points directly.
//!
//! ## Design notes
//!
//! * **Metric**: Distance is `|x_i - x_j|`; timestamps play no part in it.
//! * **Neighbour size**: `k` is clamped to `n - 1`.
//! * **Sorted sweep**: In one dimension an `eps`-neighbourhood is a contiguous
//!   run of the sorted values, so DBSCAN needs no pairwise expansion.
//! * **Density floor**: A small epsilon keeps reachability densities finite
//!   when many values coincide.
//!
//! ## Invariants
//!
//! * Scores are finite and non-negative.
//! * Fewer than two values yield no fit; the engine reports a warning.
//! * DBSCAN yields no fit below `min_samples` values.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

// Internal dependencies
use crate::math::neighbors::Neighborhoods;
use crate::math::stats::{contamination_threshold, mean, mean_and_std, min_max};

/// Added to reachability sums and densities to avoid division by zero.
const DENSITY_EPSILON: f64 = 1e-10;

// ============================================================================
// Threshold Mode
// ============================================================================

/// How the score cut-off is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMode<T> {
    /// Flag roughly this fraction of points with the highest scores.
    Contamination(T),

    /// Flag points whose score exceeds this value.
    Absolute(T),
}

impl<T: Float> ThresholdMode<T> {
    /// Resolve the cut-off for a set of scores.
    pub fn resolve(&self, scores: &[T]) -> T {
        match *self {
            ThresholdMode::Contamination(c) => contamination_threshold(scores, c),
            ThresholdMode::Absolute(t) => t,
        }
    }
}

// ============================================================================
// Fit Output
// ============================================================================

/// Scores and flags from a distance detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFit<T> {
    /// Per-value anomaly flags.
    pub flags: Vec<bool>,

    /// Per-value anomaly scores.
    pub scores: Vec<T>,

    /// Neighbour size actually used.
    pub k_used: usize,

    /// Score cut-off.
    pub threshold: T,

    /// Mean score.
    pub mean_score: T,

    /// Smallest score.
    pub min_score: T,

    /// Largest score.
    pub max_score: T,
}

impl<T: Float> DistanceFit<T> {
    fn from_scores(scores: Vec<T>, k_used: usize, mode: ThresholdMode<T>) -> Self {
        let threshold = mode.resolve(&scores);
        let flags = scores.iter().map(|&s| s > threshold).collect();
        let (min_score, max_score) = min_max(&scores).unwrap_or((T::zero(), T::zero()));

        Self {
            flags,
            mean_score: mean(&scores),
            min_score,
            max_score,
            scores,
            k_used,
            threshold,
        }
    }
}

// Neighbour size after clamping, or `None` when scoring is impossible.
#[inline]
fn effective_k(n_neighbors: usize, n: usize) -> Option<usize> {
    let k = n_neighbors.min(n.saturating_sub(1));
    (k >= 1).then_some(k)
}

// ============================================================================
// KNN
// ============================================================================

/// Score each value by its mean distance to its `n_neighbors` nearest values.
///
/// Returns `None` when fewer than two values are given.
pub fn knn<T: Float>(
    values: &[T],
    n_neighbors: usize,
    mode: ThresholdMode<T>,
) -> Option<DistanceFit<T>> {
    let k = effective_k(n_neighbors, values.len())?;
    let hoods = Neighborhoods::build(values, k);
    let scores = (0..values.len()).map(|i| hoods.mean_distance(i)).collect();

    Some(DistanceFit::from_scores(scores, k, mode))
}

// ============================================================================
// LOF
// ============================================================================

/// Score each value by its local outlier factor over `n_neighbors` neighbours.
///
/// Returns `None` when fewer than two values are given.
pub fn lof<T: Float>(
    values: &[T],
    n_neighbors: usize,
    mode: ThresholdMode<T>,
) -> Option<DistanceFit<T>> {
    let n = values.len();
    let k = effective_k(n_neighbors, n)?;
    let hoods = Neighborhoods::build(values, k);
    let eps = T::from(DENSITY_EPSILON).unwrap_or(T::epsilon());

    let k_dist: Vec<T> = (0..n).map(|i| hoods.k_distance(i)).collect();

    // Local reachability density of every point
    let lrd: Vec<T> = (0..n)
        .map(|i| {
            let list = &hoods.lists[i];
            let reach = list
                .iter()
                .fold(T::zero(), |acc, &(j, d)| acc + d.max(k_dist[j]));
            let mean_reach = reach / T::from(list.len()).unwrap_or(T::one());
            T::one() / (mean_reach + eps)
        })
        .collect();

    let scores = (0..n)
        .map(|i| {
            let list = &hoods.lists[i];
            let neighbor_lrd = list.iter().fold(T::zero(), |acc, &(j, _)| acc + lrd[j])
                / T::from(list.len()).unwrap_or(T::one());
            neighbor_lrd / (lrd[i] + eps)
        })
        .collect();

    Some(DistanceFit::from_scores(scores, k, mode))
}

// ============================================================================
// DBSCAN
// ============================================================================

/// Clusters and noise found by [`dbscan`].
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanFit {
    /// Per-value noise flags.
    pub flags: Vec<bool>,

    /// Number of clusters.
    pub n_clusters: usize,

    /// Number of noise points.
    pub noise_points: usize,
}

/// Cluster z-scored values by density and flag the noise.
///
/// A value is a core point when at least `min_samples` values, itself
/// included, lie within `eps` standard deviations of it. Core points closer
/// than `eps` share a cluster, and any value within `eps` of a core point
/// joins it. Everything else is noise. A constant sample is clustered on its
/// raw values.
///
/// Returns `None` when fewer than `min_samples` values are given.
pub fn dbscan<T: Float>(values: &[T], eps: T, min_samples: usize) -> Option<DbscanFit> {
    let n = values.len();
    if n == 0 || n < min_samples {
        return None;
    }

    let (mu, sigma) = mean_and_std(values);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Equal));
    let z: Vec<T> = order
        .iter()
        .map(|&i| {
            if sigma > T::zero() {
                (values[i] - mu) / sigma
            } else {
                values[i]
            }
        })
        .collect();

    // Neighbourhood of z[i] is the run z[left..=right]
    let mut core = vec![false; n];
    let (mut left, mut right) = (0, 0);
    for i in 0..n {
        while z[i] - z[left] > eps {
            left += 1;
        }
        while right + 1 < n && z[right + 1] - z[i] <= eps {
            right += 1;
        }
        core[i] = right - left + 1 >= min_samples;
    }

    let mut reached = core.clone();
    let mut last_core: Option<T> = None;
    for i in 0..n {
        if core[i] {
            last_core = Some(z[i]);
        } else if last_core.is_some_and(|c| z[i] - c <= eps) {
            reached[i] = true;
        }
    }
    let mut next_core: Option<T> = None;
    for i in (0..n).rev() {
        if core[i] {
            next_core = Some(z[i]);
        } else if next_core.is_some_and(|c| c - z[i] <= eps) {
            reached[i] = true;
        }
    }

    // Consecutive core points further apart than eps start a new cluster
    let mut n_clusters = 0;
    let mut prev_core: Option<T> = None;
    for i in (0..n).filter(|&i| core[i]) {
        if prev_core.map_or(true, |p| z[i] - p > eps) {
            n_clusters += 1;
        }
        prev_core = Some(z[i]);
    }

    let mut flags = vec![false; n];
    for (rank, &i) in order.iter().enumerate() {
        flags[i] = !reached[rank];
    }
    let noise_points = flags.iter().filter(|&&f| f).count();

    Some(DbscanFit {
        flags,
        n_clusters,
        noise_points,
    })
}

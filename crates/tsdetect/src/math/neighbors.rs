//! One-dimensional nearest-neighbour search in value space.
//!
//! ## Purpose
//!
//! The distance detectors score each point by its distance to the `k` closest
//! other points, measured on value magnitude only. In one dimension the `k`
//! nearest neighbours of a point are contiguous in sorted order, so they can
//! be found by expanding outward from the point's sorted position.
//!
//! ## Design notes
//!
//! * **Complexity**: O(n log n) sort plus O(n k) expansion.
//! * **Ties**: When the next lower and next higher candidates are equally
//!   distant, the lower one is taken first, which keeps results deterministic.
//!
//! ## Invariants
//!
//! * A point is never its own neighbour.
//! * Neighbour lists are ordered by non-decreasing distance.
//! * `1 <= k <= n - 1`.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

// ============================================================================
// Neighbourhoods
// ============================================================================

/// The `k` nearest neighbours of every point.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhoods<T> {
    /// Neighbour size.
    pub k: usize,

    /// For point `i`, its neighbours as `(index, distance)` pairs.
    pub lists: Vec<Vec<(usize, T)>>,
}

impl<T: Float> Neighborhoods<T> {
    /// Find the `k` nearest neighbours of every value.
    ///
    /// Requires `1 <= k < values.len()`.
    pub fn build(values: &[T], k: usize) -> Self {
        let n = values.len();
        debug_assert!(k >= 1 && k < n, "Neighborhoods::build: need 1 <= k < n");

        // Stable sort keeps equal values in index order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Equal));

        let mut lists = vec![Vec::new(); n];
        for (pos, &i) in order.iter().enumerate() {
            let v = values[i];
            let mut found = Vec::with_capacity(k);
            let mut lo = pos;
            let mut hi = pos + 1;

            while found.len() < k {
                let left = (lo > 0).then(|| (v - values[order[lo - 1]]).abs());
                let right = (hi < n).then(|| (values[order[hi]] - v).abs());

                match (left, right) {
                    (Some(dl), Some(dr)) if dl <= dr => {
                        lo -= 1;
                        found.push((order[lo], dl));
                    }
                    (_, Some(dr)) => {
                        found.push((order[hi], dr));
                        hi += 1;
                    }
                    (Some(dl), None) => {
                        lo -= 1;
                        found.push((order[lo], dl));
                    }
                    (None, None) => break,
                }
            }

            lists[i] = found;
        }

        Self { k, lists }
    }

    /// Distance from point `i` to its farthest (`k`-th) neighbour.
    #[inline]
    pub fn k_distance(&self, i: usize) -> T {
        self.lists[i].last().map_or(T::zero(), |&(_, d)| d)
    }

    /// Mean distance from point `i` to its neighbours.
    #[inline]
    pub fn mean_distance(&self, i: usize) -> T {
        let list = &self.lists[i];
        if list.is_empty() {
            return T::zero();
        }
        let n = T::from(list.len()).unwrap_or(T::one());
        list.iter().fold(T::zero(), |acc, &(_, d)| acc + d) / n
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check whether there are no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

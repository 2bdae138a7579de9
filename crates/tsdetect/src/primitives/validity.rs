//! Validity masks and data quality summaries.
//!
//! ## Purpose
//!
//! A point is valid when its value is finite. Detection algorithms work on
//! the compacted valid subset and map their flags back to the original
//! positions through the retained indices.
//!
//! ## Invariants
//!
//! * `ValidPoints::indices` is strictly increasing.
//! * `ValidPoints::values[k] == original[indices[k]]`.

// External dependencies
use serde::Serialize;

// ============================================================================
// Valid Points
// ============================================================================

/// Finite values of a series together with their original positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidPoints {
    /// Finite values in original order.
    pub values: Vec<f64>,

    /// Original index of each retained value.
    pub indices: Vec<usize>,
}

impl ValidPoints {
    /// Compact the finite values of `values`.
    pub fn collect(values: &[f64]) -> Self {
        let mut out = Self {
            values: Vec::with_capacity(values.len()),
            indices: Vec::with_capacity(values.len()),
        };
        for (i, &v) in values.iter().enumerate() {
            if v.is_finite() {
                out.values.push(v);
                out.indices.push(i);
            }
        }
        out
    }

    /// Number of valid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no point is valid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scatter per-valid-point flags back to a full-length flag vector.
    ///
    /// Positions of invalid points are always `false`.
    pub fn scatter_flags(&self, valid_flags: &[bool], total: usize) -> Vec<bool> {
        debug_assert_eq!(valid_flags.len(), self.indices.len());
        let mut flags = vec![false; total];
        for (&idx, &flag) in self.indices.iter().zip(valid_flags) {
            flags[idx] = flag;
        }
        flags
    }
}

// ============================================================================
// Data Quality
// ============================================================================

/// Counts of valid and invalid points in a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Number of points in the series.
    pub total_points: usize,

    /// Number of finite values.
    pub valid_points: usize,

    /// Number of non-finite values.
    pub invalid_points: usize,

    /// Number of NaN values.
    pub nan_count: usize,

    /// Number of infinite values.
    pub inf_count: usize,

    /// `valid_points / total_points`, or 0 for an empty series.
    pub valid_ratio: f64,
}

impl DataQuality {
    /// Summarize the validity of `values`.
    pub fn assess(values: &[f64]) -> Self {
        let nan_count = values.iter().filter(|v| v.is_nan()).count();
        let inf_count = values.iter().filter(|v| v.is_infinite()).count();
        let total_points = values.len();
        let invalid_points = nan_count + inf_count;
        let valid_points = total_points - invalid_points;

        Self {
            total_points,
            valid_points,
            invalid_points,
            nan_count,
            inf_count,
            valid_ratio: if total_points == 0 {
                0.0
            } else {
                valid_points as f64 / total_points as f64
            },
        }
    }

    /// Fraction of points that are invalid.
    pub fn invalid_ratio(&self) -> f64 {
        if self.total_points == 0 {
            0.0
        } else {
            self.invalid_points as f64 / self.total_points as f64
        }
    }
}

//! Time series value object.
//!
//! ## Purpose
//!
//! This module defines [`TimeSeries`], the immutable pairing of timestamps and
//! numeric values consumed and produced by every operation, and
//! [`DetectionWindow`], the index range a detection is restricted to.
//!
//! ## Invariants
//!
//! * `timestamps.len() == values.len()` for every constructed series.
//! * A series is never mutated; transforms build a new one.
//!
//! ## Non-goals
//!
//! * This module does not parse timestamps; they are opaque labels that only
//!   define ordering and adjacency.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::{Bound, TsError};

// ============================================================================
// Time Series
// ============================================================================

/// Ordered timestamps paired one-to-one with numeric values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    timestamps: Vec<String>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series, rejecting mismatched lengths.
    ///
    /// Timestamps are taken in the order given. Keeping them non-decreasing is
    /// the caller's responsibility; labels are never parsed or reordered.
    pub fn new<S: Into<String>>(
        timestamps: impl IntoIterator<Item = S>,
        values: Vec<f64>,
    ) -> Result<Self, TsError> {
        let timestamps: Vec<String> = timestamps.into_iter().map(Into::into).collect();
        if timestamps.len() != values.len() {
            return Err(TsError::ShapeMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        Ok(Self { timestamps, values })
    }

    /// Build a series labelled with positional indices `"0"`, `"1"`, ...
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            timestamps: (0..values.len()).map(|i| i.to_string()).collect(),
            values,
        }
    }

    /// Timestamps in order.
    #[inline]
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// Values in timestamp order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the series has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same timestamps, new values.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self {
            timestamps: self.timestamps.clone(),
            values,
        }
    }

    /// Restrict the series to a detection window.
    pub fn slice(&self, window: DetectionWindow) -> Result<Self, TsError> {
        window.check(self.len())?;
        Ok(Self {
            timestamps: self.timestamps[window.start..window.end].to_vec(),
            values: self.values[window.start..window.end].to_vec(),
        })
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.timestamps, self.values)
    }
}

// ============================================================================
// Detection Window
// ============================================================================

/// Half-open index range `[start, end)` selecting the points to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionWindow {
    /// First index (inclusive).
    pub start: usize,

    /// Last index (exclusive).
    pub end: usize,
}

impl DetectionWindow {
    /// Create a window over `[start, end)`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of points covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check whether the window covers no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate the window against a series length.
    pub fn check(&self, n: usize) -> Result<(), TsError> {
        if self.end > n {
            return Err(TsError::ParameterOutOfRange {
                name: "window.end".into(),
                value: self.end as f64,
                bound: Bound::Max(n as f64),
            });
        }
        if self.start > self.end {
            return Err(TsError::ParameterOutOfRange {
                name: "window.start".into(),
                value: self.start as f64,
                bound: Bound::Max(self.end as f64),
            });
        }
        Ok(())
    }
}

impl From<core::ops::Range<usize>> for DetectionWindow {
    fn from(range: core::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

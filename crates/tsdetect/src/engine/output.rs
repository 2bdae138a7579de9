//! Output types for detection operations.
//!
//! ## Purpose
//!
//! This module defines [`DetectionResult`], which pairs the analyzed series
//! with per-point anomaly flags, the ascending list of flagged indices, and
//! summary statistics, plus the non-fatal [`Warning`]s raised along the way.
//!
//! ## Design notes
//!
//! * **Serializable**: Field names follow the wire format (`camelCase`);
//!   non-finite values serialize as `null`.
//! * **Ergonomics**: Implements `Display` for a human-readable summary.
//!
//! ## Invariants
//!
//! * `anomaly_flags.len() == values.len() == timestamps.len()`.
//! * `anomaly_indices` is ascending and equals the positions of `true` flags.
//! * No flagged position holds a non-finite value.
//! * `anomaly_ratio == anomaly_count / valid_points`, or 0 without valid points.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations; it only stores results.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Serialize, Serializer};

// Internal dependencies
use crate::primitives::validity::DataQuality;

// ============================================================================
// Warnings
// ============================================================================

/// A non-fatal condition encountered while detecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// The series (or window) has no points; the result is empty.
    EmptySeries,

    /// Not enough valid points to form neighbourhoods or clusters; nothing was
    /// flagged.
    #[serde(rename_all = "camelCase")]
    InsufficientNeighbors {
        /// Valid points available.
        valid_points: usize,
        /// Valid points needed.
        required: usize,
    },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptySeries => write!(f, "Series is empty; returning an empty result"),
            Self::InsufficientNeighbors {
                valid_points,
                required,
            } => write!(
                f,
                "Too few valid points for neighbour scoring: got {valid_points}, need {required}"
            ),
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Method-specific summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum MethodStats {
    /// 3-sigma statistics.
    Sigma {
        /// Mean of the valid values.
        mean: f64,
        /// Population standard deviation of the valid values.
        std: f64,
        /// Upper flagging bound.
        upper_bound: f64,
        /// Lower flagging bound.
        lower_bound: f64,
    },

    /// IQR statistics.
    Iqr {
        /// First quartile.
        q1: f64,
        /// Median.
        q2: f64,
        /// Third quartile.
        q3: f64,
        /// Interquartile range.
        iqr: f64,
        /// Lower flagging bound.
        lower_bound: f64,
        /// Upper flagging bound.
        upper_bound: f64,
    },

    /// KNN / LOF statistics.
    Distance {
        /// Neighbour size actually used.
        n_neighbors: usize,
        /// Contamination fraction, when thresholding by contamination.
        #[serde(skip_serializing_if = "Option::is_none")]
        contamination: Option<f64>,
        /// Score cut-off.
        threshold: f64,
        /// Mean score.
        mean_score: f64,
        /// Largest score.
        max_score: f64,
        /// Smallest score.
        min_score: f64,
    },

    /// DBSCAN statistics.
    Density {
        /// Neighbourhood radius in standard deviations.
        eps: f64,
        /// Core point size.
        min_samples: usize,
        /// Number of clusters.
        n_clusters: usize,
        /// Number of noise points.
        noise_points: usize,
    },
}

/// Summary statistics for a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    /// Number of points analyzed.
    pub total_points: usize,

    /// Number of finite values.
    pub valid_points: usize,

    /// Number of non-finite values.
    pub invalid_points: usize,

    /// Number of flagged points.
    pub anomaly_count: usize,

    /// `anomaly_count / valid_points`, or 0 without valid points.
    pub anomaly_ratio: f64,

    /// Method-specific statistics.
    #[serde(flatten)]
    pub method: MethodStats,

    /// Validity breakdown of the analyzed values.
    pub data_quality: DataQuality,
}

// ============================================================================
// Result Structure
// ============================================================================

/// Outcome of running a detection method over a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Registered key of the method that ran.
    pub method: &'static str,

    /// Timestamps of the analyzed points.
    pub timestamps: Vec<String>,

    /// Values of the analyzed points.
    #[serde(serialize_with = "finite_or_null")]
    pub values: Vec<f64>,

    /// Per-point anomaly flag.
    pub anomaly_flags: Vec<bool>,

    /// Ascending positions of flagged points.
    pub anomaly_indices: Vec<usize>,

    /// Summary statistics.
    pub stats: DetectionStats,

    /// Non-fatal conditions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl DetectionResult {
    /// Number of flagged points.
    pub fn anomaly_count(&self) -> usize {
        self.anomaly_indices.len()
    }

    /// Check whether any point was flagged.
    pub fn has_anomalies(&self) -> bool {
        !self.anomaly_indices.is_empty()
    }

    /// `(timestamp, value)` of every flagged point, in order.
    pub fn anomalies(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.anomaly_indices
            .iter()
            .map(|&i| (self.timestamps[i].as_str(), self.values[i]))
    }
}

/// Serialize floats, writing non-finite values as `null`.
pub(crate) fn finite_or_null<S: Serializer>(
    values: &[f64],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.is_finite().then_some(*v)))
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for DetectionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let stats = &self.stats;
        writeln!(f, "Summary:")?;
        writeln!(f, "  Method:       {}", self.method)?;
        writeln!(f, "  Data points:  {}", stats.total_points)?;
        writeln!(f, "  Valid points: {}", stats.valid_points)?;
        writeln!(
            f,
            "  Anomalies:    {} ({:.2}%)",
            stats.anomaly_count,
            stats.anomaly_ratio * 100.0
        )?;

        for warning in &self.warnings {
            writeln!(f, "  Warning:      {warning}")?;
        }

        if !self.has_anomalies() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Flagged Points:")?;
        writeln!(f, "  {:>8} {:>24} {:>14}", "Index", "Timestamp", "Value")?;
        writeln!(f, "  {}", "-".repeat(48))?;
        for &i in &self.anomaly_indices {
            writeln!(
                f,
                "  {:>8} {:>24} {:>14.5}",
                i, self.timestamps[i], self.values[i]
            )?;
        }

        Ok(())
    }
}

//! Error types for preprocessing and detection operations.
//!
//! ## Purpose
//!
//! This module defines every error condition surfaced by the crate: unknown
//! method keys, parameter coercion and bound violations, series shape
//! mismatches, data quality gates, and malformed wire payloads.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending field name and value.
//! * **Stable taxonomy**: [`TsError::kind`] returns a fixed name per variant,
//!   used by the wire envelope.
//! * **Staged**: Pipeline failures wrap the inner error with the stage index.
//!
//! ## Invariants
//!
//! * Every parameter error names the parameter.
//! * Errors are produced before any computation runs.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * Non-fatal conditions (empty series) are
//!   [`Warning`](crate::engine::output::Warning)s, not errors.

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

// ============================================================================
// Bound
// ============================================================================

/// A numeric bound that a parameter value violated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Inclusive lower bound.
    Min(f64),

    /// Inclusive upper bound.
    Max(f64),
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Min(min) => write!(f, "must be >= {min}"),
            Self::Max(max) => write!(f, "must be <= {max}"),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Error type for preprocessing and detection operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TsError {
    /// The method key is not registered.
    #[error("Unknown method: '{key}'")]
    UnknownMethod {
        /// The key that failed to resolve.
        key: String,
    },

    /// A parameter value could not be coerced to its declared kind.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A numeric parameter lies outside its declared bounds.
    #[error("Parameter '{name}' out of range: {value} ({bound})")]
    ParameterOutOfRange {
        /// Parameter name.
        name: String,
        /// The provided value.
        value: f64,
        /// The bound that was violated.
        bound: Bound,
    },

    /// An enumerated parameter is not one of the allowed choices.
    #[error("Invalid choice for '{name}': '{value}' (allowed: {})", .allowed.join(", "))]
    InvalidChoice {
        /// Parameter name.
        name: String,
        /// The provided value.
        value: String,
        /// The allowed choice values.
        allowed: Vec<String>,
    },

    /// `timestamps` and `values` have different lengths.
    #[error("Length mismatch: timestamps has {timestamps} entries, values has {values}")]
    ShapeMismatch {
        /// Number of timestamps.
        timestamps: usize,
        /// Number of values.
        values: usize,
    },

    /// The series fails the configured data quality gate.
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// Which requirement failed.
        reason: String,
    },

    /// The wire payload could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A pipeline stage failed validation.
    #[error("Stage {index} ('{method}') failed: {source}")]
    Stage {
        /// Zero-based stage position in the pipeline.
        index: usize,
        /// Method key of the failing stage.
        method: String,
        /// Underlying error.
        #[source]
        source: Box<TsError>,
    },
}

impl TsError {
    /// Stable taxonomy name for this error.
    ///
    /// `Stage` reports the kind of the error it wraps.
    pub fn kind(&self) -> &'static str {
        match self.root() {
            Self::UnknownMethod { .. } => "UnknownMethodError",
            Self::InvalidParameter { .. } => "InvalidParameterError",
            Self::ParameterOutOfRange { .. } => "ParameterOutOfRangeError",
            Self::InvalidChoice { .. } => "InvalidChoiceError",
            Self::ShapeMismatch { .. } => "ShapeMismatchError",
            Self::InsufficientData { .. } => "InsufficientDataError",
            Self::InvalidRequest(_) => "InvalidRequestError",
            Self::Stage { .. } => "StageError",
        }
    }

    /// Innermost error, unwrapping any `Stage` layers.
    pub fn root(&self) -> &TsError {
        let mut err = self;
        while let Self::Stage { source, .. } = err {
            err = source;
        }
        err
    }

    /// Wrap this error with the pipeline stage that produced it.
    pub(crate) fn at_stage(self, index: usize, method: &str) -> Self {
        Self::Stage {
            index,
            method: method.to_string(),
            source: Box::new(self),
        }
    }

    /// Parameter name carried by this error, if any.
    pub fn parameter(&self) -> Option<&str> {
        match self.root() {
            Self::InvalidParameter { name, .. }
            | Self::ParameterOutOfRange { name, .. }
            | Self::InvalidChoice { name, .. } => Some(name),
            _ => None,
        }
    }
}

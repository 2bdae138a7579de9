//! Execution engine for preprocessing pipelines.
//!
//! ## Purpose
//!
//! This module applies an ordered list of preprocessing stages to a series.
//! Every stage is resolved and validated before the first one runs; the
//! stages are then folded left to right, each consuming the previous stage's
//! values.
//!
//! ## Design notes
//!
//! * **All-or-nothing**: A validation failure in any stage aborts before any
//!   computation and reports the stage index and parameter.
//! * **Typed stages**: Validated stages are [`Preprocessor`] variants carrying
//!   typed parameters, so algorithms never see raw JSON.
//!
//! ## Invariants
//!
//! * Timestamps are untouched; output length equals input length.
//! * An empty pipeline is the identity.
//!
//! ## Non-goals
//!
//! * This module does not persist pipelines between calls.

// External dependencies
use tracing::{debug, trace};

// Internal dependencies
use crate::algorithms::smoothing::SmoothingMethod;
use crate::engine::config::EngineConfig;
use crate::engine::registry::{MethodRegistry, PreprocessKind};
use crate::engine::schema::{PipelineStage, ResolvedParams};
use crate::primitives::errors::TsError;
use crate::primitives::series::TimeSeries;

// ============================================================================
// Preprocessor
// ============================================================================

/// A validated preprocessing stage with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessor {
    /// Smoothing with the given method and window size.
    Smooth {
        /// Smoothing algorithm.
        method: SmoothingMethod,
        /// Window size in samples (>= 1).
        window_size: usize,
    },
}

impl Preprocessor {
    /// Build a typed stage from resolved parameters.
    pub fn configure(kind: PreprocessKind, params: &ResolvedParams) -> Result<Self, TsError> {
        match kind {
            PreprocessKind::Smooth => {
                let key = params.text("method")?;
                let method = SmoothingMethod::from_key(key).ok_or_else(|| TsError::InvalidChoice {
                    name: "method".into(),
                    value: key.to_string(),
                    allowed: SmoothingMethod::ALL.iter().map(|m| m.key().to_string()).collect(),
                })?;
                Ok(Preprocessor::Smooth {
                    method,
                    window_size: params.usize("window_size")?,
                })
            }
        }
    }

    /// Registered key of the stage's method.
    pub fn key(&self) -> &'static str {
        match self {
            Preprocessor::Smooth { .. } => PreprocessKind::Smooth.key(),
        }
    }

    /// Transform a value sequence.
    pub fn apply(&self, values: &[f64], parallel: bool) -> Vec<f64> {
        match *self {
            Preprocessor::Smooth {
                method,
                window_size,
            } => method.smooth(values, window_size, parallel),
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Applies pipelines of preprocessing stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineExecutor {
    config: EngineConfig,
}

impl PipelineExecutor {
    /// Create an executor with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Resolve and validate every stage without running any.
    pub fn validate(&self, stages: &[PipelineStage]) -> Result<Vec<Preprocessor>, TsError> {
        let registry = MethodRegistry::global();
        stages
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                registry
                    .resolve_preprocessing(&stage.kind, &stage.params)
                    .and_then(|(kind, params)| Preprocessor::configure(kind, &params))
                    .map_err(|err| err.at_stage(index, &stage.kind))
            })
            .collect()
    }

    /// Validate then apply `stages` to `series`.
    pub fn apply(
        &self,
        series: &TimeSeries,
        stages: &[PipelineStage],
    ) -> Result<TimeSeries, TsError> {
        let preprocessors = self.validate(stages)?;
        Ok(self.run(series, &preprocessors))
    }

    /// Fold already-validated stages over `series`.
    pub fn run(&self, series: &TimeSeries, stages: &[Preprocessor]) -> TimeSeries {
        if series.is_empty() {
            debug!(stages = stages.len(), "empty series, pipeline is a no-op");
            return series.clone();
        }
        if stages.is_empty() {
            return series.clone();
        }

        debug!(points = series.len(), stages = stages.len(), "applying pipeline");

        let mut values = series.values().to_vec();
        for (index, stage) in stages.iter().enumerate() {
            values = stage.apply(&values, self.config.parallel);
            trace!(index, method = stage.key(), ?stage, "stage complete");
        }

        series.with_values(values)
    }
}

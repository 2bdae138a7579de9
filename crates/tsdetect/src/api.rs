//! High-level API for preprocessing and detection.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: the three logical
//! operations ([`get_methods`], [`apply_pipeline`], [`detect`]) and fluent
//! builders that validate a configuration once and reuse it across series.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Builders with sensible defaults for every parameter.
//! * **Validated**: Configurations are checked in full when `.build()` is
//!   called; a built pipeline or detector cannot fail on parameters.
//! * **Stateless**: Nothing is retained between calls.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`PipelineBuilder`] via `Pipeline::new()` or a
//!    [`DetectorBuilder`] via `Detector::new()`.
//! 2. Chain configuration methods (`.smooth()`, `.method()`, `.param()`, ...).
//! 3. Call `.build()` and apply the result to any number of series.

// External dependencies
use serde_json::Value;
use std::collections::BTreeMap;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::engine::detector::{DetectionEngine, DetectionMethod};
use crate::engine::pipeline::{PipelineExecutor, Preprocessor};
use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::algorithms::smoothing::SmoothingMethod;
pub use crate::engine::config::{EngineConfig, QualityGate};
pub use crate::engine::output::{DetectionResult, DetectionStats, MethodStats, Warning};
pub use crate::engine::registry::{Category, MethodDescriptor, MethodKind, MethodRegistry};
pub use crate::engine::schema::{
    MethodSpec, ParamKind, ParamSchema, ParamSpec, ParamValue, PipelineStage,
};
pub use crate::primitives::errors::{Bound, TsError};
pub use crate::primitives::series::{DetectionWindow, TimeSeries};
pub use crate::primitives::validity::DataQuality;

// ============================================================================
// Logical Operations
// ============================================================================

/// Catalogue of registered methods of one family.
pub fn get_methods(kind: MethodKind) -> &'static BTreeMap<&'static str, MethodDescriptor> {
    MethodRegistry::global().methods(kind)
}

/// Apply a pipeline of `{type, params}` stages to a series.
///
/// All stages are validated before any runs. An empty pipeline returns the
/// series unchanged.
pub fn apply_pipeline(
    series: &TimeSeries,
    stages: &[PipelineStage],
) -> Result<TimeSeries, TsError> {
    PipelineExecutor::default().apply(series, stages)
}

/// Run a detection method over a series.
pub fn detect(series: &TimeSeries, method: &MethodSpec) -> Result<DetectionResult, TsError> {
    DetectionEngine::default().detect(series, method, None)
}

/// Apply independent pipeline requests, in parallel with the `parallel` feature.
pub fn apply_many(
    requests: &[(TimeSeries, Vec<PipelineStage>)],
) -> Vec<Result<TimeSeries, TsError>> {
    let run = |(series, stages): &(TimeSeries, Vec<PipelineStage>)| apply_pipeline(series, stages);

    #[cfg(feature = "parallel")]
    return requests.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    requests.iter().map(run).collect()
}

/// Run independent detection requests, in parallel with the `parallel` feature.
pub fn detect_many(requests: &[(TimeSeries, MethodSpec)]) -> Vec<Result<DetectionResult, TsError>> {
    let run = |(series, method): &(TimeSeries, MethodSpec)| detect(series, method);

    #[cfg(feature = "parallel")]
    return requests.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    requests.iter().map(run).collect()
}

// ============================================================================
// Pipeline Builder
// ============================================================================

/// Fluent builder for preprocessing pipelines.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    /// Stages in application order.
    pub stages: Vec<PipelineStage>,

    /// Engine configuration.
    pub config: EngineConfig,
}

impl PipelineBuilder {
    /// Create an empty pipeline (the identity transform).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a smoothing stage.
    pub fn smooth(self, method: SmoothingMethod, window_size: usize) -> Self {
        self.stage(
            MethodSpec::new("smooth")
                .with_param("method", method.key())
                .with_param("window_size", window_size),
        )
    }

    /// Append an arbitrary `{type, params}` stage.
    pub fn stage(mut self, stage: PipelineStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Allow per-index work to run in parallel.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate every stage.
    pub fn build(self) -> Result<PreparedPipeline, TsError> {
        let executor = PipelineExecutor::new(self.config);
        let stages = executor.validate(&self.stages)?;
        Ok(PreparedPipeline { executor, stages })
    }
}

/// A validated pipeline, ready to apply.
#[derive(Debug, Clone)]
pub struct PreparedPipeline {
    executor: PipelineExecutor,
    stages: Vec<Preprocessor>,
}

impl PreparedPipeline {
    /// Apply the pipeline to a series.
    pub fn apply(&self, series: &TimeSeries) -> TimeSeries {
        self.executor.run(series, &self.stages)
    }

    /// Validated stages in order.
    pub fn stages(&self) -> &[Preprocessor] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check whether this is the identity pipeline.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

// ============================================================================
// Detector Builder
// ============================================================================

/// Fluent builder for detection methods.
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    /// Method reference being built.
    pub spec: MethodSpec,

    /// Restrict detection to this window.
    pub window: Option<DetectionWindow>,

    /// Engine configuration.
    pub config: EngineConfig,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<String>,
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBuilder {
    /// Create a builder for the default method (`3sigma`).
    pub fn new() -> Self {
        Self {
            spec: MethodSpec::new("3sigma"),
            window: None,
            config: EngineConfig::default(),
            duplicate_param: None,
        }
    }

    /// Select the method by registered key.
    pub fn method(mut self, key: impl Into<String>) -> Self {
        self.spec.kind = key.into();
        self
    }

    /// Set a parameter value.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if self.spec.params.contains_key(&name) {
            self.duplicate_param = Some(name.clone());
        }
        self.spec.params.insert(name, value.into());
        self
    }

    /// Restrict detection to `[start, end)`.
    pub fn window(mut self, window: impl Into<DetectionWindow>) -> Self {
        self.window = Some(window.into());
        self
    }

    /// Enforce a data quality gate.
    pub fn quality_gate(mut self, gate: QualityGate) -> Self {
        self.config.quality = Some(gate);
        self
    }

    /// Validate the method and parameters.
    pub fn build(self) -> Result<PreparedDetector, TsError> {
        Validator::validate_no_duplicates(self.duplicate_param.as_deref())?;
        let engine = DetectionEngine::new(self.config);
        let method = engine.validate(&self.spec)?;
        Ok(PreparedDetector {
            engine,
            method,
            window: self.window,
        })
    }
}

/// A validated detection method, ready to run.
#[derive(Debug, Clone, Copy)]
pub struct PreparedDetector {
    engine: DetectionEngine,
    method: DetectionMethod,
    window: Option<DetectionWindow>,
}

impl PreparedDetector {
    /// Run detection over a series.
    ///
    /// Fails only when the window does not fit the series or the quality gate
    /// rejects it.
    pub fn detect(&self, series: &TimeSeries) -> Result<DetectionResult, TsError> {
        self.engine.run(series, self.method, self.window)
    }

    /// The validated method.
    pub fn method(&self) -> DetectionMethod {
        self.method
    }
}

//! JSON wire format for the three logical operations.
//!
//! ## Purpose
//!
//! This module marshals the transport-independent operations to and from
//! JSON, so any HTTP or IPC host can expose them without knowing the engine's
//! types. Each handler is stateless.
//!
//! ## Design notes
//!
//! * **Envelope**: Every response is `{success, data?, message?, error?}`;
//!   `error` carries the stable error kind.
//! * **Missing values**: Request values may be `null`, read as NaN. Response
//!   values that are not finite are written as `null`.
//!
//! ## Non-goals
//!
//! * This module does not open sockets or route requests.

// External dependencies
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// Internal dependencies
use crate::engine::config::EngineConfig;
use crate::engine::detector::DetectionEngine;
use crate::engine::output::{finite_or_null, DetectionResult};
use crate::engine::pipeline::PipelineExecutor;
use crate::engine::registry::{MethodDescriptor, MethodKind, MethodRegistry};
use crate::engine::schema::{MethodSpec, PipelineStage};
use crate::engine::validator::Validator;
use crate::primitives::errors::TsError;
use crate::primitives::series::{DetectionWindow, TimeSeries};

// ============================================================================
// Requests
// ============================================================================

/// Body of an `ApplyPipeline` request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineRequest {
    /// Point timestamps.
    #[serde(default)]
    pub timestamps: Vec<String>,

    /// Point values; `null` is read as NaN.
    #[serde(default, deserialize_with = "nullable_values")]
    pub values: Vec<f64>,

    /// Stages in application order.
    #[serde(default)]
    pub methods: Vec<PipelineStage>,
}

/// Body of a `Detect` request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectRequest {
    /// Point timestamps.
    #[serde(default)]
    pub timestamps: Vec<String>,

    /// Point values; `null` is read as NaN.
    #[serde(default, deserialize_with = "nullable_values")]
    pub values: Vec<f64>,

    /// Detection method.
    pub method: MethodSpec,

    /// Optional index window to restrict detection to.
    #[serde(default)]
    pub window: Option<DetectionWindow>,
}

fn nullable_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

impl PipelineRequest {
    fn series(&self) -> Result<TimeSeries, TsError> {
        Validator::validate_shape(self.timestamps.len(), self.values.len())?;
        TimeSeries::new(self.timestamps.iter().cloned(), self.values.clone())
    }
}

impl DetectRequest {
    fn series(&self) -> Result<TimeSeries, TsError> {
        Validator::validate_shape(self.timestamps.len(), self.values.len())?;
        TimeSeries::new(self.timestamps.iter().cloned(), self.values.clone())
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response envelope shared by all operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error description on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Error kind on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<T> Response<T> {
    /// Successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Failed response.
    pub fn err(err: &TsError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(err.to_string()),
            error: Some(err.kind()),
        }
    }
}

impl<T> From<Result<T, TsError>> for Response<T> {
    fn from(result: Result<T, TsError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => {
                debug!(kind = err.kind(), %err, "request failed");
                Self::err(&err)
            }
        }
    }
}

/// Series payload with non-finite values written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    /// Point timestamps.
    pub timestamps: Vec<String>,

    /// Point values.
    #[serde(serialize_with = "finite_or_null")]
    pub values: Vec<f64>,
}

impl From<TimeSeries> for SeriesData {
    fn from(series: TimeSeries) -> Self {
        let (timestamps, values) = series.into_parts();
        Self { timestamps, values }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Stateless handlers for the three logical operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Handler {
    config: EngineConfig,
}

impl Handler {
    /// Create a handler with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// `GetMethods(kind)`.
    pub fn get_methods(
        &self,
        kind: MethodKind,
    ) -> Response<&'static BTreeMap<&'static str, MethodDescriptor>> {
        Response::ok(MethodRegistry::global().methods(kind))
    }

    /// `ApplyPipeline(series, stages)`.
    pub fn apply_pipeline(&self, request: &PipelineRequest) -> Response<SeriesData> {
        request
            .series()
            .and_then(|series| PipelineExecutor::new(self.config).apply(&series, &request.methods))
            .map(SeriesData::from)
            .into()
    }

    /// `Detect(series, method)`.
    pub fn detect(&self, request: &DetectRequest) -> Response<DetectionResult> {
        request
            .series()
            .and_then(|series| {
                DetectionEngine::new(self.config).detect(&series, &request.method, request.window)
            })
            .into()
    }

    /// `GetMethods` over JSON.
    pub fn get_methods_json(&self, kind: MethodKind) -> String {
        encode(&self.get_methods(kind))
    }

    /// `ApplyPipeline` over JSON.
    pub fn apply_pipeline_json(&self, body: &str) -> String {
        match serde_json::from_str::<PipelineRequest>(body) {
            Ok(request) => encode(&self.apply_pipeline(&request)),
            Err(e) => encode(&Response::<()>::err(&TsError::InvalidRequest(e.to_string()))),
        }
    }

    /// `Detect` over JSON.
    pub fn detect_json(&self, body: &str) -> String {
        match serde_json::from_str::<DetectRequest>(body) {
            Ok(request) => encode(&self.detect(&request)),
            Err(e) => encode(&Response::<()>::err(&TsError::InvalidRequest(e.to_string()))),
        }
    }
}

fn encode<T: Serialize>(response: &Response<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"message":"serialization failed: {e}","error":"InternalError"}}"#
        )
    })
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// `GetMethods` over JSON with the default configuration.
pub fn get_methods_json(kind: MethodKind) -> String {
    Handler::default().get_methods_json(kind)
}

/// `ApplyPipeline` over JSON with the default configuration.
pub fn apply_pipeline_json(body: &str) -> String {
    Handler::default().apply_pipeline_json(body)
}

/// `Detect` over JSON with the default configuration.
pub fn detect_json(body: &str) -> String {
    Handler::default().detect_json(body)
}

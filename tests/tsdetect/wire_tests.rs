//! Tests for the JSON wire format.
//!
//! These tests verify the request/response envelope used by transports:
//! - Success envelopes with data
//! - Error envelopes with kind and message
//! - `null` values in requests and responses
//! - Malformed payloads
//!
//! ## Test Organization
//!
//! 1. **GetMethods** - Catalogue envelope
//! 2. **ApplyPipeline** - Success, nulls, errors
//! 3. **Detect** - Success, windows, errors
//! 4. **Malformed Requests** - Invalid JSON and missing fields

use serde_json::{json, Value};

use tsdetect::prelude::*;
use tsdetect::wire::{apply_pipeline_json, detect_json, get_methods_json, Handler};

// ============================================================================
// Helper Functions
// ============================================================================

fn parse(body: String) -> Value {
    serde_json::from_str(&body).unwrap()
}

// ============================================================================
// GetMethods Tests
// ============================================================================

/// Test the catalogue envelope.
#[test]
fn test_get_methods_envelope() {
    let resp = parse(get_methods_json(MethodKind::Detection));
    assert_eq!(resp["success"], true);
    assert!(resp["data"]["lof"]["paramSchema"]["n_neighbors"].is_object());
    assert!(resp.get("error").is_none());
}

// ============================================================================
// ApplyPipeline Tests
// ============================================================================

/// Test a successful pipeline request.
#[test]
fn test_apply_pipeline_success() {
    let body = json!({
        "timestamps": ["a", "b", "c"],
        "values": [1.0, 2.0, 3.0],
        "methods": [{"type": "smooth", "params": {"method": "moving_average", "window_size": 3}}]
    });
    let resp = parse(apply_pipeline_json(&body.to_string()));

    assert_eq!(resp["success"], true);
    assert_eq!(resp["data"]["timestamps"], json!(["a", "b", "c"]));
    assert_eq!(resp["data"]["values"], json!([1.5, 2.0, 2.5]));
}

/// Test null values.
///
/// Verifies that `null` is read as missing and written back as `null`.
#[test]
fn test_apply_pipeline_nulls() {
    let body = json!({
        "timestamps": ["a", "b", "c", "d"],
        "values": [1.0, null, 3.0, 5.0],
        "methods": [{"type": "smooth", "params": {"window_size": 3}}]
    });
    let resp = parse(apply_pipeline_json(&body.to_string()));
    assert_eq!(resp["data"]["values"], json!([1.0, null, 4.0, 4.0]));
}

/// Test a stage validation error.
#[test]
fn test_apply_pipeline_error() {
    let body = json!({
        "timestamps": ["a"],
        "values": [1.0],
        "methods": [{"type": "smooth", "params": {"window_size": 0}}]
    });
    let resp = parse(apply_pipeline_json(&body.to_string()));

    assert_eq!(resp["success"], false);
    assert_eq!(resp["error"], "ParameterOutOfRangeError");
    assert!(resp["message"].as_str().unwrap().contains("window_size"));
    assert!(resp.get("data").is_none());
}

/// Test a shape mismatch.
#[test]
fn test_apply_pipeline_shape_mismatch() {
    let body = json!({
        "timestamps": ["a", "b", "c", "d", "e"],
        "values": [1.0, 2.0, 3.0, 4.0],
        "methods": []
    });
    let resp = parse(apply_pipeline_json(&body.to_string()));
    assert_eq!(resp["error"], "ShapeMismatchError");
}

// ============================================================================
// Detect Tests
// ============================================================================

/// Test a successful detection request.
#[test]
fn test_detect_success() {
    let body = json!({
        "timestamps": ["t0", "t1", "t2", "t3", "t4", "t5", "t6"],
        "values": [10.0, 11.0, 9.5, 10.2, 42.0, null, 9.9],
        "method": {"type": "iqr", "params": {"iqr_multiplier": 1.5}}
    });
    let resp = parse(detect_json(&body.to_string()));

    assert_eq!(resp["success"], true);
    let data = &resp["data"];
    assert_eq!(data["method"], "iqr");
    assert_eq!(data["anomalyIndices"], json!([4]));
    assert_eq!(data["values"][5], Value::Null);
    assert_eq!(data["stats"]["invalidPoints"], 1);
}

/// Test a DBSCAN request with string-coerced parameters.
#[test]
fn test_detect_dbscan() {
    let body = json!({
        "timestamps": ["a", "b", "c", "d", "e", "f"],
        "values": [4.0, 4.1, 3.9, 4.0, 4.2, 19.0],
        "method": {"type": "dbscan", "params": {"eps": "0.5", "min_samples": 4}}
    });
    let resp = parse(detect_json(&body.to_string()));

    assert_eq!(resp["success"], true);
    assert_eq!(resp["data"]["anomalyIndices"], json!([5]));
    assert_eq!(resp["data"]["stats"]["minSamples"], 4);
}

/// Test a detection window.
#[test]
fn test_detect_window() {
    let body = json!({
        "timestamps": ["a", "b", "c", "d"],
        "values": [1.0, 2.0, 3.0, 4.0],
        "method": {"type": "3sigma"},
        "window": {"start": 1, "end": 3}
    });
    let resp = parse(detect_json(&body.to_string()));
    assert_eq!(resp["data"]["timestamps"], json!(["b", "c"]));
}

/// Test an unknown detection method.
#[test]
fn test_detect_unknown_method() {
    let body = json!({
        "timestamps": ["a"],
        "values": [1.0],
        "method": {"type": "not_a_method"}
    });
    let resp = parse(detect_json(&body.to_string()));
    assert_eq!(resp["success"], false);
    assert_eq!(resp["error"], "UnknownMethodError");
}

/// Test the typed handler with a quality gate.
#[test]
fn test_handler_with_config() {
    let handler =
        Handler::new(EngineConfig::default().with_quality_gate(QualityGate::default()));
    let body = json!({
        "timestamps": ["a", "b"],
        "values": [1.0, 2.0],
        "method": {"type": "3sigma"}
    });
    let resp = parse(handler.detect_json(&body.to_string()));
    assert_eq!(resp["error"], "InsufficientDataError");
}

// ============================================================================
// Malformed Request Tests
// ============================================================================

/// Test invalid JSON and missing fields.
#[test]
fn test_malformed_requests() {
    let resp = parse(detect_json("{not json"));
    assert_eq!(resp["success"], false);
    assert_eq!(resp["error"], "InvalidRequestError");

    let resp = parse(detect_json(r#"{"timestamps": [], "values": []}"#));
    assert_eq!(resp["error"], "InvalidRequestError");

    let resp = parse(apply_pipeline_json(r#"{"values": ["x"]}"#));
    assert_eq!(resp["error"], "InvalidRequestError");
}

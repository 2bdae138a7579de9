//! Tests for the high-level API.
//!
//! These tests verify the public surface exposed through the prelude:
//! - The three logical operations
//! - Pipeline and detector builders
//! - Batch helpers
//! - Error taxonomy seen by callers
//!
//! ## Test Organization
//!
//! 1. **Discovery** - get_methods
//! 2. **Operations** - apply_pipeline, detect
//! 3. **Pipeline Builder** - Construction, validation, reuse
//! 4. **Detector Builder** - Parameters, duplicates, windows, gates
//! 5. **Batch** - apply_many, detect_many

use approx::assert_relative_eq;

use tsdetect::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

fn reference() -> TimeSeries {
    TimeSeries::new(
        [
            "2024-01-01T00:00:00Z",
            "2024-01-01T01:00:00Z",
            "2024-01-01T02:00:00Z",
            "2024-01-01T03:00:00Z",
            "2024-01-01T04:00:00Z",
            "2024-01-01T05:00:00Z",
            "2024-01-01T06:00:00Z",
            "2024-01-01T07:00:00Z",
        ],
        vec![1.0, 5.0, 2.0, 8.0, 3.0, 6.0, 4.0, 7.0],
    )
    .unwrap()
}

fn with_outlier() -> TimeSeries {
    let mut values: Vec<f64> = (0..40).map(|i| 20.0 + (i % 3) as f64).collect();
    values[25] = 90.0;
    TimeSeries::from_values(values)
}

// ============================================================================
// Discovery Tests
// ============================================================================

/// Test method discovery for both families.
#[test]
fn test_get_methods() {
    let pre = get_methods(MethodKind::Preprocessing);
    assert!(pre.contains_key("smooth"));

    let det = get_methods(MethodKind::Detection);
    let keys: Vec<_> = det.keys().copied().collect();
    assert_eq!(keys, vec!["3sigma", "dbscan", "iqr", "knn", "lof"]);
    assert_eq!(det["knn"].category, Some(Category::Distance));
}

// ============================================================================
// Operation Tests
// ============================================================================

/// Test the reference moving-average pipeline.
#[test]
fn test_apply_pipeline_reference() {
    let stages = vec![MethodSpec::new("smooth")
        .with_param("method", "moving_average")
        .with_param("window_size", 3)];
    let out = apply_pipeline(&reference(), &stages).unwrap();

    let expected = [3.0, 2.6667, 5.0, 4.3333, 5.6667, 4.3333, 5.6667, 5.5];
    assert_eq!(out.len(), 8);
    for (o, e) in out.values().iter().zip(expected) {
        assert_relative_eq!(*o, e, epsilon = 1e-4);
    }
}

/// Test the empty pipeline.
#[test]
fn test_apply_pipeline_identity() {
    let s = reference();
    assert_eq!(apply_pipeline(&s, &[]).unwrap(), s);
}

/// Test the reference 3-sigma detection.
///
/// Verifies zero anomalies at k = 2 on the reference series.
#[test]
fn test_detect_reference() {
    let r = detect(
        &reference(),
        &MethodSpec::new("3sigma").with_param("sigma_threshold", 2.0),
    )
    .unwrap();
    assert_eq!(r.stats.anomaly_count, 0);
    assert_eq!(r.stats.valid_points, 8);
}

/// Test the error taxonomy.
#[test]
fn test_operation_errors() {
    let err = detect(&reference(), &MethodSpec::new("not_a_method")).unwrap_err();
    assert_eq!(err.kind(), "UnknownMethodError");
    assert_eq!(err.to_string(), "Unknown method: 'not_a_method'");

    let err = TimeSeries::new(["a", "b", "c", "d", "e"], vec![1.0, 2.0, 3.0, 4.0]).unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatchError");

    let err = detect(
        &reference(),
        &MethodSpec::new("knn").with_param("n_neighbors", 0),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "ParameterOutOfRangeError");
    assert_eq!(err.parameter(), Some("n_neighbors"));
}

// ============================================================================
// Pipeline Builder Tests
// ============================================================================

/// Test building and reusing a pipeline.
#[test]
fn test_pipeline_builder() {
    let pipeline = Pipeline::new()
        .smooth(MovingAverage, 3)
        .smooth(Gaussian, 2)
        .build()
        .unwrap();
    assert_eq!(pipeline.len(), 2);

    let a = pipeline.apply(&reference());
    let b = pipeline.apply(&reference());
    assert_eq!(a, b);
    assert_eq!(a.timestamps(), reference().timestamps());
}

/// Test pipeline validation at build time.
#[test]
fn test_pipeline_builder_rejects() {
    let err = Pipeline::new()
        .smooth(Exponential, 3)
        .smooth(MovingAverage, 0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "ParameterOutOfRangeError");

    let err = Pipeline::new()
        .stage(MethodSpec::new("resample"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "UnknownMethodError");
}

/// Test that the empty builder is the identity.
#[test]
fn test_pipeline_builder_empty() {
    let pipeline = Pipeline::new().build().unwrap();
    assert!(pipeline.is_empty());
    assert_eq!(pipeline.apply(&reference()), reference());
}

// ============================================================================
// Detector Builder Tests
// ============================================================================

/// Test the default detector.
///
/// Verifies that the builder defaults to 3-sigma.
#[test]
fn test_detector_builder_default() {
    let detector = Detector::new().build().unwrap();
    let r = detector.detect(&with_outlier()).unwrap();
    assert_eq!(r.method, "3sigma");
    assert_eq!(r.anomaly_indices, vec![25]);
}

/// Test detector parameters.
#[test]
fn test_detector_builder_params() {
    let detector = Detector::new()
        .method("knn")
        .param("n_neighbors", 3)
        .param("threshold_mode", "absolute")
        .param("score_threshold", 5.0)
        .build()
        .unwrap();
    let r = detector.detect(&with_outlier()).unwrap();
    assert_eq!(r.anomaly_indices, vec![25]);
}

/// Test duplicate parameter detection.
#[test]
fn test_detector_builder_duplicate() {
    let err = Detector::new()
        .param("sigma_threshold", 2.0)
        .param("sigma_threshold", 3.0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidParameterError");
    assert_eq!(err.parameter(), Some("sigma_threshold"));
}

/// Test an invalid choice.
#[test]
fn test_detector_builder_invalid_choice() {
    let err = Detector::new()
        .method("lof")
        .param("threshold_mode", "percentile")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidChoiceError");
}

/// Test a detector restricted to a window.
#[test]
fn test_detector_builder_window() {
    let detector = Detector::new().method("iqr").window(20..30).build().unwrap();
    let r = detector.detect(&with_outlier()).unwrap();
    assert_eq!(r.stats.total_points, 10);
    assert_eq!(r.anomaly_indices, vec![5]);
    assert_eq!(r.timestamps[5], "25");
}

/// Test a detector with a quality gate.
#[test]
fn test_detector_builder_quality_gate() {
    let detector = Detector::new()
        .quality_gate(QualityGate {
            min_valid_points: 5,
            max_invalid_ratio: 0.5,
        })
        .build()
        .unwrap();

    let short = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
    assert_eq!(
        detector.detect(&short).unwrap_err().kind(),
        "InsufficientDataError"
    );
    assert!(detector.detect(&with_outlier()).is_ok());
}

// ============================================================================
// Batch Tests
// ============================================================================

/// Test batch helpers.
///
/// Verifies that results keep request order and errors stay per-request.
#[test]
fn test_batch() {
    let stages = vec![MethodSpec::new("smooth")];
    let applied = apply_many(&[
        (reference(), stages.clone()),
        (with_outlier(), vec![MethodSpec::new("bogus")]),
    ]);
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].as_ref().unwrap().len(), 8);
    assert!(applied[1].is_err());

    let detected = detect_many(&[
        (with_outlier(), MethodSpec::new("iqr")),
        (reference(), MethodSpec::new("3sigma")),
    ]);
    assert_eq!(detected[0].as_ref().unwrap().anomaly_indices, vec![25]);
    assert_eq!(detected[1].as_ref().unwrap().method, "3sigma");
}

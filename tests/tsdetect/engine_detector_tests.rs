#![cfg(feature = "dev")]
//! Tests for the detection engine.
//!
//! These tests verify end-to-end detection over a series:
//! - Result shape invariants for every method
//! - Exclusion of non-finite values
//! - Warnings for empty and too-small inputs
//! - Detection windows and the quality gate
//!
//! ## Test Organization
//!
//! 1. **Statistical Methods** - 3sigma, iqr
//! 2. **Distance Methods** - knn, lof, dbscan
//! 3. **Invariants** - Flags, indices, ratios for every method
//! 4. **Non-Finite Values** - Exclusion and counts
//! 5. **Warnings** - Empty series, insufficient neighbours
//! 6. **Windows & Gates** - Slicing and data quality

use approx::assert_relative_eq;
use tracing_subscriber::EnvFilter;

use tsdetect::internals::engine::config::{EngineConfig, QualityGate};
use tsdetect::internals::engine::detector::{DetectionEngine, DetectionMethod};
use tsdetect::internals::engine::output::{DetectionResult, MethodStats, Warning};
use tsdetect::internals::engine::registry::DetectorKind;
use tsdetect::internals::engine::schema::MethodSpec;
use tsdetect::internals::primitives::series::{DetectionWindow, TimeSeries};

// ============================================================================
// Helper Functions
// ============================================================================

// Route engine logs to the test harness; filter with RUST_LOG.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn spiky() -> TimeSeries {
    let mut values: Vec<f64> = (0..60).map(|i| 50.0 + (i % 6) as f64).collect();
    values[15] = 120.0;
    values[45] = -20.0;
    TimeSeries::from_values(values)
}

fn detect(series: &TimeSeries, spec: MethodSpec) -> DetectionResult {
    DetectionEngine::default().detect(series, &spec, None).unwrap()
}

// ============================================================================
// Statistical Method Tests
// ============================================================================

/// Test 3-sigma on a small series.
///
/// Verifies no anomalies at k = 2 and the reported statistics.
#[test]
fn test_three_sigma_reference() {
    let s = TimeSeries::from_values(vec![1.0, 5.0, 2.0, 8.0, 3.0, 6.0, 4.0, 7.0]);
    let r = detect(&s, MethodSpec::new("3sigma").with_param("sigma_threshold", 2));

    assert_eq!(r.method, "3sigma");
    assert_eq!(r.stats.anomaly_count, 0);
    assert!(r.anomaly_indices.is_empty());
    match r.stats.method {
        MethodStats::Sigma { mean, std, .. } => {
            assert_relative_eq!(mean, 4.5);
            assert_relative_eq!(std, 2.2913, epsilon = 1e-4);
        }
        other => panic!("Expected sigma stats, got {:?}", other),
    }
}

/// Test 3-sigma on a constant that does not sum exactly.
///
/// Verifies that a sub-unit threshold still flags nothing.
#[test]
fn test_three_sigma_constant_tenths() {
    let s = TimeSeries::from_values(vec![0.1; 10]);
    let r = detect(&s, MethodSpec::new("3sigma").with_param("sigma_threshold", 0.5));

    assert_eq!(r.stats.anomaly_count, 0);
    assert!(r.anomaly_indices.is_empty());
    match r.stats.method {
        MethodStats::Sigma { std, .. } => assert_eq!(std, 0.0),
        other => panic!("Expected sigma stats, got {:?}", other),
    }
}

/// Test statistical methods on spikes.
#[test]
fn test_statistical_flags_spikes() {
    let s = spiky();
    for key in ["3sigma", "iqr"] {
        let r = detect(&s, MethodSpec::new(key));
        assert_eq!(r.anomaly_indices, vec![15, 45], "method {}", key);
    }
}

// ============================================================================
// Distance Method Tests
// ============================================================================

/// Test distance methods on spikes.
///
/// Verifies that absolute thresholds isolate the spikes.
#[test]
fn test_distance_flags_spikes() {
    let s = spiky();

    let r = detect(
        &s,
        MethodSpec::new("knn")
            .with_param("threshold_mode", "absolute")
            .with_param("score_threshold", 10.0),
    );
    assert_eq!(r.anomaly_indices, vec![15, 45]);

    let r = detect(
        &s,
        MethodSpec::new("lof")
            .with_param("n_neighbors", 10)
            .with_param("threshold_mode", "absolute")
            .with_param("score_threshold", 3.0),
    );
    assert_eq!(r.anomaly_indices, vec![15, 45]);
    match r.stats.method {
        MethodStats::Distance {
            n_neighbors,
            contamination,
            threshold,
            ..
        } => {
            assert_eq!(n_neighbors, 10);
            assert_eq!(contamination, None);
            assert_relative_eq!(threshold, 3.0);
        }
        other => panic!("Expected distance stats, got {:?}", other),
    }
}

/// Test DBSCAN on spikes.
///
/// Verifies that the spikes are the noise around a single cluster.
#[test]
fn test_dbscan_flags_spikes() {
    let r = detect(&spiky(), MethodSpec::new("dbscan"));

    assert_eq!(r.method, "dbscan");
    assert_eq!(r.anomaly_indices, vec![15, 45]);
    match r.stats.method {
        MethodStats::Density {
            eps,
            min_samples,
            n_clusters,
            noise_points,
        } => {
            assert_relative_eq!(eps, 0.5);
            assert_eq!(min_samples, 5);
            assert_eq!(n_clusters, 1);
            assert_eq!(noise_points, 2);
        }
        other => panic!("Expected density stats, got {:?}", other),
    }
}

/// Test neighbour clamping in the result.
#[test]
fn test_distance_reports_clamped_k() {
    let s = TimeSeries::from_values(vec![1.0, 2.0, 3.0, 10.0]);
    let r = detect(&s, MethodSpec::new("lof"));
    match r.stats.method {
        MethodStats::Distance { n_neighbors, .. } => assert_eq!(n_neighbors, 3),
        other => panic!("Expected distance stats, got {:?}", other),
    }
}

// ============================================================================
// Invariant Tests
// ============================================================================

/// Test result invariants for every method.
///
/// Verifies lengths, ascending indices matching flags, and the ratio.
#[test]
fn test_result_invariants() {
    let mut values = spiky().values().to_vec();
    values[3] = f64::NAN;
    values[30] = f64::INFINITY;
    let s = TimeSeries::from_values(values);

    for kind in DetectorKind::ALL {
        let r = detect(&s, MethodSpec::new(kind.key()));

        assert_eq!(r.anomaly_flags.len(), s.len());
        assert_eq!(r.values.len(), s.len());
        assert_eq!(r.timestamps.len(), s.len());

        let from_flags: Vec<usize> = (0..s.len()).filter(|&i| r.anomaly_flags[i]).collect();
        assert_eq!(r.anomaly_indices, from_flags);
        assert!(r.anomaly_indices.windows(2).all(|w| w[0] < w[1]));
        assert!(r.anomaly_indices.iter().all(|&i| r.values[i].is_finite()));

        assert_eq!(r.stats.anomaly_count, r.anomaly_indices.len());
        assert_relative_eq!(
            r.stats.anomaly_ratio,
            r.stats.anomaly_count as f64 / r.stats.valid_points as f64
        );
    }
}

/// Test determinism.
#[test]
fn test_deterministic() {
    let s = spiky();
    for kind in DetectorKind::ALL {
        let spec = MethodSpec::new(kind.key());
        assert_eq!(detect(&s, spec.clone()), detect(&s, spec));
    }
}

// ============================================================================
// Non-Finite Value Tests
// ============================================================================

/// Test NaN exclusion.
///
/// Verifies counts and that a NaN is never flagged.
#[test]
fn test_nan_excluded() {
    init_tracing();
    let s = TimeSeries::from_values(vec![1.0, f64::NAN, 1.0, 1.0, 50.0, 1.0, 1.0, 1.0]);
    let r = detect(&s, MethodSpec::new("iqr"));

    assert_eq!(r.stats.total_points, 8);
    assert_eq!(r.stats.valid_points, 7);
    assert_eq!(r.stats.invalid_points, 1);
    assert_eq!(r.stats.data_quality.nan_count, 1);
    assert!(!r.anomaly_flags[1]);
    assert_eq!(r.anomaly_indices, vec![4]);
}

// ============================================================================
// Warning Tests
// ============================================================================

/// Test too few valid points for clustering.
#[test]
fn test_dbscan_insufficient_warning() {
    init_tracing();
    let s = TimeSeries::from_values(vec![1.0, 2.0, f64::NAN, 3.0]);
    let r = detect(&s, MethodSpec::new("dbscan").with_param("min_samples", 4));

    assert!(!r.has_anomalies());
    assert_eq!(
        r.warnings,
        vec![Warning::InsufficientNeighbors {
            valid_points: 3,
            required: 4
        }]
    );
}

/// Test an empty series.
///
/// Verifies an empty result with a warning rather than an error.
#[test]
fn test_empty_series_warning() {
    init_tracing();
    let s = TimeSeries::default();
    for kind in DetectorKind::ALL {
        let r = detect(&s, MethodSpec::new(kind.key()));
        assert!(r.anomaly_flags.is_empty());
        assert_eq!(r.stats.anomaly_ratio, 0.0);
        assert_eq!(r.warnings, vec![Warning::EmptySeries]);
    }
}

/// Test too few valid points for neighbour scoring.
#[test]
fn test_insufficient_neighbors_warning() {
    init_tracing();
    let s = TimeSeries::from_values(vec![f64::NAN, 4.0, f64::NAN]);
    let r = detect(&s, MethodSpec::new("knn"));

    assert!(!r.has_anomalies());
    assert_eq!(
        r.warnings,
        vec![Warning::InsufficientNeighbors {
            valid_points: 1,
            required: 2
        }]
    );
}

// ============================================================================
// Window & Gate Tests
// ============================================================================

/// Test a detection window.
///
/// Verifies that only the window is analyzed and indices are window-relative.
#[test]
fn test_detection_window() {
    let s = spiky();
    let r = DetectionEngine::default()
        .detect(&s, &MethodSpec::new("3sigma"), Some(DetectionWindow::new(40, 60)))
        .unwrap();

    assert_eq!(r.stats.total_points, 20);
    assert_eq!(r.timestamps[0], "40");
    assert_eq!(r.anomaly_indices, vec![5]);
}

/// Test a window past the end of the series.
#[test]
fn test_detection_window_out_of_range() {
    let err = DetectionEngine::default()
        .detect(&spiky(), &MethodSpec::new("iqr"), Some(DetectionWindow::new(10, 61)))
        .unwrap_err();
    assert_eq!(err.kind(), "ParameterOutOfRangeError");
}

/// Test the quality gate.
///
/// Verifies that the gate is off by default and rejects dirty data when on.
#[test]
fn test_quality_gate() {
    let s = TimeSeries::from_values(vec![1.0, f64::NAN, f64::NAN, f64::NAN, 2.0]);
    let spec = MethodSpec::new("3sigma");

    assert!(DetectionEngine::default().detect(&s, &spec, None).is_ok());

    let gated =
        DetectionEngine::new(EngineConfig::default().with_quality_gate(QualityGate::default()));
    assert_eq!(
        gated.detect(&s, &spec, None).unwrap_err().kind(),
        "InsufficientDataError"
    );
}

// ============================================================================
// Validation Tests
// ============================================================================

/// Test method validation.
///
/// Verifies typed parameters and rejection of unknown keys.
#[test]
fn test_validate_method() {
    let engine = DetectionEngine::default();
    assert_eq!(
        engine.validate(&MethodSpec::new("iqr")).unwrap(),
        DetectionMethod::Iqr {
            iqr_multiplier: 1.5
        }
    );
    assert_eq!(
        engine
            .validate(&MethodSpec::new("not_a_method"))
            .unwrap_err()
            .kind(),
        "UnknownMethodError"
    );
    assert_eq!(
        engine
            .validate(&MethodSpec::new("smooth"))
            .unwrap_err()
            .kind(),
        "UnknownMethodError"
    );
    assert_eq!(
        engine
            .validate(&MethodSpec::new("3sigma").with_param("sigma_threshold", 0.05))
            .unwrap_err()
            .kind(),
        "ParameterOutOfRangeError"
    );
}

//! # tsdetect: Time-Series Preprocessing and Anomaly Detection for Rust
//!
//! A small, stateless engine that cleans a univariate time series with a
//! configurable preprocessing pipeline and then flags anomalous points with
//! one of several pluggable detectors.
//!
//! ## What does it do?
//!
//! * **Preprocessing**: Moving-average, exponential, and Gaussian smoothing,
//!   chained as ordered `{type, params}` stages.
//! * **Detection**: Statistical (`3sigma`, `iqr`) and distance-based (`knn`,
//!   `lof`, `dbscan`) detectors. Each reports per-point flags, flagged indices
//!   and method statistics.
//! * **Discovery**: Every method publishes a parameter schema (type, default,
//!   bounds, options) so a client can render a form without hard-coding it.
//!
//! ## Quick Start
//!
//! ### Typical Use
//!
//! ```rust
//! use tsdetect::prelude::*;
//!
//! let series = TimeSeries::new(
//!     ["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7"],
//!     vec![1.0, 5.0, 2.0, 8.0, 3.0, 6.0, 4.0, 7.0],
//! )?;
//!
//! // Smooth, then detect
//! let pipeline = Pipeline::new()
//!     .smooth(MovingAverage, 3)   // Centered 3-point moving average
//!     .build()?;
//! let smoothed = pipeline.apply(&series);
//!
//! let detector = Detector::new()
//!     .method("3sigma")
//!     .param("sigma_threshold", 2.0)
//!     .build()?;
//! let result = detector.detect(&smoothed)?;
//!
//! println!("{}", result);
//! # Result::<(), TsError>::Ok(())
//! ```
//!
//! ```text
//! Summary:
//!   Method:       3sigma
//!   Data points:  8
//!   Valid points: 8
//!   Anomalies:    0 (0.00%)
//! ```
//!
//! ### Request-Style Use
//!
//! The same operations accept the `{type, params}` references a client sends:
//!
//! ```rust
//! use tsdetect::prelude::*;
//!
//! let series = TimeSeries::from_values(vec![10.0, 11.0, 9.5, 10.2, 42.0, 10.1, 9.9]);
//!
//! let stages = vec![MethodSpec::new("smooth")
//!     .with_param("method", "exponential")
//!     .with_param("window_size", 3)];
//! let cleaned = apply_pipeline(&series, &stages)?;
//! assert_eq!(cleaned.len(), series.len());
//!
//! let result = detect(&series, &MethodSpec::new("iqr"))?;
//! assert_eq!(result.anomaly_indices, vec![4]);
//! # Result::<(), TsError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Every operation returns `Result<_, TsError>`. Errors carry a stable
//! [`kind`](prelude::TsError::kind) (`UnknownMethodError`, `ValidationError`,
//! `ShapeMismatchError`, ...) and, for parameter failures, the offending
//! parameter name. Non-finite values are never an error: they are carried
//! through smoothing and excluded from detection.
//!
//! ```rust
//! use tsdetect::prelude::*;
//!
//! match TimeSeries::new(["a", "b"], vec![1.0]) {
//!     Ok(_) => unreachable!(),
//!     Err(e) => assert_eq!(e.kind(), "ShapeMismatchError"),
//! }
//! ```
//!
//! ## JSON Wire Format
//!
//! The [`wire`] module exposes the three operations over JSON with a
//! `{success, data, message, error}` envelope, ready to mount behind any HTTP
//! or IPC transport.
//!
//! ## Features
//!
//! * `parallel`: Per-index smoothing and batch requests run on rayon.
//! * `dev`: Exposes every layer under [`internals`] for layer tests.

// Layer 1: Primitives - series, windows, validity, and errors.
mod primitives;

// Layer 2: Math - kernels, descriptive statistics, and neighbourhoods.
mod math;

// Layer 3: Algorithms - smoothing and detection algorithms.
mod algorithms;

// Layer 4: Engine - registry, validation, and execution.
mod engine;

// Layer 5: High-level fluent API.
mod api;

// Layer 6: JSON wire format.
pub mod wire;

// Standard tsdetect prelude.
pub mod prelude {
    pub use crate::api::{
        apply_many, apply_pipeline, detect, detect_many, get_methods, Category, DataQuality,
        DetectionResult, DetectionStats, DetectionWindow, DetectorBuilder as Detector,
        EngineConfig, MethodDescriptor, MethodKind, MethodRegistry, MethodSpec, MethodStats,
        ParamKind, ParamSchema, ParamSpec, ParamValue, PipelineBuilder as Pipeline,
        PipelineStage, PreparedDetector, PreparedPipeline, QualityGate,
        SmoothingMethod::{self, Exponential, Gaussian, MovingAverage},
        TimeSeries, TsError, Warning,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}

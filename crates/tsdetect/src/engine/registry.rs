//! Method registry: the catalogue of preprocessing and detection methods.
//!
//! ## Purpose
//!
//! This module maps method keys to their descriptors and typed kinds. It is
//! the single place that knows which methods exist; the pipeline executor and
//! the detector resolve keys here and validate parameters against the
//! descriptor's schema.
//!
//! ## Design notes
//!
//! * **Closed set**: Each method is one variant of [`PreprocessKind`] or
//!   [`DetectorKind`]. Adding a method means adding a variant and its
//!   descriptor; the executor and validator are untouched.
//! * **Process-wide**: [`MethodRegistry::global`] is built once on first use
//!   and is read-only afterwards, so concurrent readers need no locking.
//!
//! ## Invariants
//!
//! * Keys are unique across both families.
//! * Every descriptor's schema has a default for every parameter.

// External dependencies
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// Internal dependencies
use crate::algorithms::smoothing::SmoothingMethod;
use crate::engine::schema::{Choice, ParamSchema, ParamSpec, RawParams, ResolvedParams};
use crate::engine::validator::Validator;
use crate::primitives::errors::TsError;

// ============================================================================
// Descriptors
// ============================================================================

/// Which family of methods to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Series-to-series transforms.
    Preprocessing,

    /// Series-to-flags classifiers.
    Detection,
}

/// Discovery grouping for detection methods. Has no behavioral effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Thresholds derived from summary statistics.
    Statistical,

    /// Scores derived from neighbour distances.
    Distance,
}

/// Catalogue entry for one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Registered key.
    pub key: &'static str,

    /// Human-readable name.
    pub display_name: &'static str,

    /// What the method does.
    pub description: &'static str,

    /// Discovery grouping (detection methods only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Parameter descriptors.
    pub param_schema: ParamSchema,
}

// ============================================================================
// Method Kinds
// ============================================================================

/// Registered preprocessing methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessKind {
    /// Moving-average, exponential, or Gaussian smoothing.
    Smooth,
}

impl PreprocessKind {
    /// All preprocessing methods.
    pub const ALL: [PreprocessKind; 1] = [PreprocessKind::Smooth];

    /// Registered key.
    pub const fn key(&self) -> &'static str {
        match self {
            PreprocessKind::Smooth => "smooth",
        }
    }

    /// Catalogue entry.
    pub fn descriptor(&self) -> MethodDescriptor {
        match self {
            PreprocessKind::Smooth => MethodDescriptor {
                key: self.key(),
                display_name: "Smoothing",
                description:
                    "Reduce noise with a local moving average, exponential, or Gaussian filter",
                category: None,
                param_schema: ParamSchema::new(vec![
                    ParamSpec::enumerated(
                        "method",
                        SmoothingMethod::default().key(),
                        SmoothingMethod::ALL
                            .iter()
                            .map(|m| Choice {
                                label: m.label(),
                                value: m.key(),
                            })
                            .collect(),
                    )
                    .describe("Smoothing algorithm"),
                    ParamSpec::integer("window_size", 5, 1, 100)
                        .describe("Window size in samples"),
                ]),
            },
        }
    }
}

/// Registered detection methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// Mean +/- k standard deviations.
    ThreeSigma,

    /// Quartiles +/- m interquartile ranges.
    Iqr,

    /// Mean distance to the k nearest values.
    Knn,

    /// Local outlier factor.
    Lof,

    /// Density clustering; noise points are anomalies.
    Dbscan,
}

impl DetectorKind {
    /// All detection methods.
    pub const ALL: [DetectorKind; 5] = [
        DetectorKind::ThreeSigma,
        DetectorKind::Iqr,
        DetectorKind::Knn,
        DetectorKind::Lof,
        DetectorKind::Dbscan,
    ];

    /// Registered key.
    pub const fn key(&self) -> &'static str {
        match self {
            DetectorKind::ThreeSigma => "3sigma",
            DetectorKind::Iqr => "iqr",
            DetectorKind::Knn => "knn",
            DetectorKind::Lof => "lof",
            DetectorKind::Dbscan => "dbscan",
        }
    }

    /// Discovery grouping.
    pub const fn category(&self) -> Category {
        match self {
            DetectorKind::ThreeSigma | DetectorKind::Iqr => Category::Statistical,
            DetectorKind::Knn | DetectorKind::Lof | DetectorKind::Dbscan => Category::Distance,
        }
    }

    /// Catalogue entry.
    pub fn descriptor(&self) -> MethodDescriptor {
        let (display_name, description, params) = match self {
            DetectorKind::ThreeSigma => (
                "3-Sigma",
                "Flag points more than k standard deviations from the mean of the valid values",
                vec![
                    ParamSpec::float("sigma_threshold", 3.0, 0.1, 10.0)
                        .step(0.1)
                        .describe("Threshold in standard deviations"),
                ],
            ),
            DetectorKind::Iqr => (
                "IQR",
                "Flag points outside [Q1 - m*IQR, Q3 + m*IQR]; robust to non-normal data",
                vec![
                    ParamSpec::float("iqr_multiplier", 1.5, 0.5, 5.0)
                        .step(0.1)
                        .describe("Multiple of the interquartile range"),
                ],
            ),
            DetectorKind::Knn => (
                "KNN",
                "Score each point by its mean value distance to its k nearest neighbours",
                distance_params(5, 1, 1.0),
            ),
            DetectorKind::Lof => (
                "LOF",
                "Score each point by its local outlier factor relative to its k nearest neighbours",
                distance_params(20, 2, 1.5),
            ),
            DetectorKind::Dbscan => (
                "DBSCAN",
                "Cluster standardized values by density and flag points that join no cluster",
                vec![
                    ParamSpec::float("eps", 0.5, 0.1, 5.0)
                        .step(0.1)
                        .describe("Neighbourhood radius in standard deviations"),
                    ParamSpec::integer("min_samples", 5, 2, 20)
                        .describe("Neighbours, including the point, needed for a core point"),
                ],
            ),
        };

        MethodDescriptor {
            key: self.key(),
            display_name,
            description,
            category: Some(self.category()),
            param_schema: ParamSchema::new(params),
        }
    }
}

// Parameters shared by the distance detectors.
fn distance_params(default_k: i64, min_k: i64, default_threshold: f64) -> Vec<ParamSpec> {
    vec![
        ParamSpec::integer("n_neighbors", default_k, min_k, 50).describe("Neighbourhood size k"),
        ParamSpec::float("contamination", 0.1, 0.01, 0.5)
            .step(0.01)
            .describe("Expected fraction of anomalies"),
        ParamSpec::enumerated(
            "threshold_mode",
            "contamination",
            vec![
                Choice {
                    label: "Contamination",
                    value: "contamination",
                },
                Choice {
                    label: "Absolute score",
                    value: "absolute",
                },
            ],
        )
        .describe("How the score threshold is chosen"),
        ParamSpec::float("score_threshold", default_threshold, 0.0, 1e12)
            .describe("Score threshold used in absolute mode"),
    ]
}

// ============================================================================
// Registry
// ============================================================================

/// A resolved method of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// A preprocessing method.
    Preprocess(PreprocessKind),

    /// A detection method.
    Detect(DetectorKind),
}

/// Read-only catalogue of registered methods.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    preprocessing: BTreeMap<&'static str, MethodDescriptor>,
    detection: BTreeMap<&'static str, MethodDescriptor>,
}

impl MethodRegistry {
    /// Process-wide registry, built on first access.
    pub fn global() -> &'static MethodRegistry {
        static REGISTRY: OnceLock<MethodRegistry> = OnceLock::new();
        REGISTRY.get_or_init(MethodRegistry::build)
    }

    fn build() -> Self {
        Self {
            preprocessing: PreprocessKind::ALL
                .iter()
                .map(|k| (k.key(), k.descriptor()))
                .collect(),
            detection: DetectorKind::ALL
                .iter()
                .map(|k| (k.key(), k.descriptor()))
                .collect(),
        }
    }

    /// Catalogue of one family.
    pub fn methods(&self, kind: MethodKind) -> &BTreeMap<&'static str, MethodDescriptor> {
        match kind {
            MethodKind::Preprocessing => &self.preprocessing,
            MethodKind::Detection => &self.detection,
        }
    }

    /// Catalogue of preprocessing methods.
    pub fn preprocessing_methods(&self) -> &BTreeMap<&'static str, MethodDescriptor> {
        &self.preprocessing
    }

    /// Catalogue of detection methods.
    pub fn detection_methods(&self) -> &BTreeMap<&'static str, MethodDescriptor> {
        &self.detection
    }

    /// Resolve a key of either family.
    pub fn resolve(&self, key: &str) -> Result<Algorithm, TsError> {
        if let Some(kind) = PreprocessKind::ALL.into_iter().find(|k| k.key() == key) {
            return Ok(Algorithm::Preprocess(kind));
        }
        if let Some(kind) = DetectorKind::ALL.into_iter().find(|k| k.key() == key) {
            return Ok(Algorithm::Detect(kind));
        }
        Err(unknown(key))
    }

    /// Resolve a preprocessing key and validate its parameters.
    pub fn resolve_preprocessing(
        &self,
        key: &str,
        raw: &RawParams,
    ) -> Result<(PreprocessKind, ResolvedParams), TsError> {
        let descriptor = self.preprocessing.get(key).ok_or_else(|| unknown(key))?;
        let kind = match self.resolve(key)? {
            Algorithm::Preprocess(kind) => kind,
            Algorithm::Detect(_) => return Err(unknown(key)),
        };
        let params = Validator::resolve_params(&descriptor.param_schema, raw)?;
        Ok((kind, params))
    }

    /// Resolve a detection key and validate its parameters.
    pub fn resolve_detection(
        &self,
        key: &str,
        raw: &RawParams,
    ) -> Result<(DetectorKind, ResolvedParams), TsError> {
        let descriptor = self.detection.get(key).ok_or_else(|| unknown(key))?;
        let kind = match self.resolve(key)? {
            Algorithm::Detect(kind) => kind,
            Algorithm::Preprocess(_) => return Err(unknown(key)),
        };
        let params = Validator::resolve_params(&descriptor.param_schema, raw)?;
        Ok((kind, params))
    }
}

fn unknown(key: &str) -> TsError {
    TsError::UnknownMethod {
        key: key.to_string(),
    }
}

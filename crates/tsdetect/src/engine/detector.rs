//! Execution engine for anomaly detection.
//!
//! ## Purpose
//!
//! This module resolves a detection request to a typed [`DetectionMethod`],
//! restricts the series to the requested window, runs the algorithm over the
//! valid (finite) values, and assembles the [`DetectionResult`].
//!
//! ## Design notes
//!
//! * **Validate first**: Method key, parameters, window and quality gate are
//!   all checked before any scoring runs.
//! * **Compaction**: Algorithms see only finite values; flags are scattered
//!   back to original positions, so invalid points are never flagged.
//! * **Warnings, not errors**: Empty input and too-small neighbourhoods yield
//!   an empty or all-clear result carrying a [`Warning`].
//!
//! ## Invariants
//!
//! * `validPoints` excludes non-finite values.
//! * `anomalyIndices` never contains the position of a non-finite value.

// External dependencies
use tracing::{debug, warn};

// Internal dependencies
use crate::algorithms::distance::{self, DistanceFit, ThresholdMode};
use crate::algorithms::statistical;
use crate::engine::config::EngineConfig;
use crate::engine::output::{DetectionResult, DetectionStats, MethodStats, Warning};
use crate::engine::registry::{DetectorKind, MethodRegistry};
use crate::engine::schema::{MethodSpec, ResolvedParams};
use crate::engine::validator::Validator;
use crate::primitives::errors::TsError;
use crate::primitives::series::{DetectionWindow, TimeSeries};
use crate::primitives::validity::{DataQuality, ValidPoints};

// ============================================================================
// Detection Method
// ============================================================================

/// A validated detection method with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionMethod {
    /// Flag `|x - mu| > sigma_threshold * sigma`.
    ThreeSigma {
        /// Threshold in standard deviations.
        sigma_threshold: f64,
    },

    /// Flag values outside the IQR fences.
    Iqr {
        /// Multiple of the interquartile range.
        iqr_multiplier: f64,
    },

    /// Flag values far from their nearest neighbours.
    Knn {
        /// Neighbourhood size.
        n_neighbors: usize,
        /// Threshold selection.
        threshold: ThresholdMode<f64>,
    },

    /// Flag values with a high local outlier factor.
    Lof {
        /// Neighbourhood size.
        n_neighbors: usize,
        /// Threshold selection.
        threshold: ThresholdMode<f64>,
    },

    /// Flag values that fall in no density cluster.
    Dbscan {
        /// Neighbourhood radius in standard deviations.
        eps: f64,
        /// Core point size.
        min_samples: usize,
    },
}

// Flags over the valid values plus the method's statistics.
struct Scored {
    flags: Vec<bool>,
    stats: MethodStats,
    warning: Option<Warning>,
}

impl DetectionMethod {
    /// Build a typed method from resolved parameters.
    pub fn configure(kind: DetectorKind, params: &ResolvedParams) -> Result<Self, TsError> {
        Ok(match kind {
            DetectorKind::ThreeSigma => DetectionMethod::ThreeSigma {
                sigma_threshold: params.f64("sigma_threshold")?,
            },
            DetectorKind::Iqr => DetectionMethod::Iqr {
                iqr_multiplier: params.f64("iqr_multiplier")?,
            },
            DetectorKind::Knn => DetectionMethod::Knn {
                n_neighbors: params.usize("n_neighbors")?,
                threshold: threshold_mode(params)?,
            },
            DetectorKind::Lof => DetectionMethod::Lof {
                n_neighbors: params.usize("n_neighbors")?,
                threshold: threshold_mode(params)?,
            },
            DetectorKind::Dbscan => DetectionMethod::Dbscan {
                eps: params.f64("eps")?,
                min_samples: params.usize("min_samples")?,
            },
        })
    }

    /// Registry entry for this method.
    pub fn kind(&self) -> DetectorKind {
        match self {
            DetectionMethod::ThreeSigma { .. } => DetectorKind::ThreeSigma,
            DetectionMethod::Iqr { .. } => DetectorKind::Iqr,
            DetectionMethod::Knn { .. } => DetectorKind::Knn,
            DetectionMethod::Lof { .. } => DetectorKind::Lof,
            DetectionMethod::Dbscan { .. } => DetectorKind::Dbscan,
        }
    }

    // Run the algorithm over finite values.
    fn score(&self, values: &[f64]) -> Scored {
        match *self {
            DetectionMethod::ThreeSigma { sigma_threshold } => {
                let fit = statistical::three_sigma(values, sigma_threshold);
                Scored {
                    stats: MethodStats::Sigma {
                        mean: fit.mean,
                        std: fit.std,
                        upper_bound: fit.upper_bound,
                        lower_bound: fit.lower_bound,
                    },
                    flags: fit.flags,
                    warning: None,
                }
            }
            DetectionMethod::Iqr { iqr_multiplier } => {
                let fit = statistical::iqr(values, iqr_multiplier);
                Scored {
                    stats: MethodStats::Iqr {
                        q1: fit.q1,
                        q2: fit.q2,
                        q3: fit.q3,
                        iqr: fit.iqr,
                        lower_bound: fit.lower_bound,
                        upper_bound: fit.upper_bound,
                    },
                    flags: fit.flags,
                    warning: None,
                }
            }
            DetectionMethod::Knn {
                n_neighbors,
                threshold,
            } => distance_scored(
                distance::knn(values, n_neighbors, threshold),
                values.len(),
                threshold,
            ),
            DetectionMethod::Lof {
                n_neighbors,
                threshold,
            } => distance_scored(
                distance::lof(values, n_neighbors, threshold),
                values.len(),
                threshold,
            ),
            DetectionMethod::Dbscan { eps, min_samples } => {
                let fit = distance::dbscan(values, eps, min_samples);
                let (n_clusters, noise_points) =
                    fit.as_ref().map_or((0, 0), |f| (f.n_clusters, f.noise_points));
                Scored {
                    stats: MethodStats::Density {
                        eps,
                        min_samples,
                        n_clusters,
                        noise_points,
                    },
                    warning: (fit.is_none() && !values.is_empty()).then_some(
                        Warning::InsufficientNeighbors {
                            valid_points: values.len(),
                            required: min_samples,
                        },
                    ),
                    flags: fit.map_or_else(|| vec![false; values.len()], |f| f.flags),
                }
            }
        }
    }
}

fn threshold_mode(params: &ResolvedParams) -> Result<ThresholdMode<f64>, TsError> {
    match params.text("threshold_mode")? {
        "absolute" => Ok(ThresholdMode::Absolute(params.f64("score_threshold")?)),
        _ => Ok(ThresholdMode::Contamination(params.f64("contamination")?)),
    }
}

fn distance_scored(fit: Option<DistanceFit<f64>>, n: usize, mode: ThresholdMode<f64>) -> Scored {
    let contamination = match mode {
        ThresholdMode::Contamination(c) => Some(c),
        ThresholdMode::Absolute(_) => None,
    };

    match fit {
        Some(fit) => Scored {
            stats: MethodStats::Distance {
                n_neighbors: fit.k_used,
                contamination,
                threshold: fit.threshold,
                mean_score: fit.mean_score,
                max_score: fit.max_score,
                min_score: fit.min_score,
            },
            flags: fit.flags,
            warning: None,
        },
        None => Scored {
            flags: vec![false; n],
            stats: MethodStats::Distance {
                n_neighbors: 0,
                contamination,
                threshold: 0.0,
                mean_score: 0.0,
                max_score: 0.0,
                min_score: 0.0,
            },
            // An empty series already carries `EmptySeries`
            warning: (n > 0).then_some(Warning::InsufficientNeighbors {
                valid_points: n,
                required: 2,
            }),
        },
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Runs detection requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionEngine {
    config: EngineConfig,
}

impl DetectionEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Resolve and validate a method reference.
    pub fn validate(&self, spec: &MethodSpec) -> Result<DetectionMethod, TsError> {
        let (kind, params) = MethodRegistry::global().resolve_detection(&spec.kind, &spec.params)?;
        DetectionMethod::configure(kind, &params)
    }

    /// Validate then run `spec` over `series`, optionally restricted to `window`.
    pub fn detect(
        &self,
        series: &TimeSeries,
        spec: &MethodSpec,
        window: Option<DetectionWindow>,
    ) -> Result<DetectionResult, TsError> {
        let method = self.validate(spec)?;
        self.run(series, method, window)
    }

    /// Run an already-validated method.
    pub fn run(
        &self,
        series: &TimeSeries,
        method: DetectionMethod,
        window: Option<DetectionWindow>,
    ) -> Result<DetectionResult, TsError> {
        let series = match window {
            Some(w) => series.slice(w)?,
            None => series.clone(),
        };

        let quality = DataQuality::assess(series.values());
        if let Some(gate) = &self.config.quality {
            Validator::validate_quality(&quality, gate)?;
        }

        let key = method.kind().key();
        let mut warnings = Vec::new();
        if series.is_empty() {
            warn!(method = key, "detection on empty series");
            warnings.push(Warning::EmptySeries);
        }
        if quality.invalid_points > 0 {
            warn!(
                method = key,
                invalid = quality.invalid_points,
                nan = quality.nan_count,
                inf = quality.inf_count,
                "series contains non-finite values; they are excluded"
            );
        }

        let valid = ValidPoints::collect(series.values());
        debug!(method = key, points = series.len(), valid = valid.len(), "running detection");

        let scored = method.score(&valid.values);
        if let Some(w) = scored.warning {
            warn!(method = key, "{w}");
            warnings.push(w);
        }

        let anomaly_flags = valid.scatter_flags(&scored.flags, series.len());
        let anomaly_indices: Vec<usize> = anomaly_flags
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect();
        let anomaly_count = anomaly_indices.len();

        let stats = DetectionStats {
            total_points: series.len(),
            valid_points: valid.len(),
            invalid_points: series.len() - valid.len(),
            anomaly_count,
            anomaly_ratio: if valid.is_empty() {
                0.0
            } else {
                anomaly_count as f64 / valid.len() as f64
            },
            method: scored.stats,
            data_quality: quality,
        };

        let (timestamps, values) = series.into_parts();
        Ok(DetectionResult {
            method: key,
            timestamps,
            values,
            anomaly_flags,
            anomaly_indices,
            stats,
            warnings,
        })
    }
}

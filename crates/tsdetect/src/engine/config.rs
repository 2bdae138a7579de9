//! Engine configuration.
//!
//! Settings that apply across requests rather than to one method: whether
//! per-index work may run in parallel, and an optional data quality gate for
//! detection. Deserializable so hosts can load it alongside their own config.

// External dependencies
use serde::{Deserialize, Serialize};

/// Minimum data quality required before detection runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityGate {
    /// Fewest valid (finite) points accepted.
    pub min_valid_points: usize,

    /// Largest accepted fraction of invalid points.
    pub max_invalid_ratio: f64,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            min_valid_points: 3,
            max_invalid_ratio: 0.5,
        }
    }
}

/// Configuration shared by pipeline execution and detection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Allow per-index smoothing to run on the rayon pool (`parallel` feature).
    pub parallel: bool,

    /// Quality gate enforced before detection; `None` disables it.
    pub quality: Option<QualityGate>,
}

impl EngineConfig {
    /// Enforce a quality gate before detection.
    pub fn with_quality_gate(mut self, gate: QualityGate) -> Self {
        self.quality = Some(gate);
        self
    }

    /// Set the parallel execution hint.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

//! Input validation for method parameters and series.
//!
//! ## Purpose
//!
//! This module provides the shared validation layer used by both the
//! preprocessing and detection paths. It coerces caller-supplied parameters
//! to their declared kinds, checks numeric bounds and enumerated choices,
//! fills in defaults, and checks series shape and quality.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Schema-driven**: All parameter rules come from the method's [`ParamSchema`].
//! * **Lenient coercion**: Integral floats and numeric strings are accepted
//!   for numeric kinds; anything else is an `InvalidParameter` error.
//!
//! ## Invariants
//!
//! * A successful resolution contains every schema parameter exactly once.
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not run any algorithm.
//! * Unknown parameter names are ignored (logged at debug level), not rejected.

// External dependencies
use serde_json::Value;
use tracing::debug;

// Internal dependencies
use crate::engine::config::QualityGate;
use crate::engine::schema::{
    ParamKind, ParamSchema, ParamSpec, ParamValue, RawParams, ResolvedParams,
};
use crate::primitives::errors::{Bound, TsError};
use crate::primitives::validity::DataQuality;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for method parameters and input series.
///
/// Provides static methods returning `Result<_, TsError>` that fail fast upon
/// identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Series Validation
    // ========================================================================

    /// Validate that timestamps and values pair up one-to-one.
    pub fn validate_shape(timestamps: usize, values: usize) -> Result<(), TsError> {
        if timestamps != values {
            return Err(TsError::ShapeMismatch { timestamps, values });
        }
        Ok(())
    }

    /// Validate a series against a data quality gate.
    pub fn validate_quality(quality: &DataQuality, gate: &QualityGate) -> Result<(), TsError> {
        if quality.total_points == 0 {
            return Ok(());
        }

        if quality.valid_points < gate.min_valid_points {
            return Err(TsError::InsufficientData {
                reason: format!(
                    "need at least {} valid points, got {}",
                    gate.min_valid_points, quality.valid_points
                ),
            });
        }

        let ratio = quality.invalid_ratio();
        if ratio > gate.max_invalid_ratio {
            return Err(TsError::InsufficientData {
                reason: format!(
                    "{}/{} points are invalid ({:.1}% > {:.1}%)",
                    quality.invalid_points,
                    quality.total_points,
                    ratio * 100.0,
                    gate.max_invalid_ratio * 100.0
                ),
            });
        }

        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Resolve caller parameters against a schema.
    ///
    /// Missing or `null` entries take the declared default.
    pub fn resolve_params(
        schema: &ParamSchema,
        raw: &RawParams,
    ) -> Result<ResolvedParams, TsError> {
        for name in raw.keys().filter(|k| schema.get(k).is_none()) {
            debug!(parameter = %name, "ignoring unknown parameter");
        }

        let mut resolved = ResolvedParams::default();
        for spec in schema.iter() {
            let value = match raw.get(spec.name) {
                None | Some(Value::Null) => spec.default.clone(),
                Some(value) => Self::coerce(spec, value)?,
            };
            resolved.insert(spec.name, value);
        }

        Ok(resolved)
    }

    /// Coerce and check a single value against its descriptor.
    pub fn coerce(spec: &ParamSpec, value: &Value) -> Result<ParamValue, TsError> {
        match spec.kind {
            ParamKind::Integer => {
                let v = Self::coerce_integer(spec.name, value)?;
                Self::validate_bounds(spec, v as f64)?;
                Ok(ParamValue::Integer(v))
            }
            ParamKind::Float => {
                let v = Self::coerce_float(spec.name, value)?;
                Self::validate_bounds(spec, v)?;
                Ok(ParamValue::Float(v))
            }
            ParamKind::String => match value {
                Value::String(s) => Ok(ParamValue::Text(s.clone())),
                other => Err(invalid(spec.name, format!("expected a string, got {other}"))),
            },
            ParamKind::Enumerated => {
                let choice = match value {
                    Value::String(s) => s.as_str(),
                    other => {
                        return Err(invalid(spec.name, format!("expected a string, got {other}")));
                    }
                };
                Self::validate_choice(spec, choice)?;
                Ok(ParamValue::Text(choice.to_string()))
            }
        }
    }

    /// Validate a numeric value against the inclusive bounds of its descriptor.
    pub fn validate_bounds(spec: &ParamSpec, value: f64) -> Result<(), TsError> {
        if let Some(min) = spec.min {
            if value < min {
                return Err(TsError::ParameterOutOfRange {
                    name: spec.name.to_string(),
                    value,
                    bound: Bound::Min(min),
                });
            }
        }
        if let Some(max) = spec.max {
            if value > max {
                return Err(TsError::ParameterOutOfRange {
                    name: spec.name.to_string(),
                    value,
                    bound: Bound::Max(max),
                });
            }
        }
        Ok(())
    }

    /// Validate that an enumerated value is one of the allowed choices.
    pub fn validate_choice(spec: &ParamSpec, value: &str) -> Result<(), TsError> {
        if spec.choices.iter().any(|c| c.value == value) {
            return Ok(());
        }
        Err(TsError::InvalidChoice {
            name: spec.name.to_string(),
            value: value.to_string(),
            allowed: spec.choice_values(),
        })
    }

    /// Validate that no parameter was set multiple times in a builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&str>) -> Result<(), TsError> {
        if let Some(name) = duplicate_param {
            return Err(invalid(name, "set multiple times".to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Coercion Helpers
    // ========================================================================

    fn coerce_integer(name: &str, value: &Value) -> Result<i64, TsError> {
        let as_float = match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i);
                }
                n.as_f64()
            }
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                s.parse::<f64>().ok()
            }
            _ => None,
        };

        match as_float {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(f as i64)
            }
            _ => Err(invalid(name, format!("expected an integer, got {value}"))),
        }
    }

    fn coerce_float(name: &str, value: &Value) -> Result<f64, TsError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(f) if f.is_finite() => Ok(f),
            _ => Err(invalid(name, format!("expected a finite number, got {value}"))),
        }
    }
}

fn invalid(name: &str, reason: String) -> TsError {
    TsError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}

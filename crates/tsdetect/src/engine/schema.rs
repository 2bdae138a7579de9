//! Parameter schemas for registered methods.
//!
//! ## Purpose
//!
//! Every registered method describes its parameters with a [`ParamSchema`].
//! The schema is the single source of truth for both validation (coercing and
//! bound-checking caller-supplied values, filling in defaults) and discovery
//! (it serializes into the catalogue served to callers).
//!
//! ## Design notes
//!
//! * **Defaults live in the schema**: Missing parameters resolve to their
//!   declared default before any algorithm sees them.
//! * **Ordered**: Parameters keep declaration order in the catalogue.
//! * **Raw vs resolved**: Callers supply loosely typed JSON ([`RawParams`]);
//!   validation produces [`ResolvedParams`] holding typed [`ParamValue`]s.
//!
//! ## Key concepts
//!
//! * **Kinds**: `integer`, `float`, `string`, `enumerated`.
//! * **Bounds**: Optional inclusive `[min, max]` for numeric kinds.
//! * **Choices**: `{label, value}` pairs for enumerated kinds.

// External dependencies
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// Internal dependencies
use crate::primitives::errors::TsError;

/// Caller-supplied parameters, keyed by name.
pub type RawParams = Map<String, Value>;

// ============================================================================
// Method Spec
// ============================================================================

/// A method reference as supplied by a caller: `{type, params}`.
///
/// Used both for pipeline stages and for detection requests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Registered method key.
    #[serde(rename = "type")]
    pub kind: String,

    /// Parameter values; missing entries take their schema default.
    #[serde(default)]
    pub params: RawParams,
}

impl MethodSpec {
    /// Reference a method with no explicit parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: RawParams::new(),
        }
    }

    /// Add a parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// One step of a preprocessing pipeline.
pub type PipelineStage = MethodSpec;

// ============================================================================
// Parameter Kinds and Values
// ============================================================================

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Whole number.
    Integer,

    /// Finite real number.
    Float,

    /// Free-form text.
    String,

    /// One of a fixed set of choices.
    Enumerated,
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer value.
    Integer(i64),

    /// Float value.
    Float(f64),

    /// Text or enumerated choice value.
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Text(_) => None,
        }
    }

    /// Integer view of the value, if integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text view of the value, if textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One allowed value of an enumerated parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Display label.
    pub label: &'static str,

    /// Wire value.
    pub value: &'static str,
}

// ============================================================================
// Parameter Spec
// ============================================================================

/// Descriptor for a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Parameter name.
    #[serde(skip)]
    pub name: &'static str,

    /// Declared kind.
    #[serde(rename = "type")]
    pub kind: ParamKind,

    /// Value used when the caller omits the parameter.
    pub default: ParamValue,

    /// Inclusive lower bound for numeric kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound for numeric kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Suggested UI increment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Allowed values for enumerated kinds.
    #[serde(rename = "options", skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,

    /// Short description.
    pub description: &'static str,
}

impl ParamSpec {
    fn base(name: &'static str, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            name,
            kind,
            default,
            min: None,
            max: None,
            step: None,
            choices: Vec::new(),
            description: "",
        }
    }

    /// Integer parameter with inclusive bounds.
    pub fn integer(name: &'static str, default: i64, min: i64, max: i64) -> Self {
        let mut spec = Self::base(name, ParamKind::Integer, ParamValue::Integer(default));
        spec.min = Some(min as f64);
        spec.max = Some(max as f64);
        spec.step = Some(1.0);
        spec
    }

    /// Float parameter with inclusive bounds.
    pub fn float(name: &'static str, default: f64, min: f64, max: f64) -> Self {
        let mut spec = Self::base(name, ParamKind::Float, ParamValue::Float(default));
        spec.min = Some(min);
        spec.max = Some(max);
        spec
    }

    /// Enumerated parameter.
    pub fn enumerated(name: &'static str, default: &'static str, choices: Vec<Choice>) -> Self {
        debug_assert!(choices.iter().any(|c| c.value == default));
        let mut spec = Self::base(
            name,
            ParamKind::Enumerated,
            ParamValue::Text(default.to_string()),
        );
        spec.choices = choices;
        spec
    }

    /// Free-form text parameter.
    pub fn text(name: &'static str, default: &'static str) -> Self {
        Self::base(name, ParamKind::String, ParamValue::Text(default.to_string()))
    }

    /// Set the suggested UI increment.
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the description.
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Wire values of the allowed choices.
    pub fn choice_values(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.value.to_string()).collect()
    }
}

// ============================================================================
// Parameter Schema
// ============================================================================

/// Ordered collection of parameter descriptors for one method.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamSchema {
    params: Vec<ParamSpec>,
}

impl ParamSchema {
    /// Build a schema from descriptors in display order.
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameters in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check whether the method takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Serialize for ParamSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for spec in &self.params {
            map.serialize_entry(spec.name, spec)?;
        }
        map.end()
    }
}

// ============================================================================
// Resolved Parameters
// ============================================================================

/// Validated parameters with defaults filled in.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResolvedParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ResolvedParams {
    pub(crate) fn insert(&mut self, name: &'static str, value: ParamValue) {
        self.values.insert(name, value);
    }

    /// Raw lookup.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Integer parameter as `usize`.
    pub fn usize(&self, name: &str) -> Result<usize, TsError> {
        self.get(name)
            .and_then(ParamValue::as_i64)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| missing(name, "a non-negative integer"))
    }

    /// Numeric parameter as `f64`.
    pub fn f64(&self, name: &str) -> Result<f64, TsError> {
        self.get(name)
            .and_then(ParamValue::as_f64)
            .ok_or_else(|| missing(name, "a number"))
    }

    /// Text or enumerated parameter.
    pub fn text(&self, name: &str) -> Result<&str, TsError> {
        self.get(name)
            .and_then(ParamValue::as_str)
            .ok_or_else(|| missing(name, "a string"))
    }

    /// Number of resolved parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn missing(name: &str, expected: &str) -> TsError {
    TsError::InvalidParameter {
        name: name.to_string(),
        reason: format!("expected {expected}"),
    }
}

//! Metric definitions and typed metric values.
//!
//! A `MetricDefinition` describes one metric a producer can report. A
//! `Metric` binds a value to its definition and knows how to render it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Granularity a metric definition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "CLASS", alias = "class")]
    Class,
    #[serde(rename = "METHOD", alias = "method")]
    Method,
}

/// Value type a metric definition produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Integer,
    Double,
    Percentage,
}

/// Immutable description of a metric
///
/// Two definitions are equal when their ids are equal, regardless of the
/// other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub reported_by: String,
    pub priority: i32,
    pub scopes: Vec<Scope>,
    pub kind: MetricKind,
}

impl MetricDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        reported_by: impl Into<String>,
        priority: i32,
        scopes: &[Scope],
        kind: MetricKind,
    ) -> Self {
        let mut scopes = scopes.to_vec();
        scopes.sort();
        scopes.dedup();

        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            reported_by: reported_by.into(),
            priority,
            scopes,
            kind,
        }
    }

    /// Whether this metric is reported at the given granularity
    pub fn valid_for_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn is_integer(&self) -> bool {
        self.kind == MetricKind::Integer
    }

    /// Display ordering: higher priority first
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

impl PartialEq for MetricDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MetricDefinition {}

impl Hash for MetricDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Typed metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Double(f64),
    /// Percentage in the range 0..=100, NaN when unknown
    Percentage(f64),
}

/// A value bound to its definition
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    definition: Arc<MetricDefinition>,
    value: MetricValue,
}

impl Metric {
    pub fn integer(definition: Arc<MetricDefinition>, value: i64) -> Self {
        Self {
            definition,
            value: MetricValue::Integer(value),
        }
    }

    pub fn double(definition: Arc<MetricDefinition>, value: f64) -> Self {
        Self {
            definition,
            value: MetricValue::Double(value),
        }
    }

    pub fn percentage(definition: Arc<MetricDefinition>, value: f64) -> Self {
        Self {
            definition,
            value: MetricValue::Percentage(value),
        }
    }

    /// Build the variant matching the definition's kind
    ///
    /// Integer metrics truncate toward zero.
    pub fn from_raw(definition: Arc<MetricDefinition>, raw: f64) -> Self {
        match definition.kind {
            MetricKind::Integer => Self::integer(definition, raw as i64),
            MetricKind::Double => Self::double(definition, raw),
            MetricKind::Percentage => Self::percentage(definition, raw),
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }

    pub fn value(&self) -> MetricValue {
        self.value
    }

    /// Numeric value for sorting and filtering
    pub fn raw_value(&self) -> f64 {
        match self.value {
            MetricValue::Integer(v) => v as f64,
            MetricValue::Double(v) | MetricValue::Percentage(v) => v,
        }
    }

    /// Display string with variant-specific rounding
    pub fn render_value(&self) -> String {
        match self.value {
            MetricValue::Integer(v) => v.to_string(),
            MetricValue::Double(v) => format!("{:.2}", v),
            MetricValue::Percentage(v) => format!("{}%", round_half_up(v)),
        }
    }
}

/// Round half up, NaN maps to 0
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

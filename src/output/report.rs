//! Output JSON schema for the aggregated metrics report.
//!
//! Schema is versioned to allow future evolution.

use super::table::{ClassRow, MeasurementTable};
use crate::aggregator::{calculate_metric_maxima, AggregatedMetrics};
use crate::model::{MetricDefinition, Scope};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when report was generated
    pub generated_at: String,

    /// Scope of the metric columns
    pub scope: Scope,

    /// Producer summary lines in registration order
    pub summary_lines: Vec<String>,

    /// Project-level totals
    pub project_metrics: Vec<ProjectMetric>,

    /// Metric columns, highest priority first
    pub supported_metrics: Vec<MetricDefinition>,

    /// Largest finite value per metric
    pub maxima: BTreeMap<String, f64>,

    /// One row per class
    pub classes: Vec<ClassRow>,
}

/// A project-level metric value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectMetric {
    pub id: String,
    pub display_name: String,
    pub value: f64,
    pub display: String,
}

impl MetricsReport {
    /// Build the report of an aggregation for one column scope
    pub fn from_aggregation(aggregated: &AggregatedMetrics, scope: Scope) -> Self {
        let columns = aggregated.supported_metrics(scope);

        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            scope,
            summary_lines: aggregated.summary_lines().to_vec(),
            project_metrics: aggregated
                .project_metrics()
                .iter()
                .map(|metric| ProjectMetric {
                    id: metric.id().to_string(),
                    display_name: metric.definition().display_name.clone(),
                    value: metric.raw_value(),
                    display: metric.render_value(),
                })
                .collect(),
            maxima: calculate_metric_maxima(aggregated.class_measurements(), &columns),
            classes: MeasurementTable::classes(&columns, aggregated.class_measurements()),
            supported_metrics: columns.iter().map(|d| d.as_ref().clone()).collect(),
        }
    }
}

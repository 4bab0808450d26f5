//! Table rows for class and method measurements.
//!
//! Every metric cell carries the raw number (for sorting and filtering)
//! and the rendered string (for display). Non-finite raw values, such as
//! missing coverage, are stored as `None` and serialize as `null`.

use crate::model::{ClassMeasurement, MeasurementBase, MethodMeasurement, MetricDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One class row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassRow {
    pub qualified_name: String,
    pub package_name: String,
    pub class_name: String,
    pub metrics_raw: BTreeMap<String, Option<f64>>,
    pub metrics_display: BTreeMap<String, String>,
}

/// One method row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodRow {
    pub method_name: String,
    pub begin_line: u32,
    pub metrics_raw: BTreeMap<String, Option<f64>>,
    pub metrics_display: BTreeMap<String, String>,
}

/// Rows for the given columns
pub struct MeasurementTable;

impl MeasurementTable {
    /// One row per class, restricted to the `columns` metrics
    pub fn classes<'a>(
        columns: &[Arc<MetricDefinition>],
        classes: impl Iterator<Item = &'a ClassMeasurement>,
    ) -> Vec<ClassRow> {
        classes
            .map(|class| {
                let (metrics_raw, metrics_display) = cells(columns, &class.base);
                ClassRow {
                    qualified_name: class.base.qualified_class_name(),
                    package_name: class.base.package_name.clone(),
                    class_name: class.base.class_name.clone(),
                    metrics_raw,
                    metrics_display,
                }
            })
            .collect()
    }

    /// One row per method name of `class`, ordered by first line
    ///
    /// Methods sharing a name are merged into one row; later values win.
    pub fn methods_of(columns: &[Arc<MetricDefinition>], class: &ClassMeasurement) -> Vec<MethodRow> {
        let mut grouped: BTreeMap<&str, Vec<&MethodMeasurement>> = BTreeMap::new();
        for method in class.methods() {
            grouped.entry(method.method_name.as_str()).or_default().push(method);
        }

        let mut rows: Vec<MethodRow> = grouped
            .into_iter()
            .map(|(name, methods)| {
                let mut metrics_raw = BTreeMap::new();
                let mut metrics_display = BTreeMap::new();
                for method in &methods {
                    let (raw, display) = cells(columns, &method.base);
                    metrics_raw.extend(raw);
                    metrics_display.extend(display);
                }
                MethodRow {
                    method_name: name.to_string(),
                    begin_line: methods
                        .iter()
                        .map(|m| m.begin_line)
                        .filter(|&line| line > 0)
                        .min()
                        .unwrap_or(0),
                    metrics_raw,
                    metrics_display,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            a.begin_line
                .cmp(&b.begin_line)
                .then_with(|| a.method_name.cmp(&b.method_name))
        });
        rows
    }
}

/// Display name to rendered value for every metric of the class
pub fn class_overview(
    columns: &[Arc<MetricDefinition>],
    class: &ClassMeasurement,
) -> BTreeMap<String, String> {
    columns
        .iter()
        .filter_map(|definition| {
            class
                .base
                .metric(&definition.id)
                .map(|metric| (definition.display_name.clone(), metric.render_value()))
        })
        .collect()
}

fn cells(
    columns: &[Arc<MetricDefinition>],
    base: &MeasurementBase,
) -> (BTreeMap<String, Option<f64>>, BTreeMap<String, String>) {
    let mut raw = BTreeMap::new();
    let mut display = BTreeMap::new();
    for definition in columns {
        if let Some(metric) = base.metric(&definition.id) {
            let value = metric.raw_value();
            raw.insert(definition.id.clone(), value.is_finite().then_some(value));
            display.insert(definition.id.clone(), metric.render_value());
        }
    }
    (raw, display)
}

//! Derived statistics over aggregated measurements.
//!
//! - Per-metric maxima (used to scale table columns)
//! - Scatter plot points comparing two metrics
//! - Distribution summary of a single metric

use crate::model::{ClassMeasurement, MetricDefinition};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum finite value per metric across class measurements
///
/// # Arguments
/// * `classes` - Class measurements
/// * `definitions` - Metrics to compute maxima for
///
/// # Returns
/// Map from metric id to its maximum; 0 when no class has a finite value
pub fn calculate_metric_maxima<'a>(
    classes: impl Iterator<Item = &'a ClassMeasurement> + Clone,
    definitions: &[Arc<MetricDefinition>],
) -> BTreeMap<String, f64> {
    debug!("Calculating maxima for {} metrics", definitions.len());

    definitions
        .iter()
        .map(|definition| {
            let max = classes
                .clone()
                .map(|class| class.base.metric_value(&definition.id).unwrap_or(0.0))
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
                .unwrap_or(0.0);
            (definition.id.clone(), max)
        })
        .collect()
}

/// One point of a two-metric scatter plot
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScatterPoint {
    /// Class name
    pub name: String,

    /// `[x, y]`; missing values are NaN and serialize as `null`
    pub value: [f64; 2],
}

/// Scatter plot of two metrics, one point per class
pub fn scatter_plot<'a>(
    classes: impl Iterator<Item = &'a ClassMeasurement>,
    x_metric: &str,
    y_metric: &str,
) -> Vec<ScatterPoint> {
    classes
        .map(|class| ScatterPoint {
            name: class.base.class_name.clone(),
            value: [
                class.base.metric_value(x_metric).unwrap_or(f64::NAN),
                class.base.metric_value(y_metric).unwrap_or(f64::NAN),
            ],
        })
        .collect()
}

/// Calculate distribution statistics of finite metric values
pub fn calculate_distribution(values: &[f64]) -> MetricDistribution {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return MetricDistribution::default();
    }

    finite.sort_by(f64::total_cmp);

    let count = finite.len();
    let total: f64 = finite.iter().sum();

    MetricDistribution {
        count,
        total,
        mean: total / count as f64,
        median: finite[count / 2],
        min: finite[0],
        max: finite[count - 1],
    }
}

/// Distribution statistics of one metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricDistribution {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricDistribution {
    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Samples: {} | Total: {:.2} | Mean: {:.2} | Median: {:.2} | Range: {:.2} - {:.2}",
            self.count, self.total, self.mean, self.median, self.min, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metric, MetricKind, Scope};

    fn def(id: &str) -> Arc<MetricDefinition> {
        Arc::new(MetricDefinition::new(
            id,
            id,
            "",
            "test",
            10,
            &[Scope::Class],
            MetricKind::Double,
        ))
    }

    fn class(name: &str, metrics: &[(&str, f64)]) -> ClassMeasurement {
        let mut class = ClassMeasurement::new("", "com.example", name);
        for (id, value) in metrics {
            class.base.add_metric(Metric::double(def(id), *value));
        }
        class
    }

    #[test]
    fn test_calculate_metric_maxima() {
        let classes = vec![
            class("A", &[("LOC", 10.0), ("COV", f64::NAN)]),
            class("B", &[("LOC", 30.0)]),
        ];

        let maxima = calculate_metric_maxima(classes.iter(), &[def("LOC"), def("COV"), def("WMC")]);

        assert_eq!(maxima["LOC"], 30.0);
        assert_eq!(maxima["COV"], 0.0);
        assert_eq!(maxima["WMC"], 0.0);
    }

    #[test]
    fn test_scatter_plot() {
        let classes = vec![class("A", &[("LOC", 10.0), ("WMC", 2.0)]), class("B", &[("LOC", 5.0)])];

        let points = scatter_plot(classes.iter(), "LOC", "WMC");

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, [10.0, 2.0]);
        assert!(points[1].value[1].is_nan());

        let json = serde_json::to_string(&points[1]).unwrap();
        assert_eq!(json, r#"{"name":"B","value":[5.0,null]}"#);
    }

    #[test]
    fn test_calculate_distribution() {
        let dist = calculate_distribution(&[4.0, 1.0, f64::NAN, 10.0, 5.0]);

        assert_eq!(dist.count, 4);
        assert_eq!(dist.total, 20.0);
        assert_eq!(dist.mean, 5.0);
        assert_eq!(dist.median, 5.0);
        assert_eq!(dist.min, 1.0);
        assert_eq!(dist.max, 10.0);
    }

    #[test]
    fn test_distribution_empty() {
        let dist = calculate_distribution(&[]);
        assert_eq!(dist.count, 0);
        assert_eq!(dist.total, 0.0);
    }
}

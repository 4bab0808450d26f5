//! Producer contract and the per-producer result bundle.

use crate::model::{Metric, MetricDefinition, MetricsMeasurement};
use crate::parser::{BuildOutput, OutputKind};
use std::sync::Arc;

/// A source of measurements for one kind of build output
///
/// The aggregator only hands a producer the outputs whose kind equals
/// `accepts()`. Both methods must cope with an empty slice.
pub trait MetricsProducer {
    /// Name reported with the measurements
    fn origin(&self) -> &str;

    /// Kind of build output this producer consumes
    fn accepts(&self) -> OutputKind;

    /// Build measurements, summary lines and project metrics
    fn produce(&self, outputs: &[&BuildOutput]) -> MetricsProvider;

    /// Metric definitions this producer reports for `outputs`
    ///
    /// Empty when `outputs` is empty.
    fn supported_metrics(&self, outputs: &[&BuildOutput]) -> Vec<Arc<MetricDefinition>>;
}

/// Everything one producer contributed to an aggregation
#[derive(Debug, Clone, Default)]
pub struct MetricsProvider {
    origin: String,
    measurements: Vec<MetricsMeasurement>,
    summary_lines: Vec<String>,
    project_metrics: Vec<Metric>,
}

impl MetricsProvider {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    pub fn with_measurements(mut self, measurements: Vec<MetricsMeasurement>) -> Self {
        self.measurements = measurements;
        self
    }

    pub fn add_summary_line(&mut self, line: impl Into<String>) {
        self.summary_lines.push(line.into());
    }

    pub fn add_project_metric(&mut self, metric: Metric) {
        self.project_metrics.push(metric);
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn measurements(&self) -> &[MetricsMeasurement] {
        &self.measurements
    }

    pub fn summary_lines(&self) -> &[String] {
        &self.summary_lines
    }

    pub fn project_metrics(&self) -> &[Metric] {
        &self.project_metrics
    }

    /// Split into measurements, summary lines and project metrics
    pub fn into_parts(self) -> (Vec<MetricsMeasurement>, Vec<String>, Vec<Metric>) {
        (self.measurements, self.summary_lines, self.project_metrics)
    }
}

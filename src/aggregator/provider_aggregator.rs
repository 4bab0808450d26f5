//! Cross-producer aggregation.
//!
//! `ProviderAggregator` owns an explicit list of producers. For a batch of
//! build outputs it routes each producer its matching outputs, merges all
//! measurements by qualified class name and unions the metric catalogs.

use super::merger::merge_measurements;
use super::provider::MetricsProducer;
use crate::model::{
    ClassMeasurement, Metric, MetricCatalog, MetricDefinition, MetricsMeasurement, Scope,
};
use crate::parser::BuildOutput;
use crate::producers::{AnalyzerProducer, CoverageProducer, WarningsProducer};
use log::{debug, info};
use std::sync::Arc;

/// Runs producers and combines their results
pub struct ProviderAggregator {
    producers: Vec<Box<dyn MetricsProducer>>,
}

impl ProviderAggregator {
    /// Create an aggregator over the given producers
    ///
    /// Summary lines and catalog ties follow this registration order.
    pub fn new(producers: Vec<Box<dyn MetricsProducer>>) -> Self {
        Self { producers }
    }

    /// Aggregator wired with the built-in analyzer, coverage and warnings producers
    pub fn with_default_producers() -> Self {
        Self::new(vec![
            Box::new(AnalyzerProducer::new()),
            Box::new(CoverageProducer::new()),
            Box::new(WarningsProducer::new()),
        ])
    }

    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    /// Aggregate a batch of build outputs
    ///
    /// # Algorithm
    /// 1. For each producer, select the outputs of its declared kind
    /// 2. Collect measurements, summary lines, project metrics and catalog
    /// 3. Merge all measurements by qualified class name
    pub fn aggregate(&self, outputs: &[BuildOutput]) -> AggregatedMetrics {
        let mut measurements = Vec::new();
        let mut summary_lines = Vec::new();
        let mut project_metrics = Vec::new();
        let mut catalog = MetricCatalog::new();

        for producer in &self.producers {
            let matching: Vec<&BuildOutput> = outputs
                .iter()
                .filter(|output| output.kind() == producer.accepts())
                .collect();

            debug!(
                "Producer {} receives {} of {} outputs",
                producer.origin(),
                matching.len(),
                outputs.len()
            );

            for definition in producer.supported_metrics(&matching) {
                catalog.register(definition);
            }

            let (produced, lines, metrics) = producer.produce(&matching).into_parts();
            info!(
                "{}: {} measurements, {} summary lines",
                producer.origin(),
                produced.len(),
                lines.len()
            );

            measurements.extend(produced);
            summary_lines.extend(lines);
            project_metrics.extend(metrics);
        }

        let measurements = merge_measurements(measurements);

        AggregatedMetrics {
            measurements,
            catalog,
            summary_lines,
            project_metrics,
        }
    }
}

impl Default for ProviderAggregator {
    fn default() -> Self {
        Self::with_default_producers()
    }
}

/// Canonical result of one aggregation request
#[derive(Debug, Clone, Default)]
pub struct AggregatedMetrics {
    measurements: Vec<MetricsMeasurement>,
    catalog: MetricCatalog,
    summary_lines: Vec<String>,
    project_metrics: Vec<Metric>,
}

impl AggregatedMetrics {
    /// Merged measurements sorted by qualified class name
    pub fn measurements(&self) -> &[MetricsMeasurement] {
        &self.measurements
    }

    /// Class measurements only; bare methods without a class are skipped
    pub fn class_measurements(&self) -> impl Iterator<Item = &ClassMeasurement> + Clone {
        self.measurements.iter().filter_map(MetricsMeasurement::as_class)
    }

    pub fn find_class(&self, qualified_class_name: &str) -> Option<&ClassMeasurement> {
        self.class_measurements()
            .find(|class| class.base.qualified_class_name() == qualified_class_name)
    }

    /// Supported metrics for `scope`, highest priority first
    pub fn supported_metrics(&self, scope: Scope) -> Vec<Arc<MetricDefinition>> {
        self.catalog.for_scope(scope)
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn definition(&self, id: &str) -> Option<&Arc<MetricDefinition>> {
        self.catalog.get(id)
    }

    /// Summary lines in producer registration order
    pub fn summary_lines(&self) -> &[String] {
        &self.summary_lines
    }

    pub fn project_metrics(&self) -> &[Metric] {
        &self.project_metrics
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Finite values of one metric, ready for binning
    ///
    /// Metrics reported only for methods are collected from every method
    /// measurement; all others from class measurements.
    pub fn values_for(&self, metric_id: &str) -> Vec<f64> {
        let method_only = self
            .definition(metric_id)
            .map(|d| d.valid_for_scope(Scope::Method) && !d.valid_for_scope(Scope::Class))
            .unwrap_or(false);

        let values: Box<dyn Iterator<Item = Option<f64>> + '_> = if method_only {
            Box::new(self.measurements.iter().flat_map(|m| match m {
                MetricsMeasurement::Class(class) => class
                    .methods()
                    .iter()
                    .map(|method| method.base.metric_value(metric_id))
                    .collect::<Vec<_>>(),
                MetricsMeasurement::Method(method) => vec![method.base.metric_value(metric_id)],
            }))
        } else {
            Box::new(
                self.class_measurements()
                    .map(|class| class.base.metric_value(metric_id)),
            )
        };

        values.flatten().filter(|v| v.is_finite()).collect()
    }
}

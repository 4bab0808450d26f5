//! Producer for static analyzer metric reports.
//!
//! Violations are parsed into measurements, merged per class and summarized
//! as project totals (classes, lines of code, statements).

use crate::aggregator::{merge_measurements, MetricsProducer, MetricsProvider};
use crate::model::{Metric, MetricCatalog, MetricDefinition, MetricKind, MetricsMeasurement, Scope};
use crate::parser::{parse_violation, AnalyzerReport, BuildOutput, OutputKind};
use log::{debug, error, warn};
use std::sync::Arc;

pub const ANALYZER_ORIGIN: &str = "metrics-aggregator (pmd)";

/// Parses analyzer reports into class and method measurements
pub struct AnalyzerProducer {
    catalog: MetricCatalog,
    classes: Arc<MetricDefinition>,
}

impl AnalyzerProducer {
    pub fn new() -> Self {
        Self {
            catalog: analyzer_metrics().into_iter().collect(),
            classes: Arc::new(MetricDefinition::new(
                "CLASSES",
                "Classes",
                "Number of classes.",
                ANALYZER_ORIGIN,
                100,
                &[],
                MetricKind::Integer,
            )),
        }
    }

    fn parse_report(&self, report: &AnalyzerReport) -> Vec<MetricsMeasurement> {
        for failure in &report.processing_errors {
            error!("Analyzer failed to process {}: {}", failure.file, failure.detail);
        }
        for failure in &report.configuration_errors {
            error!("Analyzer rule {} misconfigured: {}", failure.rule, failure.issue);
        }

        report
            .violations
            .iter()
            .enumerate()
            .filter_map(|(index, violation)| match parse_violation(violation, &self.catalog) {
                Ok(measurement) => Some(measurement),
                Err(e) => {
                    warn!(
                        "Failed to parse violation {} in {}: {}",
                        index, violation.filename, e
                    );
                    None
                }
            })
            .collect()
    }

    /// Every metric this producer can report
    pub fn metrics(&self) -> Vec<Arc<MetricDefinition>> {
        let mut metrics = self.catalog.definitions().to_vec();
        metrics.push(self.classes.clone());
        metrics
    }

    fn definition(&self, id: &str) -> Option<Arc<MetricDefinition>> {
        self.catalog.get(id).cloned()
    }
}

impl Default for AnalyzerProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProducer for AnalyzerProducer {
    fn origin(&self) -> &str {
        ANALYZER_ORIGIN
    }

    fn accepts(&self) -> OutputKind {
        OutputKind::Analyzer
    }

    fn produce(&self, outputs: &[&BuildOutput]) -> MetricsProvider {
        let parsed: Vec<MetricsMeasurement> = outputs
            .iter()
            .filter_map(|output| match output {
                BuildOutput::AnalyzerReport(report) => Some(self.parse_report(report)),
                _ => None,
            })
            .flatten()
            .collect();

        debug!("Parsed {} analyzer measurements", parsed.len());

        let measurements = merge_measurements(parsed);
        let mut provider = MetricsProvider::new(ANALYZER_ORIGIN);

        let classes: Vec<_> = measurements
            .iter()
            .filter_map(MetricsMeasurement::as_class)
            .collect();
        let sum = |id: &str| -> f64 {
            classes
                .iter()
                .map(|class| class.base.metric_value(id).unwrap_or(0.0))
                .sum()
        };

        let class_count = classes.len();
        let total_loc = sum("LOC");
        let total_ncss = sum("NCSS");

        if class_count > 0 {
            provider.add_summary_line(format!("{} Classes", class_count));
            provider.add_project_metric(Metric::integer(self.classes.clone(), class_count as i64));
        }

        if total_loc > 0.0 {
            provider.add_summary_line(format!("{} Lines of Code", total_loc as i64));
            if let Some(loc) = self.definition("LOC") {
                provider.add_project_metric(Metric::integer(loc, total_loc as i64));
            }
        }

        if total_ncss > 0.0 {
            let share = if total_loc > 0.0 {
                total_ncss / total_loc * 100.0
            } else {
                0.0
            };
            provider.add_summary_line(format!(
                "{} Non-Commenting Source Statements ({:.1}%)",
                total_ncss as i64, share
            ));
            if let Some(ncss) = self.definition("NCSS") {
                provider.add_project_metric(Metric::integer(ncss, total_ncss as i64));
            }
        }

        provider.with_measurements(measurements)
    }

    fn supported_metrics(&self, outputs: &[&BuildOutput]) -> Vec<Arc<MetricDefinition>> {
        if outputs.is_empty() {
            return Vec::new();
        }
        self.metrics()
    }
}

/// Metrics the analyzer reports
pub fn analyzer_metrics() -> Vec<Arc<MetricDefinition>> {
    use MetricKind::{Double, Integer};
    use Scope::{Class, Method};

    [
        (
            "ATFD",
            "Access to Foreign Data",
            "Number of usages of foreign attributes, both directly and through accessors.",
            20,
            &[Method, Class][..],
            Integer,
        ),
        (
            "CLASS_FAN_OUT",
            "Class Fan Out Complexity",
            "Counts the number of other classes a given class or operation relies on.",
            20,
            &[Method, Class][..],
            Integer,
        ),
        (
            "CYCLO",
            "Cyclomatic Complexity",
            "Number of independent paths through a block of code.",
            20,
            &[Method][..],
            Integer,
        ),
        (
            "LOC",
            "Lines of Code",
            "Number of lines of code the operation or class takes up in the source.",
            5,
            &[Method, Class][..],
            Integer,
        ),
        (
            "NCSS",
            "Non-commenting source statements",
            "Number of statements in a class or operation, ignoring comments and blank lines.",
            5,
            &[Method, Class][..],
            Integer,
        ),
        (
            "NPATH",
            "NPath complexity",
            "Number of acyclic execution paths through a piece of code.",
            20,
            &[Method][..],
            Integer,
        ),
        ("NOAM", "Number of Accessor Methods", "", 20, &[Class][..], Integer),
        ("NOPA", "Number of Public Attributes", "", 20, &[Class][..], Integer),
        (
            "TCC",
            "Tight Class Cohesion",
            "Relative number of method pairs that access at least one common attribute.",
            20,
            &[Class][..],
            Double,
        ),
        (
            "WMC",
            "Weighted Method Count",
            "Sum of the cyclomatic complexity of the operations in the class.",
            20,
            &[Class][..],
            Integer,
        ),
        (
            "WOC",
            "Weight of Class",
            "Number of functional public methods divided by the total number of public methods.",
            20,
            &[Class][..],
            Double,
        ),
    ]
    .into_iter()
    .map(|(id, name, description, priority, scopes, kind)| {
        Arc::new(MetricDefinition::new(
            id,
            name,
            description,
            ANALYZER_ORIGIN,
            priority,
            scopes,
            kind,
        ))
    })
    .collect()
}

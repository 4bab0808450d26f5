//! Producer for static analysis warnings and source-control statistics.
//!
//! Issues are grouped by file; each file becomes one class measurement with
//! per-severity counts plus the file's author and commit counts.

use crate::aggregator::{MetricsProducer, MetricsProvider};
use crate::model::{ClassMeasurement, Metric, MetricDefinition, MetricKind, MetricsMeasurement, Scope};
use crate::parser::{BuildOutput, FileStatistics, Issue, OutputKind, Severity};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const WARNINGS_ORIGIN: &str = "warnings";
pub const FORENSICS_ORIGIN: &str = "forensics";

/// Counts issues per class and attaches forensics statistics
pub struct WarningsProducer {
    errors: Arc<MetricDefinition>,
    high: Arc<MetricDefinition>,
    normal: Arc<MetricDefinition>,
    low: Arc<MetricDefinition>,
    authors: Arc<MetricDefinition>,
    commits: Arc<MetricDefinition>,
}

impl WarningsProducer {
    pub fn new() -> Self {
        let warning = |id: &str, name: &str, description: &str| {
            Arc::new(MetricDefinition::new(
                id,
                name,
                description,
                WARNINGS_ORIGIN,
                10,
                &[Scope::Method, Scope::Class],
                MetricKind::Integer,
            ))
        };
        let forensic = |id: &str, name: &str, description: &str| {
            Arc::new(MetricDefinition::new(
                id,
                name,
                description,
                FORENSICS_ORIGIN,
                20,
                &[Scope::Class],
                MetricKind::Integer,
            ))
        };

        Self {
            errors: warning("ERRORS", "Errors", "An error, e.g. a compile error."),
            high: warning("WARNING_HIGH", "Warning (high)", "A warning with priority high."),
            normal: warning("WARNING_NORMAL", "Warning (normal)", "A warning with priority normal."),
            low: warning("WARNING_LOW", "Warning (low)", "A warning with priority low."),
            authors: forensic("AUTHORS", "Authors", "The number of unique authors for this file."),
            commits: forensic("COMMITS", "Commits", "The number of commits for this file."),
        }
    }

    /// Every metric this producer can report
    pub fn metrics(&self) -> Vec<Arc<MetricDefinition>> {
        vec![
            self.errors.clone(),
            self.high.clone(),
            self.normal.clone(),
            self.low.clone(),
            self.authors.clone(),
            self.commits.clone(),
        ]
    }

    fn file_measurement(
        &self,
        file_name: &str,
        issues: &[&Issue],
        statistics: Option<&FileStatistics>,
    ) -> Option<MetricsMeasurement> {
        let first = issues.first()?;
        let class_name = first
            .base_name
            .strip_suffix(".java")
            .unwrap_or(&first.base_name);

        let mut measurement = ClassMeasurement::new(file_name, &first.package_name, class_name);
        let counts = SeverityCounts::from_issues(issues.iter().copied());

        measurement.base.add_metric(Metric::integer(self.errors.clone(), counts.errors));
        measurement.base.add_metric(Metric::integer(self.high.clone(), counts.high));
        measurement.base.add_metric(Metric::integer(self.normal.clone(), counts.normal));
        measurement.base.add_metric(Metric::integer(self.low.clone(), counts.low));

        let statistics = statistics.copied().unwrap_or_default();
        measurement
            .base
            .add_metric(Metric::integer(self.authors.clone(), i64::from(statistics.authors)));
        measurement
            .base
            .add_metric(Metric::integer(self.commits.clone(), i64::from(statistics.commits)));

        Some(measurement.into())
    }
}

impl Default for WarningsProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProducer for WarningsProducer {
    fn origin(&self) -> &str {
        WARNINGS_ORIGIN
    }

    fn accepts(&self) -> OutputKind {
        OutputKind::Warnings
    }

    fn produce(&self, outputs: &[&BuildOutput]) -> MetricsProvider {
        if outputs.is_empty() {
            return MetricsProvider::new(WARNINGS_ORIGIN);
        }

        let mut issues: Vec<&Issue> = Vec::new();
        let mut forensics: HashMap<&str, FileStatistics> = HashMap::new();

        for output in outputs {
            if let BuildOutput::WarningsReport(report) = output {
                issues.extend(report.issues.iter());
                for (file, statistics) in &report.forensics {
                    forensics.insert(file.as_str(), *statistics);
                }
            }
        }

        let totals = SeverityCounts::from_issues(issues.iter().copied());
        let mut provider = MetricsProvider::new(WARNINGS_ORIGIN);
        provider.add_summary_line(format!("{} Errors", totals.errors));
        provider.add_summary_line(format!(
            "{} Warnings ({} high, {} normal, {} low)",
            totals.high + totals.normal + totals.low,
            totals.high,
            totals.normal,
            totals.low
        ));

        let mut by_file: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
        for issue in issues {
            by_file.entry(issue.file_name.as_str()).or_default().push(issue);
        }

        let measurements: Vec<MetricsMeasurement> = by_file
            .iter()
            .filter_map(|(file, issues)| self.file_measurement(file, issues, forensics.get(file)))
            .collect();

        debug!("Counted warnings for {} files", measurements.len());

        provider.with_measurements(measurements)
    }

    fn supported_metrics(&self, outputs: &[&BuildOutput]) -> Vec<Arc<MetricDefinition>> {
        if outputs.is_empty() {
            return Vec::new();
        }
        self.metrics()
    }
}

#[derive(Debug, Default)]
struct SeverityCounts {
    errors: i64,
    high: i64,
    normal: i64,
    low: i64,
}

impl SeverityCounts {
    fn from_issues<'a>(issues: impl Iterator<Item = &'a Issue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Error => counts.errors += 1,
                Severity::WarningHigh => counts.high += 1,
                Severity::WarningNormal => counts.normal += 1,
                Severity::WarningLow => counts.low += 1,
            }
        }
        counts
    }
}

//! Producer for code coverage reports.
//!
//! Class and method nodes of a coverage tree become measurements carrying
//! percentage metrics. Class names arrive in path form (`com/example/Foo`)
//! and are normalized to dotted form.

use crate::aggregator::{MetricsProducer, MetricsProvider};
use crate::model::{
    ClassMeasurement, MeasurementBase, Metric, MetricDefinition, MetricKind, MethodMeasurement,
    MetricsMeasurement, Scope,
};
use crate::parser::{BuildOutput, CoverageCounter, CoverageElement, CoverageNode, OutputKind, Ratio};
use log::debug;
use std::sync::Arc;

pub const COVERAGE_ORIGIN: &str = "code-coverage";

const COVERAGE_PRIORITY: i32 = 30;

/// Turns coverage trees into percentage metrics
pub struct CoverageProducer {
    method: Arc<MetricDefinition>,
    instruction: Arc<MetricDefinition>,
    conditional: Arc<MetricDefinition>,
    line: Arc<MetricDefinition>,
}

impl CoverageProducer {
    pub fn new() -> Self {
        let definition = |id: &str, name: &str, description: &str, scopes: &[Scope]| {
            Arc::new(MetricDefinition::new(
                id,
                name,
                description,
                COVERAGE_ORIGIN,
                COVERAGE_PRIORITY,
                scopes,
                MetricKind::Percentage,
            ))
        };

        Self {
            method: definition(
                "METHOD_COVERAGE",
                "Method coverage",
                "The percentage of methods in a class that are covered by tests.",
                &[Scope::Class],
            ),
            instruction: definition(
                "INSTRUCTION_COVERAGE",
                "Instruction coverage",
                "The percentage of instructions that are covered by tests.",
                &[Scope::Method, Scope::Class],
            ),
            conditional: definition(
                "CONDITIONAL_COVERAGE",
                "Conditional coverage",
                "The percentage of conditions that are covered by tests.",
                &[Scope::Method, Scope::Class],
            ),
            line: definition(
                "LINE_COVERAGE",
                "Line coverage",
                "The percentage of lines that are covered by tests.",
                &[Scope::Method, Scope::Class],
            ),
        }
    }

    /// Every metric this producer can report
    pub fn metrics(&self) -> Vec<Arc<MetricDefinition>> {
        vec![
            self.method.clone(),
            self.instruction.clone(),
            self.conditional.clone(),
            self.line.clone(),
        ]
    }

    /// Walk the tree depth-first, emitting class and method measurements
    fn collect(&self, node: &CoverageNode, parent: Option<&str>, out: &mut Vec<MetricsMeasurement>) {
        match node.element {
            CoverageElement::Class => {
                let (package, class) = split_class_name(&node.name);
                let mut measurement = ClassMeasurement::new("", package, class);
                measurement
                    .base
                    .add_metric(Metric::percentage(self.method.clone(), coverage(node, CoverageCounter::Method)));
                self.add_common_metrics(&mut measurement.base, node);
                out.push(measurement.into());
            }
            CoverageElement::Method => match parent {
                Some(parent) => {
                    let (package, class) = split_class_name(parent);
                    let name = node.name.replace("<init>", class);
                    let mut measurement = MethodMeasurement::new("", package, class, name);
                    self.add_common_metrics(&mut measurement.base, node);
                    out.push(measurement.into());
                }
                None => debug!("Skipping method {} without enclosing class", node.name),
            },
            _ => {}
        }

        let parent = if node.element == CoverageElement::Class {
            Some(node.name.as_str())
        } else {
            parent
        };
        for child in &node.children {
            self.collect(child, parent, out);
        }
    }

    fn add_common_metrics(&self, base: &mut MeasurementBase, node: &CoverageNode) {
        base.add_metric(Metric::percentage(
            self.instruction.clone(),
            coverage(node, CoverageCounter::Instruction),
        ));
        base.add_metric(Metric::percentage(
            self.conditional.clone(),
            coverage(node, CoverageCounter::Conditional),
        ));
        base.add_metric(Metric::percentage(self.line.clone(), coverage(node, CoverageCounter::Line)));
    }
}

impl Default for CoverageProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProducer for CoverageProducer {
    fn origin(&self) -> &str {
        COVERAGE_ORIGIN
    }

    fn accepts(&self) -> OutputKind {
        OutputKind::Coverage
    }

    fn produce(&self, outputs: &[&BuildOutput]) -> MetricsProvider {
        let mut measurements = Vec::new();
        let mut class_ratio: Option<Ratio> = None;

        for output in outputs {
            if let BuildOutput::CoverageReport(report) = output {
                self.collect(&report.root, None, &mut measurements);
                if let Some(ratio) = report.root.ratios.get(&CoverageCounter::Class) {
                    class_ratio = Some(class_ratio.map_or(*ratio, |acc| acc + *ratio));
                }
            }
        }

        debug!("Collected {} coverage measurements", measurements.len());

        let mut provider = MetricsProvider::new(COVERAGE_ORIGIN);
        if let Some(ratio) = class_ratio.filter(|r| r.total > 0) {
            provider.add_summary_line(format!(
                "Class Coverage: {} Classes ({}%)",
                ratio,
                ratio.percentage() as i64
            ));
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

/// Percentage for one counter, NaN when the node lacks it
fn coverage(node: &CoverageNode, counter: CoverageCounter) -> f64 {
    node.ratios
        .get(&counter)
        .map(Ratio::percentage)
        .unwrap_or(f64::NAN)
}

/// Split `com/example/Foo` into (`com.example`, `Foo`)
fn split_class_name(name: &str) -> (String, &str) {
    let simple = name.rsplit(['/', '.']).next().unwrap_or(name);
    let package = name[..name.len() - simple.len()]
        .trim_end_matches(['/', '.'])
        .replace('/', ".");
    (package, simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CoverageReport;

    fn report() -> BuildOutput {
        let method = CoverageNode::new("<init>", CoverageElement::Method)
            .with_ratio(CoverageCounter::Line, Ratio::new(2, 2))
            .with_ratio(CoverageCounter::Instruction, Ratio::new(5, 5));
        let other = CoverageNode::new("run(int)", CoverageElement::Method)
            .with_ratio(CoverageCounter::Line, Ratio::new(1, 4));
        let class = CoverageNode::new("com/example/Foo", CoverageElement::Class)
            .with_ratio(CoverageCounter::Method, Ratio::new(1, 2))
            .with_ratio(CoverageCounter::Line, Ratio::new(3, 6))
            .with_child(method)
            .with_child(other);
        let root = CoverageNode::new("project", CoverageElement::Report)
            .with_ratio(CoverageCounter::Class, Ratio::new(1, 2))
            .with_child(
                CoverageNode::new("com/example", CoverageElement::Package)
                    .with_child(CoverageNode::new("Foo.java", CoverageElement::File).with_child(class)),
            );

        BuildOutput::CoverageReport(CoverageReport { root })
    }

    #[test]
    fn test_split_class_name() {
        assert_eq!(split_class_name("com/example/Foo"), ("com.example".to_string(), "Foo"));
        assert_eq!(split_class_name("com.example.Foo"), ("com.example".to_string(), "Foo"));
        assert_eq!(split_class_name("Foo"), (String::new(), "Foo"));
    }

    #[test]
    fn test_produce_class_and_methods() {
        let output = report();
        let provider = CoverageProducer::new().produce(&[&output]);

        let measurements = provider.measurements();
        assert_eq!(measurements.len(), 3);

        let class = measurements[0].as_class().unwrap();
        assert_eq!(class.base.qualified_class_name(), "com.example.Foo");
        assert_eq!(class.base.metric_value("METHOD_COVERAGE"), Some(50.0));
        assert_eq!(class.base.metric("LINE_COVERAGE").unwrap().render_value(), "50%");
        assert!(class.base.metric_value("CONDITIONAL_COVERAGE").unwrap().is_nan());

        match &measurements[1] {
            MetricsMeasurement::Method(method) => {
                assert_eq!(method.method_name, "Foo");
                assert_eq!(method.base.qualified_class_name(), "com.example.Foo");
                assert_eq!(method.base.metric_value("LINE_COVERAGE"), Some(100.0));
            }
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_class_coverage_summary() {
        let first = report();
        let second = report();
        let provider = CoverageProducer::new().produce(&[&first, &second]);

        assert_eq!(
            provider.summary_lines(),
            &["Class Coverage: 2/4 Classes (50%)".to_string()]
        );
    }

    #[test]
    fn test_empty_outputs() {
        let producer = CoverageProducer::new();
        assert!(producer.produce(&[]).summary_lines().is_empty());
        assert!(producer.supported_metrics(&[]).is_empty());

        let output = report();
        assert_eq!(producer.supported_metrics(&[&output]).len(), 4);
    }
}

//! Class and method measurements and their merge algebra.
//!
//! Producers emit `MetricsMeasurement`s that share a qualified class name
//! whenever they describe the same type. `merge` combines two measurements
//! of the same type into one:
//!
//! | receiver | other  | result                                   |
//! |----------|--------|------------------------------------------|
//! | Class    | Class  | metrics unioned, other's methods adopted |
//! | Class    | Method | method becomes a child of the class      |
//! | Method   | Method | metrics unioned                          |
//! | Method   | Class  | receiver unchanged                       |

use super::metric::Metric;
use crate::utils::config::QUALIFIED_NAME_SEPARATOR;
use std::collections::BTreeMap;

/// Location and metric fields shared by both measurement variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementBase {
    pub file_name: String,
    pub package_name: String,
    pub class_name: String,
    metrics: BTreeMap<String, Metric>,
}

impl MeasurementBase {
    pub fn new(
        file_name: impl Into<String>,
        package_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            package_name: package_name.into(),
            class_name: class_name.into(),
            metrics: BTreeMap::new(),
        }
    }

    /// `package + "." + class`, the merge key
    pub fn qualified_class_name(&self) -> String {
        format!(
            "{}{}{}",
            self.package_name, QUALIFIED_NAME_SEPARATOR, self.class_name
        )
    }

    /// Add a metric, replacing any metric with the same id
    pub fn add_metric(&mut self, metric: Metric) {
        self.metrics.insert(metric.id().to_string(), metric);
    }

    pub fn metric(&self, id: &str) -> Option<&Metric> {
        self.metrics.get(id)
    }

    /// Raw value of a metric, if present
    pub fn metric_value(&self, id: &str) -> Option<f64> {
        self.metrics.get(id).map(Metric::raw_value)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.values()
    }

    pub fn metric_ids(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    /// Union with another base; the other's metrics win on collision
    fn absorb(&mut self, other: MeasurementBase) {
        if self.file_name.is_empty() {
            self.file_name = other.file_name;
        }
        self.metrics.extend(other.metrics);
    }
}

/// Measurement of a single method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodMeasurement {
    pub base: MeasurementBase,
    pub method_name: String,
    pub begin_line: u32,
    pub begin_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl MethodMeasurement {
    pub fn new(
        file_name: impl Into<String>,
        package_name: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            base: MeasurementBase::new(file_name, package_name, class_name),
            method_name: method_name.into(),
            ..Default::default()
        }
    }

    pub fn with_span(mut self, begin_line: u32, begin_column: u32, end_line: u32, end_column: u32) -> Self {
        self.begin_line = begin_line;
        self.begin_column = begin_column;
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    fn has_span(&self) -> bool {
        self.begin_line != 0 || self.end_line != 0
    }

    fn absorb(&mut self, other: MethodMeasurement) {
        if !self.has_span() && other.has_span() {
            self.begin_line = other.begin_line;
            self.begin_column = other.begin_column;
            self.end_line = other.end_line;
            self.end_column = other.end_column;
        }
        self.base.absorb(other.base);
    }
}

/// Measurement of a class, owning the measurements of its methods
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMeasurement {
    pub base: MeasurementBase,
    methods: Vec<MethodMeasurement>,
}

impl ClassMeasurement {
    pub fn new(
        file_name: impl Into<String>,
        package_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            base: MeasurementBase::new(file_name, package_name, class_name),
            methods: Vec::new(),
        }
    }

    /// Methods in insertion order
    pub fn methods(&self) -> &[MethodMeasurement] {
        &self.methods
    }

    /// Take ownership of a method; a method with the same name is merged
    /// into the existing child instead of being duplicated
    pub fn add_method(&mut self, method: MethodMeasurement) {
        match self
            .methods
            .iter_mut()
            .find(|existing| existing.method_name == method.method_name)
        {
            Some(existing) => existing.absorb(method),
            None => self.methods.push(method),
        }
    }

    fn absorb(&mut self, other: ClassMeasurement) {
        self.base.absorb(other.base);
        for method in other.methods {
            self.add_method(method);
        }
    }
}

/// A class or method measurement
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsMeasurement {
    Class(ClassMeasurement),
    Method(MethodMeasurement),
}

impl MetricsMeasurement {
    pub fn base(&self) -> &MeasurementBase {
        match self {
            MetricsMeasurement::Class(class) => &class.base,
            MetricsMeasurement::Method(method) => &method.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut MeasurementBase {
        match self {
            MetricsMeasurement::Class(class) => &mut class.base,
            MetricsMeasurement::Method(method) => &mut method.base,
        }
    }

    pub fn qualified_class_name(&self) -> String {
        self.base().qualified_class_name()
    }

    pub fn package_name(&self) -> &str {
        &self.base().package_name
    }

    pub fn class_name(&self) -> &str {
        &self.base().class_name
    }

    pub fn add_metric(&mut self, metric: Metric) {
        self.base_mut().add_metric(metric);
    }

    pub fn metric(&self, id: &str) -> Option<&Metric> {
        self.base().metric(id)
    }

    pub fn metric_value(&self, id: &str) -> Option<f64> {
        self.base().metric_value(id)
    }

    pub fn is_class(&self) -> bool {
        matches!(self, MetricsMeasurement::Class(_))
    }

    pub fn as_class(&self) -> Option<&ClassMeasurement> {
        match self {
            MetricsMeasurement::Class(class) => Some(class),
            MetricsMeasurement::Method(_) => None,
        }
    }

    /// Merge `other` into `self`
    ///
    /// A class absorbs methods, never the reverse: `Method.merge(Class)`
    /// returns the method unchanged and drops the class.
    pub fn merge(self, other: MetricsMeasurement) -> MetricsMeasurement {
        match (self, other) {
            (MetricsMeasurement::Class(mut class), MetricsMeasurement::Class(other)) => {
                class.absorb(other);
                MetricsMeasurement::Class(class)
            }
            (MetricsMeasurement::Class(mut class), MetricsMeasurement::Method(method)) => {
                class.add_method(method);
                MetricsMeasurement::Class(class)
            }
            (MetricsMeasurement::Method(mut method), MetricsMeasurement::Method(other)) => {
                method.absorb(other);
                MetricsMeasurement::Method(method)
            }
            (receiver, _) => receiver,
        }
    }
}

impl From<ClassMeasurement> for MetricsMeasurement {
    fn from(class: ClassMeasurement) -> Self {
        MetricsMeasurement::Class(class)
    }
}

impl From<MethodMeasurement> for MetricsMeasurement {
    fn from(method: MethodMeasurement) -> Self {
        MetricsMeasurement::Method(method)
    }
}

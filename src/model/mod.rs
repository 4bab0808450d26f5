//! Measurement data model.
//!
//! - `metric` - metric definitions, scopes and typed values
//! - `catalog` - id lookup over a producer's definitions
//! - `measurement` - class/method measurements and their merge

pub mod catalog;
pub mod measurement;
pub mod metric;

pub use catalog::MetricCatalog;
pub use measurement::{ClassMeasurement, MeasurementBase, MethodMeasurement, MetricsMeasurement};
pub use metric::{Metric, MetricDefinition, MetricKind, MetricValue, Scope};

//! Built-in metric producers.
//!
//! Each producer consumes one kind of build output:
//! - `analyzer` - static analyzer metric violations
//! - `coverage` - code coverage trees
//! - `warnings` - issue reports with source-control statistics

pub mod analyzer;
pub mod coverage;
pub mod warnings;

pub use analyzer::{analyzer_metrics, AnalyzerProducer};
pub use coverage::CoverageProducer;
pub use warnings::WarningsProducer;

use crate::model::MetricCatalog;

/// Catalog of every metric the built-in producers can report
pub fn builtin_catalog() -> MetricCatalog {
    AnalyzerProducer::new()
        .metrics()
        .into_iter()
        .chain(CoverageProducer::new().metrics())
        .chain(WarningsProducer::new().metrics())
        .collect()
}

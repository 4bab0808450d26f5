//! Output writers and view models.
//!
//! This module handles:
//! - The versioned metrics report schema
//! - Class and method table rows
//! - Writing JSON files (reports, trees, histograms)

pub mod json;
pub mod report;
pub mod table;

// Re-export main functions
pub use json::{read_report, write_json, write_report};
pub use report::{MetricsReport, ProjectMetric};
pub use table::{class_overview, ClassRow, MeasurementTable, MethodRow};

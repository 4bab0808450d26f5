//! Input parsing and schema definitions.
//!
//! This module handles:
//! - Defining the upstream build output schema
//! - Tokenizing analyzer violation descriptions
//! - Turning violations into measurements

pub mod schema;
pub mod violation;

// Re-export main types
pub use schema::{
    AnalyzerConfigError, AnalyzerProcessingError, AnalyzerReport, BuildOutput, CoverageCounter,
    CoverageElement, CoverageNode, CoverageReport, FileStatistics, Issue, OutputKind, RawViolation,
    Ratio, Severity, WarningsReport,
};
pub use violation::{parse_violation, tokenize_description, Description};

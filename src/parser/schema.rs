//! Input JSON schema definitions for upstream build outputs.
//!
//! Each analysis tool contributes one `BuildOutput`. A batch file is a JSON
//! array of them, tagged by `kind`:
//!
//! ```json
//! [
//!   { "kind": "analyzer_report", "violations": [ ... ] },
//!   { "kind": "coverage_report", "root": { ... } },
//!   { "kind": "warnings_report", "issues": [ ... ], "forensics": { ... } }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One upstream build output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildOutput {
    AnalyzerReport(AnalyzerReport),
    CoverageReport(CoverageReport),
    WarningsReport(WarningsReport),
}

/// Declared type of a build output, used to route outputs to producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Analyzer,
    Coverage,
    Warnings,
}

impl BuildOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            BuildOutput::AnalyzerReport(_) => OutputKind::Analyzer,
            BuildOutput::CoverageReport(_) => OutputKind::Coverage,
            BuildOutput::WarningsReport(_) => OutputKind::Warnings,
        }
    }
}

/// Result of one static analyzer run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerReport {
    #[serde(default)]
    pub violations: Vec<RawViolation>,

    #[serde(default)]
    pub processing_errors: Vec<AnalyzerProcessingError>,

    #[serde(default)]
    pub configuration_errors: Vec<AnalyzerConfigError>,
}

/// A metric violation as reported by the analyzer
///
/// `description` follows `<NodeKind>::[<Signature>::]id=value,...,`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawViolation {
    pub filename: String,
    pub package_name: String,
    pub class_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,

    #[serde(default)]
    pub begin_line: u32,

    #[serde(default)]
    pub begin_column: u32,

    #[serde(default)]
    pub end_line: u32,

    #[serde(default)]
    pub end_column: u32,

    pub description: String,
}

/// A file the analyzer failed to process
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerProcessingError {
    pub file: String,
    pub detail: String,
}

/// A rule the analyzer could not configure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfigError {
    pub rule: String,
    pub issue: String,
}

/// Coverage result tree of one coverage tool run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    pub root: CoverageNode,
}

/// Structural level of a coverage node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageElement {
    Report,
    Package,
    File,
    Class,
    Method,
}

/// Counter a coverage ratio is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageCounter {
    Instruction,
    Line,
    Conditional,
    Method,
    Class,
}

/// A covered/total pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub covered: u64,
    pub total: u64,
}

impl Ratio {
    pub fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    /// Covered share in percent; nothing to cover counts as fully covered
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.covered as f64 / self.total as f64 * 100.0
        }
    }
}

impl std::ops::Add for Ratio {
    type Output = Ratio;

    fn add(self, other: Ratio) -> Ratio {
        Ratio::new(self.covered + other.covered, self.total + other.total)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.covered, self.total)
    }
}

/// One node of a coverage tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageNode {
    pub name: String,
    pub element: CoverageElement,

    #[serde(default)]
    pub ratios: BTreeMap<CoverageCounter, Ratio>,

    #[serde(default)]
    pub children: Vec<CoverageNode>,
}

impl CoverageNode {
    pub fn new(name: impl Into<String>, element: CoverageElement) -> Self {
        Self {
            name: name.into(),
            element,
            ratios: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_ratio(mut self, counter: CoverageCounter, ratio: Ratio) -> Self {
        self.ratios.insert(counter, ratio);
        self
    }

    pub fn with_child(mut self, child: CoverageNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Issues and source-control statistics of one warnings run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WarningsReport {
    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Per-file statistics keyed by file name
    #[serde(default)]
    pub forensics: BTreeMap<String, FileStatistics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    WarningHigh,
    WarningNormal,
    WarningLow,
}

/// A single reported issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub file_name: String,
    pub package_name: String,

    /// File base name, e.g. `Foo.java`
    pub base_name: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileStatistics {
    pub authors: u32,
    pub commits: u32,
}

//! Configuration and constants for the aggregator.
//!
//! Constants live at the top of the module. `AggregatorConfig` is the
//! optional TOML file accepted by the `aggregate` command; every section
//! falls back to defaults so an empty file is valid.

use crate::histogram::BinRule;
use crate::model::Scope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::ConfigError;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Separator between package segments and between package and class
pub const QUALIFIED_NAME_SEPARATOR: char = '.';

/// Metric used for package tree values when none is requested
pub const DEFAULT_TREE_METRIC: &str = "LOC";

/// Metric used for histograms when none is requested
pub const DEFAULT_HISTOGRAM_METRIC: &str = "CYCLO";

/// Bin count used by the fixed histogram rule when none is configured
pub const DEFAULT_FIXED_BINS: usize = 10;

// Analyzer node kinds that denote a type declaration. Every other kind is
// treated as a method-level construct.
pub const CLASS_NODE_KINDS: &[&str] = &[
    "ClassOrInterfaceDeclaration",
    "EnumDeclaration",
    "RecordDeclaration",
    "AnnotationTypeDeclaration",
];

/// Complete aggregator configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AggregatorConfig {
    /// Package tree settings
    #[serde(default)]
    pub tree: TreeConfig,

    /// Histogram settings
    #[serde(default)]
    pub histogram: HistogramConfig,

    /// Measurement table settings
    #[serde(default)]
    pub table: TableConfig,
}

/// Package tree settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TreeConfig {
    /// Metric id whose values size the tree nodes
    #[serde(default = "default_tree_metric")]
    pub metric: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            metric: default_tree_metric(),
        }
    }
}

/// Which binning rule the histogram uses
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinRuleKind {
    #[default]
    Adaptive,
    Fixed,
}

/// Histogram settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HistogramConfig {
    /// Metric id to bin
    #[serde(default = "default_histogram_metric")]
    pub metric: String,

    /// Adaptive (Freedman-Diaconis) or fixed bin count
    #[serde(default)]
    pub rule: BinRuleKind,

    /// Bin count for the fixed rule
    #[serde(default = "default_fixed_bins")]
    pub bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            metric: default_histogram_metric(),
            rule: BinRuleKind::default(),
            bins: DEFAULT_FIXED_BINS,
        }
    }
}

impl HistogramConfig {
    /// Resolve the configured rule into a binner rule
    pub fn bin_rule(&self) -> BinRule {
        match self.rule {
            BinRuleKind::Adaptive => BinRule::Adaptive,
            BinRuleKind::Fixed => BinRule::Fixed(self.bins),
        }
    }
}

/// Measurement table settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TableConfig {
    /// Scope of the metric columns
    #[serde(default = "default_table_scope")]
    pub scope: Scope,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            scope: default_table_scope(),
        }
    }
}

fn default_tree_metric() -> String {
    DEFAULT_TREE_METRIC.to_string()
}

fn default_histogram_metric() -> String {
    DEFAULT_HISTOGRAM_METRIC.to_string()
}

fn default_fixed_bins() -> usize {
    DEFAULT_FIXED_BINS
}

fn default_table_scope() -> Scope {
    Scope::Class
}

/// Load the aggregator configuration from a TOML file
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are out of range
///
/// # Example
/// ```ignore
/// let config = load_config("metrics.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AggregatorConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<AggregatorConfig, ConfigError> {
    let config: AggregatorConfig = toml::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AggregatorConfig) -> Result<(), ConfigError> {
    if config.histogram.rule == BinRuleKind::Fixed && config.histogram.bins == 0 {
        return Err(ConfigError::Invalid(
            "histogram.bins must be at least 1 for the fixed rule".to_string(),
        ));
    }
    if config.tree.metric.trim().is_empty() {
        return Err(ConfigError::Invalid("tree.metric must not be empty".to_string()));
    }
    Ok(())
}

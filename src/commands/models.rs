use crate::model::Scope;
use std::path::PathBuf;

/// Arguments for the aggregate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AggregateArgs {
    /// JSON file with an array of build outputs
    pub input: PathBuf,

    /// Optional TOML configuration
    pub config: Option<PathBuf>,

    /// Output path for the JSON report
    pub output: Option<PathBuf>,

    /// Output path for the package tree JSON
    pub tree_output: Option<PathBuf>,

    /// Metric sizing the package tree (overrides config)
    pub tree_metric: Option<String>,

    /// Output path for the histogram JSON
    pub histogram_output: Option<PathBuf>,

    /// Metric to bin (overrides config)
    pub histogram_metric: Option<String>,

    /// Use this many fixed-width bins instead of the adaptive rule
    pub bins: Option<usize>,

    /// Column scope of the report table (overrides config)
    pub scope: Option<Scope>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AggregateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("build-outputs.json"),
            config: None,
            output: Some(PathBuf::from("metrics.json")),
            tree_output: None,
            tree_metric: None,
            histogram_output: None,
            histogram_metric: None,
            bins: None,
            scope: None,
            print_summary: false,
        }
    }
}

//! Metrics Aggregator CLI
//!
//! Merges analyzer, coverage and warnings results into per-class metrics
//! and writes reports, package trees and histograms.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use metrics_aggregator::commands::{
    display_metrics, display_version, execute_aggregate, validate_args, validate_report_file,
    AggregateArgs,
};
use metrics_aggregator::model::Scope;

/// Metrics Aggregator - per-class code metrics from build outputs
#[derive(Parser, Debug)]
#[command(name = "metrics-aggregator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Metric scope selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Class,
    Method,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Class => Scope::Class,
            ScopeArg::Method => Scope::Method,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate build outputs into a metrics report
    Aggregate {
        /// JSON file with an array of build outputs
        #[arg(short, long, env = "METRICS_INPUT")]
        input: PathBuf,

        /// TOML configuration file
        #[arg(short, long, env = "METRICS_CONFIG")]
        config: Option<PathBuf>,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "metrics.json")]
        output: PathBuf,

        /// Output path for the package tree JSON (optional)
        #[arg(long)]
        tree: Option<PathBuf>,

        /// Metric sizing the package tree
        #[arg(long)]
        tree_metric: Option<String>,

        /// Output path for the histogram JSON (optional)
        #[arg(long)]
        histogram: Option<PathBuf>,

        /// Metric to bin
        #[arg(long)]
        histogram_metric: Option<String>,

        /// Use this many fixed-width bins instead of the adaptive rule
        #[arg(long)]
        bins: Option<usize>,

        /// Column scope of the report table
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a metrics report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List supported metrics
    Metrics {
        /// Scope to list
        #[arg(long, value_enum, default_value = "class")]
        scope: ScopeArg,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Aggregate {
            input,
            config,
            output,
            tree,
            tree_metric,
            histogram,
            histogram_metric,
            bins,
            scope,
            summary,
        } => {
            let args = AggregateArgs {
                input,
                config,
                output: Some(output),
                tree_output: tree,
                tree_metric,
                histogram_output: histogram,
                histogram_metric,
                bins,
                scope: scope.map(Scope::from),
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_aggregate(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Metrics { scope } => {
            display_metrics(scope.into());
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

//! Aggregate command implementation.
//!
//! The aggregate command:
//! 1. Loads configuration
//! 2. Reads build outputs
//! 3. Aggregates measurements across producers
//! 4. Writes the report
//! 5. Builds the package tree
//! 6. Bins the histogram

use crate::aggregator::{calculate_distribution, AggregatedMetrics, ProviderAggregator};
use crate::commands::models::AggregateArgs;
use crate::histogram::{BinRule, Histogram, HistogramBinner};
use crate::output::{write_json, write_report, MetricsReport};
use crate::parser::BuildOutput;
use crate::tree::build_metrics_tree;
use crate::utils::config::{load_config, AggregatorConfig, BinRuleKind};
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Execute the aggregate command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Configuration or input files that cannot be read or parsed
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AggregateArgs {
///     input: PathBuf::from("build-outputs.json"),
///     tree_output: Some(PathBuf::from("tree.json")),
///     ..Default::default()
/// };
///
/// execute_aggregate(args)?;
/// ```
pub fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/6: Loading configuration...");
    let config = resolve_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    info!("Step 2/6: Reading build outputs from {}", args.input.display());
    let outputs = load_build_outputs(&args.input)?;
    info!("Loaded {} build outputs", outputs.len());

    let aggregator = ProviderAggregator::with_default_producers();
    info!(
        "Step 3/6: Aggregating measurements with {} producers...",
        aggregator.producer_count()
    );
    let aggregated = aggregator.aggregate(&outputs);
    if aggregated.is_empty() {
        warn!("No measurements available in {}", args.input.display());
    }

    info!("Step 4/6: Building report...");
    let report = MetricsReport::from_aggregation(&aggregated, config.table.scope);
    if let Some(path) = &args.output {
        write_report(&report, path).context("Failed to write metrics report")?;
    }

    if let Some(path) = &args.tree_output {
        info!("Step 5/6: Building {} package tree...", config.tree.metric);
        warn_unknown_metric(&aggregated, &config.tree.metric);
        let tree = build_metrics_tree(aggregated.class_measurements(), &config.tree.metric);
        write_json(&tree, path).context("Failed to write package tree")?;
    } else {
        info!("Step 5/6: Skipping package tree (not requested)");
    }

    let histogram = if let Some(path) = &args.histogram_output {
        info!("Step 6/6: Binning {} histogram...", config.histogram.metric);
        let histogram = bin_metric(&aggregated, &config.histogram.metric, config.histogram.bin_rule());
        write_json(&histogram, path).context("Failed to write histogram")?;
        Some(histogram)
    } else {
        info!("Step 6/6: Skipping histogram (not requested)");
        None
    };

    if args.print_summary {
        print_summary(&aggregated, &config, histogram.as_ref());
    }

    info!(
        "Aggregated {} classes in {:.2?}",
        report.classes.len(),
        start_time.elapsed()
    );

    Ok(())
}

/// Validate aggregate arguments
///
/// **Public** - called before execute_aggregate
pub fn validate_args(args: &AggregateArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.bins == Some(0) {
        anyhow::bail!("Bin count must be at least 1");
    }

    if args.output.is_none() && args.tree_output.is_none() && args.histogram_output.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: specify --output, --tree, --histogram or --summary");
    }

    let outputs: Vec<&Path> = [&args.output, &args.tree_output, &args.histogram_output]
        .into_iter()
        .flatten()
        .map(|p| p.as_path())
        .collect();
    for (i, path) in outputs.iter().enumerate() {
        if outputs[i + 1..].contains(path) {
            anyhow::bail!("Output path used twice: {}", path.display());
        }
    }

    Ok(())
}

/// Read a JSON array of build outputs
pub fn load_build_outputs(path: &Path) -> Result<Vec<BuildOutput>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let outputs: Vec<BuildOutput> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse build outputs in {}", path.display()))?;
    Ok(outputs)
}

/// Bin one metric with the integer flag taken from its definition
pub fn bin_metric(aggregated: &AggregatedMetrics, metric_id: &str, rule: BinRule) -> Histogram {
    warn_unknown_metric(aggregated, metric_id);

    let integer_valued = aggregated
        .definition(metric_id)
        .map(|d| d.is_integer())
        .unwrap_or(false);

    HistogramBinner::new(rule).bin(&aggregated.values_for(metric_id), integer_valued)
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(args: &AggregateArgs) -> Result<AggregatorConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AggregatorConfig::default(),
    };

    if let Some(metric) = &args.tree_metric {
        config.tree.metric = metric.clone();
    }
    if let Some(metric) = &args.histogram_metric {
        config.histogram.metric = metric.clone();
    }
    if let Some(bins) = args.bins {
        config.histogram.rule = BinRuleKind::Fixed;
        config.histogram.bins = bins;
    }
    if let Some(scope) = args.scope {
        config.table.scope = scope;
    }

    Ok(config)
}

fn warn_unknown_metric(aggregated: &AggregatedMetrics, metric_id: &str) {
    if !aggregated.is_empty() && aggregated.definition(metric_id).is_none() {
        warn!("Metric {} is not reported by any producer", metric_id);
    }
}

fn print_summary(aggregated: &AggregatedMetrics, config: &AggregatorConfig, histogram: Option<&Histogram>) {
    println!("\n{}", "Project Overview".bold().underline());
    if aggregated.summary_lines().is_empty() {
        println!("  {}", "No data available".yellow());
    }
    for line in aggregated.summary_lines() {
        println!("  {}", line);
    }

    let metric = &config.histogram.metric;
    let distribution = calculate_distribution(&aggregated.values_for(metric));
    println!("\n{} {}", "Distribution of".bold(), metric.cyan());
    println!("  {}", distribution.summary());

    if let Some(histogram) = histogram {
        let widest = histogram.data.iter().copied().max().unwrap_or(0).max(1);
        for (label, count) in histogram.labels.iter().zip(&histogram.data) {
            let bar = "#".repeat(count * 40 / widest);
            println!("  {:>20} | {:<40} {}", label, bar.green(), count);
        }
    }
}

use crate::model::Scope;
use crate::output::read_report;
use crate::producers::builtin_catalog;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

/// Validate a metrics report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    println!("{} Valid metrics report", "✓".green());
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Scope: {:?}", report.scope);
    println!("  Classes: {}", report.classes.len());
    println!("  Supported Metrics: {}", report.supported_metrics.len());
    println!("  Project Metrics: {}", report.project_metrics.len());

    Ok(())
}

/// List the metrics the built-in producers report for a scope
pub fn display_metrics(scope: Scope) {
    let catalog = builtin_catalog();
    let definitions = catalog.for_scope(scope);

    println!("{} ({:?} scope)", "Supported Metrics".bold(), scope);
    println!();

    for definition in definitions {
        println!(
            "  {:<24} {:<36} {}",
            definition.id.cyan(),
            definition.display_name,
            definition.reported_by.dimmed()
        );
        if !definition.description.is_empty() {
            println!("  {:<24} {}", "", definition.description);
        }
    }
}

/// Display version information
pub fn display_version() {
    println!("Metrics Aggregator v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aggregates analyzer, coverage and warnings results into per-class metrics.");
}

//! Aggregation of producer results into one canonical model.
//!
//! This module turns the outputs of several producers into:
//! - One merged measurement per qualified class name
//! - A unified metric catalog
//! - Summary lines and project metrics
//! - Derived statistics (maxima, scatter plots, distributions)

pub mod merger;
pub mod metrics;
pub mod provider;
pub mod provider_aggregator;

// Re-export main types and functions
pub use merger::merge_measurements;
pub use metrics::{
    calculate_distribution, calculate_metric_maxima, scatter_plot, MetricDistribution, ScatterPoint,
};
pub use provider::{MetricsProducer, MetricsProvider};
pub use provider_aggregator::{AggregatedMetrics, ProviderAggregator};

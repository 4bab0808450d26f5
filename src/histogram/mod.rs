//! Histograms of metric distributions.

pub mod binner;

pub use binner::{percentile, BinRule, Histogram, HistogramBinner, MAX_ADAPTIVE_BINS};

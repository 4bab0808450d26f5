//! Metrics Aggregator
//!
//! Merges per-class and per-method code metrics reported by several
//! build-time analyzers into one model keyed by qualified class name.
//!
//! The pipeline:
//! - `parser` reads analyzer violations into measurements
//! - `producers` turn each kind of build output into a metrics provider
//! - `aggregator` merges providers into one measurement set
//! - `tree`, `histogram` and `output` build the views
//!
//! ## Getting Started
//!
//! ```bash
//! metrics-aggregator aggregate --input build-outputs.json --tree tree.json
//! metrics-aggregator --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod histogram;
pub mod model;
pub mod output;
pub mod parser;
pub mod producers;
pub mod tree;
pub mod utils;

//! Hierarchical package view over class measurements.

pub mod package_tree;

pub use package_tree::{build_metrics_tree, build_package_tree, PackageTreeNode};

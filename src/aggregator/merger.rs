//! Merge measurements that describe the same class.
//!
//! Measurements arrive as a flat list from one or more producers. They are
//! grouped by qualified class name and each group is folded with
//! `MetricsMeasurement::merge` into a single measurement.

use crate::model::MetricsMeasurement;
use log::debug;
use std::collections::BTreeMap;

/// Merge measurements sharing a qualified class name
///
/// # Arguments
/// * `measurements` - Measurements from any number of files and producers
///
/// # Returns
/// One measurement per qualified class name, sorted by that name. A group
/// without any class measurement yields a single merged method measurement.
///
/// # Algorithm
/// 1. Group by qualified class name
/// 2. Order each group so class measurements come before methods
/// 3. Fold the group pairwise with `merge`
pub fn merge_measurements(measurements: Vec<MetricsMeasurement>) -> Vec<MetricsMeasurement> {
    let total = measurements.len();

    let mut groups: BTreeMap<String, Vec<MetricsMeasurement>> = BTreeMap::new();
    for measurement in measurements {
        groups
            .entry(measurement.qualified_class_name())
            .or_default()
            .push(measurement);
    }

    let merged: Vec<MetricsMeasurement> = groups.into_values().filter_map(fold_group).collect();

    debug!(
        "Merged {} measurements into {} classes",
        total,
        merged.len()
    );

    merged
}

/// Fold one group; classes absorb methods, so they must come first
fn fold_group(mut group: Vec<MetricsMeasurement>) -> Option<MetricsMeasurement> {
    // Stable sort keeps the relative order inside each variant
    group.sort_by_key(|m| !m.is_class());
    group.into_iter().reduce(MetricsMeasurement::merge)
}

//! Lookup table of the metric definitions a producer reports.

use super::metric::{MetricDefinition, Scope};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered set of metric definitions with lookup by id
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    definitions: Vec<Arc<MetricDefinition>>,
    index: HashMap<String, usize>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition; a definition whose id is already present is ignored
    pub fn register(&mut self, definition: Arc<MetricDefinition>) -> bool {
        if self.index.contains_key(&definition.id) {
            return false;
        }
        self.index
            .insert(definition.id.clone(), self.definitions.len());
        self.definitions.push(definition);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Arc<MetricDefinition>> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> &[Arc<MetricDefinition>] {
        &self.definitions
    }

    /// Definitions valid for `scope`, highest priority first
    ///
    /// Definitions with equal priority keep their registration order.
    pub fn for_scope(&self, scope: Scope) -> Vec<Arc<MetricDefinition>> {
        let mut selected: Vec<_> = self
            .definitions
            .iter()
            .filter(|d| d.valid_for_scope(scope))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.cmp_priority(b));
        selected
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<Arc<MetricDefinition>> for MetricCatalog {
    fn from_iter<I: IntoIterator<Item = Arc<MetricDefinition>>>(iter: I) -> Self {
        let mut catalog = MetricCatalog::new();
        for definition in iter {
            catalog.register(definition);
        }
        catalog
    }
}

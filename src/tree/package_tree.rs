//! Package tree over qualified class names.
//!
//! Each inserted `(qualified_name, value)` pair becomes a path of package
//! nodes ending in a leaf. Values are aggregated lazily: a node's value is
//! its own value plus the values of its children, computed on read.
//!
//! ```text
//! com.example.MyClass            ""
//! com.example.other.OtherClass    └── com
//!                                      └── example
//!                                          ├── MyClass
//!                                          └── other
//!                                              └── OtherClass
//! ```
//!
//! After `collapse`, single-child chains are joined: the root becomes
//! `com.example` with children `MyClass` and `other.OtherClass`.

use crate::model::ClassMeasurement;
use crate::utils::config::QUALIFIED_NAME_SEPARATOR;
use log::debug;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;

/// A node of the package tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageTreeNode {
    name: String,
    own_value: Option<f64>,
    children: BTreeMap<String, PackageTreeNode>,
}

impl PackageTreeNode {
    /// Create a node without value or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            own_value: None,
            children: BTreeMap::new(),
        }
    }

    /// Create an empty root node
    pub fn root() -> Self {
        Self::new("")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn own_value(&self) -> Option<f64> {
        self.own_value
    }

    pub fn children(&self) -> impl Iterator<Item = &PackageTreeNode> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&PackageTreeNode> {
        self.children.get(name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Own value plus the values of all children; 0 for an empty node
    pub fn value(&self) -> f64 {
        self.own_value.unwrap_or(0.0) + self.children.values().map(PackageTreeNode::value).sum::<f64>()
    }

    /// Insert a value under a dotted qualified name
    ///
    /// Missing package nodes are created along the way. Inserting the same
    /// name twice adds to the leaf's value. Non-finite values count as 0 and
    /// empty segments are skipped.
    pub fn insert(&mut self, qualified_name: &str, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };

        let mut node = self;
        for segment in qualified_name
            .split(QUALIFIED_NAME_SEPARATOR)
            .filter(|segment| !segment.is_empty())
        {
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| PackageTreeNode::new(segment));
        }

        node.own_value = Some(node.own_value.unwrap_or(0.0) + value);
    }

    /// Join single-child chains, starting here and moving downward
    ///
    /// A node with exactly one child takes the name `"{name}.{child}"`, the
    /// child's children and the child's own value. This repeats until the
    /// node has zero or several children, then continues with each child.
    pub fn collapse(&mut self) {
        while self.children.len() == 1 {
            let Some((_, child)) = self.children.pop_first() else {
                break;
            };

            self.name = if self.name.is_empty() {
                child.name
            } else {
                format!("{}{}{}", self.name, QUALIFIED_NAME_SEPARATOR, child.name)
            };
            self.own_value = match (self.own_value, child.own_value) {
                (None, None) => None,
                (own, other) => Some(own.unwrap_or(0.0) + other.unwrap_or(0.0)),
            };
            self.children = child.children;
        }

        // Collapsed children are re-keyed by their joined names
        self.children = std::mem::take(&mut self.children)
            .into_values()
            .map(|mut child| {
                child.collapse();
                (child.name.clone(), child)
            })
            .collect();
    }

    /// Number of nodes in this subtree, including this node
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(PackageTreeNode::node_count).sum::<usize>()
    }
}

/// Serialized as `{"name": ..., "value": ..., "children": [...]}`
impl Serialize for PackageTreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children: Vec<&PackageTreeNode> = self.children.values().collect();

        let mut state = serializer.serialize_struct("PackageTreeNode", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}

/// Build a tree from `(qualified_name, value)` pairs without collapsing
pub fn build_package_tree<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> PackageTreeNode {
    let mut root = PackageTreeNode::root();
    for (name, value) in entries {
        root.insert(name, value);
    }
    root
}

/// Build and collapse the tree of one metric over class measurements
///
/// Classes without the metric contribute 0.
pub fn build_metrics_tree<'a>(
    classes: impl Iterator<Item = &'a ClassMeasurement>,
    metric_id: &str,
) -> PackageTreeNode {
    let mut root = PackageTreeNode::root();
    for class in classes {
        let value = class.base.metric_value(metric_id).unwrap_or(0.0);
        root.insert(&class.base.qualified_class_name(), value);
    }
    root.collapse();

    debug!(
        "Built {} tree with {} nodes, total {}",
        metric_id,
        root.node_count(),
        root.value()
    );

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let mut root = PackageTreeNode::root();
        assert_eq!(root.value(), 0.0);
        assert!(root.is_leaf());

        root.collapse();
        assert_eq!(root.name(), "");
    }

    #[test]
    fn test_insert_creates_intermediate_nodes() {
        let root = build_package_tree([("com.example.Foo", 10.0)]);

        let com = root.child("com").unwrap();
        let example = com.child("example").unwrap();
        let foo = example.child("Foo").unwrap();

        assert_eq!(com.own_value(), None);
        assert_eq!(foo.own_value(), Some(10.0));
        assert_eq!(root.value(), 10.0);
    }

    #[test]
    fn test_root_value_is_sum_of_leaves() {
        let root = build_package_tree([
            ("com.example.Foo", 10.0),
            ("com.example.Bar", 5.5),
            ("org.other.Baz", 4.5),
        ]);

        assert_eq!(root.value(), 20.0);
        assert_eq!(root.child("com").unwrap().value(), 15.5);
    }

    #[test]
    fn test_duplicate_insert_accumulates() {
        let root = build_package_tree([("a.B", 1.0), ("a.B", 2.0)]);
        assert_eq!(root.child("a").unwrap().child("B").unwrap().own_value(), Some(3.0));
        assert_eq!(root.value(), 3.0);
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let root = build_package_tree([("a.B", f64::NAN), ("a.C", 2.0)]);
        assert_eq!(root.value(), 2.0);
    }

    #[test]
    fn test_collapse_example_packages() {
        let mut root = build_package_tree([
            ("com.example.MyClass", 1.0),
            ("com.example.other.OtherClass", 2.0),
        ]);
        root.collapse();

        assert_eq!(root.name(), "com.example");
        let names: Vec<_> = root.children().map(PackageTreeNode::name).collect();
        assert_eq!(names, vec!["MyClass", "other.OtherClass"]);
        assert_eq!(root.child("other.OtherClass").unwrap().value(), 2.0);
        assert_eq!(root.value(), 3.0);
    }

    #[test]
    fn test_collapse_rekeys_children_by_name() {
        let mut root = build_package_tree([
            ("com.example.MyClass", 1.0),
            ("com.example.other.OtherClass", 2.0),
            ("com.example.zeta.deep.Leaf", 4.0),
        ]);
        root.collapse();

        for (key, child) in &root.children {
            assert_eq!(key, child.name());
        }
        assert_eq!(root.child("zeta.deep.Leaf").unwrap().value(), 4.0);
        assert!(root.child("other").is_none());

        let json = serde_json::to_value(&root).unwrap();
        let names: Vec<_> = json["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["MyClass", "other.OtherClass", "zeta.deep.Leaf"]);
    }

    #[test]
    fn test_collapse_single_branch_path() {
        let mut root = build_package_tree([("a.b.c.d.X", 1.0), ("a.b.c.d.Y", 2.0)]);
        root.collapse();

        assert_eq!(root.name(), "a.b.c.d");
        assert_eq!(root.children().count(), 2);
    }

    #[test]
    fn test_collapse_single_leaf() {
        let mut root = build_package_tree([("a.b.C", 7.0)]);
        root.collapse();

        assert_eq!(root.name(), "a.b.C");
        assert!(root.is_leaf());
        assert_eq!(root.value(), 7.0);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = build_package_tree([("x.A", 1.0), ("y.B", 2.0), ("x.C", 3.0)]);
        let b = build_package_tree([("x.C", 3.0), ("y.B", 2.0), ("x.A", 1.0)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_tree() {
        let mut root = build_package_tree([("com.A", 1.0), ("com.B", 2.0)]);
        root.collapse();

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "com",
                "value": 3.0,
                "children": [
                    {"name": "A", "value": 1.0, "children": []},
                    {"name": "B", "value": 2.0, "children": []}
                ]
            })
        );
    }
}

//! Match predicates shared by the executor and seed filters.

use crate::model::{Edge, Node};
use crate::query::ast::{EdgePattern, NodePattern};

/// True when the node carries every pattern label and every pattern property
/// structurally equals the node's value.
pub fn matches_node(node: &Node, pattern: &NodePattern) -> bool {
    pattern.labels.iter().all(|label| node.has_label(label))
        && pattern
            .properties
            .iter()
            .all(|(key, value)| node.property(key) == Some(value))
}

/// True when the pattern's relationship type is absent or equal and every
/// pattern property structurally equals the edge's value.
///
/// Direction is a traversal concern, not an edge predicate; the executor
/// picks which adjacency list to walk.
pub fn matches_edge(edge: &Edge, pattern: &EdgePattern) -> bool {
    if let Some(rel) = &pattern.relationship_type {
        if &edge.relationship_type != rel {
            return false;
        }
    }
    pattern
        .properties
        .iter()
        .all(|(key, value)| edge.property(key) == Some(value))
}

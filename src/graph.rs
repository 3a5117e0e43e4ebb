//! Graph coordinator: CRUD with referential validation and cascade delete.
//!
//! [`Graph`] is a thin layer over [`Storage`]. It owns exactly one storage
//! instance, validates edge endpoints on insert, cascades edge deletion when
//! a node goes away, and routes filtered listings through the right index.
//! Multiple graphs coexist in a process, distinguished by name.

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgeId, Node, NodeId, PropertyValue};
use crate::storage::{Storage, StorageOptions};

/// Node listing filter.
///
/// An empty filter scans everything. A label-only or property-only filter is
/// served by the matching index; combining fields falls back to a full scan
/// with a predicate (non-indexed path).
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// Restrict to nodes carrying this label.
    pub label: Option<String>,
    /// Restrict to nodes whose property equals this value structurally.
    pub property: Option<(String, PropertyValue)>,
}

impl NodeFilter {
    /// Filter matching every node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on a single label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Filter on a single property equality.
    pub fn property(key: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            property: Some((key.into(), value)),
            ..Self::default()
        }
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(label) = &self.label {
            if !node.has_label(label) {
                return false;
            }
        }
        if let Some((key, value)) = &self.property {
            if node.property(key) != Some(value) {
                return false;
            }
        }
        true
    }

    fn is_empty(&self) -> bool {
        self.label.is_none() && self.property.is_none()
    }
}

/// Edge listing filter; all set fields must match.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    /// Restrict to this relationship type.
    pub relationship_type: Option<String>,
    /// Restrict to edges leaving this node.
    pub from: Option<NodeId>,
    /// Restrict to edges entering this node.
    pub to: Option<NodeId>,
    /// Restrict to edges whose property equals this value structurally.
    pub property: Option<(String, PropertyValue)>,
}

impl EdgeFilter {
    /// Filter matching every edge.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on a single relationship type.
    pub fn relationship_type(rel: impl Into<String>) -> Self {
        Self {
            relationship_type: Some(rel.into()),
            ..Self::default()
        }
    }

    fn matches(&self, edge: &Edge) -> bool {
        if let Some(rel) = &self.relationship_type {
            if &edge.relationship_type != rel {
                return false;
            }
        }
        if let Some(from) = &self.from {
            if &edge.from_node_id != from {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if &edge.to_node_id != to {
                return false;
            }
        }
        if let Some((key, value)) = &self.property {
            if edge.property(key) != Some(value) {
                return false;
            }
        }
        true
    }
}

/// A named, in-memory property graph.
///
/// # Examples
///
/// ```rust
/// use umbra::{Graph, Node, Edge, Properties, PropertyValue};
///
/// let graph = Graph::new("social")?;
/// graph.add_node(Node::new("alice", ["Person"], [("name", PropertyValue::from("Alice"))]))?;
/// graph.add_node(Node::new("bob", ["Person"], [("name", PropertyValue::from("Bob"))]))?;
/// graph.add_edge(Edge::new("e1", "alice", "bob", "KNOWS", Properties::new()))?;
/// assert_eq!(graph.node_count(), 2);
/// # Ok::<(), umbra::GraphError>(())
/// ```
#[derive(Debug)]
pub struct Graph {
    storage: Storage,
}

impl Graph {
    /// Creates an empty graph with default storage options.
    ///
    /// Empty names are rejected.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_options(name, StorageOptions::default())
    }

    /// Creates an empty graph with explicit concurrency hints.
    pub fn with_options(name: impl Into<String>, options: StorageOptions) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::InvalidArgument("graph name must not be empty"));
        }
        Ok(Self {
            storage: Storage::new(name, options),
        })
    }

    /// Name of this graph.
    pub fn name(&self) -> &str {
        self.storage.name()
    }

    /// Borrow of the underlying storage, for traversal and matrix layers.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Inserts a node; duplicate ids are rejected.
    pub fn add_node(&self, node: Node) -> Result<()> {
        self.storage.put_node(node)
    }

    /// Point lookup of a node.
    pub fn get_node(&self, id: &NodeId) -> Result<Node> {
        self.storage.get_node(id)
    }

    /// Inserts an edge after validating that both endpoints exist.
    ///
    /// A concurrent endpoint delete between validation and insert can still
    /// leave a dangling edge; per-table atomicity is the only guarantee.
    pub fn add_edge(&self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.from_node_id, &edge.to_node_id] {
            if !self.storage.contains_node(endpoint) {
                return Err(GraphError::NodeNotFound(endpoint.as_str().to_owned()));
            }
        }
        self.storage.put_edge(edge)
    }

    /// Point lookup of an edge.
    pub fn get_edge(&self, id: &EdgeId) -> Result<Edge> {
        self.storage.get_edge(id)
    }

    /// Deletes an edge.
    pub fn delete_edge(&self, id: &EdgeId) -> Result<()> {
        self.storage.delete_edge(id).map(|_| ())
    }

    /// Deletes a node, cascading over its incident edges first.
    ///
    /// The cascade completes before the node row disappears, so a reader
    /// that still observes the node never observes dangling edges.
    pub fn delete_node(&self, id: &NodeId) -> Result<()> {
        if !self.storage.contains_node(id) {
            return Err(GraphError::NotFound("node"));
        }
        let incident = self.storage.get_edges_for_node(id);
        debug!(node = %id, edges = incident.len(), "cascading node delete");
        for edge in &incident {
            // A concurrent delete may have raced us to an edge; that is fine.
            match self.storage.delete_edge(&edge.id) {
                Ok(_) | Err(GraphError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        self.storage.delete_node(id).map(|_| ())
    }

    /// Lists nodes matching a filter.
    ///
    /// Single-field filters use the label or property index; composite
    /// filters scan with a predicate.
    pub fn list_nodes(&self, filter: &NodeFilter) -> Vec<Node> {
        if filter.is_empty() {
            return self.storage.nodes_snapshot();
        }
        match (&filter.label, &filter.property) {
            (Some(label), None) => self.storage.nodes_with_label(label),
            (None, Some((key, value))) => self.storage.nodes_with_property(key, value),
            _ => self
                .storage
                .nodes_snapshot()
                .into_iter()
                .filter(|n| filter.matches(n))
                .collect(),
        }
    }

    /// Lists edges matching a filter (full scan with predicates).
    pub fn list_edges(&self, filter: &EdgeFilter) -> Vec<Edge> {
        self.storage
            .edges_snapshot()
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect()
    }

    /// Outgoing edges of a node, via the adjacency index.
    pub fn get_outgoing_edges(&self, id: &NodeId) -> Vec<Edge> {
        self.storage.outgoing_edges(id)
    }

    /// Incoming edges of a node, via the adjacency index.
    pub fn get_incoming_edges(&self, id: &NodeId) -> Vec<Edge> {
        self.storage.incoming_edges(id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.storage.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.storage.edge_count()
    }
}

//! Concurrent in-memory tables backing a single graph.
//!
//! Storage owns the five tables of the engine: the node and edge primary
//! tables (insertion-ordered), the label index, the property index, and the
//! adjacency index. Each table sits behind its own read-write lock: readers
//! never block readers, and a writer holds exactly the tables its operation
//! touches. A logical graph operation that spans several tables (cascade
//! delete, edge insert) is atomic per table, not across tables; concurrent
//! readers may observe intermediate state between table writes.

mod tables;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgeId, Node, NodeId, PropertyValue};

pub use tables::{AdjacencyRecord, IndexKey};

/// Concurrency hints accepted by [`Storage::new`].
///
/// The hints do not change semantics; they exist so embedding callers can
/// record their access pattern. Every table is safe for concurrent readers
/// with a single writer regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOptions {
    /// Caller expects concurrent readers.
    pub read_concurrency: bool,
    /// Caller expects concurrent writers.
    pub write_concurrency: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            read_concurrency: true,
            write_concurrency: true,
        }
    }
}

type PropertyIndexKey = (String, IndexKey);

/// Concurrent node/edge tables plus secondary indexes for one graph.
#[derive(Debug)]
pub struct Storage {
    name: String,
    options: StorageOptions,
    nodes: RwLock<IndexMap<NodeId, Node>>,
    edges: RwLock<IndexMap<EdgeId, Edge>>,
    label_index: RwLock<FxHashMap<String, FxHashSet<NodeId>>>,
    property_index: RwLock<FxHashMap<PropertyIndexKey, FxHashSet<NodeId>>>,
    adjacency: RwLock<FxHashMap<NodeId, AdjacencyRecord>>,
}

impl Storage {
    /// Creates an empty storage handle identified by a graph name.
    pub fn new(name: impl Into<String>, options: StorageOptions) -> Self {
        Self {
            name: name.into(),
            options,
            nodes: RwLock::new(IndexMap::new()),
            edges: RwLock::new(IndexMap::new()),
            label_index: RwLock::new(FxHashMap::default()),
            property_index: RwLock::new(FxHashMap::default()),
            adjacency: RwLock::new(FxHashMap::default()),
        }
    }

    /// Name of the graph this storage belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concurrency hints this storage was created with.
    pub fn options(&self) -> StorageOptions {
        self.options
    }

    /// Inserts a node and populates the label and property indexes.
    ///
    /// Duplicate ids are rejected so the indexes never hold stale entries
    /// from an overwritten row.
    pub fn put_node(&self, node: Node) -> Result<()> {
        let mut nodes = self.nodes.write();
        if nodes.contains_key(&node.id) {
            return Err(GraphError::AlreadyExists("node"));
        }
        {
            let mut labels = self.label_index.write();
            for label in &node.labels {
                labels
                    .entry(label.clone())
                    .or_default()
                    .insert(node.id.clone());
            }
        }
        {
            let mut props = self.property_index.write();
            for (key, value) in &node.properties {
                match IndexKey::from_value(value) {
                    Some(index_key) => {
                        props
                            .entry((key.clone(), index_key))
                            .or_default()
                            .insert(node.id.clone());
                    }
                    None => {
                        warn!(node = %node.id, key = %key, "property value not indexable, scan-only");
                    }
                }
            }
        }
        nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Point lookup of a node.
    pub fn get_node(&self, id: &NodeId) -> Result<Node> {
        self.nodes
            .read()
            .get(id)
            .cloned()
            .ok_or(GraphError::NotFound("node"))
    }

    /// True when the node exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.read().contains_key(id)
    }

    /// Deletes a node row together with its index and adjacency entries.
    ///
    /// Incident edges are NOT touched here; [`crate::graph::Graph`] cascades
    /// edge deletion before removing the node row.
    pub fn delete_node(&self, id: &NodeId) -> Result<Node> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .shift_remove(id)
            .ok_or(GraphError::NotFound("node"))?;
        {
            let mut labels = self.label_index.write();
            for label in &node.labels {
                if let Some(members) = labels.get_mut(label) {
                    members.remove(id);
                    if members.is_empty() {
                        labels.remove(label);
                    }
                }
            }
        }
        {
            let mut props = self.property_index.write();
            for (key, value) in &node.properties {
                if let Some(index_key) = IndexKey::from_value(value) {
                    let entry = (key.clone(), index_key);
                    if let Some(members) = props.get_mut(&entry) {
                        members.remove(id);
                        if members.is_empty() {
                            props.remove(&entry);
                        }
                    }
                }
            }
        }
        self.adjacency.write().remove(id);
        Ok(node)
    }

    /// Inserts an edge and appends it to both endpoint adjacency lists.
    ///
    /// Endpoint existence is the coordinator's concern; adjacency records
    /// are created lazily for whatever endpoints the edge names.
    pub fn put_edge(&self, edge: Edge) -> Result<()> {
        let mut edges = self.edges.write();
        if edges.contains_key(&edge.id) {
            return Err(GraphError::AlreadyExists("edge"));
        }
        {
            let mut adjacency = self.adjacency.write();
            adjacency
                .entry(edge.from_node_id.clone())
                .or_default()
                .outgoing
                .push(edge.id.clone());
            adjacency
                .entry(edge.to_node_id.clone())
                .or_default()
                .incoming
                .push(edge.id.clone());
        }
        edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Point lookup of an edge.
    pub fn get_edge(&self, id: &EdgeId) -> Result<Edge> {
        self.edges
            .read()
            .get(id)
            .cloned()
            .ok_or(GraphError::NotFound("edge"))
    }

    /// Deletes an edge row and strips it from both endpoint adjacency lists.
    ///
    /// Missing adjacency records are tolerated silently; a cascading node
    /// delete may already have dropped them.
    pub fn delete_edge(&self, id: &EdgeId) -> Result<Edge> {
        let mut edges = self.edges.write();
        let edge = edges
            .shift_remove(id)
            .ok_or(GraphError::NotFound("edge"))?;
        let mut adjacency = self.adjacency.write();
        for endpoint in [&edge.from_node_id, &edge.to_node_id] {
            if let Some(record) = adjacency.get_mut(endpoint) {
                record.remove_edge(id);
                if record.is_empty() {
                    adjacency.remove(endpoint);
                }
            }
        }
        Ok(edge)
    }

    /// All edges incident to a node, deduplicated across directions.
    ///
    /// Adjacency entries pointing at a missing edge row are filtered out and
    /// logged; they can only appear transiently under concurrent mutation.
    pub fn get_edges_for_node(&self, id: &NodeId) -> Vec<Edge> {
        let ids = match self.adjacency.read().get(id) {
            Some(record) => record.edge_ids(),
            None => return Vec::new(),
        };
        let edges = self.edges.read();
        ids.iter()
            .filter_map(|edge_id| {
                let found = edges.get(edge_id).cloned();
                if found.is_none() {
                    warn!(node = %id, edge = %edge_id, "adjacency entry points at missing edge");
                }
                found
            })
            .collect()
    }

    /// Outgoing edges of a node, resolved through the edge table.
    pub fn outgoing_edges(&self, id: &NodeId) -> Vec<Edge> {
        self.directed_edges(id, |record| &record.outgoing)
    }

    /// Incoming edges of a node, resolved through the edge table.
    pub fn incoming_edges(&self, id: &NodeId) -> Vec<Edge> {
        self.directed_edges(id, |record| &record.incoming)
    }

    fn directed_edges<F>(&self, id: &NodeId, select: F) -> Vec<Edge>
    where
        F: Fn(&AdjacencyRecord) -> &smallvec::SmallVec<[EdgeId; 4]>,
    {
        let ids: Vec<EdgeId> = match self.adjacency.read().get(id) {
            Some(record) => select(record).iter().cloned().collect(),
            None => return Vec::new(),
        };
        let edges = self.edges.read();
        ids.iter()
            .filter_map(|edge_id| edges.get(edge_id).cloned())
            .collect()
    }

    /// Nodes carrying a label, via the label index. Order is unspecified.
    pub fn nodes_with_label(&self, label: &str) -> Vec<Node> {
        let ids: Vec<NodeId> = match self.label_index.read().get(label) {
            Some(members) => members.iter().cloned().collect(),
            None => return Vec::new(),
        };
        let nodes = self.nodes.read();
        ids.iter().filter_map(|id| nodes.get(id).cloned()).collect()
    }

    /// Nodes whose property `key` structurally equals `value`, via the
    /// property index. Order is unspecified.
    pub fn nodes_with_property(&self, key: &str, value: &PropertyValue) -> Vec<Node> {
        let Some(index_key) = IndexKey::from_value(value) else {
            // NaN never compares equal, so the empty answer is exact.
            return Vec::new();
        };
        let entry = (key.to_owned(), index_key);
        let ids: Vec<NodeId> = match self.property_index.read().get(&entry) {
            Some(members) => members.iter().cloned().collect(),
            None => return Vec::new(),
        };
        let nodes = self.nodes.read();
        ids.iter().filter_map(|id| nodes.get(id).cloned()).collect()
    }

    /// Snapshot of every node in insertion order.
    pub fn nodes_snapshot(&self) -> Vec<Node> {
        self.nodes.read().values().cloned().collect()
    }

    /// Snapshot of every node id in insertion order.
    pub fn node_ids_snapshot(&self) -> Vec<NodeId> {
        self.nodes.read().keys().cloned().collect()
    }

    /// Snapshot of every edge in insertion order.
    pub fn edges_snapshot(&self) -> Vec<Edge> {
        self.edges.read().values().cloned().collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }

    /// Clone of a node's adjacency record, if it has one.
    pub fn adjacency_record(&self, id: &NodeId) -> Option<AdjacencyRecord> {
        self.adjacency.read().get(id).cloned()
    }

    #[cfg(test)]
    fn label_entry_count(&self, label: &str) -> usize {
        self.label_index
            .read()
            .get(label)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    #[cfg(test)]
    fn property_entry_count(&self, key: &str, value: &PropertyValue) -> usize {
        IndexKey::from_value(value)
            .and_then(|k| {
                self.property_index
                    .read()
                    .get(&(key.to_owned(), k))
                    .map(|m| m.len())
            })
            .unwrap_or(0)
    }
}

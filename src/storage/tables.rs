//! Table internals: adjacency records and hashable property-index keys.

use smallvec::SmallVec;

use crate::model::{EdgeId, PropertyValue};

/// Per-node record of incident edge ids.
///
/// Lists keep insertion order; an edge id appears at most once per list
/// because duplicate edge inserts are rejected upstream.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyRecord {
    /// Edges whose target is this node.
    pub incoming: SmallVec<[EdgeId; 4]>,
    /// Edges whose source is this node.
    pub outgoing: SmallVec<[EdgeId; 4]>,
}

impl AdjacencyRecord {
    /// Strips an edge id from both direction lists.
    pub fn remove_edge(&mut self, id: &EdgeId) {
        self.incoming.retain(|e| e != id);
        self.outgoing.retain(|e| e != id);
    }

    /// Deduplicated union of incoming and outgoing edge ids.
    ///
    /// Self-loops appear in both lists under the same id; the union yields
    /// them once.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        let mut out: Vec<EdgeId> = Vec::with_capacity(self.incoming.len() + self.outgoing.len());
        for id in self.outgoing.iter().chain(self.incoming.iter()) {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// True when both direction lists are empty.
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty()
    }
}

/// Hashable key form of a property value, used by the property index.
///
/// Mirrors [`PropertyValue`] structurally; floats are keyed by their bit
/// pattern so `1.5` always maps to the same bucket. NaN has no key and is
/// therefore unindexable (it never compares equal anyway).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Null literal.
    Null,
    /// Boolean key.
    Bool(bool),
    /// Integer key.
    Int(i64),
    /// Float key, stored as the raw bit pattern.
    Float(u64),
    /// String key.
    String(String),
    /// List key, element-wise.
    List(Vec<IndexKey>),
    /// Map key; entries carry the map's sorted iteration order.
    Map(Vec<(String, IndexKey)>),
}

impl IndexKey {
    /// Builds the index key for a value, or `None` when the value contains
    /// NaN anywhere and cannot be indexed.
    pub fn from_value(value: &PropertyValue) -> Option<IndexKey> {
        match value {
            PropertyValue::Null => Some(IndexKey::Null),
            PropertyValue::Bool(v) => Some(IndexKey::Bool(*v)),
            PropertyValue::Int(v) => Some(IndexKey::Int(*v)),
            PropertyValue::Float(v) => {
                if v.is_nan() {
                    None
                } else {
                    Some(IndexKey::Float(v.to_bits()))
                }
            }
            PropertyValue::String(v) => Some(IndexKey::String(v.clone())),
            PropertyValue::List(items) => items
                .iter()
                .map(IndexKey::from_value)
                .collect::<Option<Vec<_>>>()
                .map(IndexKey::List),
            PropertyValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| IndexKey::from_value(v).map(|key| (k.clone(), key)))
                .collect::<Option<Vec<_>>>()
                .map(IndexKey::Map),
        }
    }
}

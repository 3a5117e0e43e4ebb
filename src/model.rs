//! Data models for graph entities.
//!
//! This module defines the core data structures used to represent nodes,
//! edges, and their properties.
//!
//! # Key Types
//!
//! - [`Node`] - A graph node with labels and properties
//! - [`Edge`] - A directed, typed edge between two nodes
//! - [`PropertyValue`] - Tagged sum of the supported property types
//! - [`NodeId`] / [`EdgeId`] - Opaque identifiers for nodes and edges
//!
//! # Examples
//!
//! ```rust
//! use umbra::model::{Node, Edge, Properties, PropertyValue};
//!
//! let alice = Node::new(
//!     "alice",
//!     ["Person"],
//!     [("name", PropertyValue::from("Alice"))],
//! );
//! let bob = Node::new("bob", ["Person"], Properties::new());
//! let knows = Edge::new("e1", "alice", "bob", "KNOWS", Properties::new());
//! assert_eq!(knows.relationship_type, "KNOWS");
//! assert!(alice.updated_at >= alice.created_at);
//! # let _ = bob;
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Unique identifier for nodes in a graph.
///
/// Ids are opaque tokens supplied by the caller; they are hashable, totally
/// ordered, and cheap to clone across bindings and matrix mappings.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct NodeId(Arc<str>);

/// Unique identifier for edges in a graph.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct EdgeId(Arc<str>);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(Arc::from(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(Arc::from(value.as_str()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_impls!(NodeId);
id_impls!(EdgeId);

/// Represents a property value that can be stored on nodes and edges.
///
/// Values are schemaless; maps and lists nest arbitrarily. Equality is
/// structural. Ordering is only defined within a single comparable type,
/// except that integers and floats compare numerically against each other.
///
/// # Examples
///
/// ```rust
/// use umbra::model::PropertyValue;
///
/// let name = PropertyValue::String("Alice".to_string());
/// let age = PropertyValue::Int(30);
/// let score = PropertyValue::Float(95.5);
/// let tags = PropertyValue::List(vec![PropertyValue::from("admin")]);
/// assert!(age.partial_cmp_value(&score).is_some());
/// assert!(name.partial_cmp_value(&age).is_none());
/// # let _ = tags;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum PropertyValue {
    /// Null literal.
    Null,
    /// Boolean value (true/false)
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered list of nested values
    List(Vec<PropertyValue>),
    /// String-keyed map of nested values
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Compares two values, yielding `None` for unordered cross-type pairs.
    ///
    /// Integers and floats compare numerically; everything else orders only
    /// against its own type.
    pub fn partial_cmp_value(&self, other: &PropertyValue) -> Option<Ordering> {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a.partial_cmp(b),
            (PropertyValue::Int(a), PropertyValue::Int(b)) => a.partial_cmp(b),
            (PropertyValue::Float(a), PropertyValue::Float(b)) => a.partial_cmp(b),
            (PropertyValue::Int(a), PropertyValue::Float(b)) => (*a as f64).partial_cmp(b),
            (PropertyValue::Float(a), PropertyValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (PropertyValue::String(a), PropertyValue::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Equality with numeric Int/Float promotion.
    ///
    /// Structural equality (`==`) keeps `Int(1)` and `Float(1.0)` distinct;
    /// query comparisons treat them as equal.
    pub fn loose_eq(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::Int(a), PropertyValue::Float(b)) => (*a as f64) == *b,
            (PropertyValue::Float(a), PropertyValue::Int(b)) => *a == (*b as f64),
            _ => self == other,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

/// Property map attached to nodes and edges.
pub type Properties = BTreeMap<String, PropertyValue>;

fn properties_from<K, I>(pairs: I) -> Properties
where
    K: Into<String>,
    I: IntoIterator<Item = (K, PropertyValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

fn dedup_labels<L, I>(labels: I) -> Vec<String>
where
    L: Into<String>,
    I: IntoIterator<Item = L>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.into();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// Represents a node in the graph.
///
/// Nodes carry an unordered set of labels (stored deduplicated, in first-seen
/// order) and a schemaless property map. Mutation goes through storage, which
/// keeps the secondary indexes in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Labels that categorize this node
    pub labels: Vec<String>,
    /// Properties as key-value pairs
    pub properties: Properties,
    /// Creation timestamp (UTC).
    pub created_at: OffsetDateTime,
    /// Last-update timestamp; never earlier than `created_at`.
    pub updated_at: OffsetDateTime,
}

impl Node {
    /// Creates a new node with the given id, labels, and properties.
    ///
    /// Duplicate labels are dropped; both timestamps are set to now.
    ///
    /// # Example
    /// ```rust
    /// use umbra::model::{Node, PropertyValue};
    ///
    /// let node = Node::new("alice", ["Person", "Person"], [("age", PropertyValue::Int(30))]);
    /// assert_eq!(node.labels, vec!["Person".to_string()]);
    /// ```
    pub fn new<Id, L, LI, K, PI>(id: Id, labels: LI, properties: PI) -> Self
    where
        Id: Into<NodeId>,
        L: Into<String>,
        LI: IntoIterator<Item = L>,
        K: Into<String>,
        PI: IntoIterator<Item = (K, PropertyValue)>,
    {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            labels: dedup_labels(labels),
            properties: properties_from(properties),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the node carries the given label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Looks up a property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// Represents a directed edge connecting two nodes in the graph.
///
/// Edges carry exactly one relationship type and a property map. Both
/// endpoints must exist in the same graph when the edge is created; deleting
/// an endpoint cascades to its incident edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// ID of the source node
    pub from_node_id: NodeId,
    /// ID of the target node
    pub to_node_id: NodeId,
    /// Type of the relationship
    pub relationship_type: String,
    /// Properties as key-value pairs
    pub properties: Properties,
    /// Creation timestamp (UTC).
    pub created_at: OffsetDateTime,
    /// Last-update timestamp; never earlier than `created_at`.
    pub updated_at: OffsetDateTime,
}

impl Edge {
    /// Creates a new edge with the given endpoints and relationship type.
    ///
    /// # Example
    /// ```rust
    /// use umbra::model::{Edge, Properties};
    ///
    /// let edge = Edge::new("e1", "alice", "bob", "KNOWS", Properties::new());
    /// assert_eq!(edge.from_node_id.as_str(), "alice");
    /// assert_eq!(edge.to_node_id.as_str(), "bob");
    /// ```
    pub fn new<Id, F, T, R, K, PI>(
        id: Id,
        from_node_id: F,
        to_node_id: T,
        relationship_type: R,
        properties: PI,
    ) -> Self
    where
        Id: Into<EdgeId>,
        F: Into<NodeId>,
        T: Into<NodeId>,
        R: Into<String>,
        K: Into<String>,
        PI: IntoIterator<Item = (K, PropertyValue)>,
    {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            relationship_type: relationship_type.into(),
            properties: properties_from(properties),
            created_at: now,
            updated_at: now,
        }
    }

    /// Looks up a property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Given one endpoint, returns the opposite one.
    ///
    /// Returns `None` when the supplied id is not an endpoint of this edge.
    pub fn other_endpoint(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.from_node_id == id {
            Some(&self.to_node_id)
        } else if &self.to_node_id == id {
            Some(&self.from_node_id)
        } else {
            None
        }
    }
}

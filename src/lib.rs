//! # Umbra - Embedded In-Memory Property-Graph Engine
//!
//! Umbra is an embedded property-graph engine with concurrent in-memory
//! storage, a Cypher-subset query language, graph-traversal primitives, and
//! an algebraic adjacency-matrix layer with semiring-generalized
//! multiplication.
//!
//! ## Quick Start
//!
//! ```rust
//! use umbra::{Graph, Node, Edge, Properties, PropertyValue};
//! use umbra::query;
//!
//! let graph = Graph::new("social")?;
//!
//! // Create nodes
//! graph.add_node(Node::new("alice", ["Person"], [("name", PropertyValue::from("Alice"))]))?;
//! graph.add_node(Node::new("bob", ["Person"], [("name", PropertyValue::from("Bob"))]))?;
//!
//! // Create an edge between nodes
//! graph.add_edge(Edge::new("e1", "alice", "bob", "KNOWS", Properties::new()))?;
//!
//! // Query the graph
//! let result = query::execute(&graph, "MATCH (n:Person) RETURN n.name")?;
//! assert_eq!(result.rows.len(), 2);
//! # Ok::<(), umbra::GraphError>(())
//! ```
//!
//! ## Features
//!
//! - **Concurrent Storage**: Per-table read-write locks; readers never block readers
//! - **Secondary Indexes**: Label, property, and adjacency indexes kept in step with every write
//! - **Query Language**: MATCH/WHERE/RETURN text subset plus a builder for the full AST
//! - **Traversal**: BFS neighborhood expansion and unweighted shortest path
//! - **Matrix Algebra**: Dense and sparse-COO adjacency matrices with transpose, multiply, and powers
//! - **Semirings**: Boolean, tropical, counting, and probability multiplication for reachability,
//!   shortest paths, path counting, and probabilistic reach
//!
//! ## Architecture
//!
//! Umbra is layered, leaves first:
//! - **Model**: node and edge records with labels, properties, and timestamps
//! - **Storage**: concurrent primary tables plus secondary indexes
//! - **Graph**: CRUD coordination with referential validation and cascade delete
//! - **Traversal / Matrix / Query**: pure functions over a graph reference
//!
//! Matrices snapshot the graph at construction time and are independent of
//! later mutations; queries run over storage snapshots and point lookups.

pub mod error;
pub mod graph;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod query;
pub mod storage;
pub mod traversal;

// Re-export the main public API
pub use crate::error::{GraphError, Result};
pub use crate::graph::{EdgeFilter, Graph, NodeFilter};
pub use crate::matrix::{AdjacencyMatrix, CooMatrix, MatrixData, MatrixKind, Semiring, SemiringKind};
pub use crate::model::{Edge, EdgeId, Node, NodeId, Properties, PropertyValue};
pub use crate::storage::{Storage, StorageOptions};
pub use crate::traversal::{shortest_path, traverse, Direction, TraversalOptions};

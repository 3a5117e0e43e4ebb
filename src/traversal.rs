//! BFS neighborhood expansion and unweighted shortest path.
//!
//! Both primitives walk the adjacency index through [`Storage`] accessors and
//! never mutate the graph. They are CPU-bound and run to completion on the
//! calling thread.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::model::{Node, NodeId};
use crate::storage::Storage;

/// Direction selector for edge traversals.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Direction {
    /// Follow edges out of the current node.
    #[default]
    Outgoing,
    /// Follow edges into the current node.
    Incoming,
    /// Follow edges either way.
    Both,
}

/// Options accepted by [`traverse`].
#[derive(Clone, Copy, Debug)]
pub struct TraversalOptions {
    /// Maximum number of hops from the start node, inclusive.
    pub max_depth: usize,
    /// Which incident edges to follow at each hop.
    pub direction: Direction,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            direction: Direction::Both,
        }
    }
}

fn neighbors(storage: &Storage, id: &NodeId, direction: Direction) -> Vec<NodeId> {
    let mut out = Vec::new();
    if matches!(direction, Direction::Outgoing | Direction::Both) {
        for edge in storage.outgoing_edges(id) {
            out.push(edge.to_node_id);
        }
    }
    if matches!(direction, Direction::Incoming | Direction::Both) {
        for edge in storage.incoming_edges(id) {
            out.push(edge.from_node_id);
        }
    }
    out
}

/// Expands the neighborhood of `start` breadth-first.
///
/// Returns every node reachable within `max_depth` hops, including the start
/// node itself. A visited set prevents re-expansion; nodes surface in BFS
/// discovery order, which follows adjacency insertion order per level.
///
/// Fails with `NotFound` when the start node is absent.
pub fn traverse(graph: &Graph, start: &NodeId, options: TraversalOptions) -> Result<Vec<Node>> {
    let storage = graph.storage();
    let start_node = storage.get_node(start)?;

    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
    let mut reached: Vec<Node> = vec![start_node];
    visited.insert(start.clone());
    queue.push_back((start.clone(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= options.max_depth {
            continue;
        }
        for neighbor in neighbors(storage, &current, options.direction) {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            // Tolerate an edge whose endpoint vanished mid-walk.
            if let Ok(node) = storage.get_node(&neighbor) {
                reached.push(node);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }
    Ok(reached)
}

/// Unweighted shortest path between two nodes over undirected adjacency.
///
/// A step may traverse an edge in either direction. Returns the node-id
/// sequence from `from` to `to` (`[from]` when the endpoints coincide), with
/// ties broken by first discovery. Fails with `NotFound` when either
/// endpoint is absent and `NoPath` when the endpoints are disconnected.
pub fn shortest_path(graph: &Graph, from: &NodeId, to: &NodeId) -> Result<Vec<NodeId>> {
    let storage = graph.storage();
    storage.get_node(from)?;
    storage.get_node(to)?;
    if from == to {
        return Ok(vec![from.clone()]);
    }

    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    visited.insert(from.clone());
    queue.push_back(from.clone());

    while let Some(current) = queue.pop_front() {
        for neighbor in neighbors(storage, &current, Direction::Both) {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            parent.insert(neighbor.clone(), current.clone());
            if &neighbor == to {
                return Ok(reconstruct(&parent, from, to));
            }
            queue.push_back(neighbor);
        }
    }
    Err(GraphError::NoPath)
}

fn reconstruct(parent: &FxHashMap<NodeId, NodeId>, from: &NodeId, to: &NodeId) -> Vec<NodeId> {
    let mut path = vec![to.clone()];
    let mut cursor = to;
    while cursor != from {
        // Every visited node except the start has a parent entry.
        let Some(prev) = parent.get(cursor) else {
            break;
        };
        path.push(prev.clone());
        cursor = prev;
    }
    path.reverse();
    path
}

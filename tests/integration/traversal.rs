#![allow(missing_docs)]

use umbra::{
    shortest_path, traverse, Direction, Edge, Graph, GraphError, Node, NodeId, Properties,
    TraversalOptions,
};

fn chain_graph() -> Graph {
    // a -> b -> c
    let graph = Graph::new("chain").unwrap();
    for id in ["a", "b", "c"] {
        graph
            .add_node(Node::new(id, ["Step"], Properties::new()))
            .unwrap();
    }
    graph
        .add_edge(Edge::new("ab", "a", "b", "NEXT", Properties::new()))
        .unwrap();
    graph
        .add_edge(Edge::new("bc", "b", "c", "NEXT", Properties::new()))
        .unwrap();
    graph
}

fn id_set(nodes: &[Node]) -> Vec<&str> {
    let mut ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    ids.sort();
    ids
}

#[test]
fn two_hop_neighborhood_contains_whole_chain() {
    let graph = chain_graph();
    let reached = traverse(
        &graph,
        &NodeId::from("a"),
        TraversalOptions {
            max_depth: 2,
            direction: Direction::Both,
        },
    )
    .unwrap();
    assert_eq!(id_set(&reached), vec!["a", "b", "c"]);
}

#[test]
fn depth_zero_returns_only_the_start() {
    let graph = chain_graph();
    let reached = traverse(
        &graph,
        &NodeId::from("b"),
        TraversalOptions {
            max_depth: 0,
            direction: Direction::Both,
        },
    )
    .unwrap();
    assert_eq!(id_set(&reached), vec!["b"]);
}

#[test]
fn direction_limits_expansion() {
    let graph = chain_graph();
    let outgoing = traverse(
        &graph,
        &NodeId::from("a"),
        TraversalOptions {
            max_depth: 5,
            direction: Direction::Outgoing,
        },
    )
    .unwrap();
    assert_eq!(id_set(&outgoing), vec!["a", "b", "c"]);

    let incoming = traverse(
        &graph,
        &NodeId::from("a"),
        TraversalOptions {
            max_depth: 5,
            direction: Direction::Incoming,
        },
    )
    .unwrap();
    assert_eq!(id_set(&incoming), vec!["a"]);
}

#[test]
fn cycles_do_not_loop_forever() {
    let graph = chain_graph();
    graph
        .add_edge(Edge::new("ca", "c", "a", "NEXT", Properties::new()))
        .unwrap();
    let reached = traverse(
        &graph,
        &NodeId::from("a"),
        TraversalOptions {
            max_depth: 10,
            direction: Direction::Outgoing,
        },
    )
    .unwrap();
    assert_eq!(id_set(&reached), vec!["a", "b", "c"]);
}

#[test]
fn shortest_path_follows_the_chain() {
    let graph = chain_graph();
    let path = shortest_path(&graph, &NodeId::from("a"), &NodeId::from("c")).unwrap();
    let ids: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn shortest_path_is_undirected() {
    let graph = chain_graph();
    let path = shortest_path(&graph, &NodeId::from("c"), &NodeId::from("a")).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path.first().map(|id| id.as_str()), Some("c"));
    assert_eq!(path.last().map(|id| id.as_str()), Some("a"));
}

#[test]
fn shortest_path_errors() {
    let graph = chain_graph();
    graph
        .add_node(Node::new("island", ["Step"], Properties::new()))
        .unwrap();

    assert!(matches!(
        shortest_path(&graph, &NodeId::from("a"), &NodeId::from("island")),
        Err(GraphError::NoPath)
    ));
    assert!(matches!(
        shortest_path(&graph, &NodeId::from("a"), &NodeId::from("nowhere")),
        Err(GraphError::NotFound("node"))
    ));
}

#[test]
fn shortest_path_picks_minimum_hop_route() {
    let graph = chain_graph();
    // Direct shortcut shortens a..c to one hop.
    graph
        .add_edge(Edge::new("ac", "a", "c", "NEXT", Properties::new()))
        .unwrap();
    let path = shortest_path(&graph, &NodeId::from("a"), &NodeId::from("c")).unwrap();
    assert_eq!(path.len(), 2);
}

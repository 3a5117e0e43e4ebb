#![allow(missing_docs)]

use umbra::{
    AdjacencyMatrix, Edge, Graph, MatrixKind, Node, NodeId, Properties, PropertyValue, Semiring,
};

fn chain_abc() -> Graph {
    // A -> B -> C
    let graph = Graph::new("reach").unwrap();
    for id in ["A", "B", "C"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    graph
        .add_edge(Edge::new("ab", "A", "B", "LINK", Properties::new()))
        .unwrap();
    graph
        .add_edge(Edge::new("bc", "B", "C", "LINK", Properties::new()))
        .unwrap();
    graph
}

#[test]
fn boolean_square_detects_two_hop_reachability() {
    let graph = chain_abc();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.semiring_power(2, &Semiring::boolean()).unwrap();

    // A walk of exactly length 2 exists from A to C, and nowhere back to A.
    assert_eq!(squared.get(&NodeId::from("A"), &NodeId::from("C")), Some(1.0));
    assert_eq!(squared.get(&NodeId::from("A"), &NodeId::from("A")), Some(0.0));
    assert_eq!(squared.get(&NodeId::from("C"), &NodeId::from("A")), Some(0.0));
}

#[test]
fn boolean_power_works_from_sparse_inputs() {
    let graph = chain_abc();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
    let squared = matrix.semiring_power(2, &Semiring::boolean()).unwrap();
    assert_eq!(squared.get(&NodeId::from("A"), &NodeId::from("C")), Some(1.0));
}

#[test]
fn tropical_square_beats_the_direct_edge() {
    // A -> B (2), B -> C (3), A -> C (7)
    let graph = Graph::new("paths").unwrap();
    for id in ["A", "B", "C"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    for (edge, from, to, w) in [
        ("ab", "A", "B", 2.0),
        ("bc", "B", "C", 3.0),
        ("ac", "A", "C", 7.0),
    ] {
        graph
            .add_edge(Edge::new(
                edge,
                from,
                to,
                "ROAD",
                [("weight", PropertyValue::Float(w))],
            ))
            .unwrap();
    }

    let tropical = Semiring::tropical();
    let closed = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense).semiring_weights(&tropical);

    // Off-graph entries are +∞ and the diagonal is 0.
    assert_eq!(closed.get(&NodeId::from("A"), &NodeId::from("A")), Some(0.0));
    assert_eq!(
        closed.get(&NodeId::from("C"), &NodeId::from("A")),
        Some(f64::INFINITY)
    );

    let squared = closed.semiring_power(2, &tropical).unwrap();
    // The two-hop route A->B->C costs 5 and beats the direct 7.
    assert_eq!(squared.get(&NodeId::from("A"), &NodeId::from("C")), Some(5.0));
    // Unreachable pairs stay infinite.
    assert_eq!(
        squared.get(&NodeId::from("C"), &NodeId::from("A")),
        Some(f64::INFINITY)
    );
}

#[test]
fn tropical_longer_horizon_keeps_shorter_walks() {
    // Diagonal 0 makes A^k the ≤-k-hop distance matrix.
    let graph = Graph::new("horizon").unwrap();
    for id in ["A", "B", "C", "D"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    for (edge, from, to, w) in [
        ("ab", "A", "B", 1.0),
        ("bc", "B", "C", 1.0),
        ("cd", "C", "D", 1.0),
    ] {
        graph
            .add_edge(Edge::new(
                edge,
                from,
                to,
                "ROAD",
                [("weight", PropertyValue::Float(w))],
            ))
            .unwrap();
    }
    let tropical = Semiring::tropical();
    let closed = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense).semiring_weights(&tropical);
    let cubed = closed.semiring_power(3, &tropical).unwrap();

    assert_eq!(cubed.get(&NodeId::from("A"), &NodeId::from("D")), Some(3.0));
    // One-hop distances survive the higher power.
    assert_eq!(cubed.get(&NodeId::from("A"), &NodeId::from("B")), Some(1.0));
}

#[test]
fn counting_square_enumerates_two_hop_walks() {
    // Two distinct routes from S to T.
    let graph = Graph::new("count").unwrap();
    for id in ["S", "X", "Y", "T"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    for (edge, from, to) in [
        ("sx", "S", "X"),
        ("sy", "S", "Y"),
        ("xt", "X", "T"),
        ("yt", "Y", "T"),
    ] {
        graph
            .add_edge(Edge::new(edge, from, to, "HOP", Properties::new()))
            .unwrap();
    }
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.semiring_power(2, &Semiring::counting()).unwrap();
    assert_eq!(squared.get(&NodeId::from("S"), &NodeId::from("T")), Some(2.0));
}

#[test]
fn probability_square_combines_independent_routes() {
    let graph = Graph::new("prob").unwrap();
    for id in ["S", "X", "Y", "T"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    for (edge, from, to) in [
        ("sx", "S", "X"),
        ("sy", "S", "Y"),
        ("xt", "X", "T"),
        ("yt", "Y", "T"),
    ] {
        graph
            .add_edge(Edge::new(
                edge,
                from,
                to,
                "HOP",
                [("weight", PropertyValue::Float(0.5))],
            ))
            .unwrap();
    }
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix
        .semiring_power(2, &Semiring::probability())
        .unwrap();
    let p = squared
        .get(&NodeId::from("S"), &NodeId::from("T"))
        .unwrap();
    // Each route succeeds with 0.25; either-route probability is 0.4375.
    assert!((p - 0.4375).abs() < 1e-12);
}

#[test]
fn custom_semiring_is_usable_end_to_end() {
    let graph = chain_abc();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    // max-times over unit weights behaves like boolean reachability.
    let widest = Semiring::custom("max-times", 0.0, 1.0, f64::max, |a, b| a * b);
    let squared = matrix.semiring_power(2, &widest).unwrap();
    assert_eq!(squared.get(&NodeId::from("A"), &NodeId::from("C")), Some(1.0));
}

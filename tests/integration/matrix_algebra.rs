#![allow(missing_docs)]

use proptest::prelude::*;
use umbra::{
    AdjacencyMatrix, Edge, Graph, GraphError, MatrixKind, Node, NodeId, Properties, PropertyValue,
};

fn weighted_graph() -> Graph {
    let graph = Graph::new("weights").unwrap();
    for id in ["a", "b", "c"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    graph
        .add_edge(Edge::new(
            "ab",
            "a",
            "b",
            "LINK",
            [("weight", PropertyValue::Int(1))],
        ))
        .unwrap();
    graph
        .add_edge(Edge::new(
            "bc",
            "b",
            "c",
            "LINK",
            [("weight", PropertyValue::Float(2.5))],
        ))
        .unwrap();
    graph
}

#[test]
fn dense_round_trip_recovers_the_edge_set() {
    let graph = weighted_graph();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let mut edges = matrix.to_edges();
    edges.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(
        edges,
        vec![
            (NodeId::from("a"), NodeId::from("b"), 1.0),
            (NodeId::from("b"), NodeId::from("c"), 2.5),
        ]
    );
}

#[test]
fn sparse_round_trip_matches_dense() {
    let graph = weighted_graph();
    let dense = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let sparse = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
    let mut from_dense = dense.to_edges();
    let mut from_sparse = sparse.to_edges();
    from_dense.sort_by(|x, y| (x.0.clone(), x.1.clone()).cmp(&(y.0.clone(), y.1.clone())));
    from_sparse.sort_by(|x, y| (x.0.clone(), x.1.clone()).cmp(&(y.0.clone(), y.1.clone())));
    assert_eq!(from_dense, from_sparse);
}

#[test]
fn empty_graph_produces_the_empty_sentinel() {
    let graph = Graph::new("void").unwrap();
    for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
        let matrix = AdjacencyMatrix::from_graph(&graph, kind);
        assert!(matrix.is_empty());
        assert_eq!(matrix.dimensions(), (0, 0));
        assert!(matrix.to_edges().is_empty());
        assert!(matrix.transpose().is_empty());
        assert!(matrix.multiply(&matrix).unwrap().is_empty());
        assert!(matrix.elementwise_add(&matrix).unwrap().is_empty());
    }
}

#[test]
fn multiply_requires_shared_mapping() {
    let left = AdjacencyMatrix::from_graph(&weighted_graph(), MatrixKind::Dense);
    let other_graph = Graph::new("other").unwrap();
    other_graph
        .add_node(Node::new("x", ["N"], Properties::new()))
        .unwrap();
    let right = AdjacencyMatrix::from_graph(&other_graph, MatrixKind::Dense);
    assert!(matches!(
        left.multiply(&right),
        Err(GraphError::IncompatibleMapping)
    ));
    assert!(matches!(
        left.elementwise_add(&right),
        Err(GraphError::IncompatibleMapping)
    ));
}

#[test]
fn multiply_dimensions_follow_the_operands() {
    let graph = weighted_graph();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let product = matrix.multiply(&matrix).unwrap();
    assert_eq!(product.dimensions(), (3, 3));
    assert_eq!(
        product.get(&NodeId::from("a"), &NodeId::from("c")),
        Some(2.5)
    );
}

#[test]
fn power_folds_multiplication() {
    let graph = weighted_graph();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.multiply(&matrix).unwrap();
    let power = matrix.power(2).unwrap();
    assert_eq!(power.data(), squared.data());
    assert!(matches!(
        matrix.power(0),
        Err(GraphError::InvalidArgument(_))
    ));
}

#[test]
fn subgraph_projects_in_caller_order() {
    let graph = weighted_graph();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
    let sub = matrix.subgraph(&[NodeId::from("b"), NodeId::from("c")]);
    assert_eq!(sub.dimensions(), (2, 2));
    assert_eq!(sub.get(&NodeId::from("b"), &NodeId::from("c")), Some(2.5));
    assert_eq!(sub.get(&NodeId::from("b"), &NodeId::from("a")), None);
}

#[test]
fn multi_edges_collapse_identically_in_both_kinds() {
    let graph = Graph::new("multi").unwrap();
    for id in ["a", "b"] {
        graph
            .add_node(Node::new(id, ["N"], Properties::new()))
            .unwrap();
    }
    for (edge, weight) in [("e1", 2.0), ("e2", 5.0), ("e3", 7.0)] {
        graph
            .add_edge(Edge::new(
                edge,
                "a",
                "b",
                "LINK",
                [("weight", PropertyValue::Float(weight))],
            ))
            .unwrap();
    }
    let dense = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let sparse = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
    assert_eq!(dense.get(&NodeId::from("a"), &NodeId::from("b")), Some(7.0));
    assert_eq!(
        sparse.get(&NodeId::from("a"), &NodeId::from("b")),
        Some(7.0)
    );
    assert_eq!(sparse.to_edges().len(), 1);
}

fn arbitrary_graph() -> impl Strategy<Value = Graph> {
    // Up to 5 nodes and one weighted edge per ordered pair.
    (2usize..=5)
        .prop_flat_map(|n| {
            let pairs: Vec<(usize, usize)> = (0..n)
                .flat_map(|r| (0..n).map(move |c| (r, c)))
                .collect();
            (
                Just(n),
                proptest::collection::vec(
                    (proptest::bool::ANY, 1i64..100),
                    pairs.len(),
                ),
                Just(pairs),
            )
        })
        .prop_map(|(n, picks, pairs)| {
            let graph = Graph::new("prop").unwrap();
            for i in 0..n {
                graph
                    .add_node(Node::new(
                        format!("n{i}"),
                        ["N"],
                        Properties::new(),
                    ))
                    .unwrap();
            }
            for ((keep, weight), (r, c)) in picks.into_iter().zip(pairs) {
                if keep {
                    graph
                        .add_edge(Edge::new(
                            format!("e{r}-{c}"),
                            format!("n{r}"),
                            format!("n{c}"),
                            "LINK",
                            [("weight", PropertyValue::Int(weight))],
                        ))
                        .unwrap();
                }
            }
            graph
        })
}

proptest! {
    #[test]
    fn transpose_is_involutive(graph in arbitrary_graph()) {
        for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
            let matrix = AdjacencyMatrix::from_graph(&graph, kind);
            let double_transposed = matrix.transpose().transpose();
            prop_assert_eq!(double_transposed.data(), matrix.data());
        }
    }

    #[test]
    fn conversion_round_trips(graph in arbitrary_graph()) {
        let dense = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
        let back = dense.convert(MatrixKind::Sparse).convert(MatrixKind::Dense);
        prop_assert_eq!(dense.data(), back.data());
    }

    #[test]
    fn to_edges_matches_graph_edges(graph in arbitrary_graph()) {
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
        let mut expected: Vec<(String, String, f64)> = graph
            .list_edges(&umbra::EdgeFilter::any())
            .into_iter()
            .map(|e| {
                let w = e.property("weight").and_then(|v| v.as_f64()).unwrap_or(1.0);
                (
                    e.from_node_id.as_str().to_owned(),
                    e.to_node_id.as_str().to_owned(),
                    w,
                )
            })
            .collect();
        let mut actual: Vec<(String, String, f64)> = matrix
            .to_edges()
            .into_iter()
            .map(|(f, t, w)| (f.as_str().to_owned(), t.as_str().to_owned(), w))
            .collect();
        expected.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        actual.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        // Edge ids are unique per ordered pair here, so no collapse applies.
        prop_assert_eq!(expected, actual);
    }
}

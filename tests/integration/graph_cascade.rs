#![allow(missing_docs)]

use umbra::{
    Edge, EdgeFilter, Graph, GraphError, Node, NodeFilter, NodeId, Properties, PropertyValue,
};

fn knows_graph() -> Graph {
    let graph = Graph::new("social").unwrap();
    graph
        .add_node(Node::new(
            "alice",
            ["Person"],
            [("name", PropertyValue::from("Alice"))],
        ))
        .unwrap();
    graph
        .add_node(Node::new(
            "bob",
            ["Person"],
            [("name", PropertyValue::from("Bob"))],
        ))
        .unwrap();
    graph
        .add_edge(Edge::new("knows", "alice", "bob", "KNOWS", Properties::new()))
        .unwrap();
    graph
}

#[test]
fn delete_node_cascades_incident_edges() {
    let graph = knows_graph();

    graph.delete_node(&NodeId::from("alice")).unwrap();

    assert!(matches!(
        graph.get_node(&NodeId::from("alice")),
        Err(GraphError::NotFound("node"))
    ));
    assert!(graph.get_node(&NodeId::from("bob")).is_ok());
    assert!(graph.list_edges(&EdgeFilter::any()).is_empty());
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn add_edge_without_endpoints_is_rejected() {
    let graph = Graph::new("empty").unwrap();
    let err = graph
        .add_edge(Edge::new("e", "alice", "bob", "KNOWS", Properties::new()))
        .unwrap_err();
    match err {
        GraphError::NodeNotFound(id) => assert_eq!(id, "alice"),
        other => panic!("expected NodeNotFound, got {other:?}"),
    }
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn add_edge_checks_target_endpoint_too() {
    let graph = Graph::new("half").unwrap();
    graph
        .add_node(Node::new("alice", ["Person"], Properties::new()))
        .unwrap();
    let err = graph
        .add_edge(Edge::new("e", "alice", "bob", "KNOWS", Properties::new()))
        .unwrap_err();
    match err {
        GraphError::NodeNotFound(id) => assert_eq!(id, "bob"),
        other => panic!("expected NodeNotFound, got {other:?}"),
    }
}

#[test]
fn label_filter_counts_persons() {
    let graph = knows_graph();
    graph
        .add_node(Node::new(
            "acme",
            ["Organization"],
            [("name", PropertyValue::from("Acme"))],
        ))
        .unwrap();

    assert_eq!(graph.list_nodes(&NodeFilter::label("Person")).len(), 2);
    assert_eq!(
        graph.list_nodes(&NodeFilter::label("Organization")).len(),
        1
    );
    assert_eq!(graph.list_nodes(&NodeFilter::any()).len(), 3);
}

#[test]
fn property_filter_uses_index() {
    let graph = knows_graph();
    let hits = graph.list_nodes(&NodeFilter::property(
        "name",
        PropertyValue::from("Alice"),
    ));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.as_str(), "alice");
}

#[test]
fn deleting_middle_node_keeps_outer_edges_consistent() {
    let graph = knows_graph();
    graph
        .add_node(Node::new("carol", ["Person"], Properties::new()))
        .unwrap();
    graph
        .add_edge(Edge::new("bc", "bob", "carol", "KNOWS", Properties::new()))
        .unwrap();

    graph.delete_node(&NodeId::from("bob")).unwrap();

    assert!(graph.list_edges(&EdgeFilter::any()).is_empty());
    assert!(graph.get_outgoing_edges(&NodeId::from("alice")).is_empty());
    assert!(graph.get_incoming_edges(&NodeId::from("carol")).is_empty());
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn graphs_are_independent_containers() {
    let a = Graph::new("a").unwrap();
    let b = Graph::new("b").unwrap();
    a.add_node(Node::new("n", ["L"], Properties::new())).unwrap();

    assert_eq!(a.name(), "a");
    assert_eq!(b.name(), "b");
    assert_eq!(a.node_count(), 1);
    assert_eq!(b.node_count(), 0);
}

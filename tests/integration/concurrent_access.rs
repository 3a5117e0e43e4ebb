#![allow(missing_docs)]

use std::sync::Arc;
use std::thread;

use umbra::query;
use umbra::{
    shortest_path, traverse, Direction, Edge, Graph, Node, NodeFilter, NodeId, Properties,
    PropertyValue, StorageOptions, TraversalOptions,
};

const WRITERS: usize = 4;
const NODES_PER_WRITER: usize = 50;

#[test]
fn parallel_writers_land_every_node() {
    let graph = Arc::new(
        Graph::with_options(
            "writers",
            StorageOptions {
                read_concurrency: true,
                write_concurrency: true,
            },
        )
        .unwrap(),
    );

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let graph = Arc::clone(&graph);
            scope.spawn(move || {
                for i in 0..NODES_PER_WRITER {
                    graph
                        .add_node(Node::new(
                            format!("w{writer}-n{i}"),
                            ["Item"],
                            [("writer", PropertyValue::Int(writer as i64))],
                        ))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(graph.node_count(), WRITERS * NODES_PER_WRITER);
    assert_eq!(
        graph.list_nodes(&NodeFilter::label("Item")).len(),
        WRITERS * NODES_PER_WRITER
    );
    for writer in 0..WRITERS {
        assert_eq!(
            graph
                .list_nodes(&NodeFilter::property(
                    "writer",
                    PropertyValue::Int(writer as i64)
                ))
                .len(),
            NODES_PER_WRITER
        );
    }
}

#[test]
fn readers_run_against_live_writers() {
    let graph = Arc::new(Graph::new("live").unwrap());
    graph
        .add_node(Node::new("hub", ["Hub"], Properties::new()))
        .unwrap();

    thread::scope(|scope| {
        let writer_graph = Arc::clone(&graph);
        scope.spawn(move || {
            for i in 0..NODES_PER_WRITER {
                let id = format!("spoke{i}");
                writer_graph
                    .add_node(Node::new(id.as_str(), ["Spoke"], Properties::new()))
                    .unwrap();
                writer_graph
                    .add_edge(Edge::new(
                        format!("e{i}"),
                        "hub",
                        id.as_str(),
                        "LINKS",
                        Properties::new(),
                    ))
                    .unwrap();
            }
        });

        for _ in 0..3 {
            let reader_graph = Arc::clone(&graph);
            scope.spawn(move || {
                for _ in 0..50 {
                    // Every read must observe a consistent per-table view.
                    let reached = traverse(
                        &reader_graph,
                        &NodeId::from("hub"),
                        TraversalOptions {
                            max_depth: 1,
                            direction: Direction::Both,
                        },
                    )
                    .unwrap();
                    assert!(!reached.is_empty());

                    let result =
                        query::execute(&reader_graph, "MATCH (n:Spoke) RETURN n").unwrap();
                    assert!(result.rows.len() <= NODES_PER_WRITER);
                }
            });
        }
    });

    // After the writer finishes, the full wheel is observable.
    let reached = traverse(
        &graph,
        &NodeId::from("hub"),
        TraversalOptions {
            max_depth: 1,
            direction: Direction::Outgoing,
        },
    )
    .unwrap();
    assert_eq!(reached.len(), NODES_PER_WRITER + 1);

    let path = shortest_path(
        &graph,
        &NodeId::from("spoke0"),
        &NodeId::from("spoke49"),
    )
    .unwrap();
    assert_eq!(path.len(), 3);
}

#[test]
fn concurrent_deletes_and_reads_stay_consistent() {
    let graph = Arc::new(Graph::new("churn").unwrap());
    for i in 0..NODES_PER_WRITER {
        graph
            .add_node(Node::new(
                format!("n{i}"),
                ["Churn"],
                Properties::new(),
            ))
            .unwrap();
    }
    for i in 0..NODES_PER_WRITER - 1 {
        graph
            .add_edge(Edge::new(
                format!("e{i}"),
                format!("n{i}"),
                format!("n{}", i + 1),
                "NEXT",
                Properties::new(),
            ))
            .unwrap();
    }

    thread::scope(|scope| {
        let deleter = Arc::clone(&graph);
        scope.spawn(move || {
            for i in (0..NODES_PER_WRITER).step_by(2) {
                deleter.delete_node(&NodeId::from(format!("n{i}"))).unwrap();
            }
        });

        let reader = Arc::clone(&graph);
        scope.spawn(move || {
            for _ in 0..100 {
                // Listings may race deletes but must never surface edges
                // whose rows are gone from the edge table.
                for node in reader.list_nodes(&NodeFilter::label("Churn")) {
                    let _ = reader.get_outgoing_edges(&node.id);
                }
            }
        });
    });

    assert_eq!(graph.node_count(), NODES_PER_WRITER / 2);
    // Every surviving edge connects two surviving nodes.
    for edge in graph.list_edges(&umbra::EdgeFilter::any()) {
        assert!(graph.get_node(&edge.from_node_id).is_ok());
        assert!(graph.get_node(&edge.to_node_id).is_ok());
    }
}

//! Query execution: seed, expand, filter, project, order.
//!
//! The executor runs over a frozen view of the graph obtained through
//! storage snapshots and point lookups. Bindings map pattern variables to
//! entity ids; entities are resolved through storage when a stage needs
//! their labels or properties, so a binding row stays small.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeFilter};
use crate::model::{Edge, EdgeId, Node, NodeId, PropertyValue};
use crate::query::ast::{
    CompareOp, Condition, EdgePattern, LogicalOp, MatchPattern, NodePattern, Operand,
    PatternDirection, Query, ReturnItem,
};
use crate::query::parser;
use crate::query::pattern::{matches_edge, matches_node};

/// Value cell in a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// A property value or null.
    Scalar(PropertyValue),
    /// A bound node, projected whole.
    Node(Node),
    /// A bound edge, projected whole.
    Edge(Edge),
}

impl ResultValue {
    /// The scalar payload, when this cell holds one.
    pub fn as_scalar(&self) -> Option<&PropertyValue> {
        match self {
            ResultValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// JSON view of the cell (entities serialize with their full record).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResultValue::Scalar(v) => serde_json::to_value(v).unwrap_or(serde_json::Value::Null),
            ResultValue::Node(n) => serde_json::to_value(n).unwrap_or(serde_json::Value::Null),
            ResultValue::Edge(e) => serde_json::to_value(e).unwrap_or(serde_json::Value::Null),
        }
    }

    fn compare(&self, other: &ResultValue) -> Ordering {
        match (self, other) {
            (ResultValue::Scalar(a), ResultValue::Scalar(b)) => {
                a.partial_cmp_value(b).unwrap_or(Ordering::Equal)
            }
            (ResultValue::Node(a), ResultValue::Node(b)) => a.id.cmp(&b.id),
            (ResultValue::Edge(a), ResultValue::Edge(b)) => a.id.cmp(&b.id),
            _ => Ordering::Equal,
        }
    }
}

/// Output row keyed by canonical column names.
pub type Row = BTreeMap<String, ResultValue>;

/// Counters collected while a query runs.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Nodes examined across seeding and expansion.
    pub nodes_visited: usize,
    /// Edges fetched from the adjacency index.
    pub edges_traversed: usize,
    /// Wall-clock time spent executing.
    pub execution_time: Duration,
}

/// Materialized result of a query.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Column names, in return-item order.
    pub columns: Vec<String>,
    /// Result rows.
    pub rows: Vec<Row>,
    /// Execution counters.
    pub stats: ExecutionStats,
}

impl ExecutionResult {
    /// JSON view of the result, for embedding callers.
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let cells: serde_json::Map<String, serde_json::Value> = row
                    .iter()
                    .map(|(col, value)| (col.clone(), value.to_json()))
                    .collect();
                serde_json::Value::Object(cells)
            })
            .collect();
        json!({
            "columns": self.columns,
            "rows": rows,
            "stats": {
                "nodes_visited": self.stats.nodes_visited,
                "edges_traversed": self.stats.edges_traversed,
                "execution_time_us": self.stats.execution_time.as_micros() as u64,
            },
        })
    }
}

/// Parses and executes query text against a graph.
pub fn execute(graph: &Graph, text: &str) -> Result<ExecutionResult> {
    execute_ast(graph, &parser::parse(text)?)
}

/// Executes an already-built AST against a graph.
pub fn execute_ast(graph: &Graph, query: &Query) -> Result<ExecutionResult> {
    let started = Instant::now();
    let mut stats = ExecutionStats::default();

    for pattern in &query.patterns {
        validate_pattern(pattern)?;
    }

    // Seed + expand.
    let mut bindings = vec![Binding::default()];
    for (index, pattern) in query.patterns.iter().enumerate() {
        bindings = apply_pattern(graph, bindings, pattern, index == 0, &mut stats)?;
    }

    // Filter.
    bindings.retain(|binding| {
        query
            .conditions
            .iter()
            .all(|condition| eval_condition(graph, binding, condition))
    });

    // Project.
    let columns: Vec<String> = query
        .return_items
        .iter()
        .map(ReturnItem::column_name)
        .collect();
    let mut rows: Vec<Row> = bindings
        .iter()
        .map(|binding| project(graph, binding, &query.return_items))
        .collect();

    // Order, skip, limit.
    if !query.order_by.is_empty() {
        rows.sort_by(|a, b| {
            for order in &query.order_by {
                let ordering = match (a.get(&order.key), b.get(&order.key)) {
                    (Some(left), Some(right)) => left.compare(right),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                let ordering = if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
    if let Some(skip) = query.skip {
        rows = rows.into_iter().skip(skip).collect();
    }
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    stats.execution_time = started.elapsed();
    Ok(ExecutionResult {
        columns,
        rows,
        stats,
    })
}

fn validate_pattern(pattern: &MatchPattern) -> Result<()> {
    if pattern.nodes.is_empty() {
        return Err(GraphError::UnsupportedPattern("pattern without nodes"));
    }
    if pattern.nodes.len() > 2 {
        return Err(GraphError::UnsupportedPattern(
            "paths longer than one edge are not executed",
        ));
    }
    if pattern.edges.len() + 1 != pattern.nodes.len() {
        return Err(GraphError::UnsupportedPattern(
            "edges must alternate with nodes",
        ));
    }
    if pattern
        .edges
        .iter()
        .any(|edge| edge.min_hops.is_some() || edge.max_hops.is_some())
    {
        return Err(GraphError::UnsupportedPattern(
            "variable-length edges are not executed",
        ));
    }
    Ok(())
}

/// Partial assignment from pattern variables to graph elements.
#[derive(Debug, Clone, Default)]
struct Binding {
    nodes: BTreeMap<String, NodeId>,
    edges: BTreeMap<String, EdgeId>,
}

impl Binding {
    fn with_node(&self, variable: Option<&String>, id: &NodeId) -> Binding {
        let mut next = self.clone();
        if let Some(variable) = variable {
            next.nodes.insert(variable.clone(), id.clone());
        }
        next
    }

    fn bound_node(&self, pattern: &NodePattern) -> Option<&NodeId> {
        pattern
            .variable
            .as_ref()
            .and_then(|variable| self.nodes.get(variable))
    }
}

/// Candidate nodes matching a node pattern, routed through the cheapest
/// index the pattern allows.
fn seed_nodes(graph: &Graph, pattern: &NodePattern, stats: &mut ExecutionStats) -> Vec<Node> {
    let candidates = if let Some(label) = pattern.labels.first() {
        graph.list_nodes(&NodeFilter::label(label.clone()))
    } else if let Some((key, value)) = pattern.properties.iter().next() {
        graph.list_nodes(&NodeFilter::property(key.clone(), value.clone()))
    } else {
        graph.list_nodes(&NodeFilter::any())
    };
    stats.nodes_visited += candidates.len();
    candidates
        .into_iter()
        .filter(|node| matches_node(node, pattern))
        .collect()
}

fn apply_pattern(
    graph: &Graph,
    bindings: Vec<Binding>,
    pattern: &MatchPattern,
    is_first: bool,
    stats: &mut ExecutionStats,
) -> Result<Vec<Binding>> {
    if pattern.nodes.len() == 1 {
        return Ok(apply_node_pattern(
            graph,
            bindings,
            &pattern.nodes[0],
            is_first,
            stats,
        ));
    }
    Ok(expand_step(
        graph,
        bindings,
        &pattern.nodes[0],
        &pattern.edges[0],
        &pattern.nodes[1],
        stats,
    ))
}

fn apply_node_pattern(
    graph: &Graph,
    bindings: Vec<Binding>,
    node: &NodePattern,
    is_first: bool,
    stats: &mut ExecutionStats,
) -> Vec<Binding> {
    let mut out = Vec::new();
    for binding in bindings {
        match binding.bound_node(node) {
            Some(id) => {
                // Re-check the constraint against the already-bound node.
                if graph
                    .get_node(id)
                    .map(|n| matches_node(&n, node))
                    .unwrap_or(false)
                {
                    out.push(binding);
                }
            }
            None if node.variable.is_some() || is_first => {
                for candidate in seed_nodes(graph, node, stats) {
                    out.push(binding.with_node(node.variable.as_ref(), &candidate.id));
                }
            }
            // Anonymous single-node pattern past the first: passthrough.
            None => out.push(binding),
        }
    }
    out
}

fn expand_step(
    graph: &Graph,
    bindings: Vec<Binding>,
    left: &NodePattern,
    edge: &EdgePattern,
    right: &NodePattern,
    stats: &mut ExecutionStats,
) -> Vec<Binding> {
    let mut out = Vec::new();
    for binding in bindings {
        let starts: Vec<(Binding, NodeId)> = match binding.bound_node(left) {
            Some(id) => {
                let keep = graph
                    .get_node(id)
                    .map(|n| matches_node(&n, left))
                    .unwrap_or(false);
                if keep {
                    vec![(binding.clone(), id.clone())]
                } else {
                    Vec::new()
                }
            }
            None => seed_nodes(graph, left, stats)
                .into_iter()
                .map(|node| {
                    let next = binding.with_node(left.variable.as_ref(), &node.id);
                    (next, node.id)
                })
                .collect(),
        };

        for (base, start) in starts {
            for (candidate_edge, target) in directed_candidates(graph, &start, edge.direction) {
                stats.edges_traversed += 1;
                if !matches_edge(&candidate_edge, edge) {
                    continue;
                }
                stats.nodes_visited += 1;
                let Ok(target_node) = graph.get_node(&target) else {
                    continue;
                };
                if !matches_node(&target_node, right) {
                    continue;
                }
                // A previously-bound right variable must agree (join).
                if let Some(existing) = base.bound_node(right) {
                    if existing != &target {
                        continue;
                    }
                }
                let mut next = base.with_node(right.variable.as_ref(), &target);
                if let Some(edge_var) = &edge.variable {
                    next.edges.insert(edge_var.clone(), candidate_edge.id.clone());
                }
                out.push(next);
            }
        }
    }
    out
}

/// Incident edges of `start` consistent with the pattern direction, paired
/// with the node each one leads to.
fn directed_candidates(
    graph: &Graph,
    start: &NodeId,
    direction: PatternDirection,
) -> Vec<(Edge, NodeId)> {
    let mut out = Vec::new();
    if matches!(
        direction,
        PatternDirection::Outgoing | PatternDirection::Undirected
    ) {
        for edge in graph.get_outgoing_edges(start) {
            let target = edge.to_node_id.clone();
            out.push((edge, target));
        }
    }
    if matches!(
        direction,
        PatternDirection::Incoming | PatternDirection::Undirected
    ) {
        for edge in graph.get_incoming_edges(start) {
            let target = edge.from_node_id.clone();
            out.push((edge, target));
        }
    }
    out
}

fn resolve_operand(graph: &Graph, binding: &Binding, operand: &Operand) -> Option<PropertyValue> {
    match operand {
        Operand::Literal(value) => Some(value.clone()),
        Operand::Reference { variable, property } => {
            let key = property.as_ref()?;
            if let Some(node_id) = binding.nodes.get(variable) {
                return graph
                    .get_node(node_id)
                    .ok()
                    .and_then(|node| node.property(key).cloned());
            }
            if let Some(edge_id) = binding.edges.get(variable) {
                return graph
                    .get_edge(edge_id)
                    .ok()
                    .and_then(|edge| edge.property(key).cloned());
            }
            None
        }
    }
}

/// Evaluates a condition against a binding.
///
/// Unresolvable references and unordered cross-type comparisons evaluate to
/// false rather than erroring, so one odd row cannot fail the whole query.
fn eval_condition(graph: &Graph, binding: &Binding, condition: &Condition) -> bool {
    match condition {
        Condition::Comparison { left, op, right } => {
            let (Some(left), Some(right)) = (
                resolve_operand(graph, binding, left),
                resolve_operand(graph, binding, right),
            ) else {
                return false;
            };
            eval_comparison(&left, *op, &right)
        }
        Condition::Logical { op, children } => match op {
            LogicalOp::And => children
                .iter()
                .all(|child| eval_condition(graph, binding, child)),
            LogicalOp::Or => children
                .iter()
                .any(|child| eval_condition(graph, binding, child)),
            LogicalOp::Not => children
                .first()
                .map(|child| !eval_condition(graph, binding, child))
                .unwrap_or(false),
        },
        Condition::PropertyExists { variable, key } => {
            if let Some(node_id) = binding.nodes.get(variable) {
                return graph
                    .get_node(node_id)
                    .map(|node| node.property(key).is_some())
                    .unwrap_or(false);
            }
            if let Some(edge_id) = binding.edges.get(variable) {
                return graph
                    .get_edge(edge_id)
                    .map(|edge| edge.property(key).is_some())
                    .unwrap_or(false);
            }
            false
        }
    }
}

fn eval_comparison(left: &PropertyValue, op: CompareOp, right: &PropertyValue) -> bool {
    match op {
        CompareOp::Eq => left.loose_eq(right),
        CompareOp::Neq => !left.loose_eq(right),
        CompareOp::Gt => matches!(left.partial_cmp_value(right), Some(Ordering::Greater)),
        CompareOp::Gte => matches!(
            left.partial_cmp_value(right),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        CompareOp::Lt => matches!(left.partial_cmp_value(right), Some(Ordering::Less)),
        CompareOp::Lte => matches!(
            left.partial_cmp_value(right),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        CompareOp::In => match right {
            PropertyValue::List(items) => items.iter().any(|item| left.loose_eq(item)),
            _ => false,
        },
        CompareOp::Contains => match (left, right) {
            (PropertyValue::String(haystack), PropertyValue::String(needle)) => {
                haystack.contains(needle)
            }
            _ => false,
        },
    }
}

fn project(graph: &Graph, binding: &Binding, items: &[ReturnItem]) -> Row {
    let mut row = Row::new();
    for item in items {
        let column = item.column_name();
        let value = match item {
            ReturnItem::Variable(variable) => project_variable(graph, binding, variable),
            ReturnItem::Property { variable, key } => ResultValue::Scalar(
                resolve_operand(graph, binding, &Operand::property(variable.clone(), key.clone()))
                    .unwrap_or(PropertyValue::Null),
            ),
            // Aggregation execution is pass-through in the supported subset.
            ReturnItem::Aggregation { variable, key, .. } => match key {
                Some(key) => ResultValue::Scalar(
                    resolve_operand(
                        graph,
                        binding,
                        &Operand::property(variable.clone(), key.clone()),
                    )
                    .unwrap_or(PropertyValue::Null),
                ),
                None => project_variable(graph, binding, variable),
            },
        };
        row.insert(column, value);
    }
    row
}

fn project_variable(graph: &Graph, binding: &Binding, variable: &str) -> ResultValue {
    if let Some(node_id) = binding.nodes.get(variable) {
        if let Ok(node) = graph.get_node(node_id) {
            return ResultValue::Node(node);
        }
    }
    if let Some(edge_id) = binding.edges.get(variable) {
        if let Ok(edge) = graph.get_edge(edge_id) {
            return ResultValue::Edge(edge);
        }
    }
    ResultValue::Scalar(PropertyValue::Null)
}

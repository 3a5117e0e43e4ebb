//! Fluent query builder.
//!
//! The builder reaches every AST surface, including the clauses the text
//! parser reserves: ordering, pagination, aggregations, and non-outgoing
//! edge directions. Invalid combinations are remembered in an error slot
//! and surface at [`QueryBuilder::build`], so chains stay panic-free.
//!
//! ```rust
//! use umbra::{Graph, Node, PropertyValue};
//! use umbra::query::{QueryBuilder, NodePattern, CompareOp};
//!
//! let graph = Graph::new("example")?;
//! graph.add_node(Node::new("ada", ["Person"], [("age", PropertyValue::Int(36))]))?;
//!
//! let result = QueryBuilder::new()
//!     .match_node(NodePattern::with_label("n", "Person"))
//!     .where_property("n", "age", CompareOp::Gte, PropertyValue::Int(18))
//!     .return_property("n", "age")
//!     .limit(10)
//!     .execute(&graph)?;
//! assert_eq!(result.rows.len(), 1);
//! # Ok::<(), umbra::GraphError>(())
//! ```

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::model::PropertyValue;
use crate::query::ast::{
    AggregateFn, CompareOp, Condition, EdgePattern, MatchPattern, NodePattern, Operand, OrderBy,
    Query, ReturnItem,
};
use crate::query::executor::{self, ExecutionResult};

/// Chainable builder producing a [`Query`].
#[derive(Default)]
pub struct QueryBuilder {
    query: Query,
    error: Option<GraphError>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single-node match pattern.
    pub fn match_node(mut self, node: NodePattern) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.patterns.push(MatchPattern::node(node));
        self
    }

    /// Adds a two-node, one-edge path pattern.
    pub fn match_path(mut self, from: NodePattern, edge: EdgePattern, to: NodePattern) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.patterns.push(MatchPattern::path(from, edge, to));
        self
    }

    /// Adds a WHERE condition; all conditions must hold.
    pub fn where_condition(mut self, condition: Condition) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.conditions.push(condition);
        self
    }

    /// Convenience for a `variable.key op literal` comparison.
    pub fn where_property(
        self,
        variable: impl Into<String>,
        key: impl Into<String>,
        op: CompareOp,
        value: PropertyValue,
    ) -> Self {
        self.where_condition(Condition::Comparison {
            left: Operand::property(variable, key),
            op,
            right: Operand::Literal(value),
        })
    }

    /// Convenience for a property-existence condition.
    pub fn where_exists(self, variable: impl Into<String>, key: impl Into<String>) -> Self {
        self.where_condition(Condition::PropertyExists {
            variable: variable.into(),
            key: key.into(),
        })
    }

    /// Replaces the projection list.
    pub fn returns<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = ReturnItem>,
    {
        if self.error.is_some() {
            return self;
        }
        self.query.return_items = items.into_iter().collect();
        self
    }

    /// Appends a whole-entity projection.
    pub fn return_variable(mut self, variable: impl Into<String>) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query
            .return_items
            .push(ReturnItem::Variable(variable.into()));
        self
    }

    /// Appends a property projection.
    pub fn return_property(
        mut self,
        variable: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.return_items.push(ReturnItem::Property {
            variable: variable.into(),
            key: key.into(),
        });
        self
    }

    /// Appends an aggregation projection (pass-through in the executed
    /// subset).
    pub fn return_aggregation(
        mut self,
        function: AggregateFn,
        variable: impl Into<String>,
        key: Option<String>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.return_items.push(ReturnItem::Aggregation {
            function,
            variable: variable.into(),
            key,
        });
        self
    }

    /// Appends a sort key; keys apply in insertion order.
    pub fn order_by(mut self, key: impl Into<String>, descending: bool) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.order_by.push(OrderBy {
            key: key.into(),
            descending,
        });
        self
    }

    /// Rows to drop after sorting.
    pub fn skip(mut self, count: usize) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.skip = Some(count);
        self
    }

    /// Maximum rows to keep after skipping.
    pub fn limit(mut self, count: usize) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.query.limit = Some(count);
        self
    }

    /// Finalizes the AST.
    pub fn build(self) -> Result<Query> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.query.return_items.is_empty() {
            return Err(GraphError::InvalidArgument(
                "query requires at least one return item",
            ));
        }
        Ok(self.query)
    }

    /// Builds and executes against a graph.
    pub fn execute(self, graph: &Graph) -> Result<ExecutionResult> {
        let query = self.build()?;
        executor::execute_ast(graph, &query)
    }
}

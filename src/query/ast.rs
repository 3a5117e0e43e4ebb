//! Abstract syntax tree for the pattern-match query language.
//!
//! The shapes here are produced by the parser for the supported text subset
//! and by [`crate::query::QueryBuilder`] for everything the text surface
//! does not reach (ordering, pagination, aggregations, non-outgoing edge
//! directions). Fields the executor does not yet run (variable-length hops,
//! aggregation functions) still exist so programmatic callers can set them.

use crate::model::{Properties, PropertyValue};

/// Direction constraint on an edge pattern.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum PatternDirection {
    /// Edge must leave the left node: `-[..]->`.
    #[default]
    Outgoing,
    /// Edge must enter the left node: `<-[..]-`.
    Incoming,
    /// Either orientation: `-[..]-`.
    Undirected,
}

/// Node constraint within a match pattern.
#[derive(Clone, Debug, Default)]
pub struct NodePattern {
    /// Binding variable, when named.
    pub variable: Option<String>,
    /// Labels the node must all carry.
    pub labels: Vec<String>,
    /// Properties the node must match structurally.
    pub properties: Properties,
}

impl NodePattern {
    /// Pattern binding a variable with one required label.
    pub fn with_label(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: Some(variable.into()),
            labels: vec![label.into()],
            properties: Properties::new(),
        }
    }

    /// Pattern binding a bare variable.
    pub fn var(variable: impl Into<String>) -> Self {
        Self {
            variable: Some(variable.into()),
            ..Self::default()
        }
    }
}

/// Edge constraint within a match pattern.
#[derive(Clone, Debug, Default)]
pub struct EdgePattern {
    /// Binding variable, when named.
    pub variable: Option<String>,
    /// Required relationship type; `None` matches any type.
    pub relationship_type: Option<String>,
    /// Properties the edge must match structurally.
    pub properties: Properties,
    /// Traversal orientation relative to the left node.
    pub direction: PatternDirection,
    /// Declared minimum hop count. Executing a pattern with hops set is
    /// outside the supported subset.
    pub min_hops: Option<u32>,
    /// Declared maximum hop count.
    pub max_hops: Option<u32>,
}

impl EdgePattern {
    /// Outgoing edge pattern with a required type.
    pub fn typed(relationship_type: impl Into<String>) -> Self {
        Self {
            relationship_type: Some(relationship_type.into()),
            ..Self::default()
        }
    }
}

/// A path-shaped pattern: nodes and edges alternate, edge `i` connecting
/// node `i` and node `i+1`.
#[derive(Clone, Debug, Default)]
pub struct MatchPattern {
    /// Node constraints along the path.
    pub nodes: Vec<NodePattern>,
    /// Edge constraints between consecutive nodes.
    pub edges: Vec<EdgePattern>,
}

impl MatchPattern {
    /// Single-node pattern.
    pub fn node(node: NodePattern) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
        }
    }

    /// Two-node, one-edge path pattern.
    pub fn path(from: NodePattern, edge: EdgePattern, to: NodePattern) -> Self {
        Self {
            nodes: vec![from, to],
            edges: vec![edge],
        }
    }
}

/// Comparison operators usable in WHERE conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    /// Equality (numeric Int/Float promotion applies).
    Eq,
    /// Inequality.
    Neq,
    /// Strictly greater.
    Gt,
    /// Greater or equal.
    Gte,
    /// Strictly less.
    Lt,
    /// Less or equal.
    Lte,
    /// Left value is a member of the right-hand list.
    In,
    /// Left string contains the right string.
    Contains,
}

/// Logical connectives over conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogicalOp {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
    /// Single child must not hold.
    Not,
}

/// Value source on either side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Literal value.
    Literal(PropertyValue),
    /// Reference to a bound variable, optionally drilling into a property.
    Reference {
        /// Bound variable name.
        variable: String,
        /// Property key on the bound entity; `None` references the entity.
        property: Option<String>,
    },
}

impl Operand {
    /// Reference to `variable.property`.
    pub fn property(variable: impl Into<String>, property: impl Into<String>) -> Self {
        Operand::Reference {
            variable: variable.into(),
            property: Some(property.into()),
        }
    }
}

/// Boolean predicate tree evaluated against each binding.
#[derive(Clone, Debug)]
pub enum Condition {
    /// Comparison leaf.
    Comparison {
        /// Left operand.
        left: Operand,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Operand,
    },
    /// Logical connective over children.
    Logical {
        /// Connective.
        op: LogicalOp,
        /// Child conditions; exactly one for `Not`.
        children: Vec<Condition>,
    },
    /// Property key exists on the bound entity (value may be null).
    PropertyExists {
        /// Bound variable name.
        variable: String,
        /// Property key.
        key: String,
    },
}

/// Aggregation functions; execution in the supported subset is
/// pass-through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Collect,
}

impl AggregateFn {
    fn name(&self) -> &'static str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Avg => "avg",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Collect => "collect",
        }
    }
}

/// Projection item in the RETURN clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnItem {
    /// Project the bound entity itself: column `v`.
    Variable(String),
    /// Project one property: column `v.k`.
    Property {
        /// Bound variable name.
        variable: String,
        /// Property key.
        key: String,
    },
    /// Project an aggregate: column `fn(v)` or `fn(v.k)`.
    Aggregation {
        /// Aggregate function.
        function: AggregateFn,
        /// Bound variable name.
        variable: String,
        /// Optional property key.
        key: Option<String>,
    },
}

impl ReturnItem {
    /// Canonical column name for this item.
    pub fn column_name(&self) -> String {
        match self {
            ReturnItem::Variable(v) => v.clone(),
            ReturnItem::Property { variable, key } => format!("{variable}.{key}"),
            ReturnItem::Aggregation {
                function,
                variable,
                key,
            } => match key {
                Some(key) => format!("{}({variable}.{key})", function.name()),
                None => format!("{}({variable})", function.name()),
            },
        }
    }
}

/// Sort key for the result rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    /// Column name to sort by (a return-item canonical name).
    pub key: String,
    /// Sort descending instead of ascending.
    pub descending: bool,
}

/// A complete query.
#[derive(Clone, Debug, Default)]
pub struct Query {
    /// Patterns to match, expanded left to right.
    pub patterns: Vec<MatchPattern>,
    /// WHERE conditions; all must hold.
    pub conditions: Vec<Condition>,
    /// RETURN projection, in column order.
    pub return_items: Vec<ReturnItem>,
    /// Sort keys, applied lexicographically.
    pub order_by: Vec<OrderBy>,
    /// Rows to drop after sorting.
    pub skip: Option<usize>,
    /// Maximum rows to keep after skipping.
    pub limit: Option<usize>,
}

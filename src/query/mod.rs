#![forbid(unsafe_code)]

//! Pattern-match query engine.
//!
//! Three entry points share one AST:
//!
//! - [`execute`] parses and runs query text (the MATCH/WHERE/RETURN subset);
//! - [`execute_ast`] runs an AST directly;
//! - [`QueryBuilder`] constructs ASTs fluently, covering the clauses the
//!   text surface reserves (ordering, pagination, aggregations, edge
//!   directions beyond `->`).

/// Abstract syntax tree for queries.
///
/// Sum types for patterns, conditions, and projections.
pub mod ast;

/// Fluent query builder.
pub mod builder;

/// Query execution pipeline.
///
/// Seeds bindings, expands patterns, filters, projects, and orders.
pub mod executor;

/// Tokenizer and recursive-descent parser for the text subset.
pub mod parser;

/// Node and edge match predicates.
pub mod pattern;

pub use ast::{
    AggregateFn, CompareOp, Condition, EdgePattern, LogicalOp, MatchPattern, NodePattern, Operand,
    OrderBy, PatternDirection, Query, ReturnItem,
};
pub use builder::QueryBuilder;
pub use executor::{execute, execute_ast, ExecutionResult, ExecutionStats, ResultValue, Row};
pub use parser::parse;
pub use pattern::{matches_edge, matches_node};

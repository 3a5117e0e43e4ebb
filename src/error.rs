//! Error taxonomy shared by every fallible operation in the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced by storage, graph, matrix, and query operations.
///
/// Every recoverable condition maps to a variant here; nothing in the crate
/// panics on expected failures. Internal inconsistencies (an adjacency entry
/// pointing at a missing edge) are filtered and logged rather than raised.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node, edge, or index key was absent.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// An insert collided with an existing id.
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    /// Edge creation referenced a node that is not in the graph.
    #[error("edge endpoint '{0}' does not exist")]
    NodeNotFound(String),
    /// No path exists between the requested endpoints.
    #[error("no path between the requested nodes")]
    NoPath,
    /// Matrix operands were built from different node mappings.
    #[error("matrix operands use incompatible node mappings")]
    IncompatibleMapping,
    /// Matrix operand shapes do not line up.
    #[error("incompatible matrix dimensions: {left:?} vs {right:?}")]
    IncompatibleDimensions {
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },
    /// Query text failed to tokenize or parse.
    #[error("parse error at position {position}: {message}")]
    Parse {
        /// Character offset into the query string.
        position: usize,
        /// Human-readable description of the failure.
        message: String,
    },
    /// The AST shape falls outside the executed subset.
    #[error("unsupported pattern: {0}")]
    UnsupportedPattern(&'static str),
    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Underlying table failure.
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

//! Typed failures for tree operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors surfaced by [`Tree`](crate::tree::Tree) operations.
///
/// All failures are synchronous and local; an operation that fails has
/// not mutated the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An argument precludes the operation: an empty batch, misuse of
    /// the sentinel root, an out-of-range insertion index, or a move
    /// that would place a node inside its own subtree.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No node with this id is part of the tree.
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// The flattened projection and the live graph disagree.
    ///
    /// This should be unreachable. Callers must treat it as fatal (or
    /// rebuild the projection) rather than ignore it, since every query
    /// assumes the two agree.
    #[error("tree inconsistency: {0}")]
    Inconsistent(String),
}

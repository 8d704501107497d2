//! Outline document model: stable-id nodes with a cached pre-order
//! flattened projection.
//!
//! A [`Tree`] owns its nodes in an id-keyed arena. Hosts allocate nodes
//! through the tree, attach them with the insertion operations, reparent
//! them in batches, and render from the flattened projection the tree
//! keeps consistent after every mutation.

pub mod error;
pub mod node;
pub mod tree;

pub use error::TreeError;
pub use node::{Node, NodeId, NodeKind};
pub use tree::Tree;

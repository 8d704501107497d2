//! View adapter binding an outline [`Tree`] to a rendering host.
//!
//! The adapter owns the tree (explicit dependency injection — there is
//! no ambient "current tree"), derives the visible rows from it, and
//! mediates selection and drag-and-drop. All of its state beyond the
//! tree is render-only and re-derivable; the tree stays the single
//! source of truth for structure.

pub mod row;
pub mod selection;
pub mod view;

pub use row::{Projection, Row};
pub use selection::{Selection, SelectionMode};
pub use view::{RowHost, TreeView, ViewId};

pub use trellis_tree::{Node, NodeId, NodeKind, Tree, TreeError};

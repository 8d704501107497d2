//! Host collaborators supplied to, not implemented by, the view.

use trellis_tree::{Node, NodeId};

use crate::row::Row;

/// Callbacks a rendering host provides to the view.
///
/// Only `draw_row` is mandatory; the notification hooks default to
/// no-ops.
pub trait RowHost {
    /// Draw one visible row. Side-effect boundary only; no structural
    /// mutation may happen in here.
    fn draw_row(&mut self, node: &Node, row: &Row, selected: bool);

    /// Selection deltas to mirror into host state.
    fn selection_changed(&mut self, _added: &[NodeId], _removed: &[NodeId]) {}

    /// Bring the given ids into view after a structural change.
    fn reveal(&mut self, _ids: &[NodeId]) {}

    /// Invoked right before a drop mutates the tree.
    fn before_drop(&mut self, _dragged: &[NodeId], _target: NodeId) {}
}

//! Drag-and-drop mediation: cycle-safe validation and atomic commit.

use log::debug;

use trellis_tree::{NodeId, TreeError};

use super::TreeView;
use super::host::RowHost;
use crate::selection::SelectionMode;

impl TreeView {
    /// Cycle guard: a drop is valid only when no dragged id appears on
    /// the target's ancestor chain, the target itself included.
    ///
    /// This is the sole safeguard preventing a row from being dropped
    /// into its own subtree; it must be consulted before any tree
    /// mutation. An empty drag payload is never a valid drop.
    pub fn validate_drop(&self, target_parent: NodeId, dragged: &[NodeId]) -> bool {
        if dragged.is_empty() {
            return false;
        }
        let mut current = Some(target_parent);
        while let Some(link) = current {
            if dragged.contains(&link) {
                return false;
            }
            current = self.tree().parent_of(link);
        }
        true
    }

    /// Commit a drop: pre-drop hook, cycle re-check, batch move, row
    /// rebuild, then re-select and reveal the moved nodes.
    ///
    /// The whole commit is one synchronous call; there is no multi-step
    /// drag state machine on this side of the boundary.
    pub fn commit_drop(
        &mut self,
        dragged: &[NodeId],
        target_parent: NodeId,
        insert_index: usize,
        host: &mut dyn RowHost,
    ) -> Result<(), TreeError> {
        if dragged.is_empty() {
            return Err(TreeError::InvalidArgument("no rows to drop"));
        }
        host.before_drop(dragged, target_parent);
        if !self.validate_drop(target_parent, dragged) {
            return Err(TreeError::InvalidArgument(
                "drop would move a node into its own subtree",
            ));
        }
        debug!(
            "commit drop of {} row(s) under {target_parent} at {insert_index}",
            dragged.len()
        );
        self.move_nodes(target_parent, insert_index, dragged)?;
        if self.selection_mode() != SelectionMode::None {
            let (added, removed) = self.selection.replace(dragged);
            host.selection_changed(&added, &removed);
        }
        host.reveal(dragged);
        Ok(())
    }
}

//! Selection state for outline views.
//!
//! Selection is keyed by [`NodeId`] so it stays stable while rows are
//! inserted, moved, or collapsed around it.

use std::collections::HashSet;

use trellis_tree::NodeId;

/// Selection mode for a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// Single node selection.
    Single,
    /// Multiple nodes can be selected (toggle and range gestures).
    Multiple,
}

/// Id-based selection state.
///
/// Mutators return `(added, removed)` deltas so hosts can forward
/// notifications without diffing.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<NodeId>,
    /// Anchor for range selection (the starting point of a shift-range).
    anchor: Option<NodeId>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// All selected ids, sorted for deterministic ordering.
    pub fn selected(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Check if an id is selected.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Anchor id for range selection.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Clear all selection. Returns the ids that were deselected.
    pub fn clear(&mut self) -> Vec<NodeId> {
        let removed: Vec<_> = self.selected.drain().collect();
        self.anchor = None;
        removed
    }

    /// Select a single id, clearing others. Returns (added, removed).
    pub fn select(&mut self, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let removed: Vec<_> = self
            .selected
            .iter()
            .filter(|&&existing| existing != id)
            .copied()
            .collect();
        let was_selected = self.selected.contains(&id);
        self.selected.clear();
        self.selected.insert(id);
        self.anchor = Some(id);
        let added = if was_selected { vec![] } else { vec![id] };
        (added, removed)
    }

    /// Toggle selection of an id. Returns (added, removed).
    pub fn toggle(&mut self, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        self.anchor = Some(id);
        if self.selected.remove(&id) {
            (vec![], vec![id])
        } else {
            self.selected.insert(id);
            (vec![id], vec![])
        }
    }

    /// Range select from the anchor to `target_id`.
    ///
    /// Requires the ordered list of all visible ids to determine the
    /// range. If `extend` is false, selection outside the range is
    /// cleared first. Returns (added, removed).
    pub fn range_select(
        &mut self,
        target_id: NodeId,
        all_ids_ordered: &[NodeId],
        extend: bool,
    ) -> (Vec<NodeId>, Vec<NodeId>) {
        let anchor_id = self.anchor.unwrap_or(target_id);

        let anchor_pos = all_ids_ordered.iter().position(|&id| id == anchor_id);
        let target_pos = all_ids_ordered.iter().position(|&id| id == target_id);

        let (start, end) = match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => {
                if a <= t { (a, t) } else { (t, a) }
            }
            // Anchor or target is not visible: fall back to a plain select.
            _ => return self.select(target_id),
        };

        let mut added = Vec::new();
        let mut removed = Vec::new();

        let range_ids: HashSet<NodeId> = all_ids_ordered[start..=end].iter().copied().collect();

        if !extend {
            removed = self
                .selected
                .iter()
                .filter(|id| !range_ids.contains(id))
                .copied()
                .collect();
            for id in &removed {
                self.selected.remove(id);
            }
        }

        for &id in &range_ids {
            if self.selected.insert(id) {
                added.push(id);
            }
        }

        (added, removed)
    }

    /// Select every id in the provided list. Returns the newly selected
    /// ids.
    pub fn select_all(&mut self, all_ids: &[NodeId]) -> Vec<NodeId> {
        let mut added = Vec::new();
        for &id in all_ids {
            if self.selected.insert(id) {
                added.push(id);
            }
        }
        added
    }

    /// Replace the selection with exactly `ids`. Returns (added,
    /// removed).
    pub fn replace(&mut self, ids: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
        let next: HashSet<NodeId> = ids.iter().copied().collect();
        let removed: Vec<_> = self.selected.difference(&next).copied().collect();
        let added: Vec<_> = next.difference(&self.selected).copied().collect();
        self.selected = next;
        self.anchor = ids.first().copied();
        (added, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_tree::{NodeKind, Tree};

    fn ids(count: usize) -> Vec<NodeId> {
        let mut tree = Tree::new();
        (0..count)
            .map(|i| tree.create_node(format!("n{i}"), NodeKind::Leaf))
            .collect()
    }

    #[test]
    fn toggle_flips_membership_and_moves_anchor() {
        let ordered = ids(3);
        let mut selection = Selection::new();
        let (added, removed) = selection.toggle(ordered[1]);
        assert_eq!((added.len(), removed.len()), (1, 0));
        assert_eq!(selection.anchor(), Some(ordered[1]));
        let (added, removed) = selection.toggle(ordered[1]);
        assert_eq!((added.len(), removed.len()), (0, 1));
        assert!(selection.is_empty());
    }

    #[test]
    fn range_select_spans_anchor_to_target() {
        let ordered = ids(4);
        let mut selection = Selection::new();
        selection.select(ordered[0]);
        let (added, _removed) = selection.range_select(ordered[2], &ordered, false);
        assert_eq!(added.len(), 2);
        assert_eq!(selection.selected(), ordered[..3].to_vec());
    }

    #[test]
    fn replace_reports_symmetric_deltas() {
        let ordered = ids(3);
        let mut selection = Selection::new();
        selection.select_all(&ordered[..2]);
        let (added, removed) = selection.replace(&ordered[1..]);
        assert_eq!(added, vec![ordered[2]]);
        assert_eq!(removed, vec![ordered[0]]);
    }
}

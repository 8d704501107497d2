//! The view adapter: binds one outline tree to a rendering host.

mod drag;
mod host;

pub use host::RowHost;

use std::collections::HashSet;

use log::error;
use uuid::Uuid;

use trellis_tree::{NodeId, NodeKind, Tree, TreeError};

use crate::row::{self, Projection, Row, RowFilter};
use crate::selection::{Selection, SelectionMode};

/// Unique identifier for a view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binds one [`Tree`] to a host widget: visible rows, expand/collapse
/// state, selection, and drag-and-drop mediation.
///
/// The tree is injected at construction and owned by the view; there is
/// no ambient "current tree". Everything else here is render-only state
/// that can be re-derived from the tree at any time.
pub struct TreeView {
    id: ViewId,
    tree: Tree,
    projection: Projection,
    expanded: HashSet<NodeId>,
    rows: Vec<Row>,
    selection: Selection,
    selection_mode: SelectionMode,
    filter: Option<Box<RowFilter>>,
}

impl std::fmt::Debug for TreeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeView")
            .field("id", &self.id)
            .field("projection", &self.projection)
            .field("rows", &self.rows.len())
            .field("expanded", &self.expanded.len())
            .field("selection_mode", &self.selection_mode)
            .finish_non_exhaustive()
    }
}

impl TreeView {
    /// Bind a view to the given tree.
    pub fn new(tree: Tree) -> Self {
        let mut view = Self {
            id: ViewId::new(),
            tree,
            projection: Projection::default(),
            expanded: HashSet::new(),
            rows: Vec::new(),
            selection: Selection::new(),
            selection_mode: SelectionMode::default(),
            filter: None,
        };
        view.rebuild_rows();
        view
    }

    /// Unique view identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Read access to the backing tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Hand the tree back to the host, consuming the view.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Choose how visible rows are derived.
    pub fn set_projection(&mut self, projection: Projection) {
        if self.projection != projection {
            self.projection = projection;
            self.rebuild_rows();
        }
    }

    /// Install or clear the visibility predicate. A hidden node hides
    /// its whole subtree.
    pub fn set_row_filter(&mut self, filter: Option<Box<RowFilter>>) {
        self.filter = filter;
        self.rebuild_rows();
    }

    /// The visible rows, in draw order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Re-derive the visible rows from the tree.
    ///
    /// A projection failure means the flattened cache and the graph
    /// disagree; that is logged and answered by rebuilding the cache,
    /// never ignored.
    pub fn rebuild_rows(&mut self) {
        match row::build_rows(
            &self.tree,
            &self.expanded,
            self.projection,
            self.filter.as_deref(),
        ) {
            Ok(rows) => self.rows = rows,
            Err(err) => {
                error!("row projection failed ({err}); rebuilding the flattened list");
                self.tree.rebuild_flat();
                self.rows = row::build_rows(
                    &self.tree,
                    &self.expanded,
                    self.projection,
                    self.filter.as_deref(),
                )
                .unwrap_or_default();
            }
        }
    }

    /// Walk the visible rows, handing each to the host's draw callback.
    ///
    /// The callback is a side-effect boundary only; structural mutation
    /// belongs in the mutation operations.
    pub fn draw(&self, host: &mut dyn RowHost) {
        for visible in &self.rows {
            if let Some(node) = self.tree.node(visible.id) {
                host.draw_row(node, visible, self.selection.is_selected(visible.id));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Expand/Collapse
    // -------------------------------------------------------------------------

    /// Show the subtree below `id`.
    pub fn expand(&mut self, id: NodeId) {
        if self.expanded.insert(id) {
            self.rebuild_rows();
        }
    }

    /// Hide the subtree below `id`.
    pub fn collapse(&mut self, id: NodeId) {
        if self.expanded.remove(&id) {
            self.rebuild_rows();
        }
    }

    /// Toggle expansion of `id`.
    pub fn toggle(&mut self, id: NodeId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self.rebuild_rows();
    }

    /// Whether `id` is currently expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self) {
        let root = self.tree.root();
        for id in self.tree.descendant_folders_of(root) {
            if id != root {
                self.expanded.insert(id);
            }
        }
        self.rebuild_rows();
    }

    /// Collapse everything.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.rebuild_rows();
    }

    // -------------------------------------------------------------------------
    // Structure: allocation, mutation, queries
    // -------------------------------------------------------------------------

    /// Hand out a fresh node id.
    pub fn allocate_id(&mut self) -> NodeId {
        self.tree.allocate_id()
    }

    /// Allocate a detached node.
    pub fn create_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        self.tree.create_node(name, kind)
    }

    /// Allocate a detached folder.
    pub fn create_folder(&mut self, name: impl Into<String>) -> NodeId {
        self.tree.create_folder(name)
    }

    /// Insert detached nodes under `parent`; see
    /// [`Tree::insert_children`].
    pub fn insert_children(
        &mut self,
        ids: &[NodeId],
        parent: NodeId,
        position: usize,
    ) -> Result<(), TreeError> {
        self.tree.insert_children(ids, parent, position)?;
        self.rebuild_rows();
        Ok(())
    }

    /// Insert a node as the sibling after `anchor`; see
    /// [`Tree::insert_after`].
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.tree.insert_after(anchor, node)?;
        self.rebuild_rows();
        Ok(())
    }

    /// Re-home a node as last child of `target`; see
    /// [`Tree::insert_inside`].
    pub fn insert_inside(&mut self, target: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.tree.insert_inside(target, node)?;
        self.rebuild_rows();
        Ok(())
    }

    /// Batch reparent; see [`Tree::move_nodes`].
    pub fn move_nodes(
        &mut self,
        parent: NodeId,
        insertion_index: usize,
        ids: &[NodeId],
    ) -> Result<(), TreeError> {
        self.tree.move_nodes(parent, insertion_index, ids)?;
        self.rebuild_rows();
        Ok(())
    }

    /// Remove a node and its subtree; see [`Tree::remove`]. Selection
    /// entries for removed nodes are pruned.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.tree.remove(id)?;
        let retained: Vec<NodeId> = self
            .selection
            .selected()
            .into_iter()
            .filter(|&kept| self.tree.node(kept).is_some())
            .collect();
        self.selection.replace(&retained);
        self.rebuild_rows();
        Ok(())
    }

    /// Ancestor ids of `id`, nearest first; see [`Tree::ancestors_of`].
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.ancestors_of(id)
    }

    /// Subtree ids with children; see [`Tree::descendant_folders_of`].
    pub fn descendant_folders_of(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.descendant_folders_of(id)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    /// Change the selection mode; leaving selection enabled modes clears
    /// the current selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
        if mode == SelectionMode::None {
            self.selection.clear();
        }
    }

    /// All selected ids, sorted.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selection.selected()
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.is_selected(id)
    }

    /// Select a single id, clearing others. Returns (added, removed).
    pub fn select(&mut self, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        if self.selection_mode == SelectionMode::None {
            return (vec![], vec![]);
        }
        self.selection.select(id)
    }

    /// Toggle selection of an id (multi-select only). Returns (added,
    /// removed).
    pub fn toggle_select(&mut self, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        if self.selection_mode != SelectionMode::Multiple {
            return (vec![], vec![]);
        }
        self.selection.toggle(id)
    }

    /// Range select from the anchor to `id` over the visible row order
    /// (multi-select only). Returns (added, removed).
    pub fn range_select(&mut self, id: NodeId, extend: bool) -> (Vec<NodeId>, Vec<NodeId>) {
        if self.selection_mode != SelectionMode::Multiple {
            return (vec![], vec![]);
        }
        let ordered: Vec<NodeId> = self.rows.iter().map(|visible| visible.id).collect();
        self.selection.range_select(id, &ordered, extend)
    }

    /// Select every visible row (multi-select only). Returns the newly
    /// selected ids.
    pub fn select_all(&mut self) -> Vec<NodeId> {
        if self.selection_mode != SelectionMode::Multiple {
            return vec![];
        }
        let ordered: Vec<NodeId> = self.rows.iter().map(|visible| visible.id).collect();
        self.selection.select_all(&ordered)
    }

    /// Clear the selection. Returns the deselected ids.
    pub fn deselect_all(&mut self) -> Vec<NodeId> {
        self.selection.clear()
    }
}

//! The outline tree: an id-keyed node arena with a cached pre-order
//! flattened projection.
//!
//! Every mutating operation leaves three representations in agreement
//! before it returns: the parent/children graph, each node's cached
//! depth, and the flattened list order. Rendering hosts draw rows from
//! the flattened list, so no operation may return with it stale.

use std::collections::HashMap;

use log::{debug, error, trace};

use crate::error::TreeError;
use crate::node::{Node, NodeId, NodeKind};

/// Name of the hidden sentinel root.
const ROOT_NAME: &str = "master";

/// An outline document: sentinel root, monotonic id allocator, and the
/// cached flattened projection.
///
/// The tree assumes single-threaded, call-and-return access from one
/// host at a time; there is no internal locking.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    flat: Vec<NodeId>,
}

impl Tree {
    /// Create a tree seeded with the sentinel root (id 0, depth −1).
    ///
    /// The root is a grouping node that is never rendered as a row; its
    /// children are the outline's top-level entries.
    pub fn new() -> Self {
        let mut root = Node::new(NodeId::ROOT, ROOT_NAME.to_owned(), NodeKind::Folder);
        root.depth = -1;
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, root);
        Self {
            nodes,
            root: NodeId::ROOT,
            next_id: 1,
            flat: vec![NodeId::ROOT],
        }
    }

    /// Id of the sentinel root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Hand out the next id. Ids are strictly increasing and never
    /// reissued, even after a removal.
    pub fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate a detached node owned by this tree.
    ///
    /// The node is absent from the flattened projection until one of the
    /// insertion operations attaches it.
    pub fn create_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, Node::new(id, name.into(), kind));
        id
    }

    /// Shorthand for allocating a detached folder node.
    pub fn create_folder(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(name, NodeKind::Folder)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Node data for any id the arena knows, attached or detached.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node data, for renaming or toggling the enabled flag.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Locate an attached node by scanning the flattened projection.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.flat
            .iter()
            .find(|&&entry| entry == id)
            .and_then(|entry| self.nodes.get(entry))
    }

    /// Position of an attached node in the flattened projection.
    pub fn index_of(&self, id: NodeId) -> Result<usize, TreeError> {
        self.flat
            .iter()
            .position(|&entry| entry == id)
            .ok_or(TreeError::NotFound(id))
    }

    /// Exclusive end of `parent`'s contiguous subtree run: the first
    /// index past `parent_index` whose entry sits at `parent`'s depth or
    /// shallower, or the list length if none.
    ///
    /// The flattened list carries only per-entry depth, no explicit
    /// extents, so this forward scan is the primitive behind
    /// insert-as-last-child, subtree removal, and descendant lookups.
    pub fn subtree_end(&self, parent_index: usize, parent: NodeId) -> Result<usize, TreeError> {
        let parent_depth = self.existing(parent)?.depth;
        let mut end = parent_index + 1;
        while end < self.flat.len() {
            let entry = self.flat[end];
            let depth = self
                .nodes
                .get(&entry)
                .ok_or_else(|| dangling_entry(entry))?
                .depth;
            if depth <= parent_depth {
                break;
            }
            end += 1;
        }
        Ok(end)
    }

    /// Ids on the parent chain of `id`, nearest first. The sentinel root
    /// is excluded.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(&id).and_then(Node::parent);
        while let Some(parent) = current {
            if parent == self.root {
                break;
            }
            out.push(parent);
            current = self.nodes.get(&parent).and_then(Node::parent);
        }
        out
    }

    /// Ids of every node in `id`'s subtree (self included) that has
    /// children — the rows a host gives a collapse affordance.
    pub fn descendant_folders_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                if node.has_children() {
                    out.push(current);
                }
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Ordered children of `id`, or an empty slice for unknown ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Parent back-reference, `None` for the root, detached, and
    /// unknown ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(Node::parent)
    }

    /// The cached pre-order projection, sentinel root first.
    pub fn flat(&self) -> &[NodeId] {
        &self.flat
    }

    /// Number of attached nodes, sentinel root included.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    /// Whether the outline has no entries besides the sentinel root.
    pub fn is_empty(&self) -> bool {
        self.flat.len() <= 1
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Splice a batch of detached nodes into `parent`'s children at
    /// `position`.
    ///
    /// Each inserted node gets its back-reference and
    /// `depth = parent.depth + 1`; depth recomputation cascades through
    /// any subtree the node carried while detached. Finishes by
    /// rebuilding the flattened projection from scratch.
    pub fn insert_children(
        &mut self,
        ids: &[NodeId],
        parent: NodeId,
        position: usize,
    ) -> Result<(), TreeError> {
        if ids.is_empty() {
            return Err(TreeError::InvalidArgument("no nodes to insert"));
        }
        let (parent_depth, child_count) = {
            let parent_node = self.existing(parent)?;
            (parent_node.depth, parent_node.children.len())
        };
        if position > child_count {
            return Err(TreeError::InvalidArgument("insertion position out of range"));
        }
        for (i, &id) in ids.iter().enumerate() {
            if id == self.root {
                return Err(TreeError::InvalidArgument("the sentinel root cannot be inserted"));
            }
            if ids[..i].contains(&id) {
                return Err(TreeError::InvalidArgument("duplicate node in batch"));
            }
            if self.existing(id)?.parent.is_some() {
                return Err(TreeError::InvalidArgument(
                    "node is already attached; use move_nodes",
                ));
            }
        }
        debug!("insert {} node(s) under {parent} at {position}", ids.len());
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.splice(position..position, ids.iter().copied());
        }
        for &id in ids {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = Some(parent);
                node.depth = parent_depth + 1;
            }
            self.recompute_depths(id);
        }
        self.rebuild_flat();
        Ok(())
    }

    /// Insert `node` as the sibling immediately following `anchor`.
    ///
    /// Maintains parent, depth, and the flattened projection exactly
    /// like the other insertion paths; in the projection the new sibling
    /// lands after `anchor`'s entire subtree run.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.index_of(anchor)?;
        let Some(parent) = self.existing(anchor)?.parent else {
            return Err(TreeError::InvalidArgument("the sentinel root has no siblings"));
        };
        let position = self
            .existing(parent)?
            .children
            .iter()
            .position(|&child| child == anchor)
            .ok_or_else(|| backref_mismatch(anchor))?;
        self.insert_children(&[node], parent, position + 1)
    }

    /// Re-home `node` (and the subtree it carries) as the last child of
    /// `target`.
    ///
    /// Detaches `node` from any previous parent first, splices it into
    /// the flattened list at `target`'s subtree boundary, then re-homes
    /// the carried subtree one level at a time in original order.
    pub fn insert_inside(&mut self, target: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.index_of(target)?;
        if node == self.root {
            return Err(TreeError::InvalidArgument("the sentinel root cannot be re-homed"));
        }
        self.existing(node)?;
        if self.is_in_subtree(target, node) {
            return Err(TreeError::InvalidArgument(
                "cannot move a node into its own subtree",
            ));
        }
        debug!("re-home {node} inside {target}");
        self.splice_inside(target, node)
    }

    /// Batch reparent: detach `ids` from their current parents and
    /// splice them, in batch order, into `parent`'s children.
    ///
    /// Movers sitting ahead of the insertion point in the destination
    /// vanish when detached, so the index first shrinks by their count
    /// or the drop position drifts. Depths are recomputed from the root
    /// and the flattened projection is rebuilt before returning.
    pub fn move_nodes(
        &mut self,
        parent: NodeId,
        insertion_index: usize,
        ids: &[NodeId],
    ) -> Result<(), TreeError> {
        if ids.is_empty() {
            return Ok(());
        }
        let child_count = self.existing(parent)?.children.len();
        if insertion_index > child_count {
            return Err(TreeError::InvalidArgument("insertion index out of range"));
        }
        for (i, &id) in ids.iter().enumerate() {
            if id == self.root {
                return Err(TreeError::InvalidArgument("the sentinel root cannot be moved"));
            }
            if ids[..i].contains(&id) {
                return Err(TreeError::InvalidArgument("duplicate node in batch"));
            }
            self.existing(id)?;
            if self.is_in_subtree(parent, id) {
                return Err(TreeError::InvalidArgument(
                    "cannot move a node into its own subtree",
                ));
            }
        }
        let ahead = self.existing(parent)?.children[..insertion_index]
            .iter()
            .filter(|child| ids.contains(child))
            .count();
        let corrected = insertion_index - ahead;
        debug!(
            "move {} node(s) under {parent} at {insertion_index} (corrected to {corrected})",
            ids.len()
        );
        for &id in ids {
            self.detach(id)?;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.splice(corrected..corrected, ids.iter().copied());
        }
        for &id in ids {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = Some(parent);
            }
        }
        let root = self.root;
        self.recompute_depths(root);
        self.rebuild_flat();
        Ok(())
    }

    /// Remove `id` and its entire subtree.
    ///
    /// Mirrors the detach step of [`Tree::move_nodes`] plus a
    /// flattened-list splice of the subtree range; removed ids are never
    /// reissued.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::InvalidArgument("the sentinel root cannot be removed"));
        }
        self.existing(id)?;
        debug!("remove {id} and its subtree");
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Derived-state maintenance
    // -------------------------------------------------------------------------

    /// Recompute the flattened projection from the live graph: a
    /// stack-based pre-order walk, pushing children in reverse so pop
    /// order is left-to-right.
    pub fn rebuild_flat(&mut self) {
        self.flat.clear();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            self.flat.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        trace!("flattened projection rebuilt ({} entries)", self.flat.len());
    }

    /// Reassign cached depths below `from` so every child sits one level
    /// under its parent. Must run after any reparenting before the
    /// flattened projection is trusted.
    pub fn recompute_depths(&mut self, from: NodeId) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let (depth, children) = match self.nodes.get(&id) {
                Some(node) => (node.depth, node.children.clone()),
                None => continue,
            };
            for child in children {
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.depth = depth + 1;
                }
                stack.push(child);
            }
        }
    }

    /// Check that the graph, cached depths, and flattened projection
    /// agree. A violation is logged and must not be ignored by callers.
    pub fn verify(&self) -> Result<(), TreeError> {
        let mut expected = Vec::with_capacity(self.flat.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            expected.push(id);
            let node = self.existing(id)?;
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        if expected != self.flat {
            error!("flattened projection does not match the live graph");
            return Err(TreeError::Inconsistent(
                "flattened projection does not match the pre-order of the live graph".into(),
            ));
        }
        for &id in &self.flat {
            let node = self.existing(id)?;
            if id == self.root {
                if node.depth != -1 {
                    return Err(TreeError::Inconsistent(
                        "sentinel root depth is not -1".into(),
                    ));
                }
                continue;
            }
            let parent = node.parent.ok_or_else(|| {
                TreeError::Inconsistent(format!(
                    "attached node {id} has no parent back-reference"
                ))
            })?;
            let parent_node = self.existing(parent)?;
            if node.depth != parent_node.depth + 1 {
                return Err(TreeError::Inconsistent(format!(
                    "depth of {id} does not sit one level under its parent"
                )));
            }
            if !parent_node.children.contains(&id) {
                return Err(backref_mismatch(id));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn existing(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NotFound(id))
    }

    /// Whether `id` lies inside `ancestor`'s subtree, `ancestor` itself
    /// included.
    fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(link) = current {
            if link == ancestor {
                return true;
            }
            current = self.nodes.get(&link).and_then(Node::parent);
        }
        false
    }

    /// Unhook `id` from its parent and drop its subtree range from the
    /// flattened list, if present. The node and its subtree stay in the
    /// arena, detached.
    fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(start) = self.flat.iter().position(|&entry| entry == id) {
            let end = self.subtree_end(start, id)?;
            self.flat.drain(start..end);
        }
        let parent = self.nodes.get(&id).and_then(Node::parent);
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|&child| child != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        Ok(())
    }

    /// Attach `node` as last child of `target`, splice it into the
    /// flattened list at `target`'s subtree boundary, then recurse over
    /// the carried children in original order.
    fn splice_inside(&mut self, target: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.detach(node)?;
        let target_depth = self.existing(target)?.depth;
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.parent = Some(target);
            entry.depth = target_depth + 1;
        }
        if let Some(entry) = self.nodes.get_mut(&target) {
            entry.children.push(node);
        }
        let target_index = self.index_of(target)?;
        let end = self.subtree_end(target_index, target)?;
        self.flat.insert(end, node);
        // Snapshot first: the recursion rewrites `node.children`.
        let carried = self.existing(node)?.children.clone();
        for child in carried {
            self.splice_inside(node, child)?;
        }
        Ok(())
    }

}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

fn backref_mismatch(id: NodeId) -> TreeError {
    error!("parent back-reference of {id} does not match any child slot");
    TreeError::Inconsistent(format!(
        "parent back-reference of {id} does not match any child slot"
    ))
}

fn dangling_entry(id: NodeId) -> TreeError {
    error!("flattened list references unknown node {id}");
    TreeError::Inconsistent(format!("flattened list references unknown node {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic_and_never_repeats() {
        let mut tree = Tree::new();
        let ids: Vec<NodeId> = (0..64).map(|_| tree.allocate_id()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "ids must be strictly increasing");
        }
    }

    #[test]
    fn created_nodes_stay_detached_until_inserted() {
        let mut tree = Tree::new();
        let id = tree.create_node("draft", NodeKind::Leaf);
        assert!(tree.node(id).is_some());
        assert!(tree.find(id).is_none());
        assert_eq!(tree.index_of(id), Err(TreeError::NotFound(id)));
    }

    #[test]
    fn new_tree_holds_only_the_sentinel_root() {
        let tree = Tree::new();
        assert_eq!(tree.flat(), &[NodeId::ROOT]);
        assert!(tree.is_empty());
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.depth(), -1);
        assert_eq!(root.name(), "master");
    }
}

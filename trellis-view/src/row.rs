//! Visible-row projection of an outline tree.

use std::collections::HashSet;

use trellis_tree::{Node, NodeId, NodeKind, Tree, TreeError};

/// Predicate deciding whether a node (and with it its subtree) is shown.
///
/// Hosts that filter by a "current tab" or similar close over that state
/// here instead of subclassing node types per policy.
pub type RowFilter = dyn Fn(&Node) -> bool + Send + Sync;

/// One visible row of the outline, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Backing node.
    pub id: NodeId,
    /// Indentation level; 0 for top-level rows. The sentinel root is
    /// never a row.
    pub depth: u16,
    /// Folder or leaf.
    pub kind: NodeKind,
    /// Whether the backing node has children (drives the collapse
    /// affordance).
    pub has_children: bool,
    /// Whether the subtree below this row is currently visible.
    pub expanded: bool,
}

/// How visible rows are derived from the tree.
///
/// Both strategies produce the same row sequence; mutation logic lives
/// once in [`Tree`], only the derivation differs. Hosts pick whichever
/// suits their rendering path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// Depth-first walk of the live parent/children graph, skipping
    /// collapsed subtrees.
    #[default]
    DirectGraph,
    /// Scan of the tree's cached flattened list, skipping collapsed and
    /// hidden subtrees via their flat-list boundary.
    FlattenedScan,
}

pub(crate) fn build_rows(
    tree: &Tree,
    expanded: &HashSet<NodeId>,
    projection: Projection,
    filter: Option<&RowFilter>,
) -> Result<Vec<Row>, TreeError> {
    let mut rows = Vec::new();
    match projection {
        Projection::DirectGraph => {
            collect_rows(tree, tree.root(), 0, expanded, filter, &mut rows);
        }
        Projection::FlattenedScan => {
            scan_rows(tree, expanded, filter, &mut rows)?;
        }
    }
    Ok(rows)
}

/// Walk the live graph below `parent`, appending a row per visible node.
fn collect_rows(
    tree: &Tree,
    parent: NodeId,
    depth: u16,
    expanded: &HashSet<NodeId>,
    filter: Option<&RowFilter>,
    rows: &mut Vec<Row>,
) {
    for &child in tree.children_of(parent) {
        let Some(node) = tree.node(child) else {
            continue;
        };
        if let Some(filter) = filter {
            if !filter(node) {
                continue;
            }
        }
        let has_children = node.has_children();
        let is_expanded = expanded.contains(&child);
        rows.push(Row {
            id: child,
            depth,
            kind: node.kind(),
            has_children,
            expanded: is_expanded,
        });
        if has_children && is_expanded {
            collect_rows(tree, child, depth + 1, expanded, filter, rows);
        }
    }
}

/// Scan the cached flattened list, hopping over collapsed and hidden
/// subtrees via their boundary instead of revisiting the graph.
fn scan_rows(
    tree: &Tree,
    expanded: &HashSet<NodeId>,
    filter: Option<&RowFilter>,
    rows: &mut Vec<Row>,
) -> Result<(), TreeError> {
    let flat = tree.flat();
    // Index 0 is the sentinel root.
    let mut index = 1;
    while index < flat.len() {
        let id = flat[index];
        let Some(node) = tree.node(id) else {
            return Err(TreeError::NotFound(id));
        };
        if let Some(filter) = filter {
            if !filter(node) {
                index = tree.subtree_end(index, id)?;
                continue;
            }
        }
        let has_children = node.has_children();
        let is_expanded = expanded.contains(&id);
        rows.push(Row {
            id,
            depth: node.depth().max(0) as u16,
            kind: node.kind(),
            has_children,
            expanded: is_expanded,
        });
        if has_children && !is_expanded {
            index = tree.subtree_end(index, id)?;
        } else {
            index += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let folder = tree.create_folder("folder");
        let leaf = tree.create_node("leaf", NodeKind::Leaf);
        let sibling = tree.create_node("sibling", NodeKind::Leaf);
        let root = tree.root();
        tree.insert_children(&[folder], root, 0).unwrap();
        tree.insert_inside(folder, leaf).unwrap();
        tree.insert_after(folder, sibling).unwrap();
        (tree, folder, leaf, sibling)
    }

    #[test]
    fn collapsed_folders_hide_their_subtree() {
        let (tree, folder, _leaf, sibling) = sample_tree();
        let expanded = HashSet::new();
        let rows = build_rows(&tree, &expanded, Projection::DirectGraph, None).unwrap();
        let ids: Vec<NodeId> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![folder, sibling]);
        assert!(rows[0].has_children);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn both_projections_agree_on_expanded_rows() {
        let (tree, folder, leaf, sibling) = sample_tree();
        let expanded: HashSet<NodeId> = [folder].into_iter().collect();
        let direct = build_rows(&tree, &expanded, Projection::DirectGraph, None).unwrap();
        let scanned = build_rows(&tree, &expanded, Projection::FlattenedScan, None).unwrap();
        assert_eq!(direct, scanned);
        let ids: Vec<NodeId> = direct.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![folder, leaf, sibling]);
        assert_eq!(direct[1].depth, 1);
    }

    #[test]
    fn filtered_nodes_hide_their_subtree_in_both_projections() {
        let (tree, folder, _leaf, sibling) = sample_tree();
        let expanded: HashSet<NodeId> = [folder].into_iter().collect();
        let filter = |node: &Node| node.kind() != NodeKind::Folder;
        let direct =
            build_rows(&tree, &expanded, Projection::DirectGraph, Some(&filter)).unwrap();
        let scanned =
            build_rows(&tree, &expanded, Projection::FlattenedScan, Some(&filter)).unwrap();
        assert_eq!(direct, scanned);
        let ids: Vec<NodeId> = direct.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![sibling], "the folder and its leaf are hidden");
    }
}

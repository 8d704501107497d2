//! Node identity and value types.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node within one [`Tree`](crate::tree::Tree).
///
/// Ids are handed out by the owning tree's monotonic allocator and are
/// never reissued, even after the node is removed. Stability across
/// mutations is what lets hosts key expansion and selection state on ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(u64);

impl NodeId {
    /// Id of the sentinel root every tree is seeded with.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is: a grouping folder or a plain leaf entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure grouping node with no behavior of its own.
    Folder,
    /// Ordinary entry.
    #[default]
    Leaf,
}

/// A tree vertex: stable identity, display name, cached depth, enabled
/// flag, a parent back-reference and an ordered child list.
///
/// Ownership flows parent → child through the owning tree's arena; the
/// `parent` field is a back-reference only and always matches the child
/// collection that actually contains this node. `depth` is cached (−1
/// for the sentinel root, `parent.depth + 1` everywhere else) and is
/// maintained by the tree's mutation operations.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) enabled: bool,
    pub(crate) depth: i32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, kind: NodeKind) -> Self {
        Self {
            id,
            name,
            kind,
            enabled: true,
            depth: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Stable identity within the owning tree.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Folder or leaf.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether the node is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Cached depth: −1 for the sentinel root, otherwise one more than
    /// the parent's depth.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Parent back-reference, `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child ids; insertion order is rendering order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether any children are attached.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_is_an_enabled_childless_leaf() {
        let node = Node::new(NodeId::new(7), String::from("notes"), NodeKind::default());
        assert_eq!(node.kind(), NodeKind::Leaf);
        assert!(node.is_enabled());
        assert!(!node.has_children());
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn node_id_display_includes_raw_value() {
        assert_eq!(NodeId::new(42).to_string(), "#42");
        assert_eq!(NodeId::ROOT.raw(), 0);
    }
}

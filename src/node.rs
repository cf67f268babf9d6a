use std::fmt;

use generational_arena::Index;

/// Data payload carried by every tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Label shown by the describe and render operations
    pub label: String,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// The two node variants of the hierarchy.
///
/// Children live inside the `Composite` variant, so a `Leaf` carries no
/// child storage at all and child management can never change its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Composite {
        /// Indices of child nodes in the arena, in attachment order
        children: Vec<Index>,
    },
}

/// Tree node owned by a [`ComponentTree`](crate::ComponentTree).
///
/// The parent back-reference is non-owning (a plain arena index) and is
/// written exclusively by the tree's structural operations; client code
/// reads it via [`TreeNode::parent`].
#[derive(Debug)]
pub struct TreeNode {
    /// Payload for this node
    pub data: NodeData,
    parent: Option<Index>,
    kind: NodeKind,
}

impl TreeNode {
    pub(crate) fn leaf(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            kind: NodeKind::Leaf,
        }
    }

    pub(crate) fn composite(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            kind: NodeKind::Composite {
                children: Vec::new(),
            },
        }
    }

    /// Index of the owning composite, None for a root.
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Index>) {
        self.parent = parent;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Capability query: can this node hold children?
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite { .. })
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_composite()
    }

    /// Child indices in attachment order; empty slice for a Leaf.
    pub fn children(&self) -> &[Index] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Composite { children } => children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Index>> {
        match &mut self.kind {
            NodeKind::Leaf => None,
            NodeKind::Composite { children } => Some(children),
        }
    }
}

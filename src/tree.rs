//! Arena-based component tree with a uniform describe operation.

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeData, NodeKind, TreeNode};

/// Arena-backed tree of [`TreeNode`]s.
///
/// All nodes live in a single arena and are addressed by [`Index`].
/// Generational indices keep handles into removed subtrees detectably
/// stale instead of silently pointing at recycled slots. Several
/// independent roots may coexist until client code mounts them under a
/// common composite.
#[derive(Debug)]
pub struct ComponentTree {
    arena: Arena<TreeNode>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Create a parentless Leaf and return its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn new_leaf(&mut self, data: NodeData) -> Index {
        self.arena.insert(TreeNode::leaf(data))
    }

    /// Create a parentless, childless Composite and return its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn new_composite(&mut self, data: NodeData) -> Index {
        self.arena.insert(TreeNode::composite(data))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// All parentless nodes, in arena order.
    #[instrument(level = "trace", skip(self))]
    pub fn roots(&self) -> Vec<Index> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent().is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Append `child` to `parent`'s children and point the child's parent
    /// back-reference at `parent`.
    ///
    /// A child that already sits under a composite is detached from it
    /// first, so a node is a child of at most one composite at a time;
    /// re-adding under the same parent moves the node to the end of the
    /// sibling list. When `parent` is a Leaf the call is a defined no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::WouldCycle`] when `child` is `parent` itself or one of
    /// its ancestors, [`TreeError::NodeNotFound`] for stale handles.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        if !self.contains(child) {
            return Err(TreeError::NodeNotFound(child));
        }
        let parent_node = self
            .get_node(parent)
            .ok_or(TreeError::NodeNotFound(parent))?;
        if parent_node.is_leaf() {
            return Ok(());
        }
        if self.ancestors(parent).any(|idx| idx == child) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        self.detach(child)?;
        if let Some(children) = self.arena.get_mut(parent).and_then(TreeNode::children_mut) {
            children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Remove the first occurrence of `child` from `parent`'s children and
    /// clear the child's parent back-reference.
    ///
    /// A live `child` that is not among the parent's children is a silent
    /// no-op, as is calling this with a Leaf parent.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        if !self.contains(child) {
            return Err(TreeError::NodeNotFound(child));
        }
        let parent_node = self
            .get_node(parent)
            .ok_or(TreeError::NodeNotFound(parent))?;
        if parent_node.is_leaf() || !parent_node.children().contains(&child) {
            return Ok(());
        }

        if let Some(children) = self.arena.get_mut(parent).and_then(TreeNode::children_mut) {
            if let Some(pos) = children.iter().position(|&idx| idx == child) {
                children.remove(pos);
            }
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.set_parent(None);
        }
        Ok(())
    }

    /// Unhook `child` from whatever parent it has. Roots are left as-is.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, child: Index) -> TreeResult<()> {
        let parent = self
            .get_node(child)
            .ok_or(TreeError::NodeNotFound(child))?
            .parent();
        if let Some(parent_idx) = parent {
            if let Some(children) = self
                .arena
                .get_mut(parent_idx)
                .and_then(TreeNode::children_mut)
            {
                if let Some(pos) = children.iter().position(|&idx| idx == child) {
                    children.remove(pos);
                }
            }
            if let Some(node) = self.arena.get_mut(child) {
                node.set_parent(None);
            }
        }
        Ok(())
    }

    /// Detach `node` and free it together with all of its descendants.
    ///
    /// Returns the number of nodes removed. Handles into the removed
    /// subtree become stale; later operations reject them with
    /// [`TreeError::NodeNotFound`].
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, node: Index) -> TreeResult<usize> {
        if !self.contains(node) {
            return Err(TreeError::NodeNotFound(node));
        }
        self.detach(node)?;

        let doomed: Vec<Index> = self.iter_postorder(node).map(|(idx, _)| idx).collect();
        let mut removed = 0;
        for idx in doomed {
            if self.arena.remove(idx).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Describe the subtree rooted at `node`.
    ///
    /// A Leaf contributes its label. A Composite contributes
    /// `label(c1+c2+...)` over its children in attachment order; an empty
    /// composite renders as `label()`. Pure function of the tree state:
    /// repeated calls without mutation yield identical strings.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotFound`] when `node` is stale; traversal itself
    /// cannot fail for a live handle.
    #[instrument(level = "debug", skip(self))]
    pub fn describe(&self, node: Index) -> TreeResult<String> {
        self.describe_node(node)
    }

    fn describe_node(&self, node: Index) -> TreeResult<String> {
        let n = self.get_node(node).ok_or(TreeError::NodeNotFound(node))?;
        match n.kind() {
            NodeKind::Leaf => Ok(n.data.label.clone()),
            NodeKind::Composite { children } => {
                let joined = children
                    .iter()
                    .map(|&child| self.describe_node(child))
                    .process_results(|mut parts| parts.join("+"))?;
                Ok(format!("{}({})", n.data.label, joined))
            }
        }
    }

    /// Height of the subtree rooted at `node`: 1 for a lone node, 0 for a
    /// stale handle.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, node: Index) -> usize {
        self.calculate_depth(node)
    }

    fn calculate_depth(&self, node: Index) -> usize {
        if let Some(n) = self.get_node(node) {
            1 + n
                .children()
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collect all Leaf nodes under `node` in depth-first order.
    ///
    /// A lone Leaf yields itself. An empty Composite ends a branch without
    /// contributing anything: it is childless but not a Leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, node: Index) -> Vec<Index> {
        let mut found = Vec::new();
        self.collect_leaves(node, &mut found);
        found
    }

    fn collect_leaves(&self, node: Index, found: &mut Vec<Index>) {
        if let Some(n) = self.get_node(node) {
            if n.is_leaf() {
                found.push(node);
            } else {
                for &child in n.children() {
                    self.collect_leaves(child, found);
                }
            }
        }
    }

    /// Every path from `node` down to a node without children,
    /// start-first, in child order.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self, node: Index) -> Vec<Vec<Index>> {
        let mut all = Vec::new();
        let mut trail = Vec::new();
        self.collect_branches(node, &mut trail, &mut all);
        all
    }

    fn collect_branches(&self, node: Index, trail: &mut Vec<Index>, all: &mut Vec<Vec<Index>>) {
        if let Some(n) = self.get_node(node) {
            trail.push(node);
            if n.children().is_empty() {
                all.push(trail.clone());
            } else {
                for &child in n.children() {
                    self.collect_branches(child, trail, all);
                }
            }
            trail.pop();
        }
    }

    /// Iterator over `node` followed by its chain of parents.
    pub fn ancestors(&self, node: Index) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(node).then_some(node),
        }
    }

    /// Depth-first pre-order traversal starting at `node`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, node: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, node)
    }

    /// Depth-first post-order traversal starting at `node` (children
    /// before their parent).
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, node: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, node)
    }
}

pub struct Ancestors<'a> {
    tree: &'a ComponentTree,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get_node(current).and_then(TreeNode::parent);
        Some(current)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a ComponentTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ComponentTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (ComponentTree, Index, Index, Index) {
        let mut tree = ComponentTree::new();
        let root = tree.new_composite(NodeData::new("Branch"));
        let a = tree.new_leaf(NodeData::new("Leaf"));
        let b = tree.new_leaf(NodeData::new("Leaf"));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn add_child_wires_parent_and_preserves_order() {
        let (tree, root, a, b) = small_tree();
        assert_eq!(tree.get_node(root).unwrap().children(), &[a, b]);
        assert_eq!(tree.get_node(a).unwrap().parent(), Some(root));
        assert_eq!(tree.get_node(b).unwrap().parent(), Some(root));
        assert_eq!(tree.roots(), vec![root]);
    }

    #[test]
    fn preorder_visits_parent_before_children() {
        let (tree, root, a, b) = small_tree();
        let order: Vec<Index> = tree.iter(root).map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![root, a, b]);
    }

    #[test]
    fn postorder_visits_children_before_parent() {
        let (tree, root, a, b) = small_tree();
        let order: Vec<Index> = tree.iter_postorder(root).map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![a, b, root]);
    }

    #[test]
    fn ancestors_walks_up_to_the_root() {
        let mut tree = ComponentTree::new();
        let root = tree.new_composite(NodeData::new("Branch"));
        let mid = tree.new_composite(NodeData::new("Branch"));
        let leaf = tree.new_leaf(NodeData::new("Leaf"));
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();

        let chain: Vec<Index> = tree.ancestors(leaf).collect();
        assert_eq!(chain, vec![leaf, mid, root]);
    }
}

//! Terminal rendering of component trees via termtree.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::tree::ComponentTree;

impl ComponentTree {
    /// Convert the subtree rooted at `node` into a [`termtree::Tree`] for
    /// pretty terminal output. `Display` on the result draws the usual
    /// box-glyph hierarchy, one label per line.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string(&self, node: Index) -> TreeResult<Tree<String>> {
        let n = self.get_node(node).ok_or(TreeError::NodeNotFound(node))?;
        let root = n.data.label.clone();

        // Recursively construct the children
        let leaves: Vec<_> = n
            .children()
            .iter()
            .map(|&child| self.to_tree_string(child))
            .collect::<TreeResult<_>>()?;

        Ok(Tree::new(root).with_leaves(leaves))
    }
}

#[cfg(test)]
mod tests {
    use crate::node::NodeData;
    use crate::tree::ComponentTree;

    #[test]
    fn single_leaf_renders_as_its_label() {
        let mut tree = ComponentTree::new();
        let leaf = tree.new_leaf(NodeData::new("Leaf"));
        assert_eq!(tree.to_tree_string(leaf).unwrap().to_string(), "Leaf\n");
    }
}

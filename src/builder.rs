//! Declarative construction of [`ComponentTree`]s from named node and
//! link declarations, validated as a whole at build time.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use itertools::Itertools;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::node::NodeData;
use crate::tree::ComponentTree;

#[derive(Debug, Clone)]
struct NodeDecl {
    name: String,
    label: String,
    composite: bool,
}

/// Collects node and link declarations and validates them as a set.
///
/// Unlike [`ComponentTree::add_child`], which tolerates Leaf parents and
/// repeated attachment, the builder treats a Leaf parent, a duplicate
/// name, a second parent for the same child, an unknown name, or a cycle
/// among the links as a hard error at [`build`](Self::build) time.
///
/// ```
/// use comptree::TreeBuilder;
///
/// let tree = TreeBuilder::new()
///     .composite("root", "Branch")
///     .leaf("a", "Leaf")
///     .leaf("b", "Leaf")
///     .link("root", "a")
///     .link("root", "b")
///     .build()?;
/// let root = tree.roots()[0];
/// assert_eq!(tree.describe(root)?, "Branch(Leaf+Leaf)");
/// # Ok::<(), comptree::TreeError>(())
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeDecl>,
    links: Vec<(String, String)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a Leaf node under a unique `name`.
    #[must_use]
    pub fn leaf(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.nodes.push(NodeDecl {
            name: name.into(),
            label: label.into(),
            composite: false,
        });
        self
    }

    /// Declare a Composite node under a unique `name`.
    #[must_use]
    pub fn composite(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.nodes.push(NodeDecl {
            name: name.into(),
            label: label.into(),
            composite: true,
        });
        self
    }

    /// Declare that `child` hangs under `parent`. Children end up in link
    /// declaration order.
    #[must_use]
    pub fn link(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.links.push((parent.into(), child.into()));
        self
    }

    /// Validate all declarations and assemble the tree.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateName`] when a name is declared twice,
    /// [`TreeError::UnknownName`] when a link references an undeclared
    /// name, [`TreeError::LeafAsParent`] when a link's parent is a Leaf,
    /// [`TreeError::MultipleParents`] when two links claim the same
    /// child, and [`TreeError::CycleDetected`] when the links loop.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self) -> TreeResult<ComponentTree> {
        self.validate_names()?;
        let by_name: HashMap<&str, &NodeDecl> = self
            .nodes
            .iter()
            .map(|decl| (decl.name.as_str(), decl))
            .collect();
        let children_of = self.validate_links(&by_name)?;

        let mut tree = ComponentTree::new();
        let mut handles: HashMap<&str, Index> = HashMap::new();
        for decl in &self.nodes {
            let idx = if decl.composite {
                tree.new_composite(NodeData::new(decl.label.as_str()))
            } else {
                tree.new_leaf(NodeData::new(decl.label.as_str()))
            };
            handles.insert(decl.name.as_str(), idx);
        }

        let root_names = self.find_root_names(&children_of);
        if root_names.is_empty() && !self.nodes.is_empty() {
            return Err(TreeError::CycleDetected(self.nodes[0].name.clone()));
        }

        // Stack-based walk from the roots, attaching children in
        // declaration order.
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = root_names.iter().rev().copied().collect();
        while let Some(name) = stack.pop() {
            visited.insert(name);
            if let Some(children) = children_of.get(name) {
                for &child in children.iter().rev() {
                    stack.push(child);
                }
                for &child in children {
                    tree.add_child(handles[name], handles[child])?;
                }
            }
        }
        // Nodes unreachable from any root can only sit on a cycle since
        // every child has exactly one parent at this point.
        if visited.len() < self.nodes.len() {
            let orphan = self
                .nodes
                .iter()
                .map(|decl| decl.name.as_str())
                .find(|name| !visited.contains(name))
                .unwrap_or_default();
            return Err(TreeError::CycleDetected(orphan.to_string()));
        }

        Ok(tree)
    }

    fn validate_names(&self) -> TreeResult<()> {
        if let Some(dup) = self
            .nodes
            .iter()
            .map(|decl| decl.name.as_str())
            .duplicates()
            .next()
        {
            return Err(TreeError::DuplicateName(dup.to_string()));
        }
        Ok(())
    }

    fn validate_links<'a>(
        &'a self,
        by_name: &HashMap<&str, &NodeDecl>,
    ) -> TreeResult<HashMap<&'a str, Vec<&'a str>>> {
        let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        for (parent, child) in &self.links {
            let parent_decl = by_name
                .get(parent.as_str())
                .ok_or_else(|| TreeError::UnknownName(parent.clone()))?;
            if !by_name.contains_key(child.as_str()) {
                return Err(TreeError::UnknownName(child.clone()));
            }
            if !parent_decl.composite {
                return Err(TreeError::LeafAsParent(parent.clone()));
            }
            if parent_of.insert(child.as_str(), parent.as_str()).is_some() {
                return Err(TreeError::MultipleParents(child.clone()));
            }
            children_of
                .entry(parent.as_str())
                .or_default()
                .push(child.as_str());
        }
        Ok(children_of)
    }

    fn find_root_names<'a>(&'a self, children_of: &HashMap<&'a str, Vec<&'a str>>) -> Vec<&'a str> {
        let linked_children: HashSet<&str> = children_of
            .values()
            .flat_map(|children| children.iter().copied())
            .collect();
        self.nodes
            .iter()
            .map(|decl| decl.name.as_str())
            .filter(|name| !linked_children.contains(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_assembles_declared_hierarchy() {
        let tree = TreeBuilder::new()
            .composite("root", "Branch")
            .leaf("a", "Leaf")
            .leaf("b", "Leaf")
            .link("root", "a")
            .link("root", "b")
            .build()
            .unwrap();
        let root = tree.roots()[0];
        assert_eq!(tree.describe(root).unwrap(), "Branch(Leaf+Leaf)");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = TreeBuilder::new()
            .leaf("a", "Leaf")
            .leaf("a", "Leaf")
            .build();
        assert_eq!(result.unwrap_err(), TreeError::DuplicateName("a".into()));
    }

    #[test]
    fn linking_under_a_leaf_is_rejected() {
        let result = TreeBuilder::new()
            .leaf("a", "Leaf")
            .leaf("b", "Leaf")
            .link("a", "b")
            .build();
        assert_eq!(result.unwrap_err(), TreeError::LeafAsParent("a".into()));
    }
}

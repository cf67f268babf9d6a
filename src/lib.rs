//! Arena-backed composite trees: Leaf and Composite nodes with uniform
//! traversal, description, and terminal rendering.
//!
//! Nodes live in a [`generational_arena::Arena`] and are addressed by
//! [`Index`] handles. Composites own the child order; every node carries
//! a non-owning back-reference to its parent, so walking up is as cheap
//! as walking down.
//!
//! ```
//! use comptree::{ComponentTree, NodeData};
//!
//! let mut tree = ComponentTree::new();
//! let root = tree.new_composite(NodeData::new("Branch"));
//! let leaf = tree.new_leaf(NodeData::new("Leaf"));
//! tree.add_child(root, leaf)?;
//! assert_eq!(tree.describe(root)?, "Branch(Leaf)");
//! # Ok::<(), comptree::TreeError>(())
//! ```

pub mod builder;
pub mod display;
pub mod errors;
pub mod node;
pub mod tree;
pub mod util;

pub use builder::TreeBuilder;
pub use errors::{TreeError, TreeResult};
pub use node::{NodeData, NodeKind, TreeNode};
pub use tree::{Ancestors, ComponentTree, PostOrderIterator, PreOrderIterator};

pub use generational_arena::Index;

//! Tree-level errors (no external dependencies beyond the arena handle type)

use generational_arena::Index;
use thiserror::Error;

/// Errors raised by structural operations and by builder validation.
///
/// Calling `add_child`/`remove_child` with a Leaf as the parent is *not*
/// an error: leaves silently ignore child management.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found in tree: {0:?}")]
    NodeNotFound(Index),

    #[error("cannot attach {child:?} under {parent:?}: would create a cycle")]
    WouldCycle { parent: Index, child: Index },

    #[error("duplicate node name: {0}")]
    DuplicateName(String),

    #[error("unknown node name in link: {0}")]
    UnknownName(String),

    #[error("leaf node cannot take children: {0}")]
    LeafAsParent(String),

    #[error("multiple parents declared for: {0}")]
    MultipleParents(String),

    #[error("cycle detected in links involving: {0}")]
    CycleDetected(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

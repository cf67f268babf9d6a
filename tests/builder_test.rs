//! Tests for TreeBuilder validation and assembly

use comptree::util::testing;
use comptree::{TreeBuilder, TreeError, TreeResult};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// ============================================================
// Assembly Tests
// ============================================================

#[test]
fn given_declarations_when_building_then_assembles_hierarchy() -> TreeResult<()> {
    // Arrange
    let builder = TreeBuilder::new()
        .composite("root", "Branch")
        .composite("left", "Branch")
        .composite("right", "Branch")
        .leaf("l1", "Leaf")
        .leaf("l2", "Leaf")
        .leaf("l3", "Leaf")
        .link("root", "left")
        .link("root", "right")
        .link("left", "l1")
        .link("left", "l2")
        .link("right", "l3");

    // Act
    let tree = builder.build()?;

    // Assert
    let roots = tree.roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(
        tree.describe(roots[0])?,
        "Branch(Branch(Leaf+Leaf)+Branch(Leaf))"
    );
    Ok(())
}

#[test]
fn given_links_when_building_then_children_follow_declaration_order() -> TreeResult<()> {
    let tree = TreeBuilder::new()
        .composite("root", "Branch")
        .leaf("b", "B")
        .leaf("a", "A")
        .leaf("c", "C")
        .link("root", "c")
        .link("root", "a")
        .link("root", "b")
        .build()?;

    let root = tree.roots()[0];
    assert_eq!(tree.describe(root)?, "Branch(C+A+B)");
    Ok(())
}

#[test]
fn given_no_links_when_building_then_every_node_is_a_root() -> TreeResult<()> {
    let tree = TreeBuilder::new()
        .leaf("a", "Leaf")
        .leaf("b", "Leaf")
        .composite("c", "Branch")
        .build()?;

    assert_eq!(tree.roots().len(), 3);
    assert_eq!(tree.len(), 3);
    Ok(())
}

#[test]
fn given_two_linked_groups_when_building_then_builds_forest() -> TreeResult<()> {
    let tree = TreeBuilder::new()
        .composite("x", "Branch")
        .leaf("x1", "Leaf")
        .composite("y", "Branch")
        .leaf("y1", "Leaf")
        .link("x", "x1")
        .link("y", "y1")
        .build()?;

    let roots = tree.roots();
    assert_eq!(roots.len(), 2);
    for root in roots {
        assert_eq!(tree.describe(root)?, "Branch(Leaf)");
    }
    Ok(())
}

#[test]
fn given_empty_builder_when_building_then_returns_empty_tree() -> TreeResult<()> {
    let tree = TreeBuilder::new().build()?;

    assert!(tree.is_empty());
    assert!(tree.roots().is_empty());
    Ok(())
}

// ============================================================
// Validation Tests
// ============================================================

#[test]
fn given_duplicate_name_when_building_then_reports_duplicate() {
    let result = TreeBuilder::new()
        .composite("node", "Branch")
        .leaf("node", "Leaf")
        .build();

    assert_eq!(
        result.unwrap_err(),
        TreeError::DuplicateName("node".to_string())
    );
}

#[test]
fn given_unknown_parent_when_building_then_reports_unknown_name() {
    let result = TreeBuilder::new()
        .leaf("a", "Leaf")
        .link("ghost", "a")
        .build();

    assert_eq!(
        result.unwrap_err(),
        TreeError::UnknownName("ghost".to_string())
    );
}

#[test]
fn given_unknown_child_when_building_then_reports_unknown_name() {
    let result = TreeBuilder::new()
        .composite("root", "Branch")
        .link("root", "ghost")
        .build();

    assert_eq!(
        result.unwrap_err(),
        TreeError::UnknownName("ghost".to_string())
    );
}

#[test]
fn given_leaf_parent_when_building_then_reports_leaf_as_parent() {
    let result = TreeBuilder::new()
        .leaf("a", "Leaf")
        .leaf("b", "Leaf")
        .link("a", "b")
        .build();

    let err = result.unwrap_err();
    assert_eq!(err, TreeError::LeafAsParent("a".to_string()));
    assert!(err.to_string().contains("leaf node cannot take children"));
}

#[test]
fn given_two_parents_for_one_child_when_building_then_reports_multiple_parents() {
    let result = TreeBuilder::new()
        .composite("p1", "Branch")
        .composite("p2", "Branch")
        .leaf("c", "Leaf")
        .link("p1", "c")
        .link("p2", "c")
        .build();

    assert_eq!(
        result.unwrap_err(),
        TreeError::MultipleParents("c".to_string())
    );
}

#[test]
fn given_link_cycle_when_building_then_reports_cycle() {
    let result = TreeBuilder::new()
        .composite("a", "Branch")
        .composite("b", "Branch")
        .link("a", "b")
        .link("b", "a")
        .build();

    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("cycle"),
        "Error should mention cycle: {}",
        err
    );
}

#[test]
fn given_cycle_beside_valid_tree_when_building_then_reports_cycle() {
    // root -> x is fine, but a/b loop among themselves and are
    // unreachable from any root
    let result = TreeBuilder::new()
        .composite("root", "Branch")
        .leaf("x", "Leaf")
        .composite("a", "Branch")
        .composite("b", "Branch")
        .link("root", "x")
        .link("a", "b")
        .link("b", "a")
        .build();

    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("cycle"),
        "Error should mention cycle: {}",
        err
    );
}

//! Graph arena tests
//!
//! Tests for node, group, and edge bookkeeping in the diagram arena.

use kubedraw::diagram::{Diagram, EdgeKind, GroupStyle, NodeKind};

#[test]
fn test_empty_diagram() {
    let diagram = Diagram::new();
    assert!(diagram.is_empty());
    assert!(diagram.nodes().is_empty());
    assert!(diagram.groups().is_empty());
    assert!(diagram.edges().is_empty());
    assert!(diagram.roots().is_empty());
}

#[test]
fn test_add_node() {
    let mut diagram = Diagram::new();
    let id = diagram.add_node(NodeKind::Deployment, "web", "web");

    assert!(!diagram.is_empty());
    assert_eq!(diagram.nodes().len(), 1);

    let node = diagram.node(id);
    assert_eq!(node.kind, NodeKind::Deployment);
    assert_eq!(node.name, "web");
    assert_eq!(node.label, "web");
}

#[test]
fn test_node_ids_are_arena_positions() {
    let mut diagram = Diagram::new();
    let first = diagram.add_node(NodeKind::Pod, "a", "a");
    let second = diagram.add_node(NodeKind::Pod, "b", "b");

    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
}

#[test]
fn test_find_node_keys_by_kind_and_name() {
    let mut diagram = Diagram::new();
    diagram.add_node(NodeKind::Service, "api", "api");
    let pod = diagram.add_node(NodeKind::Pod, "api", "api");

    // Same name under different kinds stays distinguishable
    let found = diagram.find_node(NodeKind::Pod, "api").unwrap();
    assert_eq!(found.id, pod);
    assert!(diagram.find_node(NodeKind::Ingress, "api").is_none());
}

#[test]
fn test_group_nesting() {
    let mut diagram = Diagram::new();
    let ns = diagram.add_root_group("default", "default", GroupStyle::Namespace);
    let child = diagram.add_child_group(ns, "web-7f9c8", "rs", GroupStyle::Controller);

    assert_eq!(diagram.roots().to_vec(), vec![ns]);
    assert_eq!(diagram.group(ns).children, vec![child]);
    assert_eq!(diagram.group(child).label, "rs");
    assert_eq!(diagram.group(child).style, GroupStyle::Controller);
    assert_eq!(diagram.groups().len(), 2);
}

#[test]
fn test_group_membership_deduplicates() {
    let mut diagram = Diagram::new();
    let ns = diagram.add_root_group("default", "default", GroupStyle::Namespace);
    let node = diagram.add_node(NodeKind::Pod, "a", "a");

    diagram.add_to_group(ns, node);
    diagram.add_to_group(ns, node);

    assert_eq!(diagram.group(ns).nodes.len(), 1);
    assert!(diagram.group_contains(ns, node));
}

#[test]
fn test_set_label_overwrites() {
    let mut diagram = Diagram::new();
    let node = diagram.add_node(NodeKind::ReplicaSet, "web-7f9c8", "web-7f9c8");

    diagram.set_label(node, "web-\n7f9c8");

    assert_eq!(diagram.node(node).label, "web-\n7f9c8");
    assert_eq!(diagram.node(node).name, "web-7f9c8");
}

#[test]
fn test_edges_keep_insertion_order() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeKind::Deployment, "web", "web");
    let b = diagram.add_node(NodeKind::ReplicaSet, "web-7f9c8", "web-7f9c8");

    diagram.add_edge(a, b, EdgeKind::Owns, None);
    diagram.add_edge(b, a, EdgeKind::Routes, Some("203.0.113.9".to_string()));

    assert_eq!(diagram.edges().len(), 2);
    assert_eq!(diagram.edges()[0].kind, EdgeKind::Owns);
    assert_eq!(diagram.edges()[0].from, a);
    assert_eq!(diagram.edges()[1].kind, EdgeKind::Routes);
    assert_eq!(diagram.edges()[1].label.as_deref(), Some("203.0.113.9"));
}

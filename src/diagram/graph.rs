//! Graph data structures for the namespace topology diagram
//!
//! This module provides the arena that owns every node, group, and edge of a
//! diagram. Construction code holds copyable ids instead of references, so
//! membership and relationship checks are plain index lookups.

/// Identifier of a node in the diagram arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in [`Diagram::nodes`]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifier of a group in the diagram arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position of the group in [`Diagram::groups`]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resource kind a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Deployment,
    DaemonSet,
    ReplicaSet,
    StatefulSet,
    Pod,
    Service,
    Ingress,
    /// External traffic origin, created at most once per diagram
    Internet,
}

/// A node in the topology diagram
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Id of this node in the arena
    pub id: NodeId,
    /// Resource kind
    pub kind: NodeKind,
    /// Resource name
    pub name: String,
    /// Display label; rewritten once an owning controller is known
    pub label: String,
}

/// Relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Controller-to-child or ingress-to-backend ownership
    Owns,
    /// Traffic path, drawn against the layout direction
    Routes,
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source node id
    pub from: NodeId,
    /// Target node id
    pub to: NodeId,
    /// Relationship type
    pub kind: EdgeKind,
    /// External address shown next to load-balancer edges
    pub label: Option<String>,
}

/// Visual style of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStyle {
    /// The enclosing namespace cluster
    Namespace,
    /// A pod-owning controller cluster, drawn with a shaded background
    Controller,
}

/// A cluster of nodes, possibly nested inside another group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Id of this group in the arena
    pub id: GroupId,
    /// Resource name the group stands for
    pub name: String,
    /// Display label
    pub label: String,
    /// Visual style
    pub style: GroupStyle,
    /// Member nodes, in insertion order
    pub nodes: Vec<NodeId>,
    /// Nested groups, in insertion order
    pub children: Vec<GroupId>,
}

/// A topology diagram: arenas of nodes, groups, and edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    nodes: Vec<Node>,
    groups: Vec<Group>,
    edges: Vec<Edge>,
    /// Groups with no parent, in insertion order
    roots: Vec<GroupId>,
}

impl Diagram {
    /// Create a new empty diagram
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the arena and return its id
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            name: name.into(),
            label: label.into(),
        });
        id
    }

    /// Add a top-level group and return its id
    pub fn add_root_group(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        style: GroupStyle,
    ) -> GroupId {
        let id = self.push_group(name, label, style);
        self.roots.push(id);
        id
    }

    /// Add a group nested inside `parent` and return its id
    pub fn add_child_group(
        &mut self,
        parent: GroupId,
        name: impl Into<String>,
        label: impl Into<String>,
        style: GroupStyle,
    ) -> GroupId {
        let id = self.push_group(name, label, style);
        self.groups[parent.0].children.push(id);
        id
    }

    fn push_group(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        style: GroupStyle,
    ) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group {
            id,
            name: name.into(),
            label: label.into(),
            style,
            nodes: Vec::new(),
            children: Vec::new(),
        });
        id
    }

    /// Attach a node to a group. Attaching the same node twice is a no-op.
    pub fn add_to_group(&mut self, group: GroupId, node: NodeId) {
        let members = &mut self.groups[group.0].nodes;
        if !members.contains(&node) {
            members.push(node);
        }
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind, label: Option<String>) {
        self.edges.push(Edge {
            from,
            to,
            kind,
            label,
        });
    }

    /// Overwrite a node's display label
    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) {
        self.nodes[node.0].label = label.into();
    }

    /// Node record for an id minted by this arena
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Group record for an id minted by this arena
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// All nodes, in creation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All groups, in creation order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All edges, in creation order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Top-level groups, in creation order
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// Find a node by kind and resource name
    pub fn find_node(&self, kind: NodeKind, name: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.kind == kind && node.name == name)
    }

    /// True when a node is a member of the given group
    pub fn group_contains(&self, group: GroupId, node: NodeId) -> bool {
        self.groups[group.0].nodes.contains(&node)
    }

    /// True when the diagram holds no nodes and no groups
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty()
    }
}

//! Namespace topology diagram construction
//!
//! Turns the per-kind resource lists of one namespace into a nested graph of
//! groups, nodes, and edges. The builder walks the kinds in a fixed stage
//! order; the resolvers and filters it uses are pure functions.

pub mod builder;
pub mod filters;
pub mod graph;
pub mod labels;
pub mod owner;

pub use builder::DiagramBuilder;
pub use graph::{Diagram, Edge, EdgeKind, Group, GroupId, GroupStyle, Node, NodeId, NodeKind};

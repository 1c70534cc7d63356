//! kubedraw Library
//!
//! This library provides the core functionality for the kubedraw CLI.
//! It can be used both as a binary and as a library for testing.

pub mod diagram;
pub mod discovery;
pub mod kube;
pub mod render;

// Re-export commonly used types for convenience
pub use diagram::{Diagram, DiagramBuilder, Edge, EdgeKind, Group, GroupStyle, Node, NodeKind};
pub use discovery::{Discovery, DiscoveryError, ObjectStore};
pub use render::{Direction, RenderOptions, render, to_dot};

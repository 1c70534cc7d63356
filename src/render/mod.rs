//! Graphviz rendering
//!
//! Serializes a built diagram to DOT text and writes it to
//! `<output_dir>/<filename>.dot`. The namespace renders as the outer
//! cluster with controller groups as shaded clusters nested inside it.
//! Nodes outside every group are printed only when an edge references them.

use crate::diagram::{Diagram, EdgeKind, GroupId, GroupStyle, Node, NodeId, NodeKind};
use std::collections::HashSet;
use std::path::PathBuf;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rendering failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Graph layout direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Top to bottom, the Graphviz `TB` rank direction
    #[default]
    TopBottom,
    /// Left to right, the Graphviz `LR` rank direction
    LeftRight,
}

impl Direction {
    fn as_dot(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
        }
    }
}

/// Output settings for one rendered diagram
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Directory the artifact lands in, created on demand
    pub output_dir: PathBuf,
    /// Artifact name without the `.dot` extension
    pub filename: String,
    /// Caption drawn under the whole graph
    pub label: String,
    /// Rank direction of the layout
    pub direction: Direction,
    /// Minimum space between nodes of the same rank, in inches
    pub nodesep: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("diagrams"),
            filename: "k8s".to_string(),
            label: "Kubernetes".to_string(),
            direction: Direction::default(),
            nodesep: 0.5,
        }
    }
}

/// Serialize the diagram to DOT text
pub fn to_dot(diagram: &Diagram, options: &RenderOptions) -> String {
    let mut output = String::from("digraph {\n");
    output.push_str(&format!("    label=\"{}\";\n", escape_label(&options.label)));
    output.push_str(&format!("    rankdir={};\n", options.direction.as_dot()));
    output.push_str(&format!("    nodesep={};\n", options.nodesep));
    output.push_str("    node [fontname=\"Sans-Serif\"];\n");
    output.push_str("    edge [fontname=\"Sans-Serif\"];\n\n");

    // Cluster tree first; each node definition lands in its first cluster
    let mut printed: HashSet<NodeId> = HashSet::new();
    for root in diagram.roots() {
        write_group(&mut output, diagram, *root, 1, &mut printed);
    }

    // Loose nodes render only when an edge touches them
    let referenced: HashSet<NodeId> = diagram
        .edges()
        .iter()
        .flat_map(|edge| [edge.from, edge.to])
        .collect();
    for node in diagram.nodes() {
        if !printed.contains(&node.id) && referenced.contains(&node.id) {
            write_node(&mut output, node, 1);
        }
    }

    if !diagram.edges().is_empty() {
        output.push('\n');
    }
    for edge in diagram.edges() {
        let from = format!("n{}", edge.from.index());
        let to = format!("n{}", edge.to.index());
        match edge.kind {
            EdgeKind::Owns => {
                output.push_str(&format!("    {} -> {};\n", from, to));
            }
            // An address label marks an external edge; plain traffic edges
            // point against the layout so pods rank above their service
            EdgeKind::Routes => match &edge.label {
                Some(address) => output.push_str(&format!(
                    "    {} -> {} [xlabel=\"{}\" labelfloat=true fontsize=6];\n",
                    from,
                    to,
                    escape_label(address)
                )),
                None => output.push_str(&format!("    {} -> {} [dir=back];\n", from, to)),
            },
        }
    }

    output.push_str("}\n");
    output
}

/// Serialize the diagram and write it to `<output_dir>/<filename>.dot`
pub fn render(diagram: &Diagram, options: &RenderOptions) -> RenderResult<PathBuf> {
    let dot = to_dot(diagram, options);

    std::fs::create_dir_all(&options.output_dir)?;
    let path = options.output_dir.join(format!("{}.dot", options.filename));
    std::fs::write(&path, dot)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}

fn write_group(
    output: &mut String,
    diagram: &Diagram,
    group_id: GroupId,
    depth: usize,
    printed: &mut HashSet<NodeId>,
) {
    let group = diagram.group(group_id);
    let indent = "    ".repeat(depth);

    output.push_str(&format!(
        "{}subgraph cluster_{} {{\n",
        indent,
        group_id.index()
    ));
    output.push_str(&format!(
        "{}    label=\"{}\";\n",
        indent,
        escape_label(&group.label)
    ));
    match group.style {
        GroupStyle::Namespace => {
            output.push_str(&format!("{}    fontsize=8;\n", indent));
            output.push_str(&format!("{}    fontname=\"Sans-Serif\";\n", indent));
            output.push_str(&format!("{}    fontcolor=\"#2D3436\";\n", indent));
        }
        GroupStyle::Controller => {
            output.push_str(&format!("{}    style=filled;\n", indent));
            output.push_str(&format!("{}    fillcolor=\"#9EBCDA\";\n", indent));
        }
    }

    for node_id in &group.nodes {
        if printed.insert(*node_id) {
            write_node(output, diagram.node(*node_id), depth + 1);
        }
    }
    for child in &group.children {
        write_group(output, diagram, *child, depth + 1, printed);
    }

    output.push_str(&format!("{}}}\n", indent));
}

fn write_node(output: &mut String, node: &Node, depth: usize) {
    let indent = "    ".repeat(depth);
    output.push_str(&format!(
        "{}n{} [label=\"{}\" {}];\n",
        indent,
        node.id.index(),
        escape_label(&node.label),
        node_attributes(node.kind)
    ));
}

fn node_attributes(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Deployment
        | NodeKind::DaemonSet
        | NodeKind::ReplicaSet
        | NodeKind::StatefulSet => "shape=box",
        NodeKind::Pod => "shape=box style=rounded",
        NodeKind::Service => "shape=ellipse",
        NodeKind::Ingress => "shape=diamond",
        NodeKind::Internet => "shape=doublecircle",
    }
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_escape_newlines_and_quotes() {
        assert_eq!(escape_label("web-\n7f9c8"), "web-\\n7f9c8");
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_directions_map_to_rank_directions() {
        assert_eq!(Direction::TopBottom.as_dot(), "TB");
        assert_eq!(Direction::LeftRight.as_dot(), "LR");
    }
}

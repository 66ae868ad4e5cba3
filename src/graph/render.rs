//! Diagram output for lineage graphs
//!
//! DOT is the primary format: node names are the escaped three-line labels,
//! so the output can be piped straight into `dot -Tsvg`.

use serde::{Deserialize, Serialize};

use super::model::{EdgeKind, GraphEdge, GraphNode, LineageGraph, NodeState};
use crate::error::LineageError;

/// Supported diagram formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// Mermaid flowchart
    Mermaid,
    /// Nodes and edges as JSON
    Json,
}

/// A format name that is not one of `dot`, `mermaid` or `json`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format {0:?} (expected dot, mermaid or json)")]
pub struct UnknownFormat(pub String);

impl std::str::FromStr for RenderFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl LineageGraph {
    /// Serialize the graph as a diagram named `name`
    pub fn render(&self, format: RenderFormat, name: &str) -> Result<String, LineageError> {
        self.validate()?;
        match format {
            RenderFormat::Dot => Ok(render_dot(self, name)),
            RenderFormat::Mermaid => Ok(render_mermaid(self)),
            RenderFormat::Json => render_json(self, name),
        }
    }

    fn validate(&self) -> Result<(), LineageError> {
        for edge in self.edges() {
            if self.node(edge.from).is_none() || self.node(edge.to).is_none() {
                return Err(LineageError::render(format!(
                    "edge {} -> {} references a missing node",
                    edge.from.0, edge.to.0
                )));
            }
        }
        Ok(())
    }
}

/// Escape a string for use inside a quoted DOT ID
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_id(node: &GraphNode) -> String {
    let parts: Vec<String> = node
        .label
        .parts()
        .iter()
        .map(|part| escape_dot(part))
        .collect();
    format!("\"{}\"", parts.join("\\n"))
}

fn render_dot(graph: &LineageGraph, name: &str) -> String {
    let mut lines = vec![format!("digraph \"{}\" {{", escape_dot(name))];

    for node in graph.nodes() {
        match &node.state {
            NodeState::Resolved => lines.push(format!("  {};", dot_id(node))),
            NodeState::Unresolved(reason) => lines.push(format!(
                "  {} [style=dashed, tooltip=\"{}\"];",
                dot_id(node),
                escape_dot(reason)
            )),
        }
    }

    for GraphEdge { from, to, kind } in graph.edges() {
        // validated by render()
        let (Some(from), Some(to)) = (graph.node(*from), graph.node(*to)) else {
            continue;
        };
        let attrs = match kind {
            EdgeKind::Owner => "",
            EdgeKind::Cycle => " [style=dotted]",
        };
        lines.push(format!("  {} -> {}{};", dot_id(from), dot_id(to), attrs));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn render_mermaid(graph: &LineageGraph) -> String {
    let mut lines = vec!["flowchart BT".to_string()];
    let mut unresolved = Vec::new();

    for node in graph.nodes() {
        let caption: Vec<String> = node
            .label
            .parts()
            .iter()
            .map(|part| part.replace('"', "#quot;"))
            .collect();
        lines.push(format!("    n{}[\"{}\"]", node.id.0, caption.join("<br/>")));
        if matches!(node.state, NodeState::Unresolved(_)) {
            unresolved.push(format!("n{}", node.id.0));
        }
    }

    for edge in graph.edges() {
        let arrow = match edge.kind {
            EdgeKind::Owner => "-->",
            EdgeKind::Cycle => "-.->",
        };
        lines.push(format!("    n{} {} n{}", edge.from.0, arrow, edge.to.0));
    }

    if !unresolved.is_empty() {
        lines.push("    classDef unresolved stroke-dasharray: 5 5".to_string());
        lines.push(format!("    class {} unresolved", unresolved.join(",")));
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    name: &'a str,
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
}

fn render_json(graph: &LineageGraph, name: &str) -> Result<String, LineageError> {
    serde_json::to_string_pretty(&JsonGraph {
        name,
        nodes: graph.nodes(),
        edges: graph.edges(),
    })
    .map_err(|e| LineageError::render(e.to_string()))
}

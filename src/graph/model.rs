//! Graph data structures for ownership lineages

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::LineageError;

/// Index of a node in a [`LineageGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Index of an edge in a [`LineageGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

/// Three-line caption identifying a node
///
/// Two objects with the same label are the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
    /// Resource collection name, or the kind when the type was never resolved
    pub resource: String,
    pub api_version: String,
    pub name: String,
}

impl NodeLabel {
    pub fn new(
        resource: impl Into<String>,
        api_version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            api_version: api_version.into(),
            name: name.into(),
        }
    }

    /// Label lines in caption order
    pub fn parts(&self) -> [&str; 3] {
        [&self.resource, &self.api_version, &self.name]
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.resource, self.api_version, self.name)
    }
}

/// Whether an owner could be followed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum NodeState {
    Resolved,
    /// The owner's type or object could not be resolved; the branch stops here
    Unresolved(String),
}

/// A node in the lineage graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: NodeLabel,
    pub state: NodeState,
}

/// Kind of child → owner edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Plain ownership
    Owner,
    /// Points back to a node already on the path from the start object
    Cycle,
}

/// Directed edge from a child to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

/// Ownership lineage graph
///
/// Nodes are deduplicated by label; edges are append-only.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<NodeLabel, NodeId>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node, or return the existing node with the same label
    pub fn create_node(&mut self, label: NodeLabel) -> NodeId {
        if let Some(id) = self.node_index.get(&label) {
            return *id;
        }

        let id = NodeId(self.nodes.len());
        self.node_index.insert(label.clone(), id);
        self.nodes.push(GraphNode {
            id,
            label,
            state: NodeState::Resolved,
        });
        id
    }

    /// Add an ownership edge from `from` (child) to `to` (owner)
    pub fn create_edge(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, LineageError> {
        self.create_edge_of_kind(from, to, EdgeKind::Owner)
    }

    pub fn create_edge_of_kind(
        &mut self,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
    ) -> Result<EdgeId, LineageError> {
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(LineageError::render(format!(
                    "edge references unknown node {}",
                    id.0
                )));
            }
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(GraphEdge { from, to, kind });
        Ok(id)
    }

    /// Record why a node's lineage could not be followed
    pub fn mark_unresolved(&mut self, id: NodeId, reason: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.state = NodeState::Unresolved(reason.into());
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    pub fn node_by_label(&self, label: &NodeLabel) -> Option<NodeId> {
        self.node_index.get(label).copied()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Edges leaving `id`, i.e. towards its owners
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    /// Nodes without owners: the tops of the lineage
    pub fn sinks(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| self.outgoing(*id).next().is_none())
            .collect()
    }
}

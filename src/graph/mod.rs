//! Lineage graph construction and rendering
//!
//! The walker creates nodes by label and connects children to owners; the
//! finished graph is rendered once, in the requested format.

mod model;
mod render;

pub use model::{
    EdgeId, EdgeKind, GraphEdge, GraphNode, LineageGraph, NodeId, NodeLabel, NodeState,
};
pub use render::{RenderFormat, UnknownFormat};

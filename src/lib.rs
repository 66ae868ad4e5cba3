//! ownergraph library
//!
//! Resolves the ownership lineage of a Kubernetes object and renders it as a
//! graph. The binary is a thin wrapper; everything here can be driven from
//! tests with an in-memory [`lineage::ObjectStore`].

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod kube;
pub mod lineage;

// Re-export commonly used types for convenience
pub use error::LineageError;
pub use graph::{LineageGraph, NodeLabel, RenderFormat};
pub use lineage::{
    FailurePolicy, GroupVersionResource, LineageWalker, ObjectRef, ObjectStore, OwnerReference,
    TypeCatalog, WalkOptions,
};

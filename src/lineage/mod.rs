//! Ownership lineage resolution
//!
//! Walks the owner reference chain of a Kubernetes object - like
//! `kubectl tree` in reverse - resolving every owner's kind to a resource
//! collection and recording child → owner edges in a [`LineageGraph`].
//!
//! [`LineageGraph`]: crate::graph::LineageGraph

mod models;
mod resolver;
mod store;
mod walker;

pub use models::{
    GroupVersionResource, ObjectRef, OwnerReference, ResolvedType, join_api_version,
    split_api_version,
};
pub use resolver::{CatalogEntry, TypeCatalog, TypeResolver};
pub use store::{KubeObjectStore, ObjectStore, parse_owner_references};
pub use walker::{FailurePolicy, LineageWalker, WalkOptions};

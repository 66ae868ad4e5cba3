//! Ownership lineage traversal
//!
//! Walks owner references with an explicit stack instead of recursion. Each
//! pending item carries the labels on its path from the start object, which
//! is how reference cycles are detected and cut.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::LineageError;
use crate::graph::{EdgeKind, LineageGraph, NodeId, NodeLabel};
use crate::lineage::models::{ObjectRef, OwnerReference, ResolvedType};
use crate::lineage::resolver::TypeResolver;
use crate::lineage::store::ObjectStore;

/// What to do when a single owner cannot be resolved or fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the walk and return the error
    #[default]
    Abort,
    /// Mark the owner as unresolved and continue with the rest of the lineage
    SkipBranch,
}

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub on_error: FailurePolicy,
    /// Objects at this depth are drawn but not expanded; the start object
    /// is depth 0, so `Some(0)` yields the start node alone
    pub max_depth: Option<usize>,
}

/// Pending owner reference together with the child that declared it
struct WorkItem {
    child: NodeId,
    owner: OwnerReference,
    /// Labels from the start object down to `child`, inclusive
    path: Arc<Vec<NodeLabel>>,
}

/// Builds the ownership graph of one object
pub struct LineageWalker<'a, R, S> {
    resolver: &'a R,
    store: &'a S,
    options: WalkOptions,
}

impl<'a, R, S> LineageWalker<'a, R, S>
where
    R: TypeResolver,
    S: ObjectStore,
{
    pub fn new(resolver: &'a R, store: &'a S, options: WalkOptions) -> Self {
        Self {
            resolver,
            store,
            options,
        }
    }

    /// Walk the owners of `start` and return the finished graph
    ///
    /// Namespaced owners are fetched in the start object's namespace; owners
    /// resolved as cluster-scoped are fetched without one.
    pub async fn walk(&self, start: &ObjectRef) -> Result<LineageGraph, LineageError> {
        let mut graph = LineageGraph::new();
        let start_label = NodeLabel::new(&start.gvr.resource, start.gvr.api_version(), &start.name);
        let start_node = graph.create_node(start_label.clone());

        tracing::debug!("Fetching owners of start object {}", start);
        let owners = self.store.fetch_owners(start).await?;

        let mut expanded: HashSet<NodeLabel> = HashSet::new();
        expanded.insert(start_label.clone());

        let mut stack = Vec::new();
        if self.options.max_depth == Some(0) {
            tracing::debug!("Not expanding {}: depth limit 0", start);
        } else {
            push_owners(&mut stack, start_node, owners, Arc::new(vec![start_label]));
        }

        while let Some(item) = stack.pop() {
            let WorkItem { child, owner, path } = item;
            let (group, _version) = owner.group_version();

            let resolved = match self.resolver.resolve(group, &owner.kind) {
                Ok(resolved) => resolved,
                Err(err) => {
                    self.record_failure(&mut graph, child, &owner, None, err)?;
                    continue;
                }
            };

            let label = NodeLabel::new(&resolved.gvr.resource, &owner.api_version, &owner.name);
            let node = graph.create_node(label.clone());

            if path.contains(&label) {
                tracing::warn!(
                    "Ownership cycle: {} {} is already on the path from the start object",
                    owner.kind,
                    owner.name
                );
                graph.create_edge_of_kind(child, node, EdgeKind::Cycle)?;
                continue;
            }
            graph.create_edge(child, node)?;

            if !expanded.insert(label.clone()) {
                tracing::debug!("{} {} already expanded", owner.kind, owner.name);
                continue;
            }

            if let Some(max_depth) = self.options.max_depth {
                // path holds the start object, so its length is this owner's depth
                if path.len() >= max_depth {
                    tracing::debug!(
                        "Not expanding {} {}: depth limit {} reached",
                        owner.kind,
                        owner.name,
                        max_depth
                    );
                    continue;
                }
            }

            let object = owner_object(start, &resolved, &owner);
            tracing::debug!("Fetching owners of {}", object);
            let owners = match self.store.fetch_owners(&object).await {
                Ok(owners) => owners,
                Err(err) => {
                    self.record_failure(&mut graph, child, &owner, Some(node), err)?;
                    continue;
                }
            };

            if !owners.is_empty() {
                let mut next_path = Vec::with_capacity(path.len() + 1);
                next_path.extend(path.iter().cloned());
                next_path.push(label);
                push_owners(&mut stack, node, owners, Arc::new(next_path));
            }
        }

        Ok(graph)
    }

    /// Apply the failure policy to an error raised for one owner
    ///
    /// `node` is the owner's node when it was already created (fetch failures);
    /// otherwise an unresolved node is created, labelled with the owner's kind.
    fn record_failure(
        &self,
        graph: &mut LineageGraph,
        child: NodeId,
        owner: &OwnerReference,
        node: Option<NodeId>,
        err: LineageError,
    ) -> Result<(), LineageError> {
        if self.options.on_error == FailurePolicy::Abort || !err.is_branch_scoped() {
            return Err(err);
        }

        tracing::warn!("Skipping owner {} {}: {}", owner.kind, owner.name, err);
        let node = match node {
            Some(node) => node,
            None => {
                let label = NodeLabel::new(&owner.kind, &owner.api_version, &owner.name);
                let node = graph.create_node(label);
                graph.create_edge(child, node)?;
                node
            }
        };
        graph.mark_unresolved(node, err.to_string());
        Ok(())
    }
}

fn push_owners(
    stack: &mut Vec<WorkItem>,
    child: NodeId,
    owners: Vec<OwnerReference>,
    path: Arc<Vec<NodeLabel>>,
) {
    // reversed so owners pop in declared order
    for owner in owners.into_iter().rev() {
        stack.push(WorkItem {
            child,
            owner,
            path: Arc::clone(&path),
        });
    }
}

fn owner_object(start: &ObjectRef, resolved: &ResolvedType, owner: &OwnerReference) -> ObjectRef {
    if resolved.namespaced {
        ObjectRef {
            gvr: resolved.gvr.clone(),
            namespace: start.namespace.clone(),
            name: owner.name.clone(),
        }
    } else {
        ObjectRef::cluster_scoped(resolved.gvr.clone(), &owner.name)
    }
}

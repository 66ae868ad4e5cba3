//! Type resolution from (group, kind) to a fetchable resource collection
//!
//! The catalog is captured once per run from API discovery and is read-only
//! afterwards, so every lookup is a plain map access.

use std::collections::HashMap;

use crate::error::LineageError;
use crate::lineage::models::{GroupVersionResource, ObjectRef, ResolvedType};

/// Resolves the abstract type of an owner reference
pub trait TypeResolver {
    fn resolve(&self, group: &str, kind: &str) -> Result<ResolvedType, LineageError>;
}

/// One entry of the cluster's API type catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub resource: String,
    pub namespaced: bool,
}

impl CatalogEntry {
    pub fn namespaced(group: &str, version: &str, kind: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            resource: resource.to_string(),
            namespaced: true,
        }
    }

    pub fn cluster_scoped(group: &str, version: &str, kind: &str, resource: &str) -> Self {
        Self {
            namespaced: false,
            ..Self::namespaced(group, version, kind, resource)
        }
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Unique(ResolvedType),
    Ambiguous(Vec<String>),
}

/// (group, kind) → resource collection mapping built from discovery
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    by_kind: HashMap<(String, String), Slot>,
    by_resource: HashMap<(String, String), String>,
}

impl TypeCatalog {
    /// Build a catalog from discovered entries
    ///
    /// The first entry for a (group, kind) wins when later entries agree on
    /// the resource name (discovery lists the preferred version first). A
    /// later entry naming a different resource makes the kind ambiguous.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    fn insert(&mut self, entry: CatalogEntry) {
        self.by_resource
            .entry((entry.group.clone(), entry.resource.clone()))
            .or_insert_with(|| entry.kind.clone());

        let key = (entry.group.clone(), entry.kind.clone());
        match self.by_kind.get_mut(&key) {
            None => {
                self.by_kind.insert(
                    key,
                    Slot::Unique(ResolvedType {
                        gvr: GroupVersionResource::new(
                            entry.group,
                            entry.version,
                            entry.resource,
                        ),
                        kind: entry.kind,
                        namespaced: entry.namespaced,
                    }),
                );
            }
            Some(Slot::Unique(existing)) => {
                if existing.gvr.resource != entry.resource {
                    tracing::debug!(
                        group = %entry.group,
                        kind = %entry.kind,
                        "Kind maps to more than one resource ({} and {})",
                        existing.gvr.resource,
                        entry.resource
                    );
                    let candidates = vec![existing.gvr.resource.clone(), entry.resource];
                    self.by_kind.insert(key, Slot::Ambiguous(candidates));
                }
            }
            Some(Slot::Ambiguous(candidates)) => {
                if !candidates.contains(&entry.resource) {
                    candidates.push(entry.resource);
                }
            }
        }
    }

    /// Number of resolvable (group, kind) pairs
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Kind served by a (group, resource) collection, if discovery listed it
    pub fn kind_for(&self, group: &str, resource: &str) -> Option<&str> {
        self.by_resource
            .get(&(group.to_string(), resource.to_string()))
            .map(String::as_str)
    }

    /// Resolve a (group, resource) collection back to its catalog entry
    pub fn resolve_resource(&self, group: &str, resource: &str) -> Option<ResolvedType> {
        let kind = self.kind_for(group, resource)?;
        self.resolve(group, kind).ok()
    }

    /// Identity of the object to start from
    ///
    /// The namespace is dropped when discovery lists the resource as
    /// cluster-scoped. Unknown resources are assumed to be namespaced; the
    /// first fetch reports them.
    pub fn object_ref(&self, gvr: GroupVersionResource, namespace: &str, name: &str) -> ObjectRef {
        match self.resolve_resource(&gvr.group, &gvr.resource) {
            Some(resolved) if !resolved.namespaced => ObjectRef::cluster_scoped(gvr, name),
            Some(_) => ObjectRef::namespaced(gvr, namespace, name),
            None => {
                tracing::debug!(
                    "{} is not in the type catalog, assuming it is namespaced",
                    gvr.resource
                );
                ObjectRef::namespaced(gvr, namespace, name)
            }
        }
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, group: &str, kind: &str) -> Result<ResolvedType, LineageError> {
        if kind.is_empty() {
            return Err(LineageError::type_not_found(group, kind));
        }

        match self.by_kind.get(&(group.to_string(), kind.to_string())) {
            Some(Slot::Unique(resolved)) => Ok(resolved.clone()),
            Some(Slot::Ambiguous(candidates)) => Err(LineageError::AmbiguousType {
                group: group.to_string(),
                kind: kind.to_string(),
                candidates: candidates.clone(),
            }),
            None => Err(LineageError::type_not_found(group, kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TypeCatalog {
        TypeCatalog::from_entries(vec![
            CatalogEntry::namespaced("", "v1", "Pod", "pods"),
            CatalogEntry::cluster_scoped("", "v1", "Node", "nodes"),
            CatalogEntry::namespaced("apps", "v1", "ReplicaSet", "replicasets"),
            CatalogEntry::namespaced("apps", "v1", "Deployment", "deployments"),
        ])
    }

    #[test]
    fn test_resolve_core_group_kind() {
        let resolved = catalog().resolve("", "Pod").unwrap();
        assert_eq!(resolved.gvr, GroupVersionResource::new("", "v1", "pods"));
        assert!(resolved.namespaced);
    }

    #[test]
    fn test_resolve_named_group_kind() {
        let resolved = catalog().resolve("apps", "ReplicaSet").unwrap();
        assert_eq!(resolved.gvr.resource, "replicasets");
        assert_eq!(resolved.gvr.api_version(), "apps/v1");
    }

    #[test]
    fn test_resolve_keeps_scope() {
        let resolved = catalog().resolve("", "Node").unwrap();
        assert!(!resolved.namespaced);
    }

    #[test]
    fn test_unknown_kind_is_type_not_found() {
        let err = catalog().resolve("apps", "Pod").unwrap_err();
        assert!(matches!(err, LineageError::TypeNotFound { ref group, ref kind }
            if group == "apps" && kind == "Pod"));
    }

    #[test]
    fn test_empty_kind_is_rejected() {
        assert!(matches!(
            catalog().resolve("", ""),
            Err(LineageError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_first_version_wins() {
        let catalog = TypeCatalog::from_entries(vec![
            CatalogEntry::namespaced(
                "autoscaling",
                "v2",
                "HorizontalPodAutoscaler",
                "horizontalpodautoscalers",
            ),
            CatalogEntry::namespaced(
                "autoscaling",
                "v1",
                "HorizontalPodAutoscaler",
                "horizontalpodautoscalers",
            ),
        ]);
        let resolved = catalog.resolve("autoscaling", "HorizontalPodAutoscaler").unwrap();
        assert_eq!(resolved.gvr.version, "v2");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_conflicting_resources_are_ambiguous() {
        let catalog = TypeCatalog::from_entries(vec![
            CatalogEntry::namespaced("example.com", "v1", "Widget", "widgets"),
            CatalogEntry::namespaced("example.com", "v1beta1", "Widget", "legacywidgets"),
        ]);
        match catalog.resolve("example.com", "Widget") {
            Err(LineageError::AmbiguousType { candidates, .. }) => {
                assert_eq!(candidates, vec!["widgets", "legacywidgets"]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_kind_for_resource() {
        let catalog = catalog();
        assert_eq!(catalog.kind_for("apps", "deployments"), Some("Deployment"));
        assert_eq!(catalog.kind_for("", "deployments"), None);
    }

    #[test]
    fn test_resolve_resource_reports_scope() {
        let catalog = catalog();
        assert!(!catalog.resolve_resource("", "nodes").unwrap().namespaced);
        assert!(catalog.resolve_resource("", "pods").unwrap().namespaced);
        assert!(catalog.resolve_resource("", "widgets").is_none());
    }

    #[test]
    fn test_object_ref_drops_namespace_for_cluster_scoped() {
        let catalog = catalog();
        let node =
            catalog.object_ref(GroupVersionResource::new("", "v1", "nodes"), "default", "n1");
        assert_eq!(node.namespace, None);

        let pod = catalog.object_ref(GroupVersionResource::new("", "v1", "pods"), "default", "p");
        assert_eq!(pod.namespace.as_deref(), Some("default"));

        let unknown =
            catalog.object_ref(GroupVersionResource::new("x.io", "v1", "things"), "ns", "t");
        assert_eq!(unknown.namespace.as_deref(), Some("ns"));
    }
}

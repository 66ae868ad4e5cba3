//! Data structures for lineage resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete, fetchable address of a resource collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    /// `group/version`, or the bare version for the core group
    pub fn api_version(&self) -> String {
        join_api_version(&self.group, &self.version)
    }
}

/// Identity of a single cluster object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub gvr: GroupVersionResource,
    /// `None` for cluster-scoped objects
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectRef {
    pub fn namespaced(
        gvr: GroupVersionResource,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            gvr,
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn cluster_scoped(gvr: GroupVersionResource, name: impl Into<String>) -> Self {
        Self {
            gvr,
            namespace: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(
                f,
                "{}/{}/{}/{}",
                self.gvr.api_version(),
                self.gvr.resource,
                ns,
                self.name
            ),
            None => write!(
                f,
                "{}/{}/{}",
                self.gvr.api_version(),
                self.gvr.resource,
                self.name
            ),
        }
    }
}

/// A declared parent taken from `metadata.ownerReferences`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

impl OwnerReference {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
            uid: None,
            controller: None,
        }
    }

    /// Group and version declared by this reference
    pub fn group_version(&self) -> (&str, &str) {
        split_api_version(&self.api_version)
    }
}

/// Split an apiVersion at the first `/`
///
/// Core-group objects carry a bare version (`v1`), which yields an empty group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// Inverse of [`split_api_version`]
pub fn join_api_version(group: &str, version: &str) -> String {
    if group.is_empty() {
        version.to_string()
    } else {
        format!("{}/{}", group, version)
    }
}

/// Result of resolving a (group, kind) through the type catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub gvr: GroupVersionResource,
    pub kind: String,
    pub namespaced: bool,
}

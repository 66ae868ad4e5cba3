//! Object store access for owner references
//!
//! The walker only needs one read: the owner references of a single object.
//! `KubeObjectStore` performs that read against the API server; tests plug in
//! their own implementation of [`ObjectStore`].

use async_trait::async_trait;
use kube::api::GetParams;
use kube::core::{ApiResource, DynamicObject, Request};
use serde_json::Value;

use crate::error::LineageError;
use crate::lineage::models::{ObjectRef, OwnerReference};

/// Read-only access to the owner references of cluster objects
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the owner references declared by `object`
    ///
    /// An object without owner references yields an empty list.
    async fn fetch_owners(&self, object: &ObjectRef) -> Result<Vec<OwnerReference>, LineageError>;
}

/// Object store backed by the Kubernetes API
pub struct KubeObjectStore {
    client: kube::Client,
}

impl KubeObjectStore {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn request_for(object: &ObjectRef) -> Result<http::Request<Vec<u8>>, LineageError> {
        let api_resource = ApiResource {
            group: object.gvr.group.clone(),
            version: object.gvr.version.clone(),
            api_version: object.gvr.api_version(),
            kind: String::new(),
            plural: object.gvr.resource.clone(),
        };
        let url = <DynamicObject as kube::Resource>::url_path(
            &api_resource,
            object.namespace.as_deref(),
        );

        Request::new(url)
            .get(&object.name, &GetParams::default())
            .map_err(|e| LineageError::connection(format!("invalid request for {}: {}", object, e)))
    }
}

#[async_trait]
impl ObjectStore for KubeObjectStore {
    async fn fetch_owners(&self, object: &ObjectRef) -> Result<Vec<OwnerReference>, LineageError> {
        let request = Self::request_for(object)?;
        tracing::debug!("GET {}", request.uri());

        match self.client.request::<Value>(request).await {
            Ok(body) => parse_owner_references(&object.to_string(), &body),
            Err(kube::Error::Api(response)) if response.code == 404 => {
                Err(LineageError::object_not_found(object.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Extract and validate `metadata.ownerReferences` from a raw object
///
/// `object` is only used to describe the source in errors.
pub fn parse_owner_references(
    object: &str,
    body: &Value,
) -> Result<Vec<OwnerReference>, LineageError> {
    let metadata = match body.get("metadata") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(metadata)) => metadata,
        Some(_) => return Err(LineageError::malformed(object, "metadata is not an object")),
    };

    let entries = match metadata.get("ownerReferences") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(LineageError::malformed(
                object,
                format!("ownerReferences is {}, expected a list", json_type(other)),
            ));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let owner: OwnerReference = serde_json::from_value(entry.clone()).map_err(|e| {
                LineageError::malformed(object, format!("ownerReferences[{}]: {}", index, e))
            })?;

            for (field, value) in [
                ("apiVersion", &owner.api_version),
                ("kind", &owner.kind),
                ("name", &owner.name),
            ] {
                if value.is_empty() {
                    return Err(LineageError::malformed(
                        object,
                        format!("ownerReferences[{}].{} is empty", index, field),
                    ));
                }
            }
            Ok(owner)
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::models::GroupVersionResource;
    use serde_json::json;

    const POD: &str = "v1/pods/default/coredns";

    #[test]
    fn test_missing_owner_references_is_empty() {
        let body = json!({"metadata": {"name": "coredns"}});
        assert!(parse_owner_references(POD, &body).unwrap().is_empty());
    }

    #[test]
    fn test_null_and_empty_owner_references_are_empty() {
        let null = json!({"metadata": {"ownerReferences": null}});
        let empty = json!({"metadata": {"ownerReferences": []}});
        assert!(parse_owner_references(POD, &null).unwrap().is_empty());
        assert!(parse_owner_references(POD, &empty).unwrap().is_empty());
    }

    #[test]
    fn test_owner_references_are_parsed_in_order() {
        let body = json!({
            "metadata": {
                "ownerReferences": [
                    {
                        "apiVersion": "apps/v1",
                        "kind": "ReplicaSet",
                        "name": "coredns-abc",
                        "uid": "u1",
                        "controller": true
                    },
                    {"apiVersion": "v1", "kind": "ConfigMap", "name": "extra", "uid": "u2"}
                ]
            }
        });
        let owners = parse_owner_references(POD, &body).unwrap();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].name, "coredns-abc");
        assert_eq!(owners[0].uid.as_deref(), Some("u1"));
        assert_eq!(owners[1].group_version(), ("", "v1"));
    }

    #[test]
    fn test_non_list_owner_references_are_malformed() {
        let body = json!({"metadata": {"ownerReferences": {"kind": "ReplicaSet"}}});
        let err = parse_owner_references(POD, &body).unwrap_err();
        match err {
            LineageError::MalformedOwnerMetadata { object, reason } => {
                assert_eq!(object, POD);
                assert!(reason.contains("an object"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_entry_missing_kind_is_malformed() {
        let body = json!({
            "metadata": {"ownerReferences": [{"apiVersion": "apps/v1", "name": "x"}]}
        });
        assert!(matches!(
            parse_owner_references(POD, &body),
            Err(LineageError::MalformedOwnerMetadata { .. })
        ));
    }

    #[test]
    fn test_entry_with_empty_name_is_malformed() {
        let body = json!({
            "metadata": {
                "ownerReferences": [{"apiVersion": "apps/v1", "kind": "ReplicaSet", "name": ""}]
            }
        });
        let err = parse_owner_references(POD, &body).unwrap_err();
        assert!(err.to_string().contains("ownerReferences[0].name"));
    }

    #[test]
    fn test_non_object_metadata_is_malformed() {
        let body = json!({"metadata": "nope"});
        assert!(matches!(
            parse_owner_references(POD, &body),
            Err(LineageError::MalformedOwnerMetadata { .. })
        ));
    }

    #[test]
    fn test_request_targets_namespaced_collection() {
        let pod = ObjectRef::namespaced(
            GroupVersionResource::new("", "v1", "pods"),
            "default",
            "coredns",
        );
        let request = KubeObjectStore::request_for(&pod).unwrap();
        assert_eq!(request.method(), http::Method::GET);
        assert_eq!(request.uri().path(), "/api/v1/namespaces/default/pods/coredns");
    }

    #[test]
    fn test_request_targets_cluster_scoped_collection() {
        let node =
            ObjectRef::cluster_scoped(GroupVersionResource::new("", "v1", "nodes"), "worker-1");
        let request = KubeObjectStore::request_for(&node).unwrap();
        assert_eq!(request.uri().path(), "/api/v1/nodes/worker-1");

        let deploy = ObjectRef::namespaced(
            GroupVersionResource::new("apps", "v1", "deployments"),
            "kube-system",
            "coredns",
        );
        let request = KubeObjectStore::request_for(&deploy).unwrap();
        assert_eq!(
            request.uri().path(),
            "/apis/apps/v1/namespaces/kube-system/deployments/coredns"
        );
    }
}

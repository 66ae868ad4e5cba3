//! API type catalog from cluster discovery

use kube::Client;
use kube::discovery::{Discovery, Scope};

use crate::error::LineageError;
use crate::lineage::{CatalogEntry, TypeCatalog};

/// Enumerate every registered API type once and build the type catalog
///
/// Only the recommended (preferred) version of each kind is kept.
pub async fn discover_types(client: &Client) -> Result<TypeCatalog, LineageError> {
    let discovery = Discovery::new(client.clone())
        .run()
        .await
        .map_err(|e| LineageError::connection(format!("API discovery failed: {}", e)))?;

    let entries: Vec<CatalogEntry> = discovery
        .groups()
        .flat_map(|group| group.recommended_resources())
        .map(|(ar, caps)| CatalogEntry {
            group: ar.group,
            version: ar.version,
            kind: ar.kind,
            resource: ar.plural,
            namespaced: matches!(caps.scope, Scope::Namespaced),
        })
        .collect();

    let catalog = TypeCatalog::from_entries(entries);
    tracing::debug!("Discovered {} resource kinds", catalog.len());
    Ok(catalog)
}

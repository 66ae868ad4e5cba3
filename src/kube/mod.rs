//! Kubernetes client module
//!
//! Builds the client used for discovery and owner lookups. Proxy settings
//! (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`) are honored by kube-rs itself.

mod discovery;

pub use discovery::discover_types;

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

/// Initialize a Kubernetes client
///
/// Without an explicit kubeconfig the default loading strategy applies:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
///
/// `context` selects a kubeconfig context other than the current one.
pub async fn create_client(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Client> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let config = match (kubeconfig, context) {
        (Some(path), _) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .with_context(|| format!("Invalid kubeconfig: {}", path.display()))?
        }
        (None, Some(name)) => Config::from_kubeconfig(&options)
            .await
            .with_context(|| format!("Failed to load kubeconfig context '{}'", name))?,
        (None, None) => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    tracing::debug!("Connecting to {}", config.cluster_url);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

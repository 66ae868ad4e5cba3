//! Configuration system for ownergraph
//!
//! A single optional YAML file plus environment overrides. Command-line
//! flags take precedence over both.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, OnError, OutputConfig, TraversalConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "kubeconfig" => Ok(config
            .kubeconfig
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "context" => Ok(config.context.clone().unwrap_or_default()),
        "output.format" => serde_yaml::to_string(&config.output.format)
            .map(|s| s.trim().to_string())
            .map_err(|e| anyhow::anyhow!("Failed to serialize output.format: {}", e)),
        "output.graphName" => Ok(config.output.graph_name.clone()),
        "traversal.onError" => serde_yaml::to_string(&config.traversal.on_error)
            .map(|s| s.trim().to_string())
            .map_err(|e| anyhow::anyhow!("Failed to serialize traversal.onError: {}", e)),
        "traversal.maxDepth" => Ok(config
            .traversal
            .max_depth
            .map(|d| d.to_string())
            .unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

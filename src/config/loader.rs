//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use crate::graph::RenderFormat;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Config file (`explicit`, or `config.yaml` in the config directory)
    /// 3. Built-in defaults
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(paths::root_config_path);

        let config = if path.exists() {
            Self::load_file(&path)?
        } else if explicit.is_some() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        } else {
            Self::load_defaults()
        };

        Self::apply_env_overrides(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &PathBuf) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(0) = config.traversal.max_depth {
            return Err(anyhow::anyhow!(
                "traversal.maxDepth must be at least 1 in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Result<Config> {
        // OWNERGRAPH_NAMESPACE override
        if let Ok(namespace) = std::env::var("OWNERGRAPH_NAMESPACE") {
            if !namespace.is_empty() {
                config.default_namespace = namespace;
            }
        }

        // OWNERGRAPH_FORMAT override
        if let Ok(format) = std::env::var("OWNERGRAPH_FORMAT") {
            config.output.format = format
                .parse::<RenderFormat>()
                .with_context(|| format!("Invalid OWNERGRAPH_FORMAT: {}", format))?;
        }

        // OWNERGRAPH_KUBECONFIG override
        if let Ok(kubeconfig) = std::env::var("OWNERGRAPH_KUBECONFIG") {
            config.kubeconfig = Some(PathBuf::from(kubeconfig));
        }

        // OWNERGRAPH_CONTEXT override
        if let Ok(context) = std::env::var("OWNERGRAPH_CONTEXT") {
            config.context = Some(context);
        }

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

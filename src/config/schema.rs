//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::graph::RenderFormat;
use crate::lineage::{FailurePolicy, WalkOptions};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Namespace used when `--namespace` is not given
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Kubeconfig file; inferred when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context; the current context when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Traversal configuration
    #[serde(default)]
    pub traversal: TraversalConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputConfig {
    /// Diagram format
    #[serde(default)]
    pub format: RenderFormat,

    /// Name given to the rendered graph
    #[serde(default = "default_graph_name")]
    pub graph_name: String,
}

/// Traversal configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TraversalConfig {
    /// What to do when an owner cannot be resolved
    #[serde(default)]
    pub on_error: OnError,

    /// Stop expanding owners beyond this depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Serialized form of [`FailurePolicy`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OnError {
    #[default]
    Abort,
    SkipBranch,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => FailurePolicy::Abort,
            OnError::SkipBranch => FailurePolicy::SkipBranch,
        }
    }
}

impl TraversalConfig {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            on_error: self.on_error.into(),
            max_depth: self.max_depth,
        }
    }
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_graph_name() -> String {
    "lineage".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            kubeconfig: None,
            context: None,
            output: OutputConfig::default(),
            traversal: TraversalConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: RenderFormat::default(),
            graph_name: default_graph_name(),
        }
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            on_error: OnError::default(),
            max_depth: None,
        }
    }
}

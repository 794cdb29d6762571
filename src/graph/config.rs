//! YAML configuration for the graph command.
//!
//! Every key is optional; command-line flags take precedence.

use crate::graph::format::{Layout, OutputFormat};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete YAML configuration for graph command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphYamlConfig {
    /// Output format: dot or mermaid
    pub format: Option<String>,
    /// Show field rows in each table
    pub field_names: Option<bool>,
    /// DOT layout direction: lr or tb
    pub layout: Option<String>,
    /// Only render tables matching these glob patterns
    pub tables: Vec<String>,
    /// Exclude tables matching these glob patterns
    pub exclude: Vec<String>,
    /// Graphviz binary used for rendering images
    pub dot_path: Option<PathBuf>,
}

impl GraphYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: GraphYamlConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Parsed output format, if configured
    pub fn output_format(&self) -> anyhow::Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .map_err(|e: String| anyhow::anyhow!(e))
    }

    /// Parsed layout, if configured
    pub fn layout(&self) -> anyhow::Result<Option<Layout>> {
        self.layout
            .as_deref()
            .map(str::parse::<Layout>)
            .transpose()
            .map_err(|e: String| anyhow::anyhow!(e))
    }
}

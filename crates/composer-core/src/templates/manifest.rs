//! Template descriptor (`template.yaml` at the template root)

use crate::error::{ComposeError, Result};
use crate::layout::DEFAULT_WORKSPACE_GLOBS;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DESCRIPTOR_FILE: &str = "template.yaml";

fn default_workspace_globs() -> Vec<String> {
    DEFAULT_WORKSPACE_GLOBS.iter().map(|g| g.to_string()).collect()
}

/// Describes the base layout shipped in a template root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackManifest {
    /// Display name of the stack
    pub name: String,

    /// What the generated project contains
    #[serde(default)]
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Globs naming the workspace packages of the base layout
    #[serde(default = "default_workspace_globs")]
    pub workspace_globs: Vec<String>,
}

impl StackManifest {
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ComposeError::yaml(path, e))
    }

    /// Read the descriptor from a template root
    pub async fn load(template_root: &Path) -> Result<Self> {
        let path = template_root.join(DESCRIPTOR_FILE);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ComposeError::io(&path, e))?;
        Self::parse(&path, &content)
    }
}

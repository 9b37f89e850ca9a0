//! Pending file writes and the document model they are applied to
//!
//! Every contribution to the composed project is expressed as a [`PendingWrite`]:
//! a target path plus a pure [`Edit`]. Edits for one path are applied together,
//! in [`Stage`] order, against a single read of the file.

use crate::env::EnvTemplate;
use crate::error::{ComposeError, Result};
use crate::manifest::{ManifestEdit, ProjectManifest};
use crate::routing::{rewrite_routing, RoutingConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fixed order in which edits to the same file are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Dependencies,
    Workspace,
    Environment,
    Routing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Manifest(ManifestEdit),
    /// Graph entries to add to the routing file
    Routing(BTreeMap<String, String>),
    /// Variable names to declare in the env template
    EnvVars(Vec<String>),
    /// Whole-file content for files the base layout does not carry
    Replace(String),
}

impl Edit {
    pub fn stage(&self) -> Stage {
        match self {
            Edit::Manifest(ManifestEdit::MergeDependencies(_)) => Stage::Dependencies,
            Edit::Manifest(_) | Edit::Replace(_) => Stage::Workspace,
            Edit::EnvVars(_) => Stage::Environment,
            Edit::Routing(_) => Stage::Routing,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Edit::Manifest(_) => "manifest edit",
            Edit::Routing(_) => "routing edit",
            Edit::EnvVars(_) => "env edit",
            Edit::Replace(_) => "replacement",
        }
    }
}

/// One computed contribution to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// Path relative to the project root
    pub path: PathBuf,
    pub edit: Edit,
}

impl PendingWrite {
    pub fn new(path: impl Into<PathBuf>, edit: Edit) -> Self {
        Self {
            path: path.into(),
            edit,
        }
    }
}

/// In-memory state of a file while its edits are applied
enum Document {
    Raw(Option<String>),
    Manifest(ProjectManifest),
    Routing(RoutingConfig),
    Env(EnvTemplate),
}

impl Document {
    fn mismatch(path: &Path, edit: &Edit, found: &str) -> ComposeError {
        ComposeError::Document {
            path: path.to_path_buf(),
            message: format!("cannot apply {} to a {}", edit.kind(), found),
        }
    }

    fn apply(self, path: &Path, edit: &Edit) -> Result<Self> {
        match (self, edit) {
            (_, Edit::Replace(content)) => Ok(Document::Raw(Some(content.clone()))),

            (Document::Manifest(manifest), Edit::Manifest(e)) => {
                Ok(Document::Manifest(e.apply(manifest)))
            }
            (Document::Raw(raw), Edit::Manifest(e)) => {
                let manifest = match raw {
                    Some(content) => ProjectManifest::parse(path, &content)?,
                    None => ProjectManifest::default(),
                };
                Ok(Document::Manifest(e.apply(manifest)))
            }

            (Document::Routing(config), Edit::Routing(entries)) => {
                Ok(Document::Routing(rewrite_routing(&config, entries)?))
            }
            (Document::Raw(raw), Edit::Routing(entries)) => {
                let config = match raw {
                    Some(content) => RoutingConfig::parse(path, &content)?,
                    None => RoutingConfig::default(),
                };
                Ok(Document::Routing(rewrite_routing(&config, entries)?))
            }

            (Document::Env(template), Edit::EnvVars(vars)) => {
                Ok(Document::Env(template.with_vars(vars)))
            }
            (Document::Raw(raw), Edit::EnvVars(vars)) => {
                let template = match raw {
                    Some(content) => EnvTemplate::parse(&content),
                    None => EnvTemplate::default(),
                };
                Ok(Document::Env(template.with_vars(vars)))
            }

            (Document::Manifest(_), edit) => Err(Self::mismatch(path, edit, "manifest")),
            (Document::Routing(_), edit) => Err(Self::mismatch(path, edit, "routing config")),
            (Document::Env(_), edit) => Err(Self::mismatch(path, edit, "env template")),
        }
    }

    /// Serialize, returning `base` verbatim when the structured content is unchanged
    fn render(self, path: &Path, base: Option<&str>) -> Result<String> {
        match self {
            Document::Raw(content) => Ok(content.unwrap_or_default()),
            Document::Manifest(manifest) => match base {
                Some(b) if ProjectManifest::parse(path, b).ok().as_ref() == Some(&manifest) => {
                    Ok(b.to_string())
                }
                _ => manifest.render(path),
            },
            Document::Routing(config) => match base {
                Some(b) if RoutingConfig::parse(path, b).ok().as_ref() == Some(&config) => {
                    Ok(b.to_string())
                }
                _ => config.render(path),
            },
            Document::Env(template) => match base {
                Some(b) if EnvTemplate::parse(b) == template => Ok(b.to_string()),
                _ => Ok(template.render()),
            },
        }
    }
}

/// Apply `edits` in order to `base` and return the new file content
pub fn apply_edits(path: &Path, base: Option<&str>, edits: &[Edit]) -> Result<String> {
    let mut document = Document::Raw(base.map(str::to_string));
    for edit in edits {
        document = document.apply(path, edit)?;
    }
    document.render(path, base)
}

//! Package manifest (`package.json`) schema and transforms

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Which manifest field carries dependency overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridesField {
    /// `overrides` (npm)
    Overrides,
    /// `resolutions` (yarn, pnpm)
    Resolutions,
}

impl OverridesField {
    pub fn key(&self) -> &'static str {
        match self {
            OverridesField::Overrides => "overrides",
            OverridesField::Resolutions => "resolutions",
        }
    }
}

/// A `package.json` document
///
/// Known fields are typed; anything else is carried through untouched.
/// `workspaces` and the overrides fields stay loosely typed because both
/// accept nested objects (yarn's `{ "packages": [...] }`, npm's scoped overrides).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scripts: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectManifest {
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ComposeError::json(path, e))
    }

    pub fn render(&self, path: &Path) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self).map_err(|e| ComposeError::json(path, e))?;
        out.push('\n');
        Ok(out)
    }

    /// The overrides map currently in use, whichever field holds it
    pub fn overrides_field(&self) -> Option<(OverridesField, &Map<String, Value>)> {
        match (&self.overrides, &self.resolutions) {
            (Some(map), _) => Some((OverridesField::Overrides, map)),
            (None, Some(map)) => Some((OverridesField::Resolutions, map)),
            (None, None) => None,
        }
    }
}

/// A single transform applied to a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEdit {
    /// Add or overwrite entries in `dependencies`
    MergeDependencies(BTreeMap<String, String>),

    /// Set `packageManager` to an exact pin like `pnpm@10.6.5`
    PinPackageManager(String),

    /// Merge string pins into the overrides field, leaving exactly that field present.
    /// Existing entries, nested ones included, are kept unless a pin replaces them.
    SetOverrides {
        field: OverridesField,
        entries: BTreeMap<String, String>,
    },

    /// Declare workspaces if the manifest has none
    EnsureWorkspaces(Vec<String>),

    /// Drop the `workspaces` field (declared in a separate file instead)
    RemoveWorkspaces,
}

impl ManifestEdit {
    /// Return a new manifest with this edit applied
    pub fn apply(&self, manifest: ProjectManifest) -> ProjectManifest {
        let mut next = manifest;
        match self {
            ManifestEdit::MergeDependencies(deps) => {
                next.dependencies
                    .extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            ManifestEdit::PinPackageManager(pin) => {
                next.package_manager = Some(pin.clone());
            }
            ManifestEdit::SetOverrides { field, entries } => {
                let mut merged = next
                    .overrides
                    .take()
                    .into_iter()
                    .chain(next.resolutions.take())
                    .flatten()
                    .collect::<Map<_, _>>();
                merged.extend(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone()))),
                );
                match field {
                    OverridesField::Overrides => next.overrides = Some(merged),
                    OverridesField::Resolutions => next.resolutions = Some(merged),
                }
            }
            ManifestEdit::EnsureWorkspaces(globs) => {
                if next.workspaces.is_none() {
                    next.workspaces = Some(Value::from(globs.clone()));
                }
            }
            ManifestEdit::RemoveWorkspaces => {
                next.workspaces = None;
            }
        }
        next
    }
}

//! Package-manager specific workspace conventions
//!
//! Each [`PackageManagerKind`] maps to a fixed set of edits: the exact
//! `packageManager` pin, which overrides field the manifest uses, and any extra
//! files the package manager needs at the project root. The adapter is a pure
//! function of the kind and the workspace globs; it never reads the project.

use crate::error::{ComposeError, Result};
use crate::layout::{AGENTS_MANIFEST, PNPM_WORKSPACE_FILE, ROOT_MANIFEST, YARNRC_FILE};
use crate::manifest::{ManifestEdit, OverridesField};
use crate::write::{Edit, PendingWrite};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Version of `@langchain/core` every workspace package must resolve to
const CORE_OVERRIDES: &[(&str, &str)] = &[("@langchain/core", "^0.3.42")];

/// pnpm does not hoist this transitive dependency of `@langchain/langgraph`,
/// so the agents workspace declares it directly.
const PNPM_HOIST_PIN: (&str, &str) = ("@langchain/langgraph-checkpoint", "^0.0.16");

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum PackageManagerKind {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManagerKind {
    pub const ALL: [PackageManagerKind; 3] = [Self::Npm, Self::Yarn, Self::Pnpm];

    /// Executable name
    pub fn name(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Yarn => "yarn",
            PackageManagerKind::Pnpm => "pnpm",
        }
    }

    /// Value for the manifest's `packageManager` field
    pub fn pin(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm@10.9.2",
            PackageManagerKind::Yarn => "yarn@4.6.0",
            PackageManagerKind::Pnpm => "pnpm@10.6.5",
        }
    }

    pub fn overrides_field(&self) -> OverridesField {
        match self {
            PackageManagerKind::Npm => OverridesField::Overrides,
            PackageManagerKind::Yarn | PackageManagerKind::Pnpm => OverridesField::Resolutions,
        }
    }

    /// Whether workspaces are declared in the root manifest (vs. a separate file)
    pub fn uses_manifest_workspaces(&self) -> bool {
        !matches!(self, PackageManagerKind::Pnpm)
    }

    /// Command line shown to the user for installing dependencies
    pub fn install_command(&self) -> String {
        format!("{} install", self.name())
    }

    /// Command line for running a package script
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManagerKind::Npm => format!("npm run {}", script),
            PackageManagerKind::Yarn => format!("yarn {}", script),
            PackageManagerKind::Pnpm => format!("pnpm {}", script),
        }
    }

    /// Infer the package manager from an `npm_config_user_agent` value
    /// such as `pnpm/10.6.5 npm/? node/v22.14.0 linux x64`
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        let launcher = user_agent.split_whitespace().next()?;
        let name = launcher.split('/').next()?;
        name.parse().ok()
    }

    /// The package manager that launched this process, falling back to npm
    pub fn detect() -> Self {
        std::env::var("npm_config_user_agent")
            .ok()
            .and_then(|ua| Self::from_user_agent(&ua))
            .unwrap_or_default()
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PackageManagerKind {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            other => Err(ComposeError::UnknownPackageManager(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct PnpmWorkspace<'a> {
    packages: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct YarnRc {
    node_linker: &'static str,
    enable_immutable_installs: bool,
}

fn to_yaml<T: Serialize>(path: &str, value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| ComposeError::yaml(path, e))
}

/// Writes that adapt the project to `kind`'s workspace convention
pub fn adapter_writes(kind: PackageManagerKind, workspace_globs: &[String]) -> Result<Vec<PendingWrite>> {
    let overrides: BTreeMap<String, String> = CORE_OVERRIDES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut writes = vec![
        PendingWrite::new(
            ROOT_MANIFEST,
            Edit::Manifest(ManifestEdit::PinPackageManager(kind.pin().to_string())),
        ),
        PendingWrite::new(
            ROOT_MANIFEST,
            Edit::Manifest(ManifestEdit::SetOverrides {
                field: kind.overrides_field(),
                entries: overrides,
            }),
        ),
    ];

    match kind {
        PackageManagerKind::Npm => {
            writes.push(PendingWrite::new(
                ROOT_MANIFEST,
                Edit::Manifest(ManifestEdit::EnsureWorkspaces(workspace_globs.to_vec())),
            ));
        }
        PackageManagerKind::Yarn => {
            writes.push(PendingWrite::new(
                ROOT_MANIFEST,
                Edit::Manifest(ManifestEdit::EnsureWorkspaces(workspace_globs.to_vec())),
            ));
            let yarnrc = YarnRc {
                node_linker: "node-modules",
                enable_immutable_installs: false,
            };
            writes.push(PendingWrite::new(
                YARNRC_FILE,
                Edit::Replace(to_yaml(YARNRC_FILE, &yarnrc)?),
            ));
        }
        PackageManagerKind::Pnpm => {
            writes.push(PendingWrite::new(
                ROOT_MANIFEST,
                Edit::Manifest(ManifestEdit::RemoveWorkspaces),
            ));
            let workspace = PnpmWorkspace {
                packages: workspace_globs,
            };
            writes.push(PendingWrite::new(
                PNPM_WORKSPACE_FILE,
                Edit::Replace(to_yaml(PNPM_WORKSPACE_FILE, &workspace)?),
            ));
            let (name, version) = PNPM_HOIST_PIN;
            writes.push(PendingWrite::new(
                AGENTS_MANIFEST,
                Edit::Manifest(ManifestEdit::MergeDependencies(BTreeMap::from([(
                    name.to_string(),
                    version.to_string(),
                )]))),
            ));
        }
    }

    Ok(writes)
}

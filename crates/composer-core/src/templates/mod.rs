//! Template trees and their descriptor
//!
//! A template root contains:
//! - `template.yaml` describing the stack
//! - `base/` with the fixed project layout (manifests, routing file, env template)
//! - `frameworks/<name>/` with one web app per supported framework
//! - `modules/<id>/` with one source tree per registry module

pub mod copier;
pub mod manifest;
pub mod version;

use crate::framework::Framework;
use crate::product::ProductConfig;
use crate::registry::{Module, ModuleRegistry};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub use copier::{FileCopier, LocalCopier};
pub use manifest::StackManifest;
pub use version::check_compatibility;

/// Directory holding the fixed base layout
pub const BASE_DIR: &str = "base";

/// Where composition reads its templates from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRoot {
    path: PathBuf,
}

impl TemplateRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the template root: explicit flag, then the product's
    /// environment variable, then the product default
    pub fn resolve<C: ProductConfig>(config: &C, explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(config.template_dir_env()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(config.default_template_dir()));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> PathBuf {
        self.path.join(BASE_DIR)
    }

    pub fn framework_dir(&self, framework: Framework) -> PathBuf {
        self.path.join(framework.source_dir())
    }

    pub fn module_dir(&self, module: &Module) -> PathBuf {
        self.path.join(module.source_dir)
    }
}

/// Verify that a template root carries every tree the registry refers to
pub async fn check_templates<C: ProductConfig>(
    config: &C,
    root: &TemplateRoot,
    registry: &ModuleRegistry,
) -> Result<()> {
    println!(
        "{}",
        format!("Checking {} templates in {}...", config.display_name(), root.path().display())
            .cyan()
            .bold()
    );
    println!();

    let manifest = StackManifest::load(root.path())
        .await
        .context("Failed to load template descriptor")?;
    println!(
        "  {} {} v{}",
        "->".blue(),
        manifest.name,
        manifest.version
    );

    let mut required: Vec<(String, PathBuf)> = vec![("base layout".to_string(), root.base_dir())];
    for framework in Framework::ALL {
        required.push((format!("framework {}", framework.id()), root.framework_dir(framework)));
    }
    for module in registry.modules() {
        required.push((format!("module {}", module.id), root.module_dir(module)));
    }

    let mut missing = 0;
    for (label, path) in &required {
        if path.is_dir() {
            println!("  {} {}", "ok".green(), label);
        } else {
            println!("  {} {} ({})", "missing".red(), label, path.display());
            missing += 1;
        }
    }

    println!();
    if missing > 0 {
        anyhow::bail!("{} template tree(s) missing", missing);
    }
    println!("{} {} template tree(s)", "Verified".green().bold(), required.len());
    Ok(())
}

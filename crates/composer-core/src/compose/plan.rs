//! Pure computation of everything a composition run will write

use crate::compose::transaction::FileTransaction;
use crate::error::Result;
use crate::layout::{ENV_TEMPLATE, ROOT_MANIFEST, ROUTING_FILE};
use crate::manifest::ManifestEdit;
use crate::merge::{merge_dependencies, merge_env_vars, merge_routing_entries};
use crate::registry::Module;
use crate::workspace::{adapter_writes, PackageManagerKind};
use crate::write::{Edit, PendingWrite};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Merged contributions of the selected modules plus package-manager writes
#[derive(Debug, Clone)]
pub struct CompositionPlan {
    pub dependencies: BTreeMap<String, String>,
    pub env_vars: Vec<String>,
    pub routing_entries: BTreeMap<String, String>,
    /// Every write, in the order contributions were computed
    pub writes: Vec<PendingWrite>,
}

impl CompositionPlan {
    /// Compute the plan; fails only on a routing collision between modules
    pub fn build(
        modules: &[&Module],
        package_manager: PackageManagerKind,
        workspace_globs: &[String],
    ) -> Result<Self> {
        let dependencies = merge_dependencies(modules);
        let env_vars = merge_env_vars(modules);
        let routing_entries = merge_routing_entries(modules)?;
        let adapter = adapter_writes(package_manager, workspace_globs)?;

        let mut writes = vec![
            PendingWrite::new(
                ROOT_MANIFEST,
                Edit::Manifest(ManifestEdit::MergeDependencies(dependencies.clone())),
            ),
            PendingWrite::new(ENV_TEMPLATE, Edit::EnvVars(env_vars.clone())),
            PendingWrite::new(ROUTING_FILE, Edit::Routing(routing_entries.clone())),
        ];
        writes.extend(adapter);

        tracing::debug!(
            dependencies = dependencies.len(),
            env_vars = env_vars.len(),
            graphs = routing_entries.len(),
            writes = writes.len(),
            %package_manager,
            "composition plan built"
        );

        Ok(Self {
            dependencies,
            env_vars,
            routing_entries,
            writes,
        })
    }

    /// Group writes into one transaction per target file
    ///
    /// Within a file, edits are ordered by [`crate::write::Stage`]; edits of
    /// the same stage keep the order in which they were computed.
    pub fn transactions(&self) -> Vec<FileTransaction> {
        let mut by_path: BTreeMap<PathBuf, Vec<(usize, &Edit)>> = BTreeMap::new();
        for (seq, write) in self.writes.iter().enumerate() {
            by_path
                .entry(write.path.clone())
                .or_default()
                .push((seq, &write.edit));
        }

        by_path
            .into_iter()
            .map(|(path, mut edits)| {
                edits.sort_by_key(|(seq, edit)| (edit.stage(), *seq));
                FileTransaction::new(path, edits.into_iter().map(|(_, e)| e.clone()).collect())
            })
            .collect()
    }
}

//! Project composition
//!
//! A composition run turns a module selection into a project directory:
//!
//! 1. Resolve the selection and refuse an existing target directory.
//! 2. Build a [`CompositionPlan`]: merged dependencies, env vars, routing
//!    entries and package-manager writes. Pure; a routing collision aborts here.
//! 3. Check the plan's routing entries against the base routing file.
//! 4. Copy the base layout.
//! 5. Concurrently: copy the framework and module trees, and commit one
//!    [`FileTransaction`] per target file.
//!
//! Failures in step 5 are isolated to the file or tree they concern and
//! reported in [`ComposedProject::failures`].

pub mod plan;
pub mod transaction;

pub use plan::CompositionPlan;
pub use transaction::FileTransaction;

use crate::error::{ComposeError, FileFailure, Result};
use crate::framework::Framework;
use crate::layout::{ROUTING_FILE, WEB_APP_DIR};
use crate::registry::{ModuleRegistry, Selection};
use crate::routing::{rewrite_routing, RoutingConfig};
use crate::templates::{FileCopier, LocalCopier, StackManifest, TemplateRoot};
use crate::workspace::PackageManagerKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Result of a composition run that got past validation
#[derive(Debug)]
pub struct ComposedProject {
    pub root: PathBuf,
    pub framework: Framework,
    pub package_manager: PackageManagerKind,
    /// Selected module ids, in selection order
    pub modules: Vec<&'static str>,
    /// Target files actually rewritten by transactions, relative to `root`.
    /// Files whose content was already up to date are not listed.
    pub written: Vec<PathBuf>,
    /// Number of files copied from template trees
    pub copied: usize,
    /// Isolated failures; composition continued past each of them
    pub failures: Vec<FileFailure>,
}

impl ComposedProject {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

enum TaskOutcome {
    Copied(usize),
    Committed(PathBuf),
    Unchanged,
    Failed(FileFailure),
}

/// Orchestrates a composition run
pub struct ProjectComposer {
    registry: ModuleRegistry,
    templates: TemplateRoot,
    copier: Arc<dyn FileCopier>,
}

impl ProjectComposer {
    pub fn new(templates: TemplateRoot) -> Self {
        Self {
            registry: ModuleRegistry::builtin(),
            templates,
            copier: Arc::new(LocalCopier),
        }
    }

    pub fn with_registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_copier(mut self, copier: Arc<dyn FileCopier>) -> Self {
        self.copier = copier;
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Compose a project into `target`, which must not exist yet
    pub async fn compose(
        &self,
        selection: &Selection,
        framework: Framework,
        package_manager: PackageManagerKind,
        target: &Path,
    ) -> Result<ComposedProject> {
        let modules = selection.resolve(&self.registry)?;

        if fs_exists(target).await? {
            return Err(ComposeError::TargetExists(target.to_path_buf()));
        }

        let descriptor = StackManifest::load(self.templates.path()).await?;
        let plan = CompositionPlan::build(&modules, package_manager, &descriptor.workspace_globs)?;
        self.check_base_routing(&plan).await?;

        tracing::info!(
            target = %target.display(),
            modules = ?selection.ids(),
            framework = framework.id(),
            %package_manager,
            "composing project"
        );

        let mut failures = Vec::new();
        let mut copied = 0;

        tokio::fs::create_dir_all(target)
            .await
            .map_err(|e| ComposeError::io(target, e))?;

        // Transactions read the base copies, so the base layout lands first.
        match self.copier.copy_tree(&self.templates.base_dir(), target).await {
            Ok(files) => copied += files.len(),
            Err(error) => {
                tracing::warn!(%error, "base layout copy failed");
                failures.push(FileFailure {
                    path: PathBuf::from("."),
                    error,
                });
            }
        }

        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();

        let mut trees = vec![(
            self.templates.framework_dir(framework),
            PathBuf::from(WEB_APP_DIR),
        )];
        for module in &modules {
            trees.push((self.templates.module_dir(module), module.target_dir()));
        }
        for (src, relative) in trees {
            let copier = Arc::clone(&self.copier);
            let dst = target.join(&relative);
            tasks.spawn(async move {
                match copier.copy_tree(&src, &dst).await {
                    Ok(files) => TaskOutcome::Copied(files.len()),
                    Err(error) => TaskOutcome::Failed(FileFailure {
                        path: relative,
                        error,
                    }),
                }
            });
        }

        for transaction in plan.transactions() {
            let root = target.to_path_buf();
            tasks.spawn(async move {
                match transaction.commit(&root).await {
                    Ok(true) => TaskOutcome::Committed(transaction.path().to_path_buf()),
                    Ok(false) => TaskOutcome::Unchanged,
                    Err(error) => TaskOutcome::Failed(FileFailure {
                        path: transaction.path().to_path_buf(),
                        error,
                    }),
                }
            });
        }

        let mut written = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Copied(count)) => copied += count,
                Ok(TaskOutcome::Committed(path)) => written.push(path),
                Ok(TaskOutcome::Unchanged) => {}
                Ok(TaskOutcome::Failed(failure)) => {
                    tracing::warn!(
                        path = %failure.path.display(),
                        error = %failure.error,
                        "composition step failed"
                    );
                    failures.push(failure);
                }
                Err(e) => failures.push(FileFailure {
                    path: PathBuf::from("."),
                    error: ComposeError::Task(e.to_string()),
                }),
            }
        }
        written.sort();

        tracing::info!(
            written = written.len(),
            copied,
            failures = failures.len(),
            "composition finished"
        );

        Ok(ComposedProject {
            root: target.to_path_buf(),
            framework,
            package_manager,
            modules: modules.iter().map(|m| m.id).collect(),
            written,
            copied,
            failures,
        })
    }

    /// Fail before any write if a module graph would shadow a base graph
    async fn check_base_routing(&self, plan: &CompositionPlan) -> Result<()> {
        let path = self.templates.base_dir().join(ROUTING_FILE);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ComposeError::io(&path, e)),
        };
        // An unparseable base file is reported by its transaction instead.
        if let Ok(base) = RoutingConfig::parse(&path, &content) {
            rewrite_routing(&base, &plan.routing_entries)?;
        }
        Ok(())
    }
}

async fn fs_exists(path: &Path) -> Result<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| ComposeError::io(path, e))
}

//! Template tree copying

use crate::error::{ComposeError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Files that are never copied into a project
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Files stored under a different name in the template tree.
/// Package registries strip `.gitignore`, so templates ship it as `_gitignore`.
const RENAMED_FILES: &[(&str, &str)] = &[("_gitignore", ".gitignore")];

/// Copies a directory tree into the project
#[async_trait]
pub trait FileCopier: Send + Sync {
    /// Copy every file below `src` into `dst`, returning the relative paths written
    async fn copy_tree(&self, src: &Path, dst: &Path) -> Result<Vec<PathBuf>>;
}

/// Copier backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCopier;

impl LocalCopier {
    fn list_files(src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
        if !src.is_dir() {
            return Err(ComposeError::Copy {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                message: "source directory not found".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(|e| ComposeError::Copy {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if IGNORED_FILES.iter().any(|ignored| *ignored == name) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(src) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Destination name for a template file
    fn target_relative(relative: &Path) -> PathBuf {
        match relative.file_name().and_then(|n| n.to_str()) {
            Some(name) => match RENAMED_FILES.iter().find(|(from, _)| *from == name) {
                Some((_, to)) => relative.with_file_name(to),
                None => relative.to_path_buf(),
            },
            None => relative.to_path_buf(),
        }
    }
}

#[async_trait]
impl FileCopier for LocalCopier {
    async fn copy_tree(&self, src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
        // walkdir is synchronous; keep the scan off the runtime workers
        let files = {
            let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
            tokio::task::spawn_blocking(move || Self::list_files(&src, &dst))
                .await
                .map_err(|e| ComposeError::Task(e.to_string()))??
        };

        fs::create_dir_all(dst)
            .await
            .map_err(|e| ComposeError::io(dst, e))?;

        let mut copied = Vec::with_capacity(files.len());
        for relative in files {
            let target_relative = Self::target_relative(&relative);
            let target_path = dst.join(&target_relative);
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ComposeError::io(parent, e))?;
            }
            fs::copy(src.join(&relative), &target_path)
                .await
                .map_err(|e| ComposeError::io(&target_path, e))?;
            copied.push(target_relative);
        }

        tracing::debug!(src = %src.display(), dst = %dst.display(), files = copied.len(), "copied tree");
        Ok(copied)
    }
}

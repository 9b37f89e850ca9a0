//! Single-writer transaction against one target file

use crate::error::{ComposeError, Result};
use crate::write::{apply_edits, Edit};
use std::path::{Path, PathBuf};
use tokio::fs;

/// All pending edits for one file, applied against one read and written once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransaction {
    path: PathBuf,
    edits: Vec<Edit>,
}

impl FileTransaction {
    pub fn new(path: PathBuf, edits: Vec<Edit>) -> Self {
        Self { path, edits }
    }

    /// Target path relative to the project root
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Read the current content, apply every edit, write the result.
    /// Returns `false` when the content was already up to date and nothing was written.
    pub async fn commit(&self, root: &Path) -> Result<bool> {
        let full_path = root.join(&self.path);

        let base = match fs::read_to_string(&full_path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(ComposeError::io(&full_path, e)),
        };

        let content = apply_edits(&self.path, base.as_deref(), &self.edits)?;

        if base.as_deref() == Some(content.as_str()) {
            tracing::debug!(path = %self.path.display(), "unchanged");
            return Ok(false);
        }

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ComposeError::io(parent, e))?;
        }
        fs::write(&full_path, content)
            .await
            .map_err(|e| ComposeError::io(&full_path, e))?;

        tracing::debug!(path = %self.path.display(), edits = self.edits.len(), "committed");
        Ok(true)
    }
}

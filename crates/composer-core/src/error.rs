//! Error types for project composition
//!
//! Composition distinguishes two kinds of failure:
//!
//! - **Fatal** errors (`ModuleNotFound`, `TargetExists`, `RoutingCollision`) stop
//!   the run before anything is written.
//! - **Isolated** errors (I/O, parse, copy) affect a single target file or module
//!   tree. They are collected into [`FileFailure`]s and reported next to the
//!   otherwise successful result.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the composer
pub type Result<T> = std::result::Result<T, ComposeError>;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Module '{id}' not found. Available modules: {}", available.join(", "))]
    ModuleNotFound { id: String, available: Vec<String> },

    #[error("Target directory already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error(
        "Routing entry '{name}' is declared twice with different entry points: '{existing}' and '{incoming}'"
    )]
    RoutingCollision {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("Unknown framework '{0}'. Expected one of: nextjs, vite")]
    UnknownFramework(String),

    #[error("Unknown package manager '{0}'. Expected one of: npm, yarn, pnpm")]
    UnknownPackageManager(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Cannot update {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("Failed to copy {} to {}: {message}", src.display(), dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        message: String,
    },

    #[error("`{command}` failed: {message}")]
    Install { command: String, message: String },

    #[error("Composition task failed: {0}")]
    Task(String),
}

impl ComposeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the whole composition run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ModuleNotFound { .. } | Self::TargetExists(_) | Self::RoutingCollision { .. }
        )
    }
}

/// A non-fatal failure isolated to one target file or module tree
#[derive(Debug)]
pub struct FileFailure {
    /// Path relative to the project root
    pub path: PathBuf,
    pub error: ComposeError,
}

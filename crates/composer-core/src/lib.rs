//! Composer Core - Shared library for composing agent monorepos
//!
//! A composed project is a fixed base layout (root manifest, agents workspace,
//! routing file, env template) plus any subset of optional feature modules.
//! Each module contributes dependencies, environment variables and graph
//! entry points to files that other modules also touch; this crate merges
//! those contributions so that every shared file is written exactly once.
//!
//! # Architecture
//!
//! - **Pure layer** - [`registry`], [`merge`], [`workspace`], [`routing`],
//!   [`manifest`], [`env`] and [`write`] compute values and edits without I/O
//! - **Orchestration** - [`compose::ProjectComposer`] validates a selection,
//!   plans all edits and commits one transaction per target file
//! - **Collaborators** - template copying ([`templates`]) and dependency
//!   installation ([`runtime`])
//! - **CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use composer_core::{Framework, PackageManagerKind, ProjectComposer, Selection, TemplateRoot};
//!
//! let composer = ProjectComposer::new(TemplateRoot::new("templates/agent-stack"));
//! let project = composer
//!     .compose(
//!         &Selection::new(["react-agent", "memory-agent"]),
//!         Framework::NextJs,
//!         PackageManagerKind::Pnpm,
//!         "my-agents".as_ref(),
//!     )
//!     .await?;
//! ```

pub mod compose;
pub mod env;
pub mod error;
pub mod framework;
pub mod layout;
pub mod manifest;
pub mod merge;
pub mod product;
pub mod registry;
pub mod routing;
pub mod runtime;
pub mod templates;
pub mod workspace;
pub mod write;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use compose::{ComposedProject, CompositionPlan, ProjectComposer};
pub use error::{ComposeError, FileFailure, Result};
pub use framework::Framework;
pub use product::ProductConfig;
pub use registry::{Module, ModuleRegistry, Selection};
pub use runtime::{check_runtimes, PackageInstaller, RuntimeInfo};
pub use templates::{FileCopier, LocalCopier, StackManifest, TemplateRoot};
pub use workspace::PackageManagerKind;

#[cfg(feature = "tui")]
pub use tui::run;

//! Product configuration trait for CLI binaries
//!
//! The composer itself is product-agnostic. A binary implements this trait to
//! name itself, point at its template root and phrase its post-setup hints.

use crate::workspace::PackageManagerKind;
use std::path::Path;

/// Configuration trait for a composing CLI
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command and env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Template root used when neither flag nor env var names one
    fn default_template_dir(&self) -> &'static str;

    /// Environment variable overriding the template root
    fn template_dir_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Instructions printed once the project is composed
    fn next_steps(&self, dir: &Path, package_manager: PackageManagerKind, installed: bool)
        -> Vec<String>;
}

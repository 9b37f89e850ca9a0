//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Node.js and package-manager detection
//! - The installer run after composition

pub mod check;
pub mod install;

pub use check::{check_node, check_package_manager, check_runtimes, RuntimeInfo};
pub use install::PackageInstaller;

//! Detection of Node.js and the selected package manager

use crate::workspace::PackageManagerKind;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// `name (version)` or `name (not installed)`
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    match Command::new(program).arg("--version").output() {
        Ok(out) if out.status.success() => RuntimeInfo {
            name,
            version: Some(String::from_utf8_lossy(&out.stdout).trim().to_string()),
            available: true,
        },
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check if the package manager's executable is on PATH
pub fn check_package_manager(kind: PackageManagerKind) -> RuntimeInfo {
    probe(kind.name(), kind.name())
}

/// Everything needed to install the composed project's dependencies
pub fn check_runtimes(kind: PackageManagerKind) -> Vec<RuntimeInfo> {
    vec![check_node(), check_package_manager(kind)]
}

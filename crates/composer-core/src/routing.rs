//! Shared routing file (`langgraph.json`)

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of the routing file
///
/// Only `graphs` is interpreted. Other keys (`node_version`, `env`,
/// `dependencies`, ...) are preserved as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub graphs: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RoutingConfig {
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ComposeError::json(path, e))
    }

    pub fn render(&self, path: &Path) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self).map_err(|e| ComposeError::json(path, e))?;
        out.push('\n');
        Ok(out)
    }
}

/// Add `entries` to the config's graphs
///
/// Re-adding an entry that is already present is a no-op, which makes the
/// rewrite idempotent. A name that is already bound to a different entry point
/// is a [`ComposeError::RoutingCollision`].
pub fn rewrite_routing(
    existing: &RoutingConfig,
    entries: &BTreeMap<String, String>,
) -> Result<RoutingConfig> {
    let mut next = existing.clone();
    for (name, path) in entries {
        match next.graphs.get(name) {
            Some(current) if current != path => {
                return Err(ComposeError::RoutingCollision {
                    name: name.clone(),
                    existing: current.clone(),
                    incoming: path.clone(),
                });
            }
            Some(_) => {}
            None => {
                next.graphs.insert(name.clone(), path.clone());
            }
        }
    }
    Ok(next)
}

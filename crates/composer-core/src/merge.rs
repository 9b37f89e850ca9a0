//! Combine the contributions of several modules
//!
//! All functions here are pure: they take the resolved modules in selection
//! order and return merged values without touching the filesystem.

use crate::error::{ComposeError, Result};
use crate::registry::Module;
use std::collections::BTreeMap;

/// Union of every module's dependencies
///
/// When two modules declare the same package with different version
/// specifiers, the module later in selection order wins.
pub fn merge_dependencies(modules: &[&Module]) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for module in modules {
        for (name, version) in module.dependencies {
            if let Some(previous) = merged.insert(name.to_string(), version.to_string()) {
                if previous != *version {
                    tracing::debug!(
                        dependency = name,
                        previous = %previous,
                        version,
                        module = module.id,
                        "dependency version overridden by later module"
                    );
                }
            }
        }
    }
    merged
}

/// Environment variables in first-seen order, without duplicates
pub fn merge_env_vars(modules: &[&Module]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for module in modules {
        for var in module.env_vars {
            if !merged.iter().any(|v| v == var) {
                merged.push(var.to_string());
            }
        }
    }
    merged
}

/// Union of every module's routing entries
///
/// A logical name may only be declared twice if both declarations point at the
/// same entry point.
pub fn merge_routing_entries(modules: &[&Module]) -> Result<BTreeMap<String, String>> {
    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    for module in modules {
        for (name, path) in module.routing_entries {
            match merged.get(*name) {
                Some(existing) if existing != path => {
                    return Err(ComposeError::RoutingCollision {
                        name: name.to_string(),
                        existing: existing.clone(),
                        incoming: path.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    merged.insert(name.to_string(), path.to_string());
                }
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModuleRegistry, Selection};

    const fn module(
        id: &'static str,
        dependencies: &'static [(&'static str, &'static str)],
        env_vars: &'static [&'static str],
        routing_entries: &'static [(&'static str, &'static str)],
    ) -> Module {
        Module {
            id,
            display_name: id,
            description: "",
            dependencies,
            env_vars,
            routing_entries,
            source_dir: "modules/test",
        }
    }

    const OLD: Module = module("old", &[("zod", "^3.22.0"), ("uuid", "^9.0.0")], &["A", "B"], &[]);
    const NEW: Module = module("new", &[("zod", "^3.24.2")], &["B", "C"], &[]);
    const GRAPH_A: Module = module("a", &[], &[], &[("agent", "./a/graph.ts:graph")]);
    const GRAPH_A_AGAIN: Module = module("a2", &[], &[], &[("agent", "./a/graph.ts:graph")]);
    const GRAPH_B: Module = module("b", &[], &[], &[("agent", "./b/graph.ts:graph")]);

    #[test]
    fn test_later_module_wins_dependency_conflict() {
        let merged = merge_dependencies(&[&OLD, &NEW]);
        assert_eq!(merged.get("zod").map(String::as_str), Some("^3.24.2"));
        assert_eq!(merged.get("uuid").map(String::as_str), Some("^9.0.0"));

        let reversed = merge_dependencies(&[&NEW, &OLD]);
        assert_eq!(reversed.get("zod").map(String::as_str), Some("^3.22.0"));
    }

    #[test]
    fn test_env_vars_first_seen_order() {
        assert_eq!(merge_env_vars(&[&OLD, &NEW]), vec!["A", "B", "C"]);
        assert_eq!(merge_env_vars(&[&NEW, &OLD]), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_env_vars_monotonic_over_builtin_subsets() {
        let registry = ModuleRegistry::builtin();
        let all: Vec<&str> = registry.ids().collect();
        for len in 0..=all.len() {
            let smaller = Selection::new(&all[..len]).resolve(&registry).unwrap();
            let larger = Selection::new(&all).resolve(&registry).unwrap();
            let small_vars = merge_env_vars(&smaller);
            let large_vars = merge_env_vars(&larger);

            // Superset, and the shared prefix keeps its relative order
            assert!(small_vars.iter().all(|v| large_vars.contains(v)));
            let filtered: Vec<_> = large_vars
                .iter()
                .filter(|v| small_vars.contains(v))
                .collect();
            assert_eq!(filtered, small_vars.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_routing_collision_is_an_error() {
        let err = merge_routing_entries(&[&GRAPH_A, &GRAPH_B]).unwrap_err();
        match err {
            ComposeError::RoutingCollision {
                name,
                existing,
                incoming,
            } => {
                assert_eq!(name, "agent");
                assert_eq!(existing, "./a/graph.ts:graph");
                assert_eq!(incoming, "./b/graph.ts:graph");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identical_routing_entries_are_merged() {
        let merged = merge_routing_entries(&[&GRAPH_A, &GRAPH_A_AGAIN]).unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_empty_selection_merges_to_nothing() {
        assert!(merge_dependencies(&[]).is_empty());
        assert!(merge_env_vars(&[]).is_empty());
        assert!(merge_routing_entries(&[]).unwrap().is_empty());
    }
}

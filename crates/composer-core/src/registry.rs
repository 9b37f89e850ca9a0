//! Built-in catalog of optional feature modules
//!
//! The registry is a compile-time table. Every composition run looks modules up
//! by id; nothing ever mutates the catalog, so it can be shared freely across
//! concurrent composition steps.

use crate::error::{ComposeError, Result};
use std::path::PathBuf;

/// Workspace directory that receives every module's source tree
pub const AGENTS_SRC_DIR: &str = "apps/agents/src";

/// An optional, independently selectable feature module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Identifier used on the command line and in selections
    pub id: &'static str,

    /// Human-readable name shown in prompts
    pub display_name: &'static str,

    /// One-line description shown in prompts
    pub description: &'static str,

    /// Dependency name -> version specifier (names unique)
    pub dependencies: &'static [(&'static str, &'static str)],

    /// Environment variables the module needs at runtime
    pub env_vars: &'static [&'static str],

    /// Logical graph name -> entry point path (names unique)
    pub routing_entries: &'static [(&'static str, &'static str)],

    /// Source tree relative to the template root
    pub source_dir: &'static str,
}

impl Module {
    /// Where this module's source tree lands inside the composed project
    pub fn target_dir(&self) -> PathBuf {
        PathBuf::from(AGENTS_SRC_DIR).join(self.id)
    }
}

const REACT_AGENT: Module = Module {
    id: "react-agent",
    display_name: "ReAct Agent",
    description: "Tool-calling agent that reasons and acts in a loop",
    dependencies: &[
        ("@langchain/anthropic", "^0.3.15"),
        ("@langchain/community", "^0.3.35"),
        ("@langchain/langgraph", "^0.2.57"),
    ],
    env_vars: &["ANTHROPIC_API_KEY", "TAVILY_API_KEY"],
    routing_entries: &[("agent", "./apps/agents/src/react-agent/graph.ts:graph")],
    source_dir: "modules/react-agent",
};

const MEMORY_AGENT: Module = Module {
    id: "memory-agent",
    display_name: "Memory Agent",
    description: "Chat agent that stores and recalls long-term user memories",
    dependencies: &[
        ("@langchain/anthropic", "^0.3.15"),
        ("@langchain/langgraph", "^0.2.57"),
        ("uuid", "^11.1.0"),
    ],
    env_vars: &["ANTHROPIC_API_KEY"],
    routing_entries: &[("memory_agent", "./apps/agents/src/memory-agent/graph.ts:graph")],
    source_dir: "modules/memory-agent",
};

const RESEARCH_AGENT: Module = Module {
    id: "research-agent",
    display_name: "Research Agent",
    description: "Multi-step researcher backed by a document index",
    dependencies: &[
        ("@elastic/elasticsearch", "^8.17.1"),
        ("@langchain/anthropic", "^0.3.15"),
        ("@langchain/community", "^0.3.35"),
        ("@langchain/langgraph", "^0.2.57"),
        ("@langchain/openai", "^0.4.4"),
    ],
    env_vars: &[
        "ANTHROPIC_API_KEY",
        "OPENAI_API_KEY",
        "ELASTICSEARCH_URL",
        "ELASTICSEARCH_API_KEY",
    ],
    routing_entries: &[
        (
            "research_agent",
            "./apps/agents/src/research-agent/retrieval-graph/graph.ts:graph",
        ),
        (
            "research_index_graph",
            "./apps/agents/src/research-agent/index-graph/graph.ts:graph",
        ),
    ],
    source_dir: "modules/research-agent",
};

const RETRIEVAL_AGENT: Module = Module {
    id: "retrieval-agent",
    display_name: "Retrieval Agent",
    description: "Question answering over an indexed document store",
    dependencies: &[
        ("@langchain/community", "^0.3.29"),
        ("@langchain/langgraph", "^0.2.57"),
        ("@langchain/openai", "^0.4.4"),
        ("@pinecone-database/pinecone", "^5.1.1"),
    ],
    env_vars: &["OPENAI_API_KEY", "PINECONE_API_KEY", "PINECONE_INDEX_NAME"],
    routing_entries: &[
        (
            "retrieval_agent",
            "./apps/agents/src/retrieval-agent/graph.ts:graph",
        ),
        (
            "retrieval_index_graph",
            "./apps/agents/src/retrieval-agent/index-graph.ts:graph",
        ),
    ],
    source_dir: "modules/retrieval-agent",
};

const BUILTIN_MODULES: &[Module] = &[REACT_AGENT, MEMORY_AGENT, RESEARCH_AGENT, RETRIEVAL_AGENT];

/// Read-only lookup table of modules
#[derive(Debug, Clone, Copy)]
pub struct ModuleRegistry {
    modules: &'static [Module],
}

impl ModuleRegistry {
    /// Registry over an arbitrary static module table
    pub const fn new(modules: &'static [Module]) -> Self {
        Self { modules }
    }

    /// The catalog shipped with the CLI
    pub const fn builtin() -> Self {
        Self::new(BUILTIN_MODULES)
    }

    pub fn lookup(&self, id: &str) -> Result<&'static Module> {
        self.modules
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| ComposeError::ModuleNotFound {
                id: id.to_string(),
                available: self.ids().map(str::to_string).collect(),
            })
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        self.modules.iter().map(|m| m.id)
    }

    pub fn modules(&self) -> &'static [Module] {
        self.modules
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// An ordered set of module ids chosen by the caller
///
/// Duplicates are dropped on construction, keeping the first occurrence, so the
/// iteration order is the order in which ids were first selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref().trim().to_ascii_lowercase();
            if !id.is_empty() && !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Resolve every id against the registry, in selection order
    pub fn resolve(&self, registry: &ModuleRegistry) -> Result<Vec<&'static Module>> {
        self.ids.iter().map(|id| registry.lookup(id)).collect()
    }
}

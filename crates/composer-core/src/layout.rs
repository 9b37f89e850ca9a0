//! Well-known paths inside a composed project, relative to its root

/// Root package manifest
pub const ROOT_MANIFEST: &str = "package.json";

/// Manifest of the agents workspace
pub const AGENTS_MANIFEST: &str = "apps/agents/package.json";

/// Shared routing file listing every graph entry point
pub const ROUTING_FILE: &str = "langgraph.json";

/// Environment template with empty values
pub const ENV_TEMPLATE: &str = ".env.example";

/// pnpm workspace declaration
pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Yarn (berry) settings
pub const YARNRC_FILE: &str = ".yarnrc.yml";

/// Where the selected framework's web app is copied
pub const WEB_APP_DIR: &str = "apps/web";

/// Workspace globs used when the template descriptor does not list any
pub const DEFAULT_WORKSPACE_GLOBS: &[&str] = &["apps/*"];

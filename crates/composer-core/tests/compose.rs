//! End-to-end composition runs against fixture template trees

use composer_core::layout::{
    AGENTS_MANIFEST, ENV_TEMPLATE, PNPM_WORKSPACE_FILE, ROOT_MANIFEST, ROUTING_FILE, YARNRC_FILE,
};
use composer_core::manifest::ProjectManifest;
use composer_core::routing::RoutingConfig;
use composer_core::{
    ComposeError, Framework, Module, ModuleRegistry, PackageManagerKind, ProjectComposer,
    Selection, TemplateRoot,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE_MANIFEST: &str = r#"{
  "name": "fixture",
  "private": true,
  "workspaces": ["apps/*"],
  "scripts": { "dev": "turbo dev" }
}
"#;

const BASE_AGENTS_MANIFEST: &str = r#"{
  "name": "agents",
  "dependencies": { "@langchain/core": "^0.3.42" }
}
"#;

const BASE_ROUTING: &str = r#"{
  "node_version": "20",
  "graphs": {},
  "env": ".env"
}
"#;

const BASE_ENV: &str = "# Fixture env\nLANGSMITH_API_KEY=\"\"\n";

const ALPHA: Module = Module {
    id: "alpha",
    display_name: "Alpha",
    description: "",
    dependencies: &[("zod", "^3.22.0"), ("uuid", "^11.1.0")],
    env_vars: &["OPENAI_API_KEY", "SHARED_KEY"],
    routing_entries: &[("alpha", "./apps/agents/src/alpha/graph.ts:graph")],
    source_dir: "modules/alpha",
};

const BETA: Module = Module {
    id: "beta",
    display_name: "Beta",
    description: "",
    dependencies: &[("zod", "^3.24.2")],
    env_vars: &["SHARED_KEY", "BETA_KEY"],
    routing_entries: &[("beta", "./apps/agents/src/beta/graph.ts:graph")],
    source_dir: "modules/beta",
};

const ALPHA_IMPOSTOR: Module = Module {
    id: "impostor",
    display_name: "Impostor",
    description: "",
    dependencies: &[],
    env_vars: &[],
    routing_entries: &[("alpha", "./apps/agents/src/impostor/graph.ts:graph")],
    source_dir: "modules/impostor",
};

const GHOST: Module = Module {
    id: "ghost",
    display_name: "Ghost",
    description: "",
    dependencies: &[("ghost-sdk", "^1.0.0")],
    env_vars: &[],
    routing_entries: &[],
    source_dir: "modules/ghost",
};

const SHADOW: Module = Module {
    id: "shadow",
    display_name: "Shadow",
    description: "",
    dependencies: &[],
    env_vars: &[],
    routing_entries: &[("base_graph", "./apps/agents/src/shadow/graph.ts:graph")],
    source_dir: "modules/shadow",
};

const FIXTURE_MODULES: &[Module] = &[ALPHA, BETA, ALPHA_IMPOSTOR, GHOST, SHADOW];

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Template root with every fixture module except `ghost`, whose tree is missing
fn fixture_templates() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "template.yaml", "name: Fixture\nversion: 0.1.0\n");
    write(root, "base/package.json", BASE_MANIFEST);
    write(root, "base/apps/agents/package.json", BASE_AGENTS_MANIFEST);
    write(root, "base/langgraph.json", BASE_ROUTING);
    write(root, "base/.env.example", BASE_ENV);
    write(root, "frameworks/nextjs/package.json", "{ \"name\": \"web\" }\n");
    write(root, "frameworks/vite/package.json", "{ \"name\": \"web\" }\n");
    for id in ["alpha", "beta", "impostor", "shadow"] {
        write(root, &format!("modules/{id}/graph.ts"), "export const graph = {};\n");
    }
    dir
}

fn composer(templates: &TempDir) -> ProjectComposer {
    ProjectComposer::new(TemplateRoot::new(templates.path()))
        .with_registry(ModuleRegistry::new(FIXTURE_MODULES))
}

fn manifest(root: &Path, relative: &str) -> ProjectManifest {
    ProjectManifest::parse(Path::new(relative), &read(root, relative)).unwrap()
}

fn target(out: &TempDir) -> PathBuf {
    out.path().join("project")
}

#[tokio::test]
async fn empty_selection_leaves_templates_untouched() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(&Selection::empty(), Framework::NextJs, PackageManagerKind::Npm, &target)
        .await
        .unwrap();

    assert!(project.is_complete(), "{:?}", project.failures);
    assert!(project.modules.is_empty());
    assert_eq!(read(&target, ROUTING_FILE), BASE_ROUTING);
    assert_eq!(read(&target, ENV_TEMPLATE), BASE_ENV);
    assert!(target.join("apps/web/package.json").exists());

    // Only the package-manager edits change anything
    assert_eq!(project.written, vec![PathBuf::from(ROOT_MANIFEST)]);
}

#[tokio::test]
async fn empty_selection_keeps_crlf_env_template() {
    let templates = fixture_templates();
    let crlf_env = "# header\r\nA=\"\"\r\n";
    write(templates.path(), "base/.env.example", crlf_env);
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(&Selection::empty(), Framework::NextJs, PackageManagerKind::Npm, &target)
        .await
        .unwrap();

    assert!(project.is_complete(), "{:?}", project.failures);
    assert_eq!(read(&target, ENV_TEMPLATE), crlf_env);
}

#[tokio::test]
async fn nested_overrides_in_base_manifest_are_merged() {
    let templates = fixture_templates();
    write(
        templates.path(),
        "base/package.json",
        r#"{
  "name": "fixture",
  "private": true,
  "workspaces": { "packages": ["apps/*"] },
  "overrides": { "foo": { "bar": "1.0.0" } }
}
"#,
    );
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(
            &Selection::new(["alpha"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap();
    assert!(project.is_complete(), "{:?}", project.failures);

    let root = manifest(&target, ROOT_MANIFEST);
    assert!(root.dependencies.contains_key("zod"));
    assert_eq!(root.package_manager.as_deref(), Some("npm@10.9.2"));
    assert_eq!(
        root.workspaces,
        Some(serde_json::json!({ "packages": ["apps/*"] }))
    );
    let (_, overrides) = root.overrides_field().unwrap();
    assert_eq!(overrides.get("foo"), Some(&serde_json::json!({ "bar": "1.0.0" })));
    assert!(overrides.contains_key("@langchain/core"));
}

#[tokio::test]
async fn modules_contribute_to_shared_files() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(
            &Selection::new(["alpha", "beta"]),
            Framework::Vite,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap();
    assert!(project.is_complete(), "{:?}", project.failures);
    assert_eq!(project.modules, vec!["alpha", "beta"]);

    // Later module wins the version conflict, no error raised
    let root = manifest(&target, ROOT_MANIFEST);
    assert_eq!(root.dependencies.get("zod").map(String::as_str), Some("^3.24.2"));
    assert_eq!(root.dependencies.get("uuid").map(String::as_str), Some("^11.1.0"));

    let env = read(&target, ENV_TEMPLATE);
    assert_eq!(
        env,
        format!("{BASE_ENV}OPENAI_API_KEY=\"\"\nSHARED_KEY=\"\"\nBETA_KEY=\"\"\n")
    );

    let routing = RoutingConfig::parse(Path::new(ROUTING_FILE), &read(&target, ROUTING_FILE)).unwrap();
    assert_eq!(routing.graphs.len(), 2);
    assert_eq!(
        routing.graphs.get("beta").map(String::as_str),
        Some("./apps/agents/src/beta/graph.ts:graph")
    );
    assert!(routing.extra.contains_key("node_version"));

    assert!(target.join("apps/agents/src/alpha/graph.ts").exists());
    assert!(target.join("apps/agents/src/beta/graph.ts").exists());
}

#[tokio::test]
async fn reversed_selection_flips_dependency_winner() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    composer(&templates)
        .compose(
            &Selection::new(["beta", "alpha"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap();

    let root = manifest(&target, ROOT_MANIFEST);
    assert_eq!(root.dependencies.get("zod").map(String::as_str), Some("^3.22.0"));
}

#[tokio::test]
async fn pnpm_moves_workspaces_and_pins_agents_dependency() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(
            &Selection::new(["alpha"]),
            Framework::NextJs,
            PackageManagerKind::Pnpm,
            &target,
        )
        .await
        .unwrap();
    assert!(project.is_complete(), "{:?}", project.failures);

    let root = manifest(&target, ROOT_MANIFEST);
    assert!(root.workspaces.is_none());
    assert_eq!(root.package_manager.as_deref(), Some("pnpm@10.6.5"));
    assert!(root.overrides.is_none());
    assert!(root.resolutions.is_some());
    // Dependency merge and adapter edits both survive on the shared manifest
    assert!(root.dependencies.contains_key("zod"));
    assert_eq!(root.scripts.get("dev").map(String::as_str), Some("turbo dev"));

    let workspace: serde_yaml::Value =
        serde_yaml::from_str(&read(&target, PNPM_WORKSPACE_FILE)).unwrap();
    assert_eq!(workspace["packages"][0].as_str(), Some("apps/*"));

    let agents = manifest(&target, AGENTS_MANIFEST);
    assert!(agents.dependencies.contains_key("@langchain/langgraph-checkpoint"));
    assert!(agents.dependencies.contains_key("@langchain/core"));

    assert!(!target.join(YARNRC_FILE).exists());
}

#[tokio::test]
async fn npm_and_yarn_keep_manifest_workspaces() {
    for kind in [PackageManagerKind::Npm, PackageManagerKind::Yarn] {
        let templates = fixture_templates();
        let out = TempDir::new().unwrap();
        let target = target(&out);

        let project = composer(&templates)
            .compose(&Selection::new(["alpha"]), Framework::NextJs, kind, &target)
            .await
            .unwrap();
        assert!(project.is_complete(), "{kind}: {:?}", project.failures);

        let root = manifest(&target, ROOT_MANIFEST);
        assert_eq!(root.workspaces, Some(serde_json::json!(["apps/*"])), "{kind}");
        assert_eq!(root.package_manager.as_deref(), Some(kind.pin()));
        assert!(root.dependencies.contains_key("zod"));
        assert!(!target.join(PNPM_WORKSPACE_FILE).exists(), "{kind}");

        let (field, _) = root.overrides_field().unwrap();
        assert_eq!(field, kind.overrides_field());
        assert_eq!(target.join(YARNRC_FILE).exists(), kind == PackageManagerKind::Yarn);

        // The agents manifest is only rewritten for pnpm
        assert_eq!(read(&target, AGENTS_MANIFEST), BASE_AGENTS_MANIFEST);
    }
}

#[tokio::test]
async fn routing_collision_aborts_before_any_write() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let err = composer(&templates)
        .compose(
            &Selection::new(["alpha", "impostor"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::RoutingCollision { ref name, .. } if name == "alpha"));
    assert!(!target.exists());
}

#[tokio::test]
async fn collision_with_base_graph_aborts_before_any_write() {
    let templates = fixture_templates();
    write(
        templates.path(),
        "base/langgraph.json",
        r#"{ "graphs": { "base_graph": "./apps/agents/src/base.ts:graph" } }"#,
    );
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let err = composer(&templates)
        .compose(
            &Selection::new(["shadow"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(!target.exists());
}

#[tokio::test]
async fn existing_target_is_rejected() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);
    write(&target, "keep.txt", "mine");

    let err = composer(&templates)
        .compose(&Selection::empty(), Framework::NextJs, PackageManagerKind::Npm, &target)
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::TargetExists(_)));
    assert_eq!(read(&target, "keep.txt"), "mine");
    assert!(!target.join(ROOT_MANIFEST).exists());
}

#[tokio::test]
async fn unknown_module_is_rejected() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let err = composer(&templates)
        .compose(
            &Selection::new(["alpha", "nope"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::ModuleNotFound { ref id, .. } if id == "nope"));
    assert!(!target.exists());
}

#[tokio::test]
async fn missing_module_tree_is_an_isolated_failure() {
    let templates = fixture_templates();
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(
            &Selection::new(["ghost", "alpha"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap();

    assert_eq!(project.failures.len(), 1);
    assert_eq!(project.failures[0].path, PathBuf::from("apps/agents/src/ghost"));
    assert!(matches!(project.failures[0].error, ComposeError::Copy { .. }));

    // Everything else is still composed
    let root = manifest(&target, ROOT_MANIFEST);
    assert!(root.dependencies.contains_key("ghost-sdk"));
    assert!(target.join("apps/agents/src/alpha/graph.ts").exists());
}

#[tokio::test]
async fn corrupt_base_file_does_not_block_other_files() {
    let templates = fixture_templates();
    write(templates.path(), "base/langgraph.json", "{ not json");
    let out = TempDir::new().unwrap();
    let target = target(&out);

    let project = composer(&templates)
        .compose(
            &Selection::new(["alpha"]),
            Framework::NextJs,
            PackageManagerKind::Npm,
            &target,
        )
        .await
        .unwrap();

    assert_eq!(project.failures.len(), 1);
    assert_eq!(project.failures[0].path, PathBuf::from(ROUTING_FILE));
    assert!(!project.written.contains(&PathBuf::from(ROUTING_FILE)));
    assert!(project.written.contains(&PathBuf::from(ROOT_MANIFEST)));
    assert!(project.written.contains(&PathBuf::from(ENV_TEMPLATE)));
}

#[tokio::test]
async fn shipped_templates_compose_every_module() {
    let templates = TemplateRoot::new(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/agent-stack"),
    );
    let out = TempDir::new().unwrap();
    let target = target(&out);
    let all: Vec<&str> = ModuleRegistry::builtin().ids().collect();

    let project = ProjectComposer::new(templates)
        .compose(&Selection::new(&all), Framework::NextJs, PackageManagerKind::Pnpm, &target)
        .await
        .unwrap();
    assert!(project.is_complete(), "{:?}", project.failures);

    let routing = RoutingConfig::parse(Path::new(ROUTING_FILE), &read(&target, ROUTING_FILE)).unwrap();
    for entry in routing.graphs.values() {
        let file = entry
            .trim_start_matches("./")
            .split(':')
            .next()
            .unwrap();
        assert!(target.join(file).exists(), "missing entry point {file}");
    }
    assert!(target.join(".gitignore").exists());
}

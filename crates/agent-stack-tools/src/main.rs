//! agent-stack CLI - Compose LangGraph agent monorepos

mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use composer_core::tui::CreateArgs;
use composer_core::{Framework, ModuleRegistry, PackageManagerKind, ProductConfig, TemplateRoot};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// agent-stack product configuration
#[derive(Clone)]
pub struct AgentStackConfig;

impl ProductConfig for AgentStackConfig {
    fn name(&self) -> &'static str {
        "agent-stack"
    }

    fn display_name(&self) -> &'static str {
        "Agent Stack"
    }

    /// Templates are read from the source checkout the binary was built from;
    /// other installs point `--template-dir` or `AGENT_STACK_TEMPLATE_DIR` at a copy
    fn default_template_dir(&self) -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/agent-stack")
    }

    fn template_dir_env(&self) -> &'static str {
        "AGENT_STACK_TEMPLATE_DIR"
    }

    fn docs_url(&self) -> &'static str {
        "https://langchain-ai.github.io/langgraphjs/"
    }

    fn upgrade_command(&self) -> &'static str {
        "git pull && cargo install --path crates/agent-stack-tools --force"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for composing LangGraph agent monorepos"
    }

    fn next_steps(&self, dir: &Path, package_manager: PackageManagerKind, installed: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install if the installer did not run
        if !installed {
            steps.push(package_manager.install_command());
        }

        // Step 3: Fill in secrets
        steps.push("cp .env.example .env  # then fill in your API keys".to_string());

        // Step 4: Start agents and web app
        steps.push(package_manager.run_command("dev"));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "agent-stack")]
#[command(about = "CLI for composing LangGraph agent monorepos")]
#[command(version)]
pub struct Args {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new agent project
    Create(CliCreateArgs),
    /// List the agents that can be included
    Modules,
    /// Verify that a template directory covers every agent and framework (for development use)
    CheckTemplates(CheckTemplatesArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project directory to create (must not exist)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Agents to include (comma-separated, e.g. react-agent,memory-agent)
    #[arg(short, long, value_delimiter = ',')]
    pub modules: Option<Vec<String>>,

    /// Web framework for the chat frontend
    #[arg(short, long, value_enum)]
    pub framework: Option<Framework>,

    /// Package manager to generate the workspace for
    #[arg(short, long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManagerKind>,

    /// Local directory to use for templates (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Do not install dependencies after creating the project
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            modules: args.modules,
            framework: args.framework,
            package_manager: args.package_manager,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CheckTemplatesArgs {
    /// Template directory to verify
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

fn list_modules() {
    println!("Available agents:");
    println!();
    for module in ModuleRegistry::builtin().modules() {
        println!("  {:<18} {}", module.id, module.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_cli_logger(args.verbose);
    tracing::debug!(version = CLI_VERSION, "starting agent-stack");

    let config = AgentStackConfig;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = composer_core::run(&config, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::Modules) => {
            list_modules();
            Ok(())
        }
        Some(Command::CheckTemplates(check_args)) => {
            let root = TemplateRoot::resolve(&config, check_args.template_dir.as_deref());
            composer_core::templates::check_templates(&config, &root, &ModuleRegistry::builtin())
                .await
        }
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            let result = composer_core::run(&config, CreateArgs::default(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}

//! Charm-style CLI prompts using cliclack

use crate::compose::{ComposedProject, ProjectComposer};
use crate::framework::Framework;
use crate::product::ProductConfig;
use crate::registry::{ModuleRegistry, Selection};
use crate::runtime::{check_runtimes, PackageInstaller};
use crate::templates::{version, StackManifest, TemplateRoot};
use crate::workspace::PackageManagerKind;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Modules preselected in the prompt and used with `--yes`
const DEFAULT_MODULES: &[&str] = &["react-agent"];

/// Directory name suggested for new projects
const DEFAULT_DIRECTORY: &str = "agent-stack-app";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local template root instead of the product default
    pub template_dir: Option<PathBuf>,

    /// Project directory to create (must not exist)
    pub directory: Option<PathBuf>,

    /// Module ids to include
    pub modules: Option<Vec<String>>,

    /// Web framework for the chat frontend
    pub framework: Option<Framework>,

    /// Package manager convention to generate for
    pub package_manager: Option<PackageManagerKind>,

    /// Do not run the package manager after composing
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Locate templates and check compatibility
    let templates = TemplateRoot::resolve(config, args.template_dir.as_deref());
    let descriptor = load_descriptor(config, &templates).await?;
    if let Some(warning) =
        version::check_compatibility(cli_version, &descriptor.version, config.upgrade_command())
    {
        cliclack::log::warning(warning)?;
    }

    // Step 2: Collect choices
    let project_dir = select_directory(&args)?;
    let framework = select_framework(&args)?;
    let package_manager = select_package_manager(&args)?;
    let registry = ModuleRegistry::builtin();
    let selection = select_modules(&registry, &args)?;

    // Step 3: Compose
    let composer = ProjectComposer::new(templates).with_registry(registry);
    let project = compose_project(&composer, &selection, framework, package_manager, &project_dir)
        .await?;

    // Step 4: Install dependencies
    let installed = if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
        false
    } else {
        install_dependencies(&project, args.yes).await?
    };

    // Step 5: Show next steps
    print_next_steps(config, &project_dir, package_manager, installed)?;

    Ok(())
}

async fn load_descriptor<C: ProductConfig>(
    config: &C,
    templates: &TemplateRoot,
) -> Result<StackManifest> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");
    match StackManifest::load(templates.path()).await {
        Ok(descriptor) => {
            spinner.stop(format!("Templates: {} v{}", descriptor.name, descriptor.version));
            Ok(descriptor)
        }
        Err(e) => {
            spinner.stop("Failed to load templates");
            Err(e).with_context(|| {
                format!(
                    "No templates found in {} (pass --template-dir or set {})",
                    templates.path().display(),
                    config.template_dir_env()
                )
            })
        }
    }
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(dir)
    }
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let path = match &args.directory {
        Some(dir) => {
            let p = absolute(dir);
            cliclack::log::info(format!("Using directory: {}", p.display()))?;
            p
        }
        None if args.yes => absolute(Path::new(DEFAULT_DIRECTORY)),
        None => {
            let input: String = cliclack::input("Project directory")
                .placeholder(DEFAULT_DIRECTORY)
                .default_input(DEFAULT_DIRECTORY)
                .validate(|input: &String| {
                    if input.trim().is_empty() {
                        Err("Please enter a directory name")
                    } else if Path::new(input.trim()).exists() {
                        Err("Directory already exists")
                    } else {
                        Ok(())
                    }
                })
                .interact()?;
            absolute(Path::new(input.trim()))
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    if path.exists() {
        anyhow::bail!(
            "Directory already exists: {}. Choose a new directory name.",
            path.display()
        );
    }

    Ok(path)
}

fn select_framework(args: &CreateArgs) -> Result<Framework> {
    if let Some(framework) = args.framework {
        cliclack::log::info(format!("Framework: {}", framework))?;
        return Ok(framework);
    }
    if args.yes {
        return Ok(Framework::default());
    }

    let mut select = cliclack::select("Which framework should the chat app use?");
    for framework in Framework::ALL {
        select = select.item(framework, framework.display_name(), "");
    }
    Ok(select.initial_value(Framework::default()).interact()?)
}

fn select_package_manager(args: &CreateArgs) -> Result<PackageManagerKind> {
    if let Some(kind) = args.package_manager {
        cliclack::log::info(format!("Package manager: {}", kind))?;
        return Ok(kind);
    }
    let detected = PackageManagerKind::detect();
    if args.yes {
        return Ok(detected);
    }

    let mut select = cliclack::select("Which package manager do you want to use?");
    for kind in PackageManagerKind::ALL {
        let hint = if kind == detected { "detected" } else { "" };
        select = select.item(kind, kind.name(), hint);
    }
    Ok(select.initial_value(detected).interact()?)
}

fn select_modules(registry: &ModuleRegistry, args: &CreateArgs) -> Result<Selection> {
    let selection = if let Some(ids) = &args.modules {
        Selection::new(ids)
    } else if args.yes {
        Selection::new(DEFAULT_MODULES)
    } else {
        let mut multi = cliclack::multiselect("Which agents do you want to include?");
        for module in registry.modules() {
            multi = multi.item(module.id, module.display_name, module.description);
        }
        let chosen: Vec<&'static str> = multi
            .initial_values(DEFAULT_MODULES.to_vec())
            .required(false)
            .interact()?;
        Selection::new(chosen)
    };

    // Surface unknown ids before anything else happens
    let modules = selection.resolve(registry)?;
    if modules.is_empty() {
        cliclack::log::info("No agents selected; composing the base layout only")?;
    } else {
        let names: Vec<&str> = modules.iter().map(|m| m.display_name).collect();
        cliclack::log::success(format!("Agents: {}", names.join(", ")))?;
    }

    Ok(selection)
}

async fn compose_project(
    composer: &ProjectComposer,
    selection: &Selection,
    framework: Framework,
    package_manager: PackageManagerKind,
    project_dir: &Path,
) -> Result<ComposedProject> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let project = match composer
        .compose(selection, framework, package_manager, project_dir)
        .await
    {
        Ok(project) => project,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e.into());
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        project.copied,
        project.root.display()
    ));

    for failure in &project.failures {
        cliclack::log::warning(format!(
            "{} was not fully composed: {}",
            failure.path.display(),
            failure.error
        ))?;
    }

    Ok(project)
}

async fn install_dependencies(project: &ComposedProject, yes: bool) -> Result<bool> {
    let installer = PackageInstaller::new(project.package_manager);
    let fallback = installer.fallback_command(&project.root);

    let missing: Vec<String> = check_runtimes(project.package_manager)
        .iter()
        .filter(|r| !r.available)
        .map(|r| r.describe())
        .collect();
    if !missing.is_empty() {
        cliclack::log::warning(format!(
            "Cannot install dependencies, missing: {}. Run `{}` once they are installed.",
            missing.join(", "),
            fallback
        ))?;
        return Ok(false);
    }

    let confirm = if yes {
        true
    } else {
        cliclack::confirm(format!(
            "Install dependencies with {}?",
            project.package_manager
        ))
        .initial_value(true)
        .interact()?
    };
    if !confirm {
        return Ok(false);
    }

    match installer.install(&project.root).await {
        Ok(()) => {
            cliclack::log::success("Dependencies installed")?;
            Ok(true)
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            cliclack::log::info(format!("Install them manually with: {}", fallback))?;
            Ok(false)
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    package_manager: PackageManagerKind,
    installed: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, package_manager, installed);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!("Docs: {}", config.docs_url()))?;

    Ok(())
}

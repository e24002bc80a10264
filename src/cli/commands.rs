//! Command dispatch: one handler per subcommand.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::TreeService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::TreeNodeConvert;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::MoveOutcome;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(Commands::Config { command }) => cmd_config(command),
        Some(command) => {
            let container = create_container(cli)?;
            match command {
                Commands::Init { labels, force } => cmd_init(&container, labels, *force),
                Commands::Show { flat } => cmd_show(&container, *flat),
                Commands::Ancestors { id } => cmd_ancestors(&container, *id),
                Commands::Parents { id } => cmd_parents(&container, *id),
                Commands::Move { ids, parent, index } => {
                    cmd_move(&container, ids, *parent, *index)
                }
                Commands::Enable { id } => cmd_set_enabled(&container, *id, true),
                Commands::Disable { id } => cmd_set_enabled(&container, *id, false),
                Commands::Validate => cmd_validate(&container),
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn load_settings() -> CliResult<Settings> {
    let cwd = std::env::current_dir().map_err(|e| InfraError::io("get current directory", e))?;
    Ok(Settings::load(Some(&cwd))?)
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings()?;
    Ok(ServiceContainer::new(settings, cli.store.clone()))
}

#[instrument(skip(container))]
fn cmd_init(container: &ServiceContainer, labels: &[String], force: bool) -> CliResult<()> {
    let labels = if labels.is_empty() {
        container.settings.default_labels.clone()
    } else {
        labels.to_vec()
    };
    if labels.is_empty() {
        output::warning("no labels given, creating a tree with only the hidden root");
    }

    container.prepare_store_dir()?;
    let service = TreeService::init(
        container.store.clone(),
        &container.settings.root_label,
        &labels,
        force,
    )?;

    output::success(&format!(
        "Created tree at {}",
        container.store.location().display()
    ));
    output::info(&service.model().to_tree());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, flat: bool) -> CliResult<()> {
    let service = container.tree_service()?;
    if flat {
        for node in service.model().nodes() {
            let indent = "  ".repeat((node.depth + 1) as usize);
            let state = if node.enabled { "" } else { " (disabled)" };
            output::info(&format!(
                "{indent}{:>3} {} [{}]{state}",
                node.depth, node.label, node.id
            ));
        }
    } else {
        output::info(&service.model().to_tree());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_ancestors(container: &ServiceContainer, id: i64) -> CliResult<()> {
    let service = container.tree_service()?;
    require_node(&service, id)?;
    let ancestors = service.ancestors(id)?;
    debug!("ancestors of {}: {:?}", id, ancestors);
    output::info(&ancestors.iter().join(" "));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_parents(container: &ServiceContainer, id: i64) -> CliResult<()> {
    let service = container.tree_service()?;
    require_node(&service, id)?;
    output::info(&service.parents_below(id)?.iter().join(" "));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_move(
    container: &ServiceContainer,
    ids: &[i64],
    parent: Option<i64>,
    index: Option<i64>,
) -> CliResult<()> {
    if ids.is_empty() {
        return Err(CliError::InvalidArgs("no node ids given".to_string()));
    }
    let mut service = container.tree_service()?;
    match service.move_nodes(parent, index, ids)? {
        MoveOutcome::Moved => {
            output::action("Moved", &ids.iter().join(", "));
            output::info(&service.model().to_tree());
        }
        MoveOutcome::Ignored => {
            output::warning("target parent not found, nothing moved");
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_set_enabled(container: &ServiceContainer, id: i64, enabled: bool) -> CliResult<()> {
    let mut service = container.tree_service()?;
    let touched = service.set_enabled(id, enabled)?;
    let label = if enabled { "Enabled" } else { "Disabled" };
    output::action(label, &format!("{touched} node(s) starting at {id}"));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer) -> CliResult<()> {
    let service = container.tree_service()?;
    let stats = service.stats();
    output::success(&format!("{} is valid", container.store.location().display()));
    output::detail(&format!("nodes:     {}", stats.nodes));
    output::detail(&format!("internal:  {}", stats.internal));
    output::detail(&format!("max depth: {}", stats.max_depth));
    output::detail(&format!("disabled:  {}", stats.disabled));
    Ok(())
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: <unavailable>"),
            }
            let cwd =
                std::env::current_dir().map_err(|e| InfraError::io("get current directory", e))?;
            output::detail(&format!("local:  {}", local_config_path(&cwd).display()));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn require_node(service: &TreeService, id: i64) -> CliResult<()> {
    if service.model().find_by_id(id)?.is_none() {
        return Err(CliError::InvalidArgs(format!("node {id} not found")));
    }
    Ok(())
}

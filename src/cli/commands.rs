//! Command dispatch: loads settings and catalog, runs the service, prints

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{CardFilter, Catalog};
use crate::application::TomlResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, LayoutFormat, OrphanArg};
use crate::cli::output;
use crate::cli::render::{layout_svg, layout_text, TreeDisplay};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Card, OrphanMode, TrailEnd};
use crate::exitcode;
use crate::infrastructure::{InfraError, InfraResult, ServiceContainer};

/// Execute the parsed command. Returns the process exit code on success.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Ok(exitcode::OK);
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let container = build_container(cli)?;
    match command {
        Commands::Cards {
            connected,
            orphans,
            toml,
        } => {
            let filter = match (connected, orphans) {
                (Some(root), _) => CardFilter::Connected(root.clone()),
                (None, Some(mode)) => CardFilter::Orphans((*mode).into()),
                (None, None) => CardFilter::All,
            };
            cmd_cards(&container, cli, &filter, *toml)
        }
        Commands::Connected { id } => cmd_connected(&container, cli, id),
        Commands::Orphans { mode } => cmd_orphans(&container, cli, *mode),
        Commands::Layout { id, format } => cmd_layout(&container, cli, id, *format),
        Commands::Tree { id } => cmd_tree(&container, cli, id),
        Commands::Trail { id } => cmd_trail(&container, cli, id),
        Commands::Check => cmd_check(&container, cli),
        Commands::Config { command } => cmd_config(&container, cli, command),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

/// Settings are loaded with the catalog's directory as local config root.
/// Without `--catalog`, the configured default catalog decides that root.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = match &cli.catalog {
        Some(path) => Settings::load(catalog_dir(path))?,
        None => {
            let base = Settings::load(None)?;
            match base.catalog.clone() {
                Some(path) => Settings::load(catalog_dir(&path))?,
                None => base,
            }
        }
    };
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn catalog_dir(path: &Path) -> Option<&Path> {
    path.parent()
        .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
}

fn catalog_path(container: &ServiceContainer, cli: &Cli) -> CliResult<PathBuf> {
    cli.catalog
        .clone()
        .or_else(|| container.settings.catalog.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no catalog given: pass --catalog, set CARDMAP_CATALOG, or configure `catalog`"
                    .to_string(),
            )
        })
}

fn load_catalog(container: &ServiceContainer, cli: &Cli) -> CliResult<Catalog> {
    let path = catalog_path(container, cli)?;
    Ok(container.catalog_service().load(&path)?)
}

fn print_cards(cards: &[&Card]) {
    for card in cards {
        output::card(card);
    }
}

fn require_card(catalog: &Catalog, id: &str) -> CliResult<()> {
    if catalog.cards().iter().any(|card| card.id == id) {
        Ok(())
    } else {
        Err(CliError::CardNotFound(id.to_string()))
    }
}

#[instrument(skip(container, cli))]
fn cmd_cards(
    container: &ServiceContainer,
    cli: &Cli,
    filter: &CardFilter,
    as_toml: bool,
) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    let service = container.relationship_service()?;

    if let CardFilter::Connected(root) = filter {
        if !catalog.cards().iter().any(|card| &card.id == root) {
            output::warning(&format!("no card with id {root}, showing nothing"));
        }
    }
    let selected = service.apply_filter(catalog.cards(), filter);

    if as_toml {
        let subset = Catalog::new(selected.into_iter().cloned().collect());
        output::data(&subset.to_toml()?);
    } else {
        print_cards(&selected);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_connected(container: &ServiceContainer, cli: &Cli, id: &str) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    if !catalog.cards().iter().any(|card| card.id == id) {
        output::warning(&format!("no card with id {id}, nothing is connected to it"));
    }
    let service = container.relationship_service()?;

    for connected in service.connected(catalog.cards(), id) {
        output::data(&connected);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_orphans(container: &ServiceContainer, cli: &Cli, mode: OrphanArg) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    let service = container.relationship_service()?;
    let mode = OrphanMode::from(mode);

    if service.taxonomy().keys(mode.layer_kind()).is_empty() {
        output::warning(&format!("no {} layers configured", mode.layer_kind()));
    }
    print_cards(&service.orphans(catalog.cards(), mode));
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_layout(
    container: &ServiceContainer,
    cli: &Cli,
    id: &str,
    format: LayoutFormat,
) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    let service = container.relationship_service()?;
    let layout = service
        .layout(catalog.cards(), id)
        .ok_or_else(|| CliError::CardNotFound(id.to_string()))?;

    match format {
        LayoutFormat::Text => print!("{}", layout_text(&layout)),
        LayoutFormat::Svg => print!("{}", layout_svg(&layout, &container.settings.layout)),
        LayoutFormat::Toml => {
            let report = toml::to_string_pretty(&layout.report()).serializing("layout")?;
            output::data(&report);
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_tree(container: &ServiceContainer, cli: &Cli, id: &str) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    let service = container.relationship_service()?;
    let layout = service
        .layout(catalog.cards(), id)
        .ok_or_else(|| CliError::CardNotFound(id.to_string()))?;

    output::data(&layout.nodes.to_tree_string());
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_trail(container: &ServiceContainer, cli: &Cli, id: &str) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    require_card(&catalog, id)?;
    let service = container.relationship_service()?;
    let trail = service.trail(catalog.cards(), id);

    output::data(&trail.cards.iter().map(|card| card.id.as_str()).join(" -> "));
    match trail.end {
        TrailEnd::Terminal => {}
        TrailEnd::Dangling(target) => output::warning(&format!("dangling link to {target}")),
        TrailEnd::Cycle(target) => output::warning(&format!("cycle back to {target}")),
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container, cli))]
fn cmd_check(container: &ServiceContainer, cli: &Cli) -> CliResult<i32> {
    let catalog = load_catalog(container, cli)?;
    let service = container.relationship_service()?;
    let diagnostics = service.diagnose(catalog.cards());

    output::data(&format!("{} cards", catalog.len()));
    report_section(
        "dangling links",
        diagnostics
            .dangling
            .iter()
            .map(|card| format!("{} -> {}", card.id, card.link().unwrap_or_default())),
    );
    report_section("cycles", diagnostics.cyclic.iter().cloned());
    if !diagnostics.unregistered_layers.is_empty() {
        output::warning(&format!(
            "layers outside the taxonomy: {}",
            diagnostics.unregistered_layers.iter().join(", ")
        ));
    }

    if diagnostics.is_clean() {
        output::success("no link problems");
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::FINDINGS)
    }
}

fn report_section(title: &str, items: impl Iterator<Item = String>) {
    let items: BTreeSet<String> = items.collect();
    if items.is_empty() {
        return;
    }
    output::section(title, items.len());
    for item in items {
        output::finding(&item);
    }
}

fn create_file(container: &ServiceContainer, path: &Path, content: &str) -> InfraResult<()> {
    container
        .fs
        .ensure_parent(path)
        .map_err(|e| InfraError::create(path, e))?;
    container
        .fs
        .create_new(path, content)
        .map_err(|e| InfraError::create(path, e))
}

fn cmd_config(
    container: &ServiceContainer,
    cli: &Cli,
    command: &ConfigCommands,
) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::data(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::entry("global", &path.display()),
                None => output::warning("no config directory on this platform"),
            }
            if let Ok(path) = catalog_path(container, cli) {
                if let Some(dir) = catalog_dir(&path) {
                    output::entry("local", &local_config_path(dir).display());
                }
            }
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no config directory on this platform".to_string())
                })?
            } else {
                let path = catalog_path(container, cli)?;
                let dir = catalog_dir(&path).unwrap_or(Path::new("."));
                local_config_path(dir)
            };
            create_file(container, &target, &Settings::template())?;
            output::success(&format!("created {}", target.display()));
        }
    }
    Ok(exitcode::OK)
}

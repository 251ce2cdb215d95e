//! gettsim-personas - Example households for GETTSIM
//!
//! Entry point for the `gettsim-personas` binary. `list`, `show` and `upsert`
//! print JSON and `config show` prints TOML; `validate`, `config init` and
//! `config validate` print a status line. Logs and errors go to stderr.

mod cli;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info};

use gettsim_personas::config::{self, PersonasConfig};
use gettsim_personas::data::DataTree;
use gettsim_personas::persona::validation::fail_if_id_columns_invalid;
use gettsim_personas::persona::{parse_date, LinspaceParameter, PersonaRegistry};
use gettsim_personas::{logging, version, Error, Result};

use crate::cli::{Cli, Commands, ConfigSubcommand};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e.format_for_log(), "Command failed");
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need configuration
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        _ => {}
    }

    let config = PersonasConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive until exit
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    debug!(version = %build.full_version(), "Starting gettsim-personas");

    let registry = PersonaRegistry::bundled()?;

    match cli.command {
        Commands::List { date } => list_personas(&registry, date.as_deref(), &config),
        Commands::Show {
            path,
            policy_date,
            evaluation_date,
            bruttolohn,
            n_points,
        } => show_persona(
            &registry,
            &path,
            &policy_date,
            evaluation_date.as_deref(),
            bruttolohn,
            n_points,
            &config,
        ),
        Commands::Upsert {
            path,
            policy_date,
            evaluation_date,
            data,
        } => upsert_persona(
            &registry,
            &path,
            &policy_date,
            evaluation_date.as_deref(),
            &data,
            &config,
        ),
        Commands::Validate {
            start_year,
            end_year,
        } => validate_personas(
            &registry,
            start_year.unwrap_or(config.validation.start_year),
            end_year.unwrap_or(config.validation.end_year),
        ),
        Commands::Version | Commands::Config { .. } => {
            Err(Error::Internal("command handled before config load".into()))
        }
    }
}

/// Write `value` as JSON to stdout
fn print_json<T: Serialize>(value: &T, config: &PersonasConfig) -> Result<()> {
    let json = if config.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn list_personas(
    registry: &PersonaRegistry,
    date: Option<&str>,
    config: &PersonasConfig,
) -> Result<()> {
    let mut listing = registry.list();
    if let Some(date) = date {
        let active = registry.active_at(parse_date(date)?);
        listing.retain(|entry| active.get(&entry.path).is_some());
        info!(%active.date, personas = active.len(), "Filtered personas by date");
    }
    print_json(&listing, config)
}

fn show_persona(
    registry: &PersonaRegistry,
    path: &str,
    policy_date: &str,
    evaluation_date: Option<&str>,
    bruttolohn: Vec<LinspaceParameter>,
    n_points: usize,
    config: &PersonasConfig,
) -> Result<()> {
    let collection = registry.get(path)?;

    let grid = if bruttolohn.is_empty() {
        None
    } else {
        let variant = collection.variant_at(parse_date(policy_date)?)?;
        Some(variant.linspace_grid(bruttolohn, n_points)?)
    };

    let persona = collection.instantiate(policy_date, evaluation_date, grid.as_ref())?;
    print_json(&persona, config)
}

fn upsert_persona(
    registry: &PersonaRegistry,
    path: &str,
    policy_date: &str,
    evaluation_date: Option<&str>,
    data_file: &str,
    config: &PersonasConfig,
) -> Result<()> {
    let data_path = PathBuf::from(data_file);
    let content = fs::read_to_string(&data_path).map_err(|source| Error::IoRead {
        path: data_path.clone(),
        source,
    })?;
    let data: DataTree = serde_json::from_str(&content)?;
    debug!(path = %data_path.display(), "Read data to upsert");

    let persona = registry
        .get(path)?
        .instantiate(policy_date, evaluation_date, None)?
        .upsert_input_data(&data)?;
    print_json(&persona, config)
}

/// Instantiate every persona on January 1st of every year and check its ids
fn validate_personas(registry: &PersonaRegistry, start_year: i32, end_year: i32) -> Result<()> {
    let pairs = registry.persona_year_pairs(start_year, end_year);
    info!(start_year, end_year, pairs = pairs.len(), "Validating personas");

    let mut failures = Vec::new();
    for (year, collection) in &pairs {
        let date = format!("{year}-01-01");
        let checked = collection
            .instantiate(&date, None, None)
            .and_then(|persona| fail_if_id_columns_invalid(&persona.input_data_tree));
        if let Err(e) = checked {
            error!(persona = collection.path(), year, error = %e, "Persona failed validation");
            failures.push((*year, collection.path(), e));
        }
    }

    let failed = failures.len();
    match failures.into_iter().next() {
        None => {
            println!(
                "Validated {} persona-year pairs ({start_year}-{end_year}).",
                pairs.len()
            );
            Ok(())
        }
        Some((year, path, e)) => {
            eprintln!("{failed} of {} persona-year pairs failed, first: {path} ({year})", pairs.len());
            Err(e)
        }
    }
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = PersonasConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let created = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", created.display());
        }
        ConfigSubcommand::Validate => {
            PersonasConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}

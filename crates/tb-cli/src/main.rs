use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tb_cli::commands::summary::SummaryOptions;
use tb_cli::commands::util::{NoteFile, load_notes};
use tb_cli::commands::{fix, show, summary, validate};
use tb_cli::{Cli, Commands, Config, Selection};

/// Load config and read the selected notes.
fn open_notes(config_path: Option<&Path>, selection: &Selection) -> Result<(Vec<NoteFile>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let today = Local::now().date_naive();
    let notes = load_notes(selection, &config, today)?;
    if notes.is_empty() {
        eprintln!("No notes found for the selected dates.");
    }
    Ok((notes, config))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Summary {
            selection,
            filters,
            by_type,
            by_focus,
            json,
            format,
        }) => {
            let (notes, config) = open_notes(cli.config.as_deref(), selection)?;
            let options = SummaryOptions {
                by_type: *by_type,
                by_focus: *by_focus,
                json: *json,
                format: *format,
            };
            summary::run(&notes, &config, filters, options)?;
        }
        Some(Commands::Validate { selection, json }) => {
            let (notes, config) = open_notes(cli.config.as_deref(), selection)?;
            if !validate::run(&notes, &config, *json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Fix { selection, dry_run }) => {
            let (notes, config) = open_notes(cli.config.as_deref(), selection)?;
            fix::run(&notes, &config, *dry_run)?;
        }
        Some(Commands::Show { selection, json }) => {
            let (notes, config) = open_notes(cli.config.as_deref(), selection)?;
            show::run(&notes, &config, *json)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(ExitCode::SUCCESS)
}

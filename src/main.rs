mod branch;
mod cli_args;
mod commands;
mod commit;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod setup;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli_args::{Cli, Command, ConfigAction};
use crate::commands::{BranchOptions, CommitOptions};
use crate::config::Config;
use crate::setup::build_llm_client;
use crate::ui::TerminalPrompter;

/// Settings are read once per invocation, never cached across runs.
fn load_config(cli: &Cli, settings: &Path) -> Result<Config> {
    let cfg = Config::from_sources(cli, settings.to_path_buf())?;
    log::debug!(
        "Using settings from {} (model {})",
        cfg.path.display(),
        cfg.generation.preferred_model
    );
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<()> {
    let settings = config::settings_path(cli)?;
    let prompter = TerminalPrompter;

    // `model` and `config set` work on the file alone, so they can repair a
    // value the generation settings would reject.
    match &cli.command {
        Some(Command::Model { name }) => {
            commands::run_model(&settings, name.as_deref(), &prompter)?;
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Show => commands::run_config_show(&load_config(cli, &settings)?),
            ConfigAction::Set { key, value } => commands::run_config_set(&settings, key, value)?,
        },
        Some(Command::Branch {
            description,
            from_diff,
            ticket,
            dry_run,
        }) => {
            let cfg = load_config(cli, &settings)?;
            let connect = || build_llm_client(&cfg.generation);
            let repo = workspace(cli)?;
            let opts = BranchOptions {
                description: description.clone(),
                from_diff: *from_diff,
                ticket: ticket.clone(),
                dry_run: *dry_run,
            };
            commands::run_branch(&repo, &cfg.branch, &opts, &prompter, &connect)?;
        }
        Some(Command::Commit) | None => {
            let cfg = load_config(cli, &settings)?;
            let connect = || build_llm_client(&cfg.generation);
            let repo = workspace(cli)?;
            let opts = CommitOptions {
                apply: cli.apply,
                stage: cli.stage,
            };
            commands::run_commit(&repo, &opts, &connect)?;
        }
    }

    Ok(())
}

fn workspace(cli: &Cli) -> Result<PathBuf> {
    let start = match &cli.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("failed to read the current directory")?,
    };
    Ok(git::workspace_root(&start)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

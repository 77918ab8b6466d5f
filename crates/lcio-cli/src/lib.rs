// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lcio` command-line tool.
//!
//! ```text
//! lcio dump  <file> [--skip N] [--max N]
//! lcio count <file>
//! lcio copy  <in> <out> [--ignore NAME]... [--only NAME]...
//! lcio config show
//! lcio config set [--dump-max N] [--clear-filters] [--ignore NAME]... [--only NAME]...
//!                 [--strict-handlers BOOL] [--skip-unknown-blocks BOOL]
//! ```
//!
//! Defaults come from the saved [`CliPrefs`](config::CliPrefs) in the user
//! config directory, or from the file given with `--config`.
#![forbid(unsafe_code)]

pub mod commands;
pub mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{CliPrefs, PrefsEdit, PrefsError, PrefsFile, PrefsStore};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "lcio", author, version, about = "Inspect and filter LCIO event files")]
pub struct Cli {
    /// Preferences file to use instead of the one in the user config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// More log output (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a table of runs, events and collections.
    Dump {
        /// Input file.
        file: PathBuf,
        /// Events to skip before printing.
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Events to print (defaults to the saved preference).
        #[arg(long)]
        max: Option<usize>,
    },
    /// Print the number of events.
    Count {
        /// Input file.
        file: PathBuf,
    },
    /// Copy events, dropping filtered collections.
    Copy {
        /// Input file.
        input: PathBuf,
        /// Output file (truncated).
        output: PathBuf,
        /// Collection to drop (repeatable).
        #[arg(long)]
        ignore: Vec<String>,
        /// Collection to keep; all others are dropped (repeatable).
        #[arg(long)]
        only: Vec<String>,
    },
    /// Show or change saved preferences.
    Config {
        /// Action.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `lcio config` actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the preferences in effect as JSON.
    Show,
    /// Change saved preferences; unspecified settings keep their value.
    Set(SetArgs),
}

/// Arguments of `lcio config set`.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Events shown by `dump` without `--max`.
    #[arg(long)]
    pub dump_max: Option<usize>,
    /// Empty the saved ignore and only lists first.
    #[arg(long)]
    pub clear_filters: bool,
    /// Collection always dropped by `copy` (repeatable).
    #[arg(long)]
    pub ignore: Vec<String>,
    /// Collection kept by `copy` (repeatable).
    #[arg(long)]
    pub only: Vec<String>,
    /// Fail `copy` on collections no codec can write.
    #[arg(long)]
    pub strict_handlers: Option<bool>,
    /// Skip blocks of unknown type instead of failing.
    #[arg(long)]
    pub skip_unknown_blocks: Option<bool>,
}

impl From<&SetArgs> for PrefsEdit {
    fn from(args: &SetArgs) -> Self {
        Self {
            dump_max: args.dump_max,
            clear_filters: args.clear_filters,
            ignore: args.ignore.clone(),
            only: args.only.clone(),
            strict_handlers: args.strict_handlers,
            skip_unknown_blocks: args.skip_unknown_blocks,
        }
    }
}

impl Cli {
    /// Log filter directive implied by `--verbose`.
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Preferences file selected by `--config`, else the user one.
    pub fn store(&self) -> Result<PrefsFile, PrefsError> {
        match &self.config {
            Some(path) => Ok(PrefsFile::at(path)),
            None => PrefsFile::user(),
        }
    }

    /// Preferences in effect. A missing user file means defaults; a missing
    /// `--config` file is an error.
    pub fn prefs(&self) -> Result<CliPrefs> {
        let store = match self.store() {
            Ok(store) => store,
            Err(err) => {
                tracing::debug!(%err, "no config store, using defaults");
                return Ok(CliPrefs::default());
            }
        };
        let saved = store
            .load()
            .with_context(|| format!("reading config {}", store.location()))?;
        match saved {
            Some(prefs) => Ok(prefs),
            None if self.config.is_some() => {
                bail!("reading config {}: no such file", store.location())
            }
            None => Ok(CliPrefs::default()),
        }
    }
}

fn run_config(cli: &Cli, action: &ConfigAction, out: &mut impl Write) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let prefs = cli.prefs()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
        }
        ConfigAction::Set(args) => {
            let store = cli.store().context("locating preferences")?;
            PrefsEdit::from(args)
                .save_to(&store)
                .with_context(|| format!("saving config {}", store.location()))?;
            tracing::info!(path = %store.location(), "preferences saved");
            writeln!(out, "saved {}", store.location())?;
        }
    }
    Ok(())
}

/// Run `cli`, writing human-readable output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Dump { file, skip, max } => {
            let prefs = cli.prefs()?;
            let table = commands::dump(file, *skip, max.unwrap_or(prefs.dump_max), &prefs)?;
            writeln!(out, "{table}")?;
        }
        Command::Count { file } => {
            let n = commands::count(file, &cli.prefs()?)?;
            writeln!(out, "{n}")?;
        }
        Command::Copy {
            input,
            output,
            ignore,
            only,
        } => {
            let n = commands::copy(input, output, ignore, only, &cli.prefs()?)?;
            writeln!(out, "copied {n} events")?;
        }
        Command::Config { action } => run_config(cli, action, out)?,
    }
    Ok(())
}

//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// Budget-constrained site selection: serve the most people for the money
#[derive(Parser, Debug)]
#[command(name = "siteplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Force plain output (no colors)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Color mode: auto, always, never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/siteplan/config.toml)
    #[arg(long, global = true, env = "SITEPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl Cli {
    /// Output format picked by flags, if any.
    ///
    /// Priority order:
    /// 1. `--plain` → Plain format
    /// 2. `--output-format` → Explicit format
    /// 3. `--machine` → JSON format (shorthand)
    ///
    /// `None` defers to the `output.format` config value.
    #[must_use]
    pub const fn output_format(&self) -> Option<OutputFormat> {
        if self.plain {
            return Some(OutputFormat::Plain);
        }
        if let Some(fmt) = self.output_format {
            return Some(fmt);
        }
        if self.machine {
            return Some(OutputFormat::Json);
        }
        None
    }

    /// Check if plain mode is forced via CLI flags or color mode.
    #[must_use]
    pub fn force_plain(&self) -> bool {
        self.plain || self.color == Some(ColorMode::Never)
    }

    /// Check if rich mode is forced via CLI flags.
    #[must_use]
    pub fn force_rich(&self) -> bool {
        self.color == Some(ColorMode::Always)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the sample plan file
    Init(commands::init::InitArgs),

    /// Append a candidate site to a plan
    Add(commands::add::AddArgs),

    /// Drop a candidate site from a plan
    Remove(commands::remove::RemoveArgs),

    /// List the candidate sites of a plan
    List(commands::list::ListArgs),

    /// Select the sites that serve the most people within the budget
    Solve(commands::solve::SolveArgs),

    /// Optimal served population across a range of budgets
    Sweep(commands::sweep::SweepArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

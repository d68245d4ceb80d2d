//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod add;
pub mod config;
pub mod init;
pub mod list;
pub mod remove;
pub mod solve;
pub mod sweep;

/// Plan file used when `--plan` is not given.
pub const DEFAULT_PLAN: &str = "plan.toml";

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Add(args) => add::run(ctx, args),
        Commands::Remove(args) => remove::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Solve(args) => solve::run(ctx, args),
        Commands::Sweep(args) => sweep::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

//! siteplan - budget-constrained site selection
//!
//! Chooses which candidate sites to build so the served population is as
//! large as possible without going over budget.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use siteplan::PlanError;
use siteplan::app::AppContext;
use siteplan::cli::Cli;
use siteplan::cli::output::{emit_json, robot_error_structured};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    init_colors(&cli);

    // Before the config loads only the flags can pick the format.
    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => return report_error(&e, machine_errors(&cli)),
    };

    match siteplan::cli::commands::run(&ctx, &cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e, ctx.output_format.is_machine_readable()),
    }
}

fn report_error(e: &PlanError, machine: bool) -> ExitCode {
    if machine {
        // Machine mode: structured error envelope on stdout
        if emit_json(&robot_error_structured(e)).is_err() {
            eprintln!("Error: {e}");
        }
    } else {
        eprintln!("Error: {e}");
        let suggestion = e.to_structured().suggestion;
        if !suggestion.is_empty() {
            eprintln!("  {suggestion}");
        }
    }
    ExitCode::FAILURE
}

fn machine_errors(cli: &Cli) -> bool {
    cli.output_format()
        .is_some_and(|format| format.is_machine_readable())
}

fn init_colors(cli: &Cli) {
    if cli.force_plain() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    } else if cli.force_rich() {
        console::set_colors_enabled(true);
        console::set_colors_enabled_stderr(true);
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,siteplan=info",
        1 => "info,siteplan=debug",
        2 => "debug,siteplan=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if machine_errors(cli) {
        // JSON logging alongside machine output
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

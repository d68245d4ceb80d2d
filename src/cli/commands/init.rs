//! siteplan init - Write the sample plan

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::{PlanError, Result};
use crate::storage::PlanFile;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the plan (.toml, .json, .yaml)
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub path: PathBuf,

    /// Overwrite an existing plan
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    path: String,
    budget: String,
    sites: usize,
    overwritten: bool,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let existed = args.path.exists();
    if existed && !args.force {
        return Err(PlanError::PlanExists(args.path.display().to_string()));
    }

    let plan = PlanFile::sample();
    plan.save(&args.path)?;
    info!(path = %args.path.display(), "wrote sample plan");

    if ctx.silent() {
        return Ok(());
    }

    let report = InitReport {
        path: args.path.display().to_string(),
        budget: plan.budget.to_string(),
        sites: plan.sites.len(),
        overwritten: existed,
    };
    emit_formatted(
        &report,
        ctx.output_format,
        |r| render(r, HumanLayout::new()),
        |r| render(r, HumanLayout::plain()),
        |r| format!("path\tbudget\tsites\n{}\t{}\t{}", r.path, r.budget, r.sites),
    )
}

fn render(report: &InitReport, mut layout: HumanLayout) -> String {
    layout
        .title("Plan initialized")
        .kv("Path", &report.path)
        .kv("Budget", &report.budget)
        .kv("Sites", &report.sites.to_string());
    if report.overwritten {
        layout.blank().push_line("Replaced the existing plan.");
    }
    layout
        .blank()
        .push_line(format!("Solve it with: siteplan solve --plan {}", report.path));
    layout.build()
}

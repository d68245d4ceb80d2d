//! siteplan add - Append a candidate site to a plan

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::core::Candidate;
use crate::error::Result;
use crate::storage::PlanFile;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Plan file to extend
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub plan: PathBuf,

    /// Area name
    #[arg(long)]
    pub name: String,

    /// People served if the site is built
    #[arg(long)]
    pub population: u64,

    /// Cost of building the site
    #[arg(long)]
    pub cost: u64,

    /// Stable id (defaults to a slug of the name)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddReport {
    plan: String,
    index: usize,
    site: Candidate,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let mut plan = PlanFile::load(&args.plan)?;

    let candidate = Candidate::new(args.name.trim(), args.population, args.cost);
    let candidate = match &args.id {
        Some(id) => candidate.with_id(id.trim()),
        None => candidate,
    };

    let index = plan.add_site(&candidate)?;
    plan.save(&args.plan)?;
    info!(plan = %args.plan.display(), id = %candidate.id, index, "added site");

    if ctx.silent() {
        return Ok(());
    }

    let report = AddReport {
        plan: args.plan.display().to_string(),
        index,
        site: candidate,
    };
    emit_formatted(
        &report,
        ctx.output_format,
        |r| render(r, HumanLayout::new()),
        |r| render(r, HumanLayout::plain()),
        |r| {
            format!(
                "index\tid\tname\tpopulation\tcost\n{}\t{}\t{}\t{}\t{}",
                r.index, r.site.id, r.site.name, r.site.population, r.site.cost
            )
        },
    )
}

fn render(report: &AddReport, mut layout: HumanLayout) -> String {
    layout
        .title(&format!("Added {}", report.site.name))
        .kv("Id", &report.site.id)
        .kv("Population", &report.site.population.to_string())
        .kv("Cost", &report.site.cost.to_string())
        .kv("Position", &(report.index + 1).to_string())
        .kv("Plan", &report.plan);
    layout.build()
}

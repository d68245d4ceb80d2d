//! siteplan remove - Drop a candidate site from a plan

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;
use crate::storage::{PlanFile, SiteEntry};

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Plan file to edit
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub plan: PathBuf,

    /// Id of the site to drop (see `siteplan list`)
    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Serialize)]
struct RemoveReport {
    plan: String,
    id: String,
    site: SiteEntry,
    remaining: usize,
}

pub fn run(ctx: &AppContext, args: &RemoveArgs) -> Result<()> {
    let mut plan = PlanFile::load(&args.plan)?;
    let site = plan.remove_site(args.id.trim())?;
    plan.save(&args.plan)?;
    info!(plan = %args.plan.display(), id = %args.id, "removed site");

    if ctx.silent() {
        return Ok(());
    }

    let report = RemoveReport {
        plan: args.plan.display().to_string(),
        id: args.id.trim().to_string(),
        site,
        remaining: plan.sites.len(),
    };
    emit_formatted(
        &report,
        ctx.output_format,
        |r| render(r, HumanLayout::new()),
        |r| render(r, HumanLayout::plain()),
        |r| format!("id\tname\tremaining\n{}\t{}\t{}", r.id, r.site.name, r.remaining),
    )
}

fn render(report: &RemoveReport, mut layout: HumanLayout) -> String {
    layout
        .title(&format!("Removed {}", report.site.name))
        .kv("Id", &report.id)
        .kv("Sites left", &report.remaining.to_string())
        .kv("Plan", &report.plan);
    layout.build()
}

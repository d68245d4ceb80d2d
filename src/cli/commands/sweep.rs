//! siteplan sweep - Optimal served population across a budget range

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_json, emit_jsonl, render_tsv, robot_ok};
use crate::core::{Allocator, CandidateSet, SweepPoint, TableStrategy, budget_range, sweep};
use crate::error::Result;
use crate::storage::PlanFile;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Plan file to solve
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub plan: PathBuf,

    /// First budget, in cost units
    #[arg(long, default_value_t = 0)]
    pub from: u64,

    /// Last budget, in cost units (inclusive)
    #[arg(long)]
    pub to: u64,

    /// Distance between budgets
    #[arg(long, default_value_t = 1)]
    pub step: u64,

    /// DP table layout: auto, full, compact
    #[arg(long)]
    pub strategy: Option<TableStrategy>,

    /// Money per cost unit; real costs are rounded to whole units
    #[arg(long)]
    pub cost_unit: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    budget: u64,
    total_population: u64,
    total_cost: u64,
    sites: Vec<String>,
}

impl SweepRow {
    fn from_point(point: SweepPoint, candidates: &CandidateSet) -> Self {
        Self {
            budget: point.budget,
            total_population: point.total_population,
            total_cost: point.total_cost,
            sites: point
                .selected
                .iter()
                .filter_map(|&index| candidates.get(index))
                .map(|candidate| candidate.id.clone())
                .collect(),
        }
    }
}

pub fn run(ctx: &AppContext, args: &SweepArgs) -> Result<()> {
    let mut solver = ctx.config.solver.clone();
    if let Some(strategy) = args.strategy {
        solver.strategy = strategy;
    }
    if let Some(unit) = args.cost_unit {
        solver.cost_unit = unit;
    }

    let plan = PlanFile::load(&args.plan)?.resolve(solver.cost_unit)?;
    let budgets = budget_range(args.from, args.to, args.step, solver.max_sweep_points)?;

    let allocator = Allocator::new(solver.solve_options());
    let points = sweep(
        &allocator,
        &plan.candidates.populations(),
        &plan.candidates.costs(),
        &budgets,
    )?;
    info!(budgets = budgets.len(), sites = plan.candidates.len(), "swept budgets");

    if ctx.silent() {
        return Ok(());
    }

    let rows: Vec<SweepRow> = points
        .into_iter()
        .map(|point| SweepRow::from_point(point, &plan.candidates))
        .collect();

    match ctx.output_format {
        OutputFormat::Human => println!("{}", render(&rows, HumanLayout::new())),
        OutputFormat::Plain => println!("{}", render(&rows, HumanLayout::plain())),
        OutputFormat::Json => emit_json(&robot_ok(&rows))?,
        OutputFormat::Jsonl => emit_jsonl(&rows)?,
        OutputFormat::Tsv => println!(
            "{}",
            render_tsv(
                &["budget", "total_population", "total_cost", "sites"],
                &rows,
                |row| vec![
                    row.budget.to_string(),
                    row.total_population.to_string(),
                    row.total_cost.to_string(),
                    row.sites.join(","),
                ],
            )
        ),
    }
    Ok(())
}

fn render(rows: &[SweepRow], mut layout: HumanLayout) -> String {
    layout.title("Budget sweep");
    layout.push_line(format!(
        "{:>10}  {:>12}  {:>10}  Sites",
        "Budget", "Population", "Cost"
    ));
    for row in rows {
        let line = format!(
            "{:>10}  {:>12}  {:>10}  {}",
            row.budget,
            row.total_population,
            row.total_cost,
            row.sites.join(", ")
        );
        layout.push_line(line.trim_end());
    }
    layout.build()
}

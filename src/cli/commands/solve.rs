//! siteplan solve - Pick the sites that serve the most people within budget

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::{Alignment, measure_text_width, pad_str};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_json, emit_jsonl, render_tsv, robot_ok,
};
use crate::config::{SolverConfig, parse_duration};
use crate::core::quantize::rounding_error_bound;
use crate::core::{AllocationReport, Allocator, SiteStatus, TableStrategy};
use crate::error::Result;
use crate::storage::{Amount, PlanFile};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Plan file to solve
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub plan: PathBuf,

    /// Override the plan's budget
    #[arg(long, short)]
    pub budget: Option<Amount>,

    /// DP table layout: auto, full, compact
    #[arg(long)]
    pub strategy: Option<TableStrategy>,

    /// Give up after this long (e.g. 500ms, 5s)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Money per cost unit; real costs are rounded to whole units
    #[arg(long)]
    pub cost_unit: Option<f64>,
}

impl SolveArgs {
    fn solver_config(&self, base: &SolverConfig) -> SolverConfig {
        let mut solver = base.clone();
        if let Some(strategy) = self.strategy {
            solver.strategy = strategy;
        }
        if let Some(timeout) = self.timeout {
            solver.timeout = Some(timeout);
        }
        if let Some(unit) = self.cost_unit {
            solver.cost_unit = unit;
        }
        solver
    }
}

#[derive(Debug, Serialize)]
struct SolveReport {
    plan: String,
    strategy: TableStrategy,
    cost_unit: f64,
    /// Worst-case gap between the rounded and the real total cost, in money.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_cost_error: Option<f64>,
    #[serde(flatten)]
    allocation: AllocationReport,
}

pub fn run(ctx: &AppContext, args: &SolveArgs) -> Result<()> {
    let solver = args.solver_config(&ctx.config.solver);

    let mut file = PlanFile::load(&args.plan)?;
    if let Some(budget) = args.budget {
        file.budget = budget;
    }
    #[allow(clippy::float_cmp)]
    let quantized = solver.cost_unit != 1.0 || file.has_real_amounts();
    let plan = file.resolve(solver.cost_unit)?;

    let allocator = Allocator::new(solver.solve_options());
    let selection = allocator.solve_candidates(&plan.candidates, plan.budget)?;
    let allocation = AllocationReport::build(&plan.candidates, plan.budget, &selection);
    info!(
        sites = plan.candidates.len(),
        budget = plan.budget,
        selected = allocation.selected_count,
        population = allocation.total_population,
        "solved plan"
    );
    if allocation.selected_count == 0 && !plan.candidates.is_empty() {
        warn!(budget = plan.budget, "no site fits the budget");
    }

    if ctx.silent() {
        return Ok(());
    }

    let report = SolveReport {
        plan: args.plan.display().to_string(),
        strategy: solver.strategy,
        cost_unit: solver.cost_unit,
        max_cost_error: quantized
            .then(|| rounding_error_bound(allocation.selected_count, solver.cost_unit)),
        allocation,
    };

    match ctx.output_format {
        OutputFormat::Human => println!("{}", render(&report, HumanLayout::new())),
        OutputFormat::Plain => println!("{}", render(&report, HumanLayout::plain())),
        OutputFormat::Json => emit_json(&robot_ok(&report))?,
        OutputFormat::Jsonl => emit_jsonl(&report.allocation.sites)?,
        OutputFormat::Tsv => println!("{}", render_sites_tsv(&report.allocation)),
    }
    Ok(())
}

fn render(report: &SolveReport, mut layout: HumanLayout) -> String {
    let allocation = &report.allocation;
    layout
        .title(&format!("Allocation for budget {}", allocation.budget))
        .section("Results");

    let name_width = allocation
        .sites
        .iter()
        .map(|site| measure_text_width(&site.name))
        .max()
        .unwrap_or(0)
        .max(4);
    let area = |name: &str| pad_str(name, name_width, Alignment::Left, None).into_owned();
    layout.push_line(format!(
        "{}  {:>12}  {:>10}  Status",
        area("Area"),
        "Population",
        "Cost"
    ));
    for site in &allocation.sites {
        layout.push_line(format!(
            "{}  {:>12}  {:>10}  {}",
            area(&site.name),
            site.population,
            site.cost,
            site.status
        ));
    }

    layout
        .blank()
        .kv(
            "Total population",
            &allocation.total_population.to_string(),
        )
        .kv("Total cost", &allocation.total_cost.to_string())
        .kv("Remaining budget", &allocation.remaining_budget.to_string());
    if let Some(bound) = report.max_cost_error {
        layout.kv("Cost unit", &report.cost_unit.to_string());
        layout.kv("Max cost error", &format!("±{bound}"));
    }

    if allocation.selected_count > 0 {
        layout.blank().section("Contribution");
        for site in allocation.selected() {
            let share = site.share_percent.unwrap_or(0.0);
            layout.bullet(&format!("{}: {share:.1}%", site.name));
        }
    } else {
        layout
            .blank()
            .push_line("No site fits within the budget.");
    }

    layout.build()
}

fn render_sites_tsv(allocation: &AllocationReport) -> String {
    render_tsv(
        &["index", "id", "name", "population", "cost", "status", "share_percent"],
        &allocation.sites,
        |site| {
            vec![
                site.index.to_string(),
                site.id.clone(),
                site.name.clone(),
                site.population.to_string(),
                site.cost.to_string(),
                match site.status {
                    SiteStatus::Selected => "selected".to_string(),
                    SiteStatus::NotSelected => "not_selected".to_string(),
                },
                site.share_percent
                    .map(|share| format!("{share:.2}"))
                    .unwrap_or_default(),
            ]
        },
    )
}

//! siteplan list - List the candidate sites of a plan

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_json, emit_jsonl, render_tsv, robot_ok};
use crate::core::candidate::slugify;
use crate::error::Result;
use crate::storage::{Amount, PlanFile};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Plan file to read
    #[arg(long, default_value = super::DEFAULT_PLAN)]
    pub plan: PathBuf,
}

#[derive(Debug, Serialize)]
struct SiteRow {
    index: usize,
    id: String,
    name: String,
    population: Amount,
    cost: Amount,
}

#[derive(Debug, Serialize)]
struct Listing {
    budget: Amount,
    sites: Vec<SiteRow>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let plan = PlanFile::load(&args.plan)?;
    let listing = Listing {
        budget: plan.budget,
        sites: plan
            .sites
            .iter()
            .enumerate()
            .map(|(index, site)| SiteRow {
                index,
                id: site.id.clone().unwrap_or_else(|| slugify(&site.name)),
                name: site.name.clone(),
                population: site.population,
                cost: site.cost,
            })
            .collect(),
    };

    if ctx.silent() {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Human => println!("{}", render(&listing, HumanLayout::new())),
        OutputFormat::Plain => println!("{}", render(&listing, HumanLayout::plain())),
        OutputFormat::Json => emit_json(&robot_ok(&listing))?,
        OutputFormat::Jsonl => emit_jsonl(&listing.sites)?,
        OutputFormat::Tsv => println!(
            "{}",
            render_tsv(
                &["index", "id", "name", "population", "cost"],
                &listing.sites,
                |row| vec![
                    row.index.to_string(),
                    row.id.clone(),
                    row.name.clone(),
                    row.population.to_string(),
                    row.cost.to_string(),
                ],
            )
        ),
    }
    Ok(())
}

fn render(listing: &Listing, mut layout: HumanLayout) -> String {
    layout
        .title(&format!("{} candidate sites", listing.sites.len()))
        .kv("Budget", &listing.budget.to_string())
        .blank();

    if listing.sites.is_empty() {
        layout.push_line("No sites yet. Add one with: siteplan add --name <area> --population <n> --cost <c>");
        return layout.build();
    }

    let name_width = listing
        .sites
        .iter()
        .map(|row| row.name.len())
        .max()
        .unwrap_or(0)
        .max(4);
    layout.push_line(format!(
        "{:<name_width$}  {:>12}  {:>10}",
        "Area", "Population", "Cost"
    ));
    for row in &listing.sites {
        layout.push_line(format!(
            "{:<name_width$}  {:>12}  {:>10}",
            row.name,
            row.population.to_string(),
            row.cost.to_string()
        ));
    }
    layout.build()
}

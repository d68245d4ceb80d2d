//! Presentation-ready view of a selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::allocator::Selection;
use super::candidate::CandidateSet;

/// Whether a site made it into the optimal selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Selected,
    NotSelected,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected => f.write_str("Selected"),
            Self::NotSelected => f.write_str("Not Selected"),
        }
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteOutcome {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub population: u64,
    pub cost: u64,
    pub status: SiteStatus,
    /// Percentage of the served population this site contributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_percent: Option<f64>,
}

/// Per-site status plus the aggregate figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub budget: u64,
    pub total_population: u64,
    pub total_cost: u64,
    pub remaining_budget: u64,
    pub selected_count: usize,
    pub not_selected_count: usize,
    pub sites: Vec<SiteOutcome>,
}

impl AllocationReport {
    /// Partition `candidates` by `selection` and aggregate the selected side.
    #[must_use]
    pub fn build(candidates: &CandidateSet, budget: u64, selection: &Selection) -> Self {
        let total_population: u64 = candidates
            .iter()
            .enumerate()
            .filter(|(index, _)| selection.contains(*index))
            .map(|(_, c)| c.population)
            .sum();
        let total_cost: u64 = candidates
            .iter()
            .enumerate()
            .filter(|(index, _)| selection.contains(*index))
            .map(|(_, c)| c.cost)
            .sum();

        let sites: Vec<SiteOutcome> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let selected = selection.contains(index);
                SiteOutcome {
                    index,
                    id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    population: candidate.population,
                    cost: candidate.cost,
                    status: if selected {
                        SiteStatus::Selected
                    } else {
                        SiteStatus::NotSelected
                    },
                    share_percent: (selected && total_population > 0)
                        .then(|| share(candidate.population, total_population)),
                }
            })
            .collect();

        let selected_count = sites
            .iter()
            .filter(|site| site.status == SiteStatus::Selected)
            .count();

        Self {
            budget,
            total_population,
            total_cost,
            remaining_budget: budget.saturating_sub(total_cost),
            selected_count,
            not_selected_count: sites.len() - selected_count,
            sites,
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &SiteOutcome> {
        self.sites
            .iter()
            .filter(|site| site.status == SiteStatus::Selected)
    }

    pub fn not_selected(&self) -> impl Iterator<Item = &SiteOutcome> {
        self.sites
            .iter()
            .filter(|site| site.status == SiteStatus::NotSelected)
    }
}

#[allow(clippy::cast_precision_loss)]
fn share(part: u64, whole: u64) -> f64 {
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::allocator::solve;

    #[test]
    fn report_partitions_sample() {
        let set = CandidateSet::sample();
        let selection = solve(&set.populations(), &set.costs(), 300).unwrap();
        let report = AllocationReport::build(&set, 300, &selection);

        assert_eq!(report.total_population, 1_300_000);
        assert_eq!(report.total_cost, 300);
        assert_eq!(report.remaining_budget, 0);
        assert_eq!(report.selected_count, 2);
        assert_eq!(report.not_selected_count, 3);

        let selected: Vec<&str> = report.selected().map(|s| s.name.as_str()).collect();
        assert_eq!(selected, vec!["Dokki", "Administrative Capital"]);
        assert_eq!(report.not_selected().count(), 3);
        assert!(report.not_selected().all(|s| s.share_percent.is_none()));

        let shares: f64 = report.selected().filter_map(|s| s.share_percent).sum();
        assert!((shares - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_has_no_shares() {
        let set = CandidateSet::sample();
        let report = AllocationReport::build(&set, 0, &Selection::empty());
        assert_eq!(report.total_population, 0);
        assert_eq!(report.selected_count, 0);
        assert!(report.sites.iter().all(|s| s.share_percent.is_none()));
        assert!(report.sites.iter().all(|s| s.status == SiteStatus::NotSelected));
    }

    #[test]
    fn status_display_matches_results_table() {
        assert_eq!(SiteStatus::Selected.to_string(), "Selected");
        assert_eq!(SiteStatus::NotSelected.to_string(), "Not Selected");
    }
}

//! Optimal value across a range of budgets.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::allocator::Allocator;
use crate::error::{PlanError, Result};

/// Optimum for one budget of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub budget: u64,
    pub total_population: u64,
    pub total_cost: u64,
    pub selected: Vec<usize>,
}

/// Default cap on the number of budgets in one sweep.
pub const DEFAULT_MAX_SWEEP_POINTS: u64 = 10_000;

/// Budgets `from, from + step, ...` up to and including `to`.
///
/// Fails without allocating when the range holds more than `max_points`
/// budgets.
pub fn budget_range(from: u64, to: u64, step: u64, max_points: u64) -> Result<Vec<u64>> {
    if step == 0 {
        return Err(PlanError::InvalidInput("sweep step must be positive".to_string()));
    }
    if from > to {
        return Err(PlanError::InvalidInput(format!(
            "sweep start {from} is above its end {to}"
        )));
    }
    let points = ((to - from) / step).saturating_add(1);
    if points > max_points {
        return Err(PlanError::InvalidInput(format!(
            "sweep covers {points} budgets, above the limit of {max_points}; raise --step or solver.max_sweep_points"
        )));
    }
    let mut budgets = Vec::with_capacity(usize::try_from(points).unwrap_or(0));
    let mut budget = from;
    loop {
        budgets.push(budget);
        match budget.checked_add(step) {
            Some(next) if next <= to => budget = next,
            _ => break,
        }
    }
    Ok(budgets)
}

/// Solve every budget in parallel. Points come back in the order of `budgets`.
pub fn sweep(
    allocator: &Allocator,
    populations: &[u64],
    costs: &[u64],
    budgets: &[u64],
) -> Result<Vec<SweepPoint>> {
    budgets
        .par_iter()
        .map(|&budget| {
            allocator
                .solve(populations, costs, budget)
                .map(|selection| SweepPoint {
                    budget,
                    total_population: selection.total_population,
                    total_cost: selection.total_cost,
                    selected: selection.indices,
                })
        })
        .collect()
}

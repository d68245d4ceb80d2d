//! Exact 0/1 budget allocation.
//!
//! `best[i][w]` is the largest population reachable with the first `i`
//! candidates under a cost budget of `w`:
//!
//! ```text
//! best[0][w] = 0
//! best[i][w] = best[i-1][w]                                      if cost[i-1] > w
//!            = max(best[i-1][w], best[i-1][w-cost[i-1]] + pop[i-1])  otherwise
//! ```
//!
//! The traceback walks from `(n, budget)` down to row 0 and marks candidate
//! `i-1` selected whenever `best[i][w] != best[i-1][w]`. Inclusion is recorded
//! only when it strictly improves the cell, so among equal-value subsets the
//! reported one drops later candidates whenever an equally good alternative
//! without them exists. [`TableStrategy::Full`] and [`TableStrategy::Compact`]
//! always report the same selection.

use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidate::CandidateSet;
use super::interrupt::Interrupt;
use crate::error::{PlanError, Result};

/// How the DP table is stored while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStrategy {
    /// `Full` when the value table fits `full_table_max_cells`, else `Compact`.
    #[default]
    Auto,
    /// Whole `(n+1) x (budget+1)` table of `u64` values.
    Full,
    /// One rolling value row plus one decision bit per cell.
    Compact,
}

impl fmt::Display for TableStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Full => "full",
            Self::Compact => "compact",
        };
        f.write_str(name)
    }
}

impl FromStr for TableStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "unknown table strategy '{other}' (expected auto, full or compact)"
            )),
        }
    }
}

/// Resource limits for a single solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverLimits {
    /// Hard ceiling on `n * (budget + 1)`.
    pub max_table_cells: u64,
    /// Largest table `Auto` will store as full `u64` values.
    pub full_table_max_cells: u64,
    /// Ceiling on the memory the chosen table layout allocates.
    pub max_table_bytes: u64,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_table_cells: 4_000_000_000,
            full_table_max_cells: 8 * 1024 * 1024,
            max_table_bytes: 1024 * 1024 * 1024,
        }
    }
}

/// Bytes `strategy` allocates for `n` candidates and `width` budget columns.
///
/// `Full` keeps `(n+1) x width` values. `Compact` keeps one value row and a
/// decision bit per cell, packed into `u64` words.
#[must_use]
pub fn table_bytes(strategy: TableStrategy, n: usize, width: usize) -> u128 {
    let word = std::mem::size_of::<u64>() as u128;
    let (n, width) = (n as u128, width as u128);
    match strategy {
        TableStrategy::Compact => width * word + (n * width).div_ceil(64) * word,
        TableStrategy::Auto | TableStrategy::Full => (n + 1) * width * word,
    }
}

/// Options for [`Allocator`].
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub strategy: TableStrategy,
    pub limits: SolverLimits,
    pub interrupt: Interrupt,
}

/// The optimal subset for one solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected candidate indices, ascending.
    pub indices: Vec<usize>,
    /// Sum of the selected populations (the optimum).
    pub total_population: u64,
    /// Sum of the selected costs.
    pub total_cost: u64,
}

impl Selection {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            indices: Vec::new(),
            total_population: 0,
            total_cost: 0,
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Exact knapsack solver. Holds options only; every solve is independent.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    options: SolveOptions,
}

impl Allocator {
    #[must_use]
    pub const fn new(options: SolveOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Solve for the candidates of a [`CandidateSet`].
    pub fn solve_candidates(&self, candidates: &CandidateSet, budget: u64) -> Result<Selection> {
        self.solve(&candidates.populations(), &candidates.costs(), budget)
    }

    /// Solve from signed inputs, rejecting negative values.
    pub fn solve_signed(&self, populations: &[i64], costs: &[i64], budget: i64) -> Result<Selection> {
        let populations = to_unsigned("population", populations)?;
        let costs = to_unsigned("cost", costs)?;
        let budget = u64::try_from(budget)
            .map_err(|_| PlanError::InvalidInput(format!("budget must be non-negative, got {budget}")))?;
        self.solve(&populations, &costs, budget)
    }

    /// Pick the subset of candidates with the largest total population whose
    /// total cost stays within `budget`.
    pub fn solve(&self, populations: &[u64], costs: &[u64], budget: u64) -> Result<Selection> {
        if populations.len() != costs.len() {
            return Err(PlanError::InvalidInput(format!(
                "{} populations but {} costs",
                populations.len(),
                costs.len()
            )));
        }
        populations.iter().try_fold(0u64, |acc, &p| acc.checked_add(p)).ok_or_else(|| {
            PlanError::InvalidInput("total population does not fit in 64 bits".to_string())
        })?;

        let n = populations.len();
        if n == 0 {
            return Ok(Selection::empty());
        }

        // Any budget at or above the total cost behaves exactly like the
        // total cost, for both the optimum and the traceback.
        let total_cost = costs.iter().fold(0u64, |acc, &c| acc.saturating_add(c));
        let effective_budget = budget.min(total_cost);

        let width = usize::try_from(effective_budget)
            .ok()
            .and_then(|b| b.checked_add(1))
            .ok_or(PlanError::TableTooLarge {
                cells: u64::MAX,
                limit: self.options.limits.max_table_cells,
            })?;
        let cells = (n as u128) * (width as u128);
        let limit = self.options.limits.max_table_cells;
        if cells > u128::from(limit) {
            return Err(PlanError::TableTooLarge {
                cells: u64::try_from(cells).unwrap_or(u64::MAX),
                limit,
            });
        }

        let strategy = match self.options.strategy {
            TableStrategy::Auto => {
                let full_cells = (n as u128 + 1) * (width as u128);
                if full_cells <= u128::from(self.options.limits.full_table_max_cells) {
                    TableStrategy::Full
                } else {
                    TableStrategy::Compact
                }
            }
            explicit => explicit,
        };

        let bytes = table_bytes(strategy, n, width);
        let byte_limit = self.options.limits.max_table_bytes;
        if bytes > u128::from(byte_limit) {
            return Err(PlanError::TableMemory {
                bytes: u64::try_from(bytes).unwrap_or(u64::MAX),
                limit: byte_limit,
            });
        }
        debug!(
            candidates = n,
            budget,
            effective_budget,
            %strategy,
            bytes = u64::try_from(bytes).unwrap_or(u64::MAX),
            "solving allocation"
        );

        // A cost above the effective budget can never be afforded.
        let costs_in_range: Vec<Option<usize>> = costs
            .iter()
            .map(|&c| usize::try_from(c).ok().filter(|&c| c < width))
            .collect();

        let indices = match strategy {
            TableStrategy::Compact => {
                solve_compact(populations, &costs_in_range, width, &self.options.interrupt)?
            }
            _ => solve_full(populations, &costs_in_range, width, &self.options.interrupt)?,
        };

        let total_population = indices.iter().map(|&i| populations[i]).sum();
        let total_cost = indices.iter().map(|&i| costs[i]).sum();
        debug!(
            selected = indices.len(),
            total_population, total_cost, "allocation solved"
        );

        Ok(Selection {
            indices,
            total_population,
            total_cost,
        })
    }
}

/// Solve with default options.
pub fn solve(populations: &[u64], costs: &[u64], budget: u64) -> Result<Selection> {
    Allocator::default().solve(populations, costs, budget)
}

fn to_unsigned(field: &str, values: &[i64]) -> Result<Vec<u64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u64::try_from(value).map_err(|_| {
                PlanError::InvalidInput(format!(
                    "{field} at index {index} must be non-negative, got {value}"
                ))
            })
        })
        .collect()
}

fn solve_full(
    populations: &[u64],
    costs: &[Option<usize>],
    width: usize,
    interrupt: &Interrupt,
) -> Result<Vec<usize>> {
    let n = populations.len();
    let mut table = vec![0u64; (n + 1) * width];

    for i in 1..=n {
        interrupt.check()?;
        let (done, rest) = table.split_at_mut(i * width);
        let prev = &done[(i - 1) * width..];
        let row = &mut rest[..width];
        let population = populations[i - 1];

        match costs[i - 1] {
            Some(cost) => {
                row[..cost].copy_from_slice(&prev[..cost]);
                for w in cost..width {
                    row[w] = prev[w].max(prev[w - cost] + population);
                }
            }
            None => row.copy_from_slice(prev),
        }
    }

    let mut selected = Vec::new();
    let mut w = width - 1;
    for i in (1..=n).rev() {
        if table[i * width + w] != table[(i - 1) * width + w] {
            selected.push(i - 1);
            // A changed cell implies the cost was affordable at `w`.
            w -= costs[i - 1].unwrap_or(0);
        }
    }
    selected.reverse();
    Ok(selected)
}

fn solve_compact(
    populations: &[u64],
    costs: &[Option<usize>],
    width: usize,
    interrupt: &Interrupt,
) -> Result<Vec<usize>> {
    let n = populations.len();
    let mut row = vec![0u64; width];
    // improved[i * width + w]: including candidate i strictly beat excluding it.
    let mut improved: BitVec<u64, Lsb0> = bitvec![u64, Lsb0; 0; n * width];

    for i in 0..n {
        interrupt.check()?;
        let Some(cost) = costs[i] else {
            continue;
        };
        let population = populations[i];
        // Descending so row[w - cost] still holds the previous row.
        for w in (cost..width).rev() {
            let include = row[w - cost] + population;
            if include > row[w] {
                row[w] = include;
                improved.set(i * width + w, true);
            }
        }
    }

    let mut selected = Vec::new();
    let mut w = width - 1;
    for i in (0..n).rev() {
        if improved[i * width + w] {
            selected.push(i);
            w -= costs[i].unwrap_or(0);
        }
    }
    selected.reverse();
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::interrupt::CancelToken;

    const POPULATIONS: [u64; 5] = [500_000, 700_000, 300_000, 800_000, 400_000];
    const COSTS: [u64; 5] = [100, 150, 70, 200, 90];

    fn with_strategy(strategy: TableStrategy) -> Allocator {
        Allocator::new(SolveOptions {
            strategy,
            ..SolveOptions::default()
        })
    }

    #[test]
    fn cairo_sample_picks_dokki_and_capital() {
        for strategy in [TableStrategy::Full, TableStrategy::Compact, TableStrategy::Auto] {
            let selection = with_strategy(strategy)
                .solve(&POPULATIONS, &COSTS, 300)
                .unwrap();
            assert_eq!(selection.indices, vec![0, 3], "{strategy}");
            assert_eq!(selection.total_population, 1_300_000);
            assert_eq!(selection.total_cost, 300);
        }
    }

    #[test]
    fn single_unaffordable_candidate() {
        let selection = solve(&[1_000], &[50], 49).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.total_population, 0);
    }

    #[test]
    fn everything_fits() {
        let selection = solve(&POPULATIONS, &COSTS, 10_000).unwrap();
        assert_eq!(selection.indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(selection.total_population, 2_700_000);
        assert_eq!(selection.total_cost, 610);
    }

    #[test]
    fn zero_budget_selects_nothing() {
        let selection = solve(&POPULATIONS, &COSTS, 0).unwrap();
        assert_eq!(selection, Selection::empty());
    }

    #[test]
    fn empty_candidates_are_valid() {
        assert_eq!(solve(&[], &[], 0).unwrap(), Selection::empty());
        assert_eq!(solve(&[], &[], u64::MAX).unwrap(), Selection::empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = solve(&[1, 2], &[1], 10).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(ref msg) if msg.contains("2 populations but 1 costs")));
    }

    #[test]
    fn negative_values_are_rejected() {
        let allocator = Allocator::default();
        assert!(matches!(
            allocator.solve_signed(&[1, -2], &[1, 1], 5),
            Err(PlanError::InvalidInput(ref msg)) if msg.contains("population at index 1")
        ));
        assert!(matches!(
            allocator.solve_signed(&[1], &[-1], 5),
            Err(PlanError::InvalidInput(ref msg)) if msg.contains("cost at index 0")
        ));
        assert!(matches!(
            allocator.solve_signed(&[1], &[1], -5),
            Err(PlanError::InvalidInput(ref msg)) if msg.contains("budget")
        ));
        let ok = allocator.solve_signed(&[5, 7], &[2, 3], 3).unwrap();
        assert_eq!(ok.indices, vec![1]);
    }

    #[test]
    fn population_overflow_is_rejected() {
        let err = solve(&[u64::MAX, 1], &[1, 1], 2).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn huge_budget_is_clamped_to_total_cost() {
        let selection = solve(&[3, 4], &[1_000, 7], u64::MAX).unwrap();
        assert_eq!(selection.indices, vec![0, 1]);
    }

    #[test]
    fn zero_cost_sites_are_always_taken() {
        let selection = solve(&[10, 20, 0], &[0, 5, 0], 0).unwrap();
        assert_eq!(selection.indices, vec![0]);
        assert_eq!(selection.total_population, 10);
    }

    #[test]
    fn zero_population_sites_are_never_taken() {
        let selection = solve(&[0, 5], &[1, 1], 10).unwrap();
        assert_eq!(selection.indices, vec![1]);
    }

    #[test]
    fn ties_prefer_earlier_candidates() {
        // {0} and {1} both reach 10; the later candidate is dropped.
        for strategy in [TableStrategy::Full, TableStrategy::Compact] {
            let allocator = with_strategy(strategy);
            assert_eq!(allocator.solve(&[10, 10], &[5, 5], 5).unwrap().indices, vec![0]);
            // {2} alone ties {0, 1}; the traceback keeps the earlier pair.
            assert_eq!(
                allocator.solve(&[4, 6, 10], &[2, 3, 5], 5).unwrap().indices,
                vec![0, 1]
            );
        }
    }

    #[test]
    fn strategies_agree_on_mixed_input() {
        let populations = [7, 3, 9, 3, 12, 5, 5, 8, 1, 6];
        let costs = [4, 2, 6, 2, 7, 3, 3, 5, 1, 4];
        for budget in 0..=40 {
            let full = with_strategy(TableStrategy::Full)
                .solve(&populations, &costs, budget)
                .unwrap();
            let compact = with_strategy(TableStrategy::Compact)
                .solve(&populations, &costs, budget)
                .unwrap();
            assert_eq!(full, compact, "budget {budget}");
        }
    }

    #[test]
    fn auto_falls_back_to_compact_for_large_tables() {
        let allocator = Allocator::new(SolveOptions {
            limits: SolverLimits {
                max_table_cells: 1_000_000,
                full_table_max_cells: 10,
                ..SolverLimits::default()
            },
            ..SolveOptions::default()
        });
        let selection = allocator.solve(&POPULATIONS, &COSTS, 300).unwrap();
        assert_eq!(selection.indices, vec![0, 3]);
    }

    #[test]
    fn table_limit_is_enforced_before_solving() {
        let allocator = Allocator::new(SolveOptions {
            limits: SolverLimits {
                max_table_cells: 100,
                full_table_max_cells: 100,
                ..SolverLimits::default()
            },
            ..SolveOptions::default()
        });
        let err = allocator.solve(&POPULATIONS, &COSTS, 300).unwrap_err();
        assert!(matches!(
            err,
            PlanError::TableTooLarge { cells: 1505, limit: 100 }
        ));
    }

    #[test]
    fn oversized_row_is_refused_before_allocating() {
        // 3e9 cells passes the cell limit but needs ~24 GB as a compact row.
        let err = solve(&[5], &[3_000_000_000], 3_000_000_000).unwrap_err();
        assert!(matches!(
            err,
            PlanError::TableMemory { bytes, limit }
                if bytes > 24_000_000_000 && limit == SolverLimits::default().max_table_bytes
        ));

        for strategy in [TableStrategy::Full, TableStrategy::Compact] {
            let err = with_strategy(strategy)
                .solve(&[5], &[3_000_000_000], u64::MAX)
                .unwrap_err();
            assert!(matches!(err, PlanError::TableMemory { .. }), "{strategy}");
        }
    }

    #[test]
    fn byte_limit_depends_on_layout() {
        // 5 candidates, budget 300: full needs 6 * 301 * 8, compact 301 * 8 + 24 * 8.
        assert_eq!(table_bytes(TableStrategy::Full, 5, 301), 14_448);
        assert_eq!(table_bytes(TableStrategy::Compact, 5, 301), 2_600);

        let limits = SolverLimits {
            max_table_bytes: 10_000,
            ..SolverLimits::default()
        };
        let full = Allocator::new(SolveOptions {
            strategy: TableStrategy::Full,
            limits,
            ..SolveOptions::default()
        });
        assert!(matches!(
            full.solve(&POPULATIONS, &COSTS, 300),
            Err(PlanError::TableMemory { bytes: 14_448, limit: 10_000 })
        ));

        let compact = Allocator::new(SolveOptions {
            strategy: TableStrategy::Compact,
            limits,
            ..SolveOptions::default()
        });
        assert_eq!(compact.solve(&POPULATIONS, &COSTS, 300).unwrap().indices, vec![0, 3]);
    }

    #[test]
    fn cancelled_token_stops_solve() {
        let token = CancelToken::new();
        token.cancel();
        let allocator = Allocator::new(SolveOptions {
            interrupt: Interrupt::none().with_token(token),
            ..SolveOptions::default()
        });
        assert!(matches!(
            allocator.solve(&POPULATIONS, &COSTS, 300),
            Err(PlanError::Cancelled)
        ));
    }

    #[test]
    fn expired_deadline_stops_solve() {
        for strategy in [TableStrategy::Full, TableStrategy::Compact] {
            let allocator = Allocator::new(SolveOptions {
                strategy,
                interrupt: Interrupt::none().with_timeout(Duration::ZERO),
                ..SolveOptions::default()
            });
            assert!(matches!(
                allocator.solve(&POPULATIONS, &COSTS, 300),
                Err(PlanError::DeadlineExceeded(_))
            ));
        }
    }

    #[test]
    fn solve_candidates_uses_set_order() {
        let set = CandidateSet::sample();
        let selection = Allocator::default().solve_candidates(&set, 300).unwrap();
        let names: Vec<&str> = selection
            .indices
            .iter()
            .map(|&i| set.get(i).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["Dokki", "Administrative Capital"]);
        assert!(selection.contains(3));
        assert!(!selection.contains(1));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Compact".parse::<TableStrategy>().unwrap(), TableStrategy::Compact);
        assert_eq!(" full ".parse::<TableStrategy>().unwrap(), TableStrategy::Full);
        assert!("dense".parse::<TableStrategy>().is_err());
    }
}

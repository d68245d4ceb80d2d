//! Property-based tests for the allocator: feasibility, optimality and
//! determinism of the selection.

use proptest::prelude::*;

use siteplan::PlanError;
use siteplan::core::{
    Allocator, CancelToken, DEFAULT_MAX_SWEEP_POINTS, Interrupt, SolveOptions, TableStrategy,
    budget_range, sweep,
};

/// Populations and costs of equal length, small enough to brute force.
fn arb_instance(max_len: usize) -> impl Strategy<Value = (Vec<u64>, Vec<u64>)> {
    (0..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(0u64..1_000, n),
            prop::collection::vec(0u64..30, n),
        )
    })
}

fn allocator(strategy: TableStrategy) -> Allocator {
    Allocator::new(SolveOptions {
        strategy,
        ..SolveOptions::default()
    })
}

fn brute_force_best(populations: &[u64], costs: &[u64], budget: u64) -> u64 {
    let n = populations.len();
    (0u32..1 << n)
        .filter_map(|mask| {
            let (population, cost) = (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .fold((0u64, 0u64), |(p, c), i| (p + populations[i], c + costs[i]));
            (cost <= budget).then_some(population)
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn selection_is_feasible_and_consistent(
        (populations, costs) in arb_instance(16),
        budget in 0u64..200,
    ) {
        let selection = allocator(TableStrategy::Auto).solve(&populations, &costs, budget).unwrap();

        prop_assert!(selection.total_cost <= budget);
        prop_assert!(selection.indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(selection.indices.iter().all(|&i| i < populations.len()));
        prop_assert_eq!(
            selection.total_population,
            selection.indices.iter().map(|&i| populations[i]).sum::<u64>()
        );
        prop_assert_eq!(
            selection.total_cost,
            selection.indices.iter().map(|&i| costs[i]).sum::<u64>()
        );
        prop_assert!(selection.indices.iter().all(|&i| populations[i] > 0));
    }

    #[test]
    fn selection_is_optimal((populations, costs) in arb_instance(12), budget in 0u64..150) {
        let selection = allocator(TableStrategy::Auto).solve(&populations, &costs, budget).unwrap();
        prop_assert_eq!(
            selection.total_population,
            brute_force_best(&populations, &costs, budget)
        );
    }

    #[test]
    fn strategies_pick_the_same_sites(
        (populations, costs) in arb_instance(16),
        budget in 0u64..200,
    ) {
        let full = allocator(TableStrategy::Full).solve(&populations, &costs, budget).unwrap();
        let compact = allocator(TableStrategy::Compact).solve(&populations, &costs, budget).unwrap();
        prop_assert_eq!(full, compact);
    }

    #[test]
    fn solving_twice_gives_the_same_answer(
        (populations, costs) in arb_instance(16),
        budget in 0u64..200,
    ) {
        let allocator = allocator(TableStrategy::Auto);
        let first = allocator.solve(&populations, &costs, budget).unwrap();
        let second = allocator.solve(&populations, &costs, budget).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn more_budget_never_serves_fewer(
        (populations, costs) in arb_instance(12),
        budget in 0u64..150,
        extra in 0u64..50,
    ) {
        let allocator = allocator(TableStrategy::Auto);
        let smaller = allocator.solve(&populations, &costs, budget).unwrap();
        let larger = allocator.solve(&populations, &costs, budget + extra).unwrap();
        prop_assert!(smaller.total_population <= larger.total_population);
    }

    #[test]
    fn sweep_matches_individual_solves((populations, costs) in arb_instance(10), step in 1u64..20) {
        let allocator = allocator(TableStrategy::Auto);
        let budgets = budget_range(0, 100, step, DEFAULT_MAX_SWEEP_POINTS).unwrap();
        let points = sweep(&allocator, &populations, &costs, &budgets).unwrap();

        prop_assert_eq!(points.len(), budgets.len());
        for point in &points {
            let single = allocator.solve(&populations, &costs, point.budget).unwrap();
            prop_assert_eq!(&point.selected, &single.indices);
        }
        prop_assert!(points.windows(2).all(|w| w[0].total_population <= w[1].total_population));
    }

    #[test]
    fn zero_budget_with_positive_costs_selects_nothing(
        populations in prop::collection::vec(0u64..1_000, 0..12),
    ) {
        let costs: Vec<u64> = populations.iter().map(|_| 1).collect();
        let selection = allocator(TableStrategy::Auto).solve(&populations, &costs, 0).unwrap();
        prop_assert!(selection.is_empty());
        prop_assert_eq!(selection.total_population, 0);
    }

    #[test]
    fn budget_covering_everything_selects_every_populated_site(
        (populations, costs) in arb_instance(16),
    ) {
        let total: u64 = costs.iter().sum();
        let selection = allocator(TableStrategy::Auto).solve(&populations, &costs, total).unwrap();
        let expected: Vec<usize> = (0..populations.len()).filter(|&i| populations[i] > 0).collect();
        prop_assert_eq!(selection.indices, expected);
    }

    #[test]
    fn cancelled_solve_produces_no_selection(
        (populations, costs) in arb_instance(12).prop_filter("non-empty", |(p, _)| !p.is_empty()),
        budget in 0u64..100,
    ) {
        let token = CancelToken::new();
        token.cancel();
        let allocator = Allocator::new(SolveOptions {
            interrupt: Interrupt::none().with_token(token),
            ..SolveOptions::default()
        });
        let result = allocator.solve(&populations, &costs, budget);
        prop_assert!(matches!(result, Err(PlanError::Cancelled)));
    }
}

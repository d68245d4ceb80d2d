//! Property-based tests for safety - ensuring parsers and conversions never panic.

use proptest::prelude::*;

use siteplan::PlanError;
use siteplan::core::Allocator;
use siteplan::core::quantize::{quantize, quantize_budget, rounding_error_bound};
use siteplan::storage::{Amount, PlanFile, PlanFormat};

proptest! {
    #[test]
    fn test_parse_toml_never_panics(raw in ".{0,200}") {
        let _ = PlanFile::parse(&raw, PlanFormat::Toml);
    }

    #[test]
    fn test_parse_json_never_panics(raw in ".{0,200}") {
        let _ = PlanFile::parse(&raw, PlanFormat::Json);
    }

    #[test]
    fn test_parse_yaml_never_panics(raw in ".{0,200}") {
        let _ = PlanFile::parse(&raw, PlanFormat::Yaml);
    }

    #[test]
    fn test_amount_from_str_never_panics(raw in ".{0,40}") {
        let _ = raw.parse::<Amount>();
    }

    #[test]
    fn test_signed_inputs_never_panic(
        populations in prop::collection::vec(any::<i64>(), 0..6),
        costs in prop::collection::vec(-50i64..50, 0..6),
        budget in -100i64..100,
    ) {
        match Allocator::default().solve_signed(&populations, &costs, budget) {
            Ok(selection) => {
                let budget = u64::try_from(budget).unwrap();
                prop_assert!(selection.total_cost <= budget);
            }
            Err(err) => prop_assert!(matches!(err, PlanError::InvalidInput(_))),
        }
    }

    #[test]
    fn test_quantize_error_within_half_unit(value in 0.0f64..1e6, unit in 0.01f64..100.0) {
        let units = quantize(value, unit).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let restored = units as f64 * unit;
        prop_assert!((restored - value).abs() <= unit / 2.0 + 1e-6);
    }

    #[test]
    fn test_quantized_budget_never_exceeds_value(value in 0.0f64..1e6, unit in 0.01f64..100.0) {
        let units = quantize_budget(value, unit).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let restored = units as f64 * unit;
        prop_assert!(restored <= value + unit * 1e-6);
    }

    #[test]
    fn test_error_bound_scales_with_selection(selected in 0usize..100, unit in 0.01f64..100.0) {
        #[allow(clippy::cast_precision_loss)]
        let expected = selected as f64 * unit / 2.0;
        prop_assert!((rounding_error_bound(selected, unit) - expected).abs() < 1e-9);
    }
}

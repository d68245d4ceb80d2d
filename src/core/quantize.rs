//! Conversion of real-valued costs and budgets to integer units.
//!
//! The DP table is indexed by cost, so fractional money amounts are rounded
//! to a whole number of `unit`s before solving. Each rounded value is off by
//! at most `unit / 2`; a selection of `k` sites can therefore misstate its
//! true total cost by at most `k * unit / 2`. The budget is rounded down so
//! that a quantized selection never exceeds the real budget by more than the
//! rounding of its own costs.

use crate::error::{PlanError, Result};

/// Largest float that still converts to a `u64` exactly enough to solve.
const MAX_UNITS: f64 = 9_007_199_254_740_992.0; // 2^53

fn check_unit(unit: f64) -> Result<()> {
    if !unit.is_finite() || unit <= 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "cost unit must be a positive finite number, got {unit}"
        )));
    }
    Ok(())
}

fn check_value(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlanError::InvalidInput(format!(
            "{field} must be finite, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

fn to_units(field: &str, scaled: f64) -> Result<u64> {
    if scaled > MAX_UNITS {
        return Err(PlanError::InvalidInput(format!(
            "{field} is too large for the chosen cost unit"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(scaled as u64)
}

/// Round a cost (or any amount) to the nearest whole number of `unit`s.
pub fn quantize(value: f64, unit: f64) -> Result<u64> {
    check_unit(unit)?;
    check_value("cost", value)?;
    to_units("cost", (value / unit).round())
}

/// Round a budget down to a whole number of `unit`s.
pub fn quantize_budget(value: f64, unit: f64) -> Result<u64> {
    check_unit(unit)?;
    check_value("budget", value)?;
    // Tolerate float noise such as 0.3 / 0.1 = 2.9999999999999996.
    let scaled = value / unit;
    let nearest = scaled.round();
    let units = if (scaled - nearest).abs() < 1e-9 {
        nearest
    } else {
        scaled.floor()
    };
    to_units("budget", units)
}

/// Population counts must be whole, non-negative numbers.
pub fn whole_population(value: f64) -> Result<u64> {
    check_value("population", value)?;
    if value.fract() != 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "population must be a whole number, got {value}"
        )));
    }
    to_units("population", value)
}

/// Worst-case difference between the quantized and the real total cost of
/// a selection of `selected` sites.
#[must_use]
pub fn rounding_error_bound(selected: usize, unit: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let count = selected as f64;
    count * unit / 2.0
}

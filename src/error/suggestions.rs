//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints
//! built from the error context.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::TableTooLarge => suggest_table_too_large(context),
        ErrorCode::CandidateNotFound => suggest_candidate_not_found(context),
        ErrorCode::PlanNotFound => suggest_plan_not_found(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_table_too_large(context: Option<&Value>) -> String {
    let field = |key: &str| context.and_then(|c| c.get(key)).and_then(Value::as_u64);
    let limit = field("limit");

    let (needed, unit, key) = match (field("cells"), field("bytes")) {
        (Some(cells), _) => (cells, "table cells", "solver.max_table_cells"),
        (None, Some(bytes)) => (bytes, "bytes of table memory", "solver.max_table_bytes"),
        (None, None) => return ErrorCode::TableTooLarge.suggestion().to_string(),
    };

    match limit {
        Some(limit) if limit > 0 => {
            let factor = needed.div_ceil(limit);
            format!(
                "The solve needs {needed} {unit} but the limit is {limit}. Try:\n  - `--cost-unit {factor}` to coarsen costs\n  - raising {key} in the config"
            )
        }
        _ => ErrorCode::TableTooLarge.suggestion().to_string(),
    }
}

fn suggest_candidate_not_found(context: Option<&Value>) -> String {
    context
        .and_then(|c| c.get("id"))
        .and_then(Value::as_str)
        .map_or_else(
            || ErrorCode::CandidateNotFound.suggestion().to_string(),
            |id| {
                format!(
                    "No site has id '{id}'. Run `siteplan list --plan <file>` to see all site ids"
                )
            },
        )
}

fn suggest_plan_not_found(context: Option<&Value>) -> String {
    context
        .and_then(|c| c.get("path"))
        .and_then(Value::as_str)
        .map_or_else(
            || ErrorCode::PlanNotFound.suggestion().to_string(),
            |path| format!("Run `siteplan init --path {path}` to create a sample plan there"),
        )
}

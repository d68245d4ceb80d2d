//! Storage layer for siteplan
//!
//! Plans live in plain files the user edits by hand or through `siteplan add`.

pub mod plan_file;

pub use plan_file::{Amount, Plan, PlanFile, PlanFormat, SiteEntry};

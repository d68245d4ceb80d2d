//! Allocation engine: candidates, the knapsack solver and its reports.

pub mod allocator;
pub mod candidate;
pub mod interrupt;
pub mod quantize;
pub mod report;
pub mod sweep;

pub use allocator::{
    Allocator, Selection, SolveOptions, SolverLimits, TableStrategy, solve, table_bytes,
};
pub use candidate::{Candidate, CandidateSet, SAMPLE_BUDGET};
pub use interrupt::{CancelToken, Interrupt};
pub use report::{AllocationReport, SiteOutcome, SiteStatus};
pub use sweep::{DEFAULT_MAX_SWEEP_POINTS, SweepPoint, budget_range, sweep};

//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Input errors
//! - 2xx: Solver errors
//! - 3xx: Config errors
//! - 6xx: Storage errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine output.
///
/// Each variant maps to a numeric code (e.g., `InvalidInput` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Input errors (1xx)
    // ========================================
    /// E101: Candidate data or budget is malformed
    InvalidInput,
    /// E102: A new candidate entry was refused
    CandidateRejected,
    /// E103: No candidate with the requested id
    CandidateNotFound,

    // ========================================
    // Solver errors (2xx)
    // ========================================
    /// E201: The DP table would exceed the configured cell or memory limit
    TableTooLarge,
    /// E202: Solve was cancelled by the caller
    SolveCancelled,
    /// E203: Solve ran past its deadline
    DeadlineExceeded,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Plan file does not exist
    PlanNotFound,
    /// E602: Plan file could not be parsed or written
    PlanInvalid,
    /// E603: Refusing to overwrite an existing plan
    PlanExists,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `InvalidInput` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::InvalidInput => 101,
            Self::CandidateRejected => 102,
            Self::CandidateNotFound => 103,

            Self::TableTooLarge => 201,
            Self::SolveCancelled => 202,
            Self::DeadlineExceeded => 203,

            Self::ConfigInvalid => 302,

            Self::PlanNotFound => 601,
            Self::PlanInvalid => 602,
            Self::PlanExists => 603,
            Self::SerializationError => 605,
            Self::IoError => 606,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Populations, costs and the budget must be non-negative integers, with one cost per population",
            Self::CandidateRejected => "Give the site a non-empty name, a unique id, and a positive population and cost",
            Self::CandidateNotFound => "Run `siteplan list --plan <file>` to see the ids of all sites",

            Self::TableTooLarge => "Lower the budget, coarsen costs with --cost-unit, or raise solver.max_table_cells and solver.max_table_bytes",
            Self::SolveCancelled => "The solve was cancelled before completion. Re-run it to obtain a result",
            Self::DeadlineExceeded => "Increase the timeout with --timeout, or coarsen costs with --cost-unit",

            Self::ConfigInvalid => "Run `siteplan config` to see current values. Check TOML syntax in config file",

            Self::PlanNotFound => "Run `siteplan init` to create a sample plan, or pass --plan <path>",
            Self::PlanInvalid => "Check the plan file syntax. Supported formats are .toml, .json, .yaml and .yml",
            Self::PlanExists => "Pass --force to overwrite the existing plan",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidInput
            | Self::CandidateRejected
            | Self::CandidateNotFound
            | Self::TableTooLarge
            | Self::SolveCancelled
            | Self::DeadlineExceeded
            | Self::ConfigInvalid
            | Self::PlanNotFound
            | Self::PlanInvalid
            | Self::PlanExists
            | Self::IoError => true,

            Self::SerializationError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "input",
            2 => "solver",
            3 => "config",
            6 => "storage",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::InvalidInput,
            Self::CandidateRejected,
            Self::CandidateNotFound,
            Self::TableTooLarge,
            Self::SolveCancelled,
            Self::DeadlineExceeded,
            Self::ConfigInvalid,
            Self::PlanNotFound,
            Self::PlanInvalid,
            Self::PlanExists,
            Self::SerializationError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}

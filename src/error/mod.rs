//! Error handling for siteplan.
//!
//! This module provides:
//! - [`PlanError`]: The main error enum for all siteplan operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;
mod suggestions;

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for siteplan operations.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Candidate rejected: {0}")]
    CandidateRejected(String),

    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    #[error("DP table too large: {cells} cells exceeds the limit of {limit}")]
    TableTooLarge { cells: u64, limit: u64 },

    #[error("DP table too large: {bytes} bytes exceeds the limit of {limit}")]
    TableMemory { bytes: u64, limit: u64 },

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Solve exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plan file not found: {0}")]
    PlanNotFound(String),

    #[error("Plan file error: {0}")]
    PlanFile(String),

    #[error("Plan file already exists: {0}")]
    PlanExists(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl PlanError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::CandidateRejected(_) => ErrorCode::CandidateRejected,
            Self::CandidateNotFound(_) => ErrorCode::CandidateNotFound,
            Self::TableTooLarge { .. } | Self::TableMemory { .. } => ErrorCode::TableTooLarge,
            Self::Cancelled => ErrorCode::SolveCancelled,
            Self::DeadlineExceeded(_) => ErrorCode::DeadlineExceeded,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::PlanNotFound(_) => ErrorCode::PlanNotFound,
            Self::PlanFile(_) => ErrorCode::PlanInvalid,
            Self::PlanExists(_) => ErrorCode::PlanExists,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) | Self::Toml(_) => ErrorCode::SerializationError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidInput(reason) | Self::CandidateRejected(reason) => {
                Some(serde_json::json!({ "reason": reason }))
            }
            Self::CandidateNotFound(id) => Some(serde_json::json!({ "id": id })),
            Self::TableTooLarge { cells, limit } => {
                Some(serde_json::json!({ "cells": cells, "limit": limit }))
            }
            Self::TableMemory { bytes, limit } => {
                Some(serde_json::json!({ "bytes": bytes, "limit": limit }))
            }
            Self::DeadlineExceeded(limit) => {
                let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                Some(serde_json::json!({ "deadline_ms": millis }))
            }
            Self::PlanNotFound(path) | Self::PlanExists(path) => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_plan_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "INVALID_INPUT")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "input", "solver", "storage")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`PlanError`].
    #[must_use]
    pub fn from_plan_error(err: &PlanError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&PlanError> for StructuredError {
    fn from(err: &PlanError) -> Self {
        Self::from_plan_error(err)
    }
}

/// Result type alias using [`PlanError`].
pub type Result<T> = std::result::Result<T, PlanError>;

//! Cooperative cancellation for long-running solves.
//!
//! The allocator consults an [`Interrupt`] once per candidate row, so a
//! tripped interrupt stops the solve within one row of work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{PlanError, Result};

/// Shared flag another thread can raise to abort a solve.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    // None when the timeout is too far out to represent.
    at: Option<Instant>,
    timeout: Duration,
}

/// Deadline and/or cancel token checked inside the DP loop.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    deadline: Option<Deadline>,
    token: Option<CancelToken>,
}

impl Interrupt {
    /// An interrupt that never trips.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Trip once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let at = Instant::now().checked_add(timeout);
        self.deadline = Some(Deadline { at, timeout });
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some() || self.token.is_some()
    }

    /// Fail with [`PlanError::Cancelled`] or [`PlanError::DeadlineExceeded`]
    /// if the interrupt has tripped.
    pub fn check(&self) -> Result<()> {
        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(PlanError::Cancelled);
        }
        if let Some(Deadline { at: Some(at), timeout }) = self.deadline {
            if Instant::now() >= at {
                return Err(PlanError::DeadlineExceeded(timeout));
            }
        }
        Ok(())
    }
}

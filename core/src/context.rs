//! Cancellable call context passed to every network operation.
//!
//! A `Context` is cheap to clone; clones share one cancellation token. The
//! transport checks it at the request boundary: a cancelled or expired
//! context never starts a request, and the remaining time until the deadline
//! bounds the request that does start.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

/// Cancels the `Context` it was created with, and every clone of it.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancellable() -> (Self, CancelHandle) {
        let ctx = Self::background();
        let handle = CancelHandle {
            token: ctx.token.clone(),
        };
        (ctx, handle)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails if the context may no longer start a request.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        if self.remaining().is_some_and(|left| left.is_zero()) {
            return Err(ApiError::DeadlineExceeded);
        }
        Ok(())
    }
}

//! Per-call deadlines and cancellation.
//!
//! Every media-host and metadata-store call takes a `&Deadline`. A deadline is an optional
//! instant after which the call is abandoned, plus an optional cancellation token that the
//! server trips on shutdown. Steps of one request share the same deadline, so a slow upload
//! leaves less time for the insert that follows it.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a call was abandoned before it completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeadlineError {
    #[error("deadline exceeded after {0:?}")]
    Elapsed(Duration),

    #[error("call cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Instant>,
    budget: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Deadline {
    /// A deadline that never fires and cannot be cancelled.
    pub fn none() -> Self {
        Self::default()
    }

    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Some(Instant::now() + budget),
            budget: Some(budget),
            cancel: None,
        }
    }

    /// Attach a cancellation token; the call is abandoned when the token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Time left before the deadline fires, `None` if unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.remaining(), Some(d) if d.is_zero())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    /// Drive `fut` to completion unless the deadline fires or the token is cancelled first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineError>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return Err(DeadlineError::Cancelled);
        }

        let elapsed = DeadlineError::Elapsed(self.budget.unwrap_or_default());

        match (&self.cancel, self.at) {
            (None, None) => Ok(fut.await),
            (None, Some(at)) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| elapsed),
            (Some(token), None) => tokio::select! {
                out = fut => Ok(out),
                _ = token.cancelled() => Err(DeadlineError::Cancelled),
            },
            (Some(token), Some(at)) => tokio::select! {
                out = tokio::time::timeout_at(at, fut) => out.map_err(|_| elapsed),
                _ = token.cancelled() => Err(DeadlineError::Cancelled),
            },
        }
    }
}

//! Per-call deadline and cancellation.
//!
//! A `CallContext` travels with one call through `Transport::send_with`.
//! Its deadline replaces the client-wide timeout for that call. Its
//! `CancelToken` may be tripped from any thread while the call is in
//! flight; the call then returns `TransportError::Cancelled`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::TransportError;

/// Shared flag that aborts the calls it is attached to.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Deadline and cancellation handle for a single call. The default context
/// has neither, so the client-wide timeout applies.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Time left before the deadline; `None` when no deadline is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail when the call is cancelled or its deadline has passed.
    pub fn check(&self) -> Result<(), TransportError> {
        if self.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        match self.remaining() {
            Some(left) if left.is_zero() => Err(TransportError::Timeout("call deadline elapsed".to_string())),
            _ => Ok(()),
        }
    }
}

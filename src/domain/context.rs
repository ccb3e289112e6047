// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellation contexts threaded through configuration reads.
//!
//! No accessor blocks on I/O, so a context is only consulted once, when a call
//! starts: an accessor handed a done context fails with
//! [`ConfigError::ContextCanceled`](crate::domain::ConfigError::ContextCanceled)
//! instead of reading.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a context is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoneReason {
    /// [`Context::cancel`] was called on the context or one of its parents.
    Canceled,
    /// The context's deadline, or a parent's, has passed.
    DeadlineExceeded,
}

impl std::fmt::Display for DoneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoneReason::Canceled => write!(f, "context cancelled"),
            DoneReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// A cheaply clonable cancellation handle.
///
/// Clones share state: cancelling one clone cancels all of them, and every
/// child derived from it.
///
/// # Examples
///
/// ```
/// use treecfg::domain::Context;
///
/// let parent = Context::new();
/// let child = parent.child();
/// assert!(child.done().is_none());
///
/// parent.cancel();
/// assert!(child.done().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    inner: Option<Arc<Inner>>,
}

impl Context {
    /// Returns a context that is never done.
    pub fn background() -> Self {
        Self { inner: None }
    }

    /// Creates a cancellable context with no deadline.
    pub fn new() -> Self {
        Self::with_parts(None, None)
    }

    /// Creates a cancellable context that is done once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::with_parts(Some(deadline), None)
    }

    /// Creates a cancellable context that is done after `timeout`.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_parts(Instant::now().checked_add(timeout), None)
    }

    /// Derives a cancellable child that is also done whenever `self` is.
    pub fn child(&self) -> Self {
        Self::with_parts(None, Some(self.clone()))
    }

    fn with_parts(deadline: Option<Instant>, parent: Option<Context>) -> Self {
        Self {
            inner: Some(Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent,
            })),
        }
    }

    /// Cancels this context and all contexts derived from it.
    ///
    /// Cancelling the background context has no effect.
    pub fn cancel(&self) {
        if let Some(inner) = &self.inner {
            inner.cancelled.store(true, Ordering::Release);
        }
    }

    /// Returns the earliest deadline of this context and its parents.
    pub fn deadline(&self) -> Option<Instant> {
        let inner = self.inner.as_ref()?;
        let inherited = inner.parent.as_ref().and_then(Context::deadline);
        match (inner.deadline, inherited) {
            (Some(own), Some(parent)) => Some(own.min(parent)),
            (own, parent) => own.or(parent),
        }
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn done(&self) -> Option<DoneReason> {
        let inner = self.inner.as_ref()?;
        if inner.cancelled.load(Ordering::Acquire) {
            return Some(DoneReason::Canceled);
        }
        if inner.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(DoneReason::DeadlineExceeded);
        }
        inner.parent.as_ref().and_then(Context::done)
    }

    /// Returns `true` if the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.done().is_some()
    }
}

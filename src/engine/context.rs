//! Cancellation and deadlines shared by the jobs of one call.
//!
//! A [`Context`] is cheap to clone. Child contexts are done as soon as their
//! parent is. Nothing is interrupted when a context is done: code polls
//! [`Context::err`] and stops on its own.

use crate::error::ContextError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    parent: Option<Context>,
    canceled: AtomicBool,
    deadline: Option<Instant>,
}

/// Cancellation scope for a call.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

/// Cancels the context it was created with, and all of its children.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    inner: Arc<Inner>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.inner.canceled.store(true, Ordering::Release);
    }
}

impl Context {
    /// A context that is never done.
    pub fn background() -> Self {
        Context {
            inner: Arc::new(Inner {
                parent: None,
                canceled: AtomicBool::new(false),
                deadline: None,
            }),
        }
    }

    fn child(&self, deadline: Option<Instant>) -> (Context, CancelHandle) {
        let inner = Arc::new(Inner {
            parent: Some(self.clone()),
            canceled: AtomicBool::new(false),
            deadline,
        });
        (
            Context {
                inner: inner.clone(),
            },
            CancelHandle { inner },
        )
    }

    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        self.child(None)
    }

    pub fn with_deadline(&self, deadline: Instant) -> (Context, CancelHandle) {
        self.child(Some(deadline))
    }

    pub fn with_timeout(&self, timeout: Duration) -> (Context, CancelHandle) {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if self.inner.canceled.load(Ordering::Acquire) {
            return Some(ContextError::Canceled);
        }
        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                return Some(ContextError::DeadlineExceeded);
            }
        }
        self.inner.parent.as_ref().and_then(Context::err)
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Earliest deadline of this context and its ancestors.
    pub fn deadline(&self) -> Option<Instant> {
        let parent = self.inner.parent.as_ref().and_then(Context::deadline);
        match (self.inner.deadline, parent) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

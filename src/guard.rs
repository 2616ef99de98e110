//! Last-issued-wins sequencing for overlapping fetches.
//!
//! A page that reloads while an earlier request is still in flight must not
//! let the earlier response land on top of the newer one. [`RequestGuard`]
//! numbers every call it wraps; when a call settles, its result is only
//! surfaced if no later call was issued in the meantime.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Result of a guarded call.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// This call was the most recent one when it settled.
    Current(T),
    /// A later call was issued before this one settled; do nothing.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn current(self) -> Option<T> {
        match self {
            Outcome::Current(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// Issue number of one guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Sequencer for one class of request (dashboard, queries, ...).
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    name: &'static str,
    issued: Arc<AtomicU64>,
}

impl RequestGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Take the next issue number. Every earlier ticket stops being current.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no call was issued after `ticket`.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Wrap a fallible call.
    ///
    /// The ticket is taken here, when `load` is called, not when the returned
    /// future is first polled. Once the call settles, a success or failure is
    /// passed through unchanged if this is still the latest call; otherwise
    /// the result is dropped and `Ok(Outcome::Cancelled)` is returned, even
    /// when the call failed.
    pub fn load<F, T, E>(&self, call: F) -> impl Future<Output = Result<Outcome<T>, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.issue();
        let guard = self.clone();
        async move {
            let result = call.await;
            if !guard.is_current(ticket) {
                debug!(
                    guard = guard.name,
                    ticket = ticket.0,
                    failed = result.is_err(),
                    "A newer request was issued, discarding this result"
                );
                return Ok(Outcome::Cancelled);
            }
            result.map(Outcome::Current)
        }
    }
}

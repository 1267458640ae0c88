//! Last-write-wins guard for overlapping fetches.
//!
//! Every fetch takes a [`RequestToken`] before it starts. When it finishes, its
//! result is only kept if no newer request has already landed; a slow response
//! that resolves after a newer one is dropped.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug)]
struct Accepted<T> {
    token: u64,
    value: Option<T>,
}

#[derive(Debug)]
pub struct LatestResponse<T> {
    issued: AtomicU64,
    accepted: Mutex<Accepted<T>>,
}

impl<T> Default for LatestResponse<T> {
    fn default() -> Self {
        Self {
            issued: AtomicU64::new(0),
            accepted: Mutex::new(Accepted { token: 0, value: None }),
        }
    }
}

impl<T: Clone> LatestResponse<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a request that is about to start.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[cfg(test)]
    fn is_newest(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Record the outcome of the request behind `token`.
    ///
    /// `None` means the fetch failed and the value is now absent. Returns false,
    /// leaving the current value untouched, when a newer request has already
    /// been recorded.
    pub fn complete(&self, token: RequestToken, value: Option<T>) -> bool {
        let mut accepted = self.lock();
        if token.0 <= accepted.token {
            tracing::debug!(
                token = token.0,
                accepted = accepted.token,
                "Discarding stale response"
            );
            return false;
        }

        accepted.token = token.0;
        accepted.value = value;
        true
    }

    /// The most recently accepted value, if any.
    pub fn current(&self) -> Option<T> {
        self.lock().value.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Accepted<T>> {
        // Poisoning is ignored: the value is only ever replaced wholesale.
        self.accepted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! Coalesce bursts of input into a single value.
//!
//! The debouncer holds values instead of callbacks. The owner polls it and
//! handles whatever comes out with its own, current logic.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replace any pending value and restart the quiet period from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Instant at which the pending value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(at) if now >= at => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

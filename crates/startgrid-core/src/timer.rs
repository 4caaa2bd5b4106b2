//! Cancelable one-shot debounce timers.
//!
//! A timer is a deadline plus the token captured when it was armed. Nothing
//! runs in the background: the owner passes the current instant to
//! [`Debounce::poll`] and acts on the returned token. The token lets the
//! owner check that what the timer was armed for still holds when it fires.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// A single pending deadline carrying a captured token.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    /// Create an idle timer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn start(&mut self, now: Instant, token: T) {
        self.pending = Some((now + self.delay, token));
    }

    /// Arm the timer only if nothing is pending. Returns true if armed.
    pub fn start_if_idle(&mut self, now: Instant, token: T) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.start(now, token);
        true
    }

    /// Drop any pending deadline. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn token(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, token)| token)
    }

    /// Fire the timer if its deadline is at or before `now`, handing back
    /// the captured token. A fired timer is idle again.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.pending.take().map(|(_, token)| token)
        } else {
            None
        }
    }
}

//! One-shot tasks scheduled against a [`Timer`] and cancelled by epoch.
//!
//! A [`Deferred`] is polled by the owner on every frame; it carries the
//! [`CancelToken`] of the epoch it was scheduled in. Bumping the [`Epoch`]
//! invalidates every token issued before, so a task scheduled for an old
//! session can never fire against a new one.

use crate::timer::Timer;
use std::time::Duration;

/// Generation counter owned by whoever owns the deferred tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Epoch(u64);

/// Ties a task to the epoch that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        CancelToken(self.0)
    }

    /// Cancels every outstanding token.
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn is_live(&self, token: CancelToken) -> bool {
        token.0 == self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred<Ts> {
    due_at: Ts,
    token: CancelToken,
}

impl<Ts: Copy> Deferred<Ts> {
    pub fn schedule<T>(timer: &T, delay: Duration, token: CancelToken) -> Self
    where
        T: Timer<Timestamp = Ts>,
    {
        Self {
            due_at: timer.after(delay),
            token,
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token
    }

    pub fn due_at(&self) -> Ts {
        self.due_at
    }
}

impl Deferred<u64> {
    pub fn is_due<T: Timer<Timestamp = u64>>(&self, timer: &T) -> bool {
        timer.now() >= self.due_at
    }
}

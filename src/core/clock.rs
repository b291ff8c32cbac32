//! Wall-clock abstraction used for TTLs, debouncing and freshness windows.
//!
//! Time-based policies read the current time through [`Clock`] so they can be
//! driven deterministically by [`ManualClock`] in tests.

use std::cell::Cell;

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Real time, backed by `chrono::Utc::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }

    pub fn set(&self, millis: i64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Milliseconds elapsed since `since`, never negative.
pub fn elapsed_millis(clock: &dyn Clock, since: i64) -> i64 {
    (clock.now_millis() - since).max(0)
}

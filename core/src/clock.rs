//! Time sources.
//!
//! The engine never reads the wall clock directly: it asks a [`Clock`], so
//! tests and the simulator can advance time by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDateTime, TimeDelta, Utc};

/// Timestamps are naive UTC. Deadlines are compared by subtraction, so the
/// source must never jump at daylight-saving changes.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: NaiveDateTime,
    offset_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            offset_ms: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now())
    }

    pub fn advance_ms(&self, ms: i64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.advance_ms(delta.num_milliseconds());
    }

    /// Milliseconds elapsed since the clock was created.
    pub fn elapsed_ms(&self) -> i64 {
        self.offset_ms.load(Ordering::SeqCst)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.start + TimeDelta::milliseconds(self.offset_ms.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_now();
        let other = clock.clone();
        let t0 = clock.now();

        other.advance_ms(1500);

        assert_eq!(clock.now() - t0, TimeDelta::milliseconds(1500));
        assert_eq!(clock.elapsed_ms(), 1500);
    }

    #[test]
    fn system_clock_reads_utc() {
        let before = Utc::now().naive_utc();
        let now = SystemClock.now();
        let after = Utc::now().naive_utc();

        assert!(before <= now && now <= after);
    }
}

//! Time source for the runtime.
//!
//! Core functions take `now` as an argument; the runtime reads it from a
//! [`Clock`] so tests can drive time by hand.

use std::sync::atomic::{AtomicU64, Ordering};

use gotvalis_core::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock, in whole UTC seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = chrono::Utc::now().timestamp();
        Timestamp::from_secs(u64::try_from(secs).unwrap_or(0))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(start.as_secs()),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.secs.store(now.as_secs(), Ordering::SeqCst);
    }

    /// Moves the clock forward and returns the new instant.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let previous = self.secs.fetch_add(secs, Ordering::SeqCst);
        Timestamp::from_secs(previous.saturating_add(secs))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(Timestamp::from_secs(100));
        assert_eq!(clock.advance(900), Timestamp::from_secs(1_000));
        assert_eq!(clock.now(), Timestamp::from_secs(1_000));

        clock.set(Timestamp::from_secs(5));
        assert_eq!(clock.now().as_secs(), 5);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}

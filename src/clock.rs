//! Clock providers.
//!
//! The ledger only ever compares "now" against stored deadlines. It never
//! sleeps or schedules anything, so a clock is just a source of timestamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the UNIX epoch.
pub type Timestamp = u64;

/// Source of the current time.
///
/// Implementations must be monotonically non-decreasing.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Clock errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("clock cannot move backwards: current {current}, requested {requested}")]
    Backwards {
        current: Timestamp,
        requested: Timestamp,
    },
}

/// Caller-driven clock for tests and scripted replays.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move the clock to `to`. Fails if `to` is in the past.
    pub fn set(&self, to: Timestamp) -> Result<(), ClockError> {
        let current = self.now.load(Ordering::SeqCst);
        if to < current {
            return Err(ClockError::Backwards {
                current,
                requested: to,
            });
        }
        self.now.store(to, Ordering::SeqCst);
        Ok(())
    }

    /// Advance by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let current = self.now.load(Ordering::SeqCst);
        self.now.store(current.saturating_add(secs), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now(), 1_000);

        clock.advance(60);
        assert_eq!(clock.now(), 1_060);

        clock.set(2_000).unwrap();
        assert_eq!(clock.now(), 2_000);
    }

    #[test]
    fn test_manual_clock_rejects_going_backwards() {
        let clock = ManualClock::new(500);
        let err = clock.set(499).unwrap_err();
        assert_eq!(
            err,
            ClockError::Backwards {
                current: 500,
                requested: 499
            }
        );
        assert_eq!(clock.now(), 500);

        // Same instant is fine
        clock.set(500).unwrap();
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let other = clock.clone();
        clock.advance(10);
        assert_eq!(other.now(), 10);
    }
}

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source of wall-clock time for a tracker
///
/// The tracker never schedules timers; it reads the clock on every tick.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the tracker.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let step = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Elapsed time between two instants, zero if the clock went backwards
pub fn elapsed_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    (end - start).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_shared_handle() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_secs(90));

        assert_eq!(elapsed_between(start, clock.now()), Duration::from_secs(90));
    }

    #[test]
    fn test_elapsed_never_negative() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::seconds(5);
        assert_eq!(elapsed_between(now, earlier), Duration::ZERO);
    }
}

//! Cooperative polling timer.
//!
//! There is no background thread. The owner calls `due(now)` from its own
//! loop (or UI tick) and refreshes when it returns true. Starting an active
//! timer is a no-op; stopping releases it.

use std::time::{Duration, Instant};

/// Fixed-interval timer driven by the caller's clock.
#[derive(Clone, Debug)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    /// Create an inactive timer.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True while started.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start; the first poll falls due one interval from `now`.
    /// Returns false (and changes nothing) if already active.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_active() {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }

    /// Stop. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// True when a poll is due at `now`; schedules the next one.
    ///
    /// Missed intervals are not replayed: one late tick yields one poll.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(100));

        assert!(timer.start(t0));
        assert!(!timer.start(t0 + Duration::from_millis(50)));
        // The second start did not push the deadline back.
        assert!(timer.due(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_due_schedule() {
        let t0 = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(100));
        assert!(!timer.due(t0 + Duration::from_secs(5)));

        timer.start(t0);
        assert!(!timer.due(t0 + Duration::from_millis(99)));
        assert!(timer.due(t0 + Duration::from_millis(350)));
        assert!(!timer.due(t0 + Duration::from_millis(400)));
        assert!(timer.due(t0 + Duration::from_millis(450)));
    }

    #[test]
    fn test_stop_releases() {
        let t0 = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(100));
        timer.start(t0);
        assert!(timer.stop());
        assert!(!timer.stop());
        assert!(!timer.due(t0 + Duration::from_secs(1)));
        assert!(timer.start(t0));
    }
}

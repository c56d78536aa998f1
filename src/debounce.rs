//! Cancellable quiet-period timer.
//!
//! Each keystroke reschedules the deadline; the timer fires once the input
//! has been quiet for the full period. Deliberately poll-based (the frame
//! loop asks `ready()` every update) so the race between the timer and a
//! manual trigger can be tested with explicit instants.

use std::time::{Duration, Instant};

/// A resettable one-shot timer
pub struct Debouncer {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// (Re)arm the timer: it becomes ready one quiet period after `now`.
    /// Calling this again before the deadline pushes the deadline back.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    /// Disarm the timer without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the timer is armed and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the quiet period has elapsed.
    /// The timer disarms itself on firing.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule(start);
        assert!(!debouncer.ready(start + Duration::from_millis(999)));
        assert!(debouncer.ready(start + Duration::from_millis(1000)));
        // Disarmed after firing
        assert!(!debouncer.ready(start + Duration::from_millis(2000)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn rescheduling_pushes_the_deadline_back() {
        // Simulates typing "a", "ab", "abc" within one second: the timer
        // must fire once, one quiet period after the last edit.
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(300));
        debouncer.schedule(start + Duration::from_millis(600));

        assert!(!debouncer.ready(start + Duration::from_millis(1000)));
        assert!(!debouncer.ready(start + Duration::from_millis(1599)));
        assert!(debouncer.ready(start + Duration::from_millis(1600)));
        assert!(!debouncer.ready(start + Duration::from_millis(1601)));
    }

    #[test]
    fn cancel_disarms_without_firing() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.schedule(start);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.ready(start + Duration::from_millis(5000)));
    }
}

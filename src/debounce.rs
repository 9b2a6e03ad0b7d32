//! Single-slot cancellable debounce timer
//!
//! A burst of triggers collapses into one firing after a quiet period: each
//! new trigger restarts the timer, so only the last trigger in a burst
//! actually executes. There is at most one pending slot; scheduling cancels
//! any unfired predecessor.

use instant::Instant;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending_since: None,
        }
    }

    /// Schedule (or reschedule) a firing after the quiet period
    pub fn trigger(&mut self) {
        self.pending_since = Some(Instant::now());
    }

    /// Discard any pending firing
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }

    /// Whether a firing is scheduled
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Consume the pending firing if the quiet period has elapsed
    ///
    /// Returns `true` at most once per trigger.
    pub fn take_if_ready(&mut self) -> bool {
        match self.pending_since {
            Some(since) if since.elapsed() >= self.quiet => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// The configured quiet period
    #[inline]
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut d = Debouncer::new(Duration::from_millis(0));
        assert!(!d.is_pending());
        assert!(!d.take_if_ready());
    }

    #[test]
    fn test_zero_quiet_fires_immediately_and_once() {
        let mut d = Debouncer::new(Duration::from_millis(0));
        d.trigger();
        assert!(d.is_pending());
        assert!(d.take_if_ready());
        // Consumed: does not fire again without a new trigger.
        assert!(!d.is_pending());
        assert!(!d.take_if_ready());
    }

    #[test]
    fn test_long_quiet_not_ready_immediately() {
        let mut d = Debouncer::new(Duration::from_secs(3600));
        d.trigger();
        assert!(d.is_pending());
        assert!(!d.take_if_ready());
        assert!(d.is_pending());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut d = Debouncer::new(Duration::from_millis(0));
        d.trigger();
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.take_if_ready());
    }

    #[test]
    fn test_retrigger_restarts_quiet_period() {
        let mut d = Debouncer::new(Duration::from_millis(20));
        d.trigger();
        std::thread::sleep(Duration::from_millis(12));
        // A second trigger inside the window restarts the timer, so the
        // original deadline must not fire.
        d.trigger();
        std::thread::sleep(Duration::from_millis(12));
        assert!(!d.take_if_ready());
        std::thread::sleep(Duration::from_millis(12));
        assert!(d.take_if_ready());
    }
}

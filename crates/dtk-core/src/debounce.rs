//! Debounce timer with a single pending action.
//!
//! The debouncer owns its timer as plain data: a deadline and the action to
//! hand back once the deadline passes. Scheduling again replaces both, so a
//! burst of input collapses into one action carrying the newest value.
//!
//! Time comes from `tokio::time`, which lets tests pause and advance the clock.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant};

/// Default delay for search-as-you-type input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct Pending<A> {
    deadline: Instant,
    action: A,
}

/// Collapses bursts of scheduled actions into the most recent one.
#[derive(Debug)]
pub struct Debouncer<A> {
    delay: Duration,
    pending: Option<Pending<A>>,
}

impl<A> Default for Debouncer<A> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<A> Debouncer<A> {
    /// Create a debouncer that fires `delay` after the last schedule call.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Create a debouncer with no delay, for button-triggered fetches.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured quiet interval.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer with `action`, replacing any pending one.
    ///
    /// Returns the new deadline.
    pub fn schedule(&mut self, action: A) -> Instant {
        self.schedule_at(Instant::now(), action)
    }

    /// Arm the timer relative to `now`.
    pub fn schedule_at(&mut self, now: Instant, action: A) -> Instant {
        let deadline = now + self.delay;
        if self.pending.replace(Pending { deadline, action }).is_some() {
            tracing::trace!(delay_ms = self.delay.as_millis() as u64, "debounce timer reset");
        }
        deadline
    }

    /// Drop the pending action without firing it.
    ///
    /// Returns whether an action was pending.
    pub fn cancel_all(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether an action is waiting for its deadline.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending action.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Action waiting for its deadline.
    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref().map(|pending| &pending.action)
    }

    /// Take the pending action if its deadline has been reached at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<A> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.pending.take().map(|pending| pending.action)
        } else {
            None
        }
    }

    /// Wait until the pending action is due and take it.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future before it resolves leaves the pending action in place, so it can
    /// be used as a `tokio::select!` branch.
    pub async fn fired(&mut self) -> A {
        loop {
            let Some(deadline) = self.deadline() else {
                return future::pending().await;
            };
            time::sleep_until(deadline).await;
            if let Some(action) = self.take_due(Instant::now()) {
                return action;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_debouncer_is_idle() {
        let debouncer: Debouncer<&str> = Debouncer::default();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.delay(), DEFAULT_DEBOUNCE);
        assert!(debouncer.deadline().is_none());
    }

    #[test]
    fn test_reschedule_replaces_pending_action() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule_at(start, "bat");
        let deadline = debouncer.schedule_at(start + Duration::from_millis(100), "batman");

        assert_eq!(deadline, start + Duration::from_millis(600));
        assert_eq!(debouncer.pending(), Some(&"batman"));
        // Old deadline passes without firing
        assert_eq!(debouncer.take_due(start + Duration::from_millis(500)), None);
        assert_eq!(debouncer.take_due(deadline), Some("batman"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_all_discards_action() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule_at(start, 1);

        assert!(debouncer.cancel_all());
        assert!(!debouncer.cancel_all());
        assert_eq!(debouncer.take_due(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_immediate_is_due_at_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::immediate();
        debouncer.schedule_at(start, 'x');
        assert_eq!(debouncer.take_due(start), Some('x'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule("first");
        time::advance(Duration::from_millis(100)).await;
        debouncer.schedule("second");

        let action = debouncer.fired().await;

        assert_eq!(action, "second");
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_is_cancel_safe() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule(7);

        let raced = time::timeout(Duration::from_millis(100), debouncer.fired()).await;
        assert!(raced.is_err());
        assert!(debouncer.is_pending());

        assert_eq!(debouncer.fired().await, 7);
    }
}

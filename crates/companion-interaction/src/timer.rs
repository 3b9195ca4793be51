//! Single-slot debounce timer driven by the event loop.

use std::time::{Duration, Instant};

/// A timer with at most one pending deadline.
///
/// Arming while already armed replaces the deadline, so a burst of
/// triggers yields a single firing `delay` after the last one. The timer
/// does not run on its own: the owner polls [`fire_if_due`] from the
/// event loop and sleeps until [`deadline`].
///
/// [`fire_if_due`]: CoalescingTimer::fire_if_due
/// [`deadline`]: CoalescingTimer::deadline
#[derive(Debug, Clone)]
pub struct CoalescingTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl CoalescingTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending deadline keeps its old value.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once per arming, on the first poll at or
    /// after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

//! Timer scheduling capability and a virtual-clock implementation.
//!
//! Components never sleep or register callbacks themselves.  They arm timers
//! through the [`Timers`] trait, remember the returned [`TimerId`], and get
//! told about expiry when the driver pops that id off the queue.  Cancelling
//! an id removes it from the queue, so a cancelled timer can never fire.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Opaque handle of an armed timer.  Never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Schedule-after-delay / cancel capability injected into components.
pub trait Timers {
    /// Current time of the clock driving this scheduler.
    fn now(&self) -> Duration;

    /// Arm a timer due `delay` after [`now`](Self::now).  A zero delay is due
    /// immediately but only fires on the next dispatch, never from within
    /// this call.
    fn schedule_after(&mut self, delay: Duration) -> TimerId;

    /// Disarm a timer.  Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Deadline-ordered timer queue driven by an explicit clock.
///
/// Entries are keyed by `(deadline, id)`; ids grow monotonically, so timers
/// with equal deadlines fire in the order they were armed.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerId)>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.  Earlier values are ignored; time never runs
    /// backwards.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline so that anything armed by its handler is measured from
    /// the instant it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let &(deadline, id) = self.queue.first()?;
        if deadline > until {
            return None;
        }
        self.queue.pop_first();
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some(id)
    }

    /// Deadline of the earliest armed timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|&(deadline, _)| deadline)
    }

    #[cfg(test)]
    pub fn is_armed(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of armed timers.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl Timers for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_after(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.queue.insert((deadline, id));
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => {
                self.queue.remove(&(deadline, id));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule_after(ms(50));
        let early = q.schedule_after(ms(10));

        assert_eq!(q.pop_due(ms(100)), Some(early));
        assert_eq!(q.now(), ms(10));
        assert_eq!(q.pop_due(ms(100)), Some(late));
        assert_eq!(q.pop_due(ms(100)), None);
    }

    #[test]
    fn equal_deadlines_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        let a = q.schedule_after(ms(5));
        let b = q.schedule_after(ms(5));
        assert_eq!(q.pop_due(ms(5)), Some(a));
        assert_eq!(q.pop_due(ms(5)), Some(b));
    }

    #[test]
    fn not_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule_after(ms(30));
        assert_eq!(q.pop_due(ms(29)), None);
        assert_eq!(q.next_deadline(), Some(ms(30)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule_after(ms(10));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(!q.is_armed(id));
        assert_eq!(q.pop_due(ms(1_000)), None);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_delay_is_due_on_next_dispatch() {
        let mut q = TimerQueue::new();
        q.advance_to(ms(40));
        let id = q.schedule_after(Duration::ZERO);
        assert!(q.is_armed(id));
        assert_eq!(q.pop_due(ms(40)), Some(id));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut q = TimerQueue::new();
        q.advance_to(ms(100));
        q.advance_to(ms(20));
        assert_eq!(q.now(), ms(100));

        let id = q.schedule_after(ms(5));
        assert_eq!(q.next_deadline(), Some(ms(105)));
        assert_eq!(q.pop_due(ms(200)), Some(id));
        assert_eq!(q.now(), ms(105));
    }
}

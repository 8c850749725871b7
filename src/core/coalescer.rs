//! Debounced-call coalescer.
//!
//! A burst of [`Coalescer::schedule`] calls under one key collapses into a
//! single delivery of the most recent payload, `delay` after the last call.
//! This is a pure debounce: a caller that keeps scheduling faster than the
//! delay never gets a delivery.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use super::timer::{TimerId, Timers};

#[derive(Debug)]
struct Pending<P> {
    timer: TimerId,
    payload: P,
}

/// Per-key debounce state.  At most one armed timer exists per key.
#[derive(Debug)]
pub struct Coalescer<K, P> {
    pending: HashMap<K, Pending<P>>,
    /// Reverse index so an expired [`TimerId`] can be routed back to its key.
    by_timer: HashMap<TimerId, K>,
}

impl<K, P> Default for Coalescer<K, P> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            by_timer: HashMap::new(),
        }
    }
}

impl<K, P> Coalescer<K, P>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is pending under `key` and arm a fresh delivery of
    /// `payload` after `delay`.
    pub fn schedule(&mut self, timers: &mut impl Timers, key: K, payload: P, delay: Duration) {
        if let Some(old) = self.pending.remove(&key) {
            timers.cancel(old.timer);
            self.by_timer.remove(&old.timer);
        }
        let timer = timers.schedule_after(delay);
        tracing::debug!(?key, ?delay, "coalescer: armed");
        self.by_timer.insert(timer, key.clone());
        self.pending.insert(key, Pending { timer, payload });
    }

    /// Drop any pending delivery under `key` without firing it.
    pub fn cancel(&mut self, timers: &mut impl Timers, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(old) => {
                timers.cancel(old.timer);
                self.by_timer.remove(&old.timer);
                true
            }
            None => false,
        }
    }

    /// Route an expired timer.  Returns the key and latest payload when the
    /// timer belongs to this coalescer, `None` otherwise.
    pub fn fire(&mut self, timer: TimerId) -> Option<(K, P)> {
        let key = self.by_timer.remove(&timer)?;
        let pending = self.pending.remove(&key)?;
        debug_assert_eq!(pending.timer, timer);
        tracing::debug!(?key, "coalescer: fired");
        Some((key, pending.payload))
    }

    #[cfg(test)]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timer::TimerQueue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Drain every timer due by `until`, collecting deliveries with the time
    /// they fired at.
    fn drain(
        q: &mut TimerQueue,
        c: &mut Coalescer<&'static str, u32>,
        until: Duration,
    ) -> Vec<(Duration, &'static str, u32)> {
        let mut out = Vec::new();
        while let Some(id) = q.pop_due(until) {
            if let Some((k, p)) = c.fire(id) {
                out.push((q.now(), k, p));
            }
        }
        q.advance_to(until);
        out
    }

    #[test]
    fn burst_collapses_to_last_payload() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();

        c.schedule(&mut q, "search", 1, ms(300));
        q.advance_to(ms(100));
        c.schedule(&mut q, "search", 2, ms(300));
        q.advance_to(ms(250));
        c.schedule(&mut q, "search", 3, ms(300));

        assert!(drain(&mut q, &mut c, ms(549)).is_empty());
        let fired = drain(&mut q, &mut c, ms(10_000));
        assert_eq!(fired, vec![(ms(550), "search", 3)]);
        assert!(!c.is_pending(&"search"));
        assert!(q.is_empty());
    }

    #[test]
    fn continuous_calls_never_fire() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();
        for step in 0..50u32 {
            q.advance_to(ms(u64::from(step) * 100));
            c.schedule(&mut q, "k", step, ms(300));
            let now = q.now();
            assert!(drain(&mut q, &mut c, now).is_empty());
        }
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();
        c.schedule(&mut q, "a", 1, ms(100));
        c.schedule(&mut q, "b", 2, ms(50));
        c.schedule(&mut q, "a", 3, ms(100));

        let fired = drain(&mut q, &mut c, ms(1_000));
        assert_eq!(fired, vec![(ms(50), "b", 2), (ms(100), "a", 3)]);
    }

    #[test]
    fn one_delivery_per_quiet_period() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();
        c.schedule(&mut q, "k", 1, ms(10));
        assert_eq!(drain(&mut q, &mut c, ms(20)).len(), 1);
        c.schedule(&mut q, "k", 2, ms(10));
        assert_eq!(drain(&mut q, &mut c, ms(40)), vec![(ms(30), "k", 2)]);
    }

    #[test]
    fn zero_delay_fires_on_next_dispatch() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();
        c.schedule(&mut q, "k", 7, Duration::ZERO);
        assert!(c.is_pending(&"k"));
        assert_eq!(drain(&mut q, &mut c, ms(0)), vec![(ms(0), "k", 7)]);
    }

    #[test]
    fn cancel_drops_pending_delivery() {
        let mut q = TimerQueue::new();
        let mut c = Coalescer::new();
        c.schedule(&mut q, "k", 1, ms(10));
        assert!(c.cancel(&mut q, &"k"));
        assert!(!c.cancel(&mut q, &"k"));
        assert!(drain(&mut q, &mut c, ms(100)).is_empty());
    }
}

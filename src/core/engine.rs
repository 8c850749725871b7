//! The choreographer: one instance of every component plus the timer queue
//! they share.
//!
//! The glue layer calls the update functions whenever its own input arrives,
//! calls [`Choreographer::advance_to`] with the current time, and calls
//! [`Choreographer::frame`] once per presented frame.  Everything the glue
//! needs to draw comes back through the query functions.

use std::collections::HashMap;
use std::time::Duration;

use super::coalescer::Coalescer;
use super::fade::{FadeMachine, FadeMarker, FadeTimings, Filter};
use super::follower::{Follower, Point, DEFAULT_ALPHA};
use super::gate::ThresholdGate;
use super::latch::VisibilityLatch;
use super::search::{ItemMeta, SearchState};
use super::timer::TimerQueue;

/// Externally supplied entity identifier.
pub type ItemId = usize;

/// Identifies a tracked pointer.
pub type PointerId = usize;

/// The mouse, in a single-pointer setup.
pub const PRIMARY_POINTER: PointerId = 0;

/// Call sites whose bursts are collapsed by the coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallSite {
    Search,
}

/// Deliveries produced while advancing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A debounced search term was applied.
    Search(String),
}

/// Tunable constants of the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreoConfig {
    /// Per-frame smoothing coefficient of the pointer follower, in (0, 1).
    pub smoothing_alpha: f64,
    pub fade_out: Duration,
    pub fade_in: Duration,
    /// Scroll offset above which the gate is active.
    pub scroll_threshold: f64,
    pub search_debounce: Duration,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_ALPHA,
            fade_out: Duration::from_millis(300),
            fade_in: Duration::from_millis(500),
            scroll_threshold: 100.0,
            search_debounce: Duration::from_millis(300),
        }
    }
}

pub struct Choreographer {
    config: ChoreoConfig,
    timers: TimerQueue,
    coalescer: Coalescer<CallSite, String>,
    follower: Follower<PointerId>,
    gate: ThresholdGate,
    fade: FadeMachine<ItemId>,
    latch: VisibilityLatch<ItemId>,
    filter: Filter,
    items: HashMap<ItemId, ItemMeta>,
    search: SearchState<ItemId>,
}

impl Choreographer {
    /// Build the core and start the follower's frame loop.
    pub fn new(config: ChoreoConfig) -> Self {
        let mut follower = Follower::new(config.smoothing_alpha);
        follower.start();
        Self {
            timers: TimerQueue::new(),
            coalescer: Coalescer::new(),
            follower,
            gate: ThresholdGate::new(config.scroll_threshold),
            fade: FadeMachine::new(FadeTimings {
                fade_out: config.fade_out,
                fade_in: config.fade_in,
            }),
            latch: VisibilityLatch::new(),
            filter: Filter::All,
            items: HashMap::new(),
            search: SearchState::default(),
            config,
        }
    }

    // ── registration ───────────────────────────────────────────

    /// Register a filterable, searchable and reveal-observed item.  An id
    /// that is already registered is dropped first, pending fade included.
    pub fn register_item(&mut self, id: ItemId, meta: ItemMeta) {
        if self.items.contains_key(&id) {
            self.deregister_item(id);
        }
        self.fade
            .register(&mut self.timers, id, meta.category.clone(), &self.filter);
        self.latch.register(id);
        self.search.admit(id, &meta);
        self.items.insert(id, meta);
    }

    /// Register an entity that only takes part in reveal-on-scroll.
    pub fn register_observed(&mut self, id: ItemId) {
        self.latch.register(id);
    }

    pub fn deregister_item(&mut self, id: ItemId) {
        self.fade.deregister(&mut self.timers, &id);
        self.latch.deregister(&id);
        self.search.forget(&id);
        self.items.remove(&id);
    }

    // ── updates ────────────────────────────────────────────────

    /// Switch the category filter and re-evaluate every item.
    pub fn set_filter(&mut self, filter: Filter) {
        tracing::debug!(filter = filter.label(), "engine: filter changed");
        let decisions: Vec<(ItemId, bool)> = self
            .items
            .iter()
            .map(|(&id, meta)| (id, filter.includes(&meta.category)))
            .collect();
        for (id, include) in decisions {
            self.evaluate(id, include);
        }
        self.filter = filter;
    }

    pub fn evaluate(&mut self, id: ItemId, include: bool) {
        self.fade.evaluate(&mut self.timers, &id, include);
    }

    pub fn observe_scroll(&mut self, offset: f64) -> bool {
        self.gate.observe(offset)
    }

    pub fn set_pointer(&mut self, id: PointerId, at: Point) {
        self.follower.set_target(id, at);
    }

    /// Returns `true` when this report revealed `id`.
    pub fn report_visible(&mut self, id: ItemId) -> bool {
        self.latch.report(id)
    }

    /// Report every intersection of one pass.  Returns the ids this batch
    /// revealed, each once even if it appears several times.
    pub fn report_visible_batch(&mut self, ids: impl IntoIterator<Item = ItemId>) -> Vec<ItemId> {
        ids.into_iter().filter(|&id| self.report_visible(id)).collect()
    }

    /// Debounce a search term; it is applied once typing pauses.
    pub fn schedule_search(&mut self, term: impl Into<String>) {
        let delay = self.config.search_debounce;
        self.coalescer
            .schedule(&mut self.timers, CallSite::Search, term.into(), delay);
    }

    /// Fire every timer due by `now`, oldest deadline first.
    pub fn advance_to(&mut self, now: Duration) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Some(timer) = self.timers.pop_due(now) {
            if let Some((site, payload)) = self.coalescer.fire(timer) {
                match site {
                    CallSite::Search => {
                        self.search.apply(&payload, &self.items);
                        out.push(Notification::Search(payload));
                    }
                }
            } else if !self.fade.fire(timer) {
                tracing::trace!(?timer, "engine: unclaimed timer");
            }
        }
        self.timers.advance_to(now);
        out
    }

    /// One presented animation frame.
    pub fn frame(&mut self) {
        self.follower.on_frame();
    }

    /// Halt the follower's frame loop and drop any undelivered search.
    pub fn shutdown(&mut self) {
        self.follower.shutdown();
        self.coalescer.cancel(&mut self.timers, &CallSite::Search);
    }

    pub fn wants_frames(&self) -> bool {
        self.follower.wants_frames()
    }

    // ── queries ────────────────────────────────────────────────

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn is_hidden(&self, id: ItemId) -> bool {
        self.fade.is_hidden(&id)
    }

    pub fn fade_marker(&self, id: ItemId) -> FadeMarker {
        self.fade.fade_marker(&id)
    }

    #[cfg(test)]
    pub fn fade_state(&self, id: ItemId) -> Option<super::fade::FadeState> {
        self.fade.state(&id)
    }

    pub fn follower_position(&self, id: PointerId) -> Option<Point> {
        self.follower.position(&id)
    }

    #[cfg(test)]
    pub fn follower_target(&self, id: PointerId) -> Option<Point> {
        self.follower.target(&id)
    }

    pub fn gate_active(&self) -> bool {
        self.gate.is_active()
    }

    pub fn is_revealed(&self, id: ItemId) -> bool {
        self.latch.is_triggered(&id)
    }

    pub fn matches_search(&self, id: ItemId) -> bool {
        self.search.matches(&id)
    }

    pub fn search_term(&self) -> &str {
        self.search.term()
    }

    #[cfg(test)]
    pub fn search_pending(&self) -> bool {
        self.coalescer.is_pending(&CallSite::Search)
    }

    /// Distinct item categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.fade.categories().into_iter().map(str::to_owned).collect()
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemMeta> {
        self.items.get(&id)
    }
}

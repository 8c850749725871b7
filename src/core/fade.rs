//! Per-item fade state machine driving filter transitions.
//!
//! ```text
//! Visible  ──exclude──▶ FadingOut ──T_out──▶ Hidden
//!    ▲                     │  ▲                 │
//!  T_in                include exclude       include
//!    │                     ▼  │                 │
//! FadingIn ◀───────────────┴──┴─────────────────┘
//! ```
//!
//! Every transition cancels the item's outstanding timeout before arming its
//! own, so an item never has more than one timeout in flight and a superseded
//! timeout can never land.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use super::timer::{TimerId, Timers};

/// Fade lifecycle of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Visible,
    FadingOut,
    Hidden,
    FadingIn,
}

/// Transient animation marker the glue layer should show for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeMarker {
    #[default]
    None,
    FadingIn,
    FadingOut,
}

/// Category filter.  `All` includes every item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    pub fn includes(&self, category: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(c) => c == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Category(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FadeItem {
    state: FadeState,
    category: String,
    pending: Option<TimerId>,
}

impl FadeItem {
    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Fade durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimings {
    pub fade_out: Duration,
    pub fade_in: Duration,
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self {
            fade_out: Duration::from_millis(300),
            fade_in: Duration::from_millis(500),
        }
    }
}

/// State machines for every registered item.
#[derive(Debug)]
pub struct FadeMachine<K> {
    timings: FadeTimings,
    items: HashMap<K, FadeItem>,
    by_timer: HashMap<TimerId, K>,
}

impl<K> FadeMachine<K>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
{
    pub fn new(timings: FadeTimings) -> Self {
        Self {
            timings,
            items: HashMap::new(),
            by_timer: HashMap::new(),
        }
    }

    /// Register an item.  It starts `Visible` when `filter` includes it and
    /// directly `Hidden` otherwise.  Re-registering replaces the old entry.
    pub fn register(
        &mut self,
        timers: &mut impl Timers,
        id: K,
        category: impl Into<String>,
        filter: &Filter,
    ) {
        self.deregister(timers, &id);
        let category = category.into();
        let state = if filter.includes(&category) {
            FadeState::Visible
        } else {
            FadeState::Hidden
        };
        self.items.insert(
            id,
            FadeItem {
                state,
                category,
                pending: None,
            },
        );
    }

    /// Forget an item, disarming its outstanding timeout.
    pub fn deregister(&mut self, timers: &mut impl Timers, id: &K) -> bool {
        let Some(item) = self.items.remove(id) else {
            return false;
        };
        if let Some(timer) = item.pending {
            timers.cancel(timer);
            self.by_timer.remove(&timer);
        }
        true
    }

    /// Feed the latest inclusion result for `id`.  Unknown ids are ignored.
    pub fn evaluate(&mut self, timers: &mut impl Timers, id: &K, include: bool) {
        let Some(item) = self.items.get(id) else {
            return;
        };
        let (next, delay) = match (item.state, include) {
            (FadeState::Hidden | FadeState::FadingOut, true) => {
                (FadeState::FadingIn, self.timings.fade_in)
            }
            (FadeState::Visible | FadeState::FadingIn, false) => {
                (FadeState::FadingOut, self.timings.fade_out)
            }
            // Same inclusion result as the state already heads toward.
            _ => return,
        };
        self.transition(timers, id, next, delay);
    }

    fn transition(&mut self, timers: &mut impl Timers, id: &K, next: FadeState, delay: Duration) {
        let Some(item) = self.items.get_mut(id) else {
            return;
        };
        if let Some(old) = item.pending.take() {
            timers.cancel(old);
            self.by_timer.remove(&old);
        }
        tracing::debug!(?id, from = ?item.state, to = ?next, ?delay, "fade: transition");
        item.state = next;
        let timer = timers.schedule_after(delay);
        item.pending = Some(timer);
        self.by_timer.insert(timer, id.clone());
    }

    /// Route an expired timer.  Returns `true` when it belonged to an item.
    pub fn fire(&mut self, timer: TimerId) -> bool {
        let Some(id) = self.by_timer.remove(&timer) else {
            return false;
        };
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        if item.pending != Some(timer) {
            return false;
        }
        item.pending = None;
        let settled = match item.state {
            FadeState::FadingOut => FadeState::Hidden,
            FadeState::FadingIn => FadeState::Visible,
            other => other,
        };
        tracing::debug!(?id, from = ?item.state, to = ?settled, "fade: settled");
        item.state = settled;
        true
    }

    pub fn state(&self, id: &K) -> Option<FadeState> {
        self.items.get(id).map(FadeItem::state)
    }

    /// Hidden items are not laid out and take no input.  Unknown ids are not
    /// hidden.
    pub fn is_hidden(&self, id: &K) -> bool {
        self.state(id) == Some(FadeState::Hidden)
    }

    pub fn fade_marker(&self, id: &K) -> FadeMarker {
        match self.state(id) {
            Some(FadeState::FadingIn) => FadeMarker::FadingIn,
            Some(FadeState::FadingOut) => FadeMarker::FadingOut,
            _ => FadeMarker::None,
        }
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.items.values().map(FadeItem::category).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

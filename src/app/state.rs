//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use super::page::{self, PageLayout, ABOUT_ID, CONTACT_ID};
use crate::config::AppConfig;
use crate::core::engine::{Choreographer, ItemId};
use crate::core::fade::Filter;
use crate::ui::smooth_scroll::SmoothScroll;

/// Fraction of the remaining scroll distance covered per frame.
const SCROLL_SPEED: f64 = 0.25;

/// What keyboard input currently goes to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Page,
    /// Typing into the search box.
    Search,
}

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// The animation core.  Owns every piece of timed state.
    pub engine: Choreographer,
    /// Project ids in display order.
    pub projects: Vec<ItemId>,
    /// `All` followed by each category.
    pub filters: Vec<Filter>,
    pub active_filter: usize,
    pub scroll: SmoothScroll,
    pub input_mode: InputMode,
    /// Text typed into the search box; the engine sees it debounced.
    pub search_input: String,
    pub menu_open: bool,
    /// Highlighted entry while the menu is open.
    pub menu_selected: usize,
    /// Last known mouse cell.
    pub pointer: Option<(u16, u16)>,
    /// Pointer rests on something clickable.
    pub hovering: bool,
    pub terminal_area: Rect,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Origin of the engine's clock.
    pub started: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, terminal_area: Rect) -> Self {
        let mut engine = Choreographer::new(config.choreo);
        let mut projects = Vec::new();
        for (id, meta) in page::catalogue().into_iter().enumerate() {
            engine.register_item(id, meta);
            projects.push(id);
        }
        engine.register_observed(ABOUT_ID);
        engine.register_observed(CONTACT_ID);

        let filters = std::iter::once(Filter::All)
            .chain(engine.categories().into_iter().map(Filter::Category))
            .collect();

        Self {
            config,
            engine,
            projects,
            filters,
            active_filter: 0,
            scroll: SmoothScroll::new(SCROLL_SPEED),
            input_mode: InputMode::default(),
            search_input: String::new(),
            menu_open: false,
            menu_selected: 0,
            pointer: None,
            hovering: false,
            terminal_area,
            should_quit: false,
            status_message: None,
            started: Instant::now(),
        }
    }

    /// Time on the engine's clock.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout::build(&self.engine, &self.projects)
    }

    pub fn filter(&self) -> &Filter {
        &self.filters[self.active_filter]
    }
}

//! Input handling: maps key/mouse events, frames and timer deliveries to
//! state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::page::{filter_buttons, Block, Section};
use super::state::{AppState, InputMode};
use crate::config::Action;
use crate::core::engine::{Notification, PRIMARY_POINTER};
use crate::core::follower::Point;
use crate::ui::layout::{point_in_rect, AppLayout};

/// Rows moved per wheel notch / arrow press.
const SCROLL_STEP: f64 = 3.0;

// ── keyboard ────────────────────────────────────────────────────

/// Process a key event, dispatching on the current input mode.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Timers armed below count from the moment of the input.
    advance(state);
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits, regardless of mode.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.input_mode == InputMode::Search {
        handle_search_key(state, key);
        return;
    }
    if state.menu_open && handle_menu_key(state, key) {
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let page_rows = page_height(state) as f64;
    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollUp => scroll_by(state, -SCROLL_STEP),
        Action::ScrollDown => scroll_by(state, SCROLL_STEP),
        Action::PageUp => scroll_by(state, -page_rows),
        Action::PageDown => scroll_by(state, page_rows),
        Action::NextFilter => {
            let next = (state.active_filter + 1) % state.filters.len();
            select_filter(state, next);
        }
        Action::PrevFilter => {
            let len = state.filters.len();
            select_filter(state, (state.active_filter + len - 1) % len);
        }
        Action::Search => {
            state.input_mode = InputMode::Search;
            state.menu_open = false;
        }
        Action::ToggleMenu => toggle_menu(state),
    }
}

fn handle_search_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => state.input_mode = InputMode::Page,
        KeyCode::Esc => {
            state.input_mode = InputMode::Page;
            if !state.search_input.is_empty() {
                state.search_input.clear();
                state.engine.schedule_search("");
            }
        }
        KeyCode::Backspace => {
            if state.search_input.pop().is_some() {
                state.engine.schedule_search(state.search_input.clone());
            }
        }
        KeyCode::Char(c) => {
            state.search_input.push(c);
            state.engine.schedule_search(state.search_input.clone());
        }
        _ => {}
    }
}

/// Keys consumed by the open menu.  Returns `false` to fall through.
fn handle_menu_key(state: &mut AppState, key: KeyEvent) -> bool {
    let count = Section::ALL.len();
    match key.code {
        KeyCode::Esc => state.menu_open = false,
        KeyCode::Up | KeyCode::Char('k') => {
            state.menu_selected = (state.menu_selected + count - 1) % count;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.menu_selected = (state.menu_selected + 1) % count;
        }
        KeyCode::Enter => jump_to(state, Section::ALL[state.menu_selected]),
        _ => return false,
    }
    true
}

// ── mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    advance(state);
    let layout = AppLayout::from_area(state.terminal_area);
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            state.pointer = Some((x, y));
            state
                .engine
                .set_pointer(PRIMARY_POINTER, Point::new(f64::from(x), f64::from(y)));
            state.hovering = is_interactive(state, &layout, x, y);
        }
        MouseEventKind::ScrollUp => scroll_by(state, -SCROLL_STEP),
        MouseEventKind::ScrollDown => scroll_by(state, SCROLL_STEP),
        MouseEventKind::Down(MouseButton::Left) => handle_click(state, &layout, x, y),
        _ => {}
    }
}

fn handle_click(state: &mut AppState, layout: &AppLayout, x: u16, y: u16) {
    if point_in_rect(layout.menu_toggle_area(), x, y) {
        toggle_menu(state);
        return;
    }
    if let Some(section) = layout.nav_link_at(x, y) {
        jump_to(state, section);
        return;
    }

    if state.menu_open {
        match menu_entry_at(layout, x, y) {
            Some(index) => jump_to(state, Section::ALL[index]),
            // Clicking anywhere outside the menu closes it.
            None if !point_in_rect(layout.menu_area(), x, y) => state.menu_open = false,
            None => {}
        }
        return;
    }

    if let Some(index) = filter_button_at(state, layout, x, y) {
        select_filter(state, index);
    }
}

fn menu_entry_at(layout: &AppLayout, x: u16, y: u16) -> Option<usize> {
    let menu = layout.menu_area();
    // Entries sit inside the border, one per row.
    if x <= menu.x || x + 1 >= menu.x + menu.width || y <= menu.y {
        return None;
    }
    let index = (y - menu.y - 1) as usize;
    (index < Section::ALL.len()).then_some(index)
}

fn filter_button_at(state: &AppState, layout: &AppLayout, x: u16, y: u16) -> Option<usize> {
    let row = page_row_at(state, layout, y)?;
    let placed = state.layout().block_at(row).copied()?;
    if placed.block != Block::FilterBar || row != placed.top {
        return None;
    }
    let col = x.checked_sub(layout.page_area.x)?;
    filter_buttons(&state.filters)
        .iter()
        .position(|(range, _)| range.contains(&col))
}

fn is_interactive(state: &AppState, layout: &AppLayout, x: u16, y: u16) -> bool {
    if point_in_rect(layout.menu_toggle_area(), x, y) || layout.nav_link_at(x, y).is_some() {
        return true;
    }
    if state.menu_open {
        return menu_entry_at(layout, x, y).is_some();
    }
    if filter_button_at(state, layout, x, y).is_some() {
        return true;
    }
    page_row_at(state, layout, y)
        .and_then(|row| state.layout().block_at(row).copied())
        .is_some_and(|p| matches!(p.block, Block::Project(_)))
}

/// Page row under terminal row `y`, if `y` is inside the page area.
fn page_row_at(state: &AppState, layout: &AppLayout, y: u16) -> Option<usize> {
    let area = layout.page_area;
    if y < area.y || y >= area.y + area.height {
        return None;
    }
    Some(state.scroll.offset() + (y - area.y) as usize)
}

// ── actions ─────────────────────────────────────────────────────

fn page_height(state: &AppState) -> usize {
    AppLayout::from_area(state.terminal_area).page_area.height as usize
}

fn scroll_by(state: &mut AppState, delta: f64) {
    let max = state.layout().max_scroll(page_height(state));
    state.scroll.scroll_by(delta, max);
}

pub fn select_filter(state: &mut AppState, index: usize) {
    if index == state.active_filter || index >= state.filters.len() {
        return;
    }
    state.active_filter = index;
    let filter = state.filter().clone();
    state.status_message = Some(format!("Filter: {}", filter.label()));
    state.engine.set_filter(filter);
}

fn toggle_menu(state: &mut AppState) {
    state.menu_open = !state.menu_open;
    state.menu_selected = 0;
}

/// Close the menu and glide to `section`.
fn jump_to(state: &mut AppState, section: Section) {
    state.menu_open = false;
    let layout = state.layout();
    let max = layout.max_scroll(page_height(state));
    state.scroll.scroll_to(layout.jump_target(section) as f64, max);
}

// ── time ────────────────────────────────────────────────────────

/// One presented frame: advance the page scroll, feed the scroll gate, step
/// the pointer follower and report which observed blocks are on screen.
pub fn on_frame(state: &mut AppState) {
    let height = page_height(state);
    let layout = state.layout();
    state.scroll.clamp(layout.max_scroll(height));
    state.scroll.tick();

    let px = state.scroll.position() * state.config.px_per_row;
    state.engine.observe_scroll(px);
    state.engine.frame();

    let on_screen: Vec<_> = layout
        .visible(state.scroll.offset(), height)
        .filter_map(|p| p.block.reveal_id())
        .collect();
    let revealed = state.engine.report_visible_batch(on_screen);
    if !revealed.is_empty() {
        tracing::debug!(?revealed, "page: revealed");
    }
}

/// Fire due timers and react to coalesced deliveries.
pub fn advance(state: &mut AppState) {
    let now = state.elapsed();
    for note in state.engine.advance_to(now) {
        match note {
            Notification::Search(term) => {
                state.status_message = Some(if term.is_empty() {
                    "Search cleared".to_string()
                } else {
                    format!("Search: {term}")
                });
            }
        }
    }
}

//! Page rendering: navbar, the scrolling page and the cursor overlay.
//!
//! Every widget here is created fresh each frame from `&AppState` and only
//! translates the core's answers (fade marker, hidden, revealed, gate,
//! follower position) into cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::layout::{nav_links, BRAND, MENU_TOGGLE_WIDTH};
use super::theme::Theme;
use crate::app::page::{
    filter_buttons, Block, PageLayout, ABOUT_LINES, CONTACT_LINES, HERO_LINES,
};
use crate::app::state::AppState;
use crate::core::engine::ItemId;
use crate::core::fade::FadeMarker;
use crate::core::follower::Point;

/// Widest a project card is drawn.
const MAX_CARD_WIDTH: usize = 64;

// ───────────────────────────────────────── navbar ────────────

pub struct NavBar {
    /// Scroll gate state: the page has moved past the threshold.
    pub scrolled: bool,
    pub menu_open: bool,
}

impl Widget for NavBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.scrolled {
            Theme::navbar_scrolled_style()
        } else {
            Theme::navbar_style()
        };
        buf.set_style(area, style);

        let toggle = if self.menu_open { " ✕  " } else { " ☰  " };
        let mut spans = vec![
            Span::styled(toggle, style),
            Span::styled(BRAND, Theme::title_style()),
        ];
        let mut x = MENU_TOGGLE_WIDTH + BRAND.chars().count() as u16;
        for (range, section) in nav_links() {
            spans.push(Span::styled(" ".repeat((range.start - x) as usize), style));
            spans.push(Span::styled(format!(" {} ", section.label()), style));
            x = range.end;
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

// ───────────────────────────────────────── page ──────────────

pub struct PageView<'a> {
    pub state: &'a AppState,
    pub layout: &'a PageLayout,
}

impl<'a> Widget for PageView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let offset = self.state.scroll.offset();
        let height = area.height as usize;
        for placed in self.layout.visible(offset, height) {
            for row in placed.rows() {
                if row < offset || row >= offset + height {
                    continue;
                }
                let y = area.y + (row - offset) as u16;
                let line = self.block_line(placed.block, row - placed.top, area.width as usize);
                buf.set_line(area.x, y, &line, area.width);
            }
        }
    }
}

impl<'a> PageView<'a> {
    /// Row `r` of `block`, counted from the block's top.
    fn block_line(&self, block: Block, r: usize, width: usize) -> Line<'static> {
        let engine = &self.state.engine;
        if let Some(id) = block.reveal_id() {
            if !engine.is_revealed(id) {
                return unrevealed_line(r, block.height());
            }
        }

        match block {
            Block::Hero => {
                let style = if r == 1 {
                    Theme::heading_style()
                } else {
                    Theme::body_style()
                };
                Line::styled(HERO_LINES[r], style)
            }
            Block::Heading(section) if r == 0 => Line::styled(
                format!("  ── {} ──", section.label()),
                Theme::heading_style(),
            ),
            Block::Heading(_) => Line::raw(""),
            Block::FilterBar if r == 0 => self.filter_bar_line(),
            Block::FilterBar => {
                let term = engine.search_term();
                if term.is_empty() {
                    Line::raw("")
                } else {
                    Line::styled(format!("  matching \"{term}\""), Theme::muted_style())
                }
            }
            Block::Project(id) => self.card_line(id, r, width),
            Block::About => Line::styled(ABOUT_LINES[r], Theme::body_style()),
            Block::Contact => Line::styled(CONTACT_LINES[r], Theme::body_style()),
        }
    }

    fn filter_bar_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut x = 0u16;
        for (i, (range, label)) in filter_buttons(&self.state.filters).into_iter().enumerate() {
            spans.push(Span::raw(" ".repeat((range.start - x) as usize)));
            spans.push(Span::styled(
                label,
                Theme::filter_button_style(i == self.state.active_filter),
            ));
            x = range.end;
        }
        Line::from(spans)
    }

    fn card_line(&self, id: ItemId, r: usize, width: usize) -> Line<'static> {
        let engine = &self.state.engine;
        let Some(meta) = engine.item(id) else {
            return Line::raw("");
        };
        let marker = engine.fade_marker(id);
        let style = Theme::card_style(marker);
        let tag_style = if matches!(marker, FadeMarker::None) {
            Theme::tag_style()
        } else {
            style
        };
        let inner = width.saturating_sub(4).min(MAX_CARD_WIDTH);

        match r {
            0 => {
                let title = format!("┌─ {} ", meta.title);
                let fill = inner.saturating_sub(title.chars().count());
                Line::styled(format!("  {title}{}", "─".repeat(fill)), style)
            }
            1 => Line::styled(format!("  │ {}", meta.description), style),
            2 => {
                let mut spans = vec![Span::styled("  │ ", style)];
                for tag in &meta.tags {
                    spans.push(Span::styled(format!("#{tag} "), tag_style));
                }
                Line::from(spans)
            }
            3 => Line::styled(format!("  └{}", "─".repeat(inner.saturating_sub(1))), style),
            _ => Line::raw(""),
        }
    }
}

/// Placeholder drawn until a block has been seen once.
fn unrevealed_line(r: usize, height: usize) -> Line<'static> {
    if r == 0 || r + 1 >= height {
        Line::raw("")
    } else {
        Line::styled("  · · ·", Theme::muted_style())
    }
}

// ───────────────────────────────────────── cursor ────────────

/// Pointer marker plus its smoothed follower.
pub struct CursorOverlay {
    pub pointer: Option<(u16, u16)>,
    pub follower: Option<Point>,
    /// Hovering something interactive.
    pub grow: bool,
}

impl Widget for CursorOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((px, py)) = self.pointer else {
            return;
        };
        if let Some(p) = self.follower {
            let (fx, fy) = (p.x.round(), p.y.round());
            if fx >= 0.0 && fy >= 0.0 {
                put(buf, area, fx as u16, fy as u16, "○", Theme::follower_style());
            }
        }
        let symbol = if self.grow { "◉" } else { "•" };
        put(buf, area, px, py, symbol, Theme::cursor_style(self.grow));
    }
}

fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, symbol: &str, style: ratatui::style::Style) {
    if !super::layout::point_in_rect(area, x, y) {
        return;
    }
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn render_page(state: &AppState, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        let layout = state.layout();
        PageView {
            state,
            layout: &layout,
        }
        .render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn unrevealed_cards_render_placeholders() {
        let area = Rect::new(0, 0, 70, 22);
        let mut state = AppState::new(AppConfig::default(), area);
        let before = render_page(&state, area);
        // First card title row sits right after hero, heading and filter bar.
        assert!(row_text(&before, 12).contains("· · ·"));

        state.engine.report_visible(0);
        let after = render_page(&state, area);
        assert!(row_text(&after, 11).contains("Weather Board"));
    }

    #[test]
    fn filter_bar_marks_active_button() {
        let area = Rect::new(0, 0, 70, 22);
        let state = AppState::new(AppConfig::default(), area);
        let buf = render_page(&state, area);
        let text = row_text(&buf, 9);
        assert!(text.starts_with("   all  design  mobile  web "));
        assert_eq!(buf[(2, 9)].style().bg, Theme::filter_button_style(true).bg);
        assert_eq!(buf[(8, 9)].style().bg, Theme::filter_button_style(false).bg);
    }

    #[test]
    fn navbar_links_sit_where_clicks_land() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        NavBar {
            scrolled: false,
            menu_open: false,
        }
        .render(area, &mut buf);
        for (range, section) in nav_links() {
            let text: String = range
                .map(|x| buf[(x, 0)].symbol().to_string())
                .collect();
            assert_eq!(text, format!(" {} ", section.label()));
        }
    }

    #[test]
    fn cursor_overlay_draws_pointer_over_follower() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        CursorOverlay {
            pointer: Some((3, 2)),
            follower: Some(Point::new(3.2, 1.6)),
            grow: false,
        }
        .render(area, &mut buf);
        assert_eq!(buf[(3, 2)].symbol(), "•");

        let mut buf = Buffer::empty(area);
        CursorOverlay {
            pointer: Some((3, 2)),
            follower: Some(Point::new(7.0, 4.0)),
            grow: true,
        }
        .render(area, &mut buf);
        assert_eq!(buf[(3, 2)].symbol(), "◉");
        assert_eq!(buf[(7, 4)].symbol(), "○");
    }
}

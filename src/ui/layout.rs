//! Layout helpers: split the terminal area into regions.

use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::page::Section;

/// Width of the `☰` toggle at the left of the navbar.
pub const MENU_TOGGLE_WIDTH: u16 = 4;

/// Brand text drawn right after the toggle.
pub const BRAND: &str = "choreo";

/// Blank columns between the brand and the first section link.
const BRAND_GAP: u16 = 3;

/// Navbar on top, the scrolling page, and a bottom status bar.
pub struct AppLayout {
    pub navbar_area: Rect,
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // navbar
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status / search bar
            ])
            .split(area);

        Self {
            navbar_area: chunks[0],
            page_area: chunks[1],
            status_area: chunks[2],
        }
    }

    /// Drop-down menu anchored under the navbar toggle.
    pub fn menu_area(&self) -> Rect {
        let height = (Section::ALL.len() as u16 + 2).min(self.page_area.height);
        let width = 16.min(self.page_area.width);
        Rect::new(self.page_area.x, self.page_area.y, width, height)
    }

    /// Section link under `(x, y)`, if any.
    pub fn nav_link_at(&self, x: u16, y: u16) -> Option<Section> {
        if !point_in_rect(self.navbar_area, x, y) {
            return None;
        }
        let col = x - self.navbar_area.x;
        nav_links()
            .into_iter()
            .find(|(range, _)| range.contains(&col))
            .map(|(_, section)| section)
    }

    pub fn menu_toggle_area(&self) -> Rect {
        Rect::new(
            self.navbar_area.x,
            self.navbar_area.y,
            MENU_TOGGLE_WIDTH.min(self.navbar_area.width),
            self.navbar_area.height,
        )
    }
}

/// Column ranges of the navbar section links, relative to the navbar's left
/// edge, each label padded by one space on both sides.
pub fn nav_links() -> Vec<(Range<u16>, Section)> {
    let mut x = MENU_TOGGLE_WIDTH + BRAND.chars().count() as u16 + BRAND_GAP;
    Section::ALL
        .iter()
        .map(|&section| {
            let width = section.label().chars().count() as u16 + 2;
            let range = x..x + width;
            x += width + 1;
            (range, section)
        })
        .collect()
}

pub fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::fade::FadeMarker;

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── navbar ─────────────────────────────────────────────────
    /// Navbar over the top of the page.
    pub fn navbar_style() -> Style {
        Style::default().fg(Color::White)
    }

    /// Navbar once the page has scrolled past the threshold.
    pub fn navbar_scrolled_style() -> Style {
        Style::default()
            .bg(Color::Rgb(26, 32, 44))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── page ───────────────────────────────────────────────────
    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn body_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn tag_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn filter_button_style(active: bool) -> Style {
        if active {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        }
    }

    /// Card style for the current fade marker.
    pub fn card_style(marker: FadeMarker) -> Style {
        match marker {
            FadeMarker::None => Style::default().fg(Color::White),
            FadeMarker::FadingOut => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            FadeMarker::FadingIn => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
        }
    }

    // ── cursor ─────────────────────────────────────────────────
    pub fn cursor_style(grow: bool) -> Style {
        let style = Style::default().fg(Color::LightRed);
        if grow {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn follower_style() -> Style {
        Style::default().fg(Color::LightBlue)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn command_input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }
}

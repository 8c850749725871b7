//! Navigation menu drop-down.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::theme::Theme;
use crate::app::page::Section;

/// Section list shown under the navbar toggle while the menu is open.
/// Render it into `AppLayout::menu_area`, which the click handler uses too.
pub struct MenuPopup {
    pub selected: usize,
}

impl Widget for MenuPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, section)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!("▸ {}", section.label()),
                        Theme::selected_style(),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {}", section.label()),
                        Theme::body_style(),
                    ))
                }
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_sit_one_per_row_inside_border() {
        let area = Rect::new(0, 1, 16, 6);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        MenuPopup { selected: 2 }.render(area, &mut buf);

        assert_eq!(buf[(0, 1)].symbol(), "╭");
        assert_eq!(buf[(3, 2)].symbol(), "H");
        assert_eq!(buf[(1, 4)].symbol(), "▸");
        assert_eq!(buf[(3, 4)].symbol(), "A");
        assert_eq!(buf[(3, 4)].style().bg, Theme::selected_style().bg);
    }
}

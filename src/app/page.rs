//! Page model: the showcase content and its row layout.
//!
//! The page is a single vertical column of blocks.  Project cards take part
//! in filtering and search, so their presence in the layout follows the
//! choreographer's `is_hidden` / `matches_search` answers.  Layout is rebuilt
//! from scratch whenever it is needed; it is a handful of blocks.

use std::ops::Range;

use crate::core::engine::{Choreographer, ItemId};
use crate::core::fade::Filter;
use crate::core::search::ItemMeta;

/// Reveal-latch ids of the non-project sections.
pub const ABOUT_ID: ItemId = 1_000;
pub const CONTACT_ID: ItemId = 1_001;

/// Rows kept above a section when jumping to it from the menu.
pub const JUMP_MARGIN_ROWS: usize = 1;

pub const HERO_HEIGHT: usize = 7;
pub const HEADING_HEIGHT: usize = 2;
pub const FILTER_BAR_HEIGHT: usize = 2;
pub const CARD_HEIGHT: usize = 5;
pub const ABOUT_HEIGHT: usize = 7;
pub const CONTACT_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Projects,
    About,
    Contact,
}

impl Section {
    pub const ALL: &[Section] = &[
        Section::Home,
        Section::Projects,
        Section::About,
        Section::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Projects => "Projects",
            Section::About => "About",
            Section::Contact => "Contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Hero,
    Heading(Section),
    FilterBar,
    Project(ItemId),
    About,
    Contact,
}

impl Block {
    pub fn height(self) -> usize {
        match self {
            Block::Hero => HERO_HEIGHT,
            Block::Heading(_) => HEADING_HEIGHT,
            Block::FilterBar => FILTER_BAR_HEIGHT,
            Block::Project(_) => CARD_HEIGHT,
            Block::About => ABOUT_HEIGHT,
            Block::Contact => CONTACT_HEIGHT,
        }
    }

    /// Id of the reveal latch observing this block, if any.
    pub fn reveal_id(self) -> Option<ItemId> {
        match self {
            Block::Project(id) => Some(id),
            Block::About => Some(ABOUT_ID),
            Block::Contact => Some(CONTACT_ID),
            _ => None,
        }
    }
}

/// A block at its position in page rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub block: Block,
    pub top: usize,
}

impl Placed {
    pub fn rows(&self) -> Range<usize> {
        self.top..self.top + self.block.height()
    }
}

#[derive(Debug, Default)]
pub struct PageLayout {
    pub blocks: Vec<Placed>,
    pub total_height: usize,
}

impl PageLayout {
    /// Lay out the page.  Hidden or search-excluded cards take no rows.
    pub fn build(engine: &Choreographer, projects: &[ItemId]) -> Self {
        let mut layout = Self::default();
        layout.push(Block::Hero);
        layout.push(Block::Heading(Section::Projects));
        layout.push(Block::FilterBar);
        for &id in projects {
            if !engine.is_hidden(id) && engine.matches_search(id) {
                layout.push(Block::Project(id));
            }
        }
        layout.push(Block::Heading(Section::About));
        layout.push(Block::About);
        layout.push(Block::Heading(Section::Contact));
        layout.push(Block::Contact);
        layout
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(Placed {
            block,
            top: self.total_height,
        });
        self.total_height += block.height();
    }

    pub fn block_at(&self, row: usize) -> Option<&Placed> {
        self.blocks.iter().find(|p| p.rows().contains(&row))
    }

    /// Blocks overlapping the viewport `[top, top + height)`.
    pub fn visible(&self, top: usize, height: usize) -> impl Iterator<Item = &Placed> {
        let bottom = top + height;
        self.blocks
            .iter()
            .filter(move |p| p.top < bottom && p.rows().end > top)
    }

    /// Scroll offset that brings `section` just under the top edge.
    pub fn jump_target(&self, section: Section) -> usize {
        let top = match section {
            Section::Home => 0,
            Section::Projects => self.find(Block::Heading(Section::Projects)),
            Section::About => self.find(Block::Heading(Section::About)),
            Section::Contact => self.find(Block::Heading(Section::Contact)),
        };
        top.saturating_sub(JUMP_MARGIN_ROWS)
    }

    fn find(&self, block: Block) -> usize {
        self.blocks
            .iter()
            .find(|p| p.block == block)
            .map_or(0, |p| p.top)
    }

    /// Largest scroll offset that still fills a viewport of `height` rows.
    pub fn max_scroll(&self, height: usize) -> usize {
        self.total_height.saturating_sub(height)
    }
}

// ───────────────────────────────────────── filter bar ────────

/// Column ranges of the filter buttons, in filter order, relative to the
/// left edge of the page area.
pub fn filter_buttons(filters: &[Filter]) -> Vec<(Range<u16>, String)> {
    let mut x: u16 = 2;
    filters
        .iter()
        .map(|f| {
            let label = format!(" {} ", f.label());
            let width = label.chars().count() as u16;
            let range = x..x + width;
            x += width + 1;
            (range, label)
        })
        .collect()
}

// ───────────────────────────────────────── content ───────────

pub const HERO_LINES: &[&str] = &[
    "",
    "  Hi, I build small things that move.",
    "",
    "  Tools, interfaces and experiments - filter them by kind,",
    "  search them by name, and watch them fade in and out.",
    "",
    "",
];

pub const ABOUT_LINES: &[&str] = &[
    "  I care about interfaces that feel calm: transitions that finish",
    "  before the next one starts, motion that eases instead of jumping,",
    "  and pages that reveal themselves as you read them.",
    "",
    "  Most of my work lives somewhere between systems code and design.",
    "",
    "",
];

pub const CONTACT_LINES: &[&str] = &[
    "  Want to build something together?",
    "",
    "  mail   hello@example.com",
    "  code   github.com/example",
    "",
    "",
];

/// The project catalogue shown on the page, in display order.
pub fn catalogue() -> Vec<ItemMeta> {
    let project = |title: &str, description: &str, category: &str, tags: &[&str]| ItemMeta {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    };
    vec![
        project(
            "Weather Board",
            "Live forecast dashboard with animated charts",
            "web",
            &["TypeScript", "Charts"],
        ),
        project(
            "Pocket Ledger",
            "Offline-first budgeting app for phones",
            "mobile",
            &["Kotlin", "SQLite"],
        ),
        project(
            "Glyph Studio",
            "Variable-font playground and specimen generator",
            "design",
            &["Typography", "Canvas"],
        ),
        project(
            "Trail Finder",
            "Hiking route planner with elevation profiles",
            "mobile",
            &["Swift", "Maps"],
        ),
        project(
            "Markdown Deck",
            "Turn markdown notes into keyboard-driven slides",
            "web",
            &["Rust", "WASM"],
        ),
        project(
            "Palette Lab",
            "Accessible colour palette explorer",
            "design",
            &["Color", "A11y"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::ChoreoConfig;
    use std::time::Duration;

    fn engine_with_catalogue() -> (Choreographer, Vec<ItemId>) {
        let mut engine = Choreographer::new(ChoreoConfig::default());
        let ids: Vec<ItemId> = catalogue()
            .into_iter()
            .enumerate()
            .map(|(id, meta)| {
                engine.register_item(id, meta);
                id
            })
            .collect();
        (engine, ids)
    }

    #[test]
    fn hidden_cards_take_no_rows() {
        let (mut engine, ids) = engine_with_catalogue();
        let full = PageLayout::build(&engine, &ids).total_height;

        engine.set_filter(Filter::Category("web".into()));
        // Fading out still occupies its slot.
        assert_eq!(PageLayout::build(&engine, &ids).total_height, full);

        engine.advance_to(Duration::from_millis(300));
        let filtered = PageLayout::build(&engine, &ids);
        assert_eq!(filtered.total_height, full - 4 * CARD_HEIGHT);
        let shown: Vec<Block> = filtered
            .blocks
            .iter()
            .map(|p| p.block)
            .filter(|b| matches!(b, Block::Project(_)))
            .collect();
        assert_eq!(shown, vec![Block::Project(0), Block::Project(4)]);
    }

    #[test]
    fn search_excluded_cards_take_no_rows() {
        let (mut engine, ids) = engine_with_catalogue();
        engine.schedule_search("rust");
        engine.advance_to(Duration::from_secs(1));
        let layout = PageLayout::build(&engine, &ids);
        let cards = layout
            .blocks
            .iter()
            .filter(|p| matches!(p.block, Block::Project(_)))
            .count();
        assert_eq!(cards, 1);
    }

    #[test]
    fn blocks_tile_the_page() {
        let (engine, ids) = engine_with_catalogue();
        let layout = PageLayout::build(&engine, &ids);
        let mut expected_top = 0;
        for p in &layout.blocks {
            assert_eq!(p.top, expected_top);
            expected_top = p.rows().end;
        }
        assert_eq!(layout.total_height, expected_top);
        assert_eq!(layout.block_at(0).map(|p| p.block), Some(Block::Hero));
        assert_eq!(layout.block_at(layout.total_height), None);
    }

    #[test]
    fn visible_blocks_overlap_viewport() {
        let (engine, ids) = engine_with_catalogue();
        let layout = PageLayout::build(&engine, &ids);
        let seen: Vec<Block> = layout.visible(HERO_HEIGHT, 3).map(|p| p.block).collect();
        assert_eq!(
            seen,
            vec![Block::Heading(Section::Projects), Block::FilterBar]
        );
    }

    #[test]
    fn jump_targets_leave_margin() {
        let (engine, ids) = engine_with_catalogue();
        let layout = PageLayout::build(&engine, &ids);
        assert_eq!(layout.jump_target(Section::Home), 0);
        assert_eq!(
            layout.jump_target(Section::Projects),
            HERO_HEIGHT - JUMP_MARGIN_ROWS
        );
        let about = layout.jump_target(Section::About);
        assert_eq!(
            about,
            HERO_HEIGHT + HEADING_HEIGHT + FILTER_BAR_HEIGHT + 6 * CARD_HEIGHT - JUMP_MARGIN_ROWS
        );
    }

    #[test]
    fn filter_buttons_do_not_overlap() {
        let filters = vec![
            Filter::All,
            Filter::Category("design".into()),
            Filter::Category("web".into()),
        ];
        let buttons = filter_buttons(&filters);
        assert_eq!(buttons[0].1, " all ");
        for pair in buttons.windows(2) {
            assert!(pair[0].0.end < pair[1].0.start);
        }
    }
}

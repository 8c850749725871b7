//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the app state and the core's answers and turns them into
//! cells on the terminal.  Nothing here mutates timed state.

pub mod layout;
pub mod menu;
pub mod page_view;
pub mod smooth_scroll;
pub mod theme;

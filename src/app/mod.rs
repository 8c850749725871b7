//! Application glue: state, page model, event loop inputs and input handling.
//!
//! This layer owns the terminal-facing concerns and translates them into the
//! core's update calls; the core never sees a key code or a cell.

pub mod event;
pub mod handler;
pub mod page;
pub mod state;

//! Core animation choreography: debouncing, pointer smoothing, scroll
//! gating, fade transitions and reveal latches.
//!
//! Nothing in this module depends on any TUI, terminal or async crate.  Time
//! comes in as plain values and timers go through [`timer::Timers`], so every
//! component runs the same against the wall clock or a simulated one.

pub mod coalescer;
pub mod engine;
pub mod fade;
pub mod follower;
pub mod gate;
pub mod latch;
pub mod search;
pub mod timer;

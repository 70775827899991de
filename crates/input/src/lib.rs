//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]. Timing is
//! left to the terminal: held keys arrive as repeat events and are treated
//! like fresh presses.

pub mod map;

pub use blockfall_types as types;

pub use map::{map_key, should_quit};

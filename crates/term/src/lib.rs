//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is diffed and flushed
//! through crossterm.
//!
//! Goals:
//! - Keep `core` free of presentation concerns
//! - Keep the drawing code pure and testable ([`GameView`] does no I/O)
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)

pub mod effects;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use effects::ClearFlash;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

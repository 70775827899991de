//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the board rules and the game state machine. It has no
//! dependencies on terminals, timers or threads: gravity arrives as a
//! [`Command::Tick`](types::Command::Tick) like any other command, so the
//! same seed and command sequence always produce the same game.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision detection and row compaction
//! - [`pieces`]: shape catalog and pure clockwise rotation (no wall kicks)
//! - [`rng`]: seeded uniform shape generator
//! - [`scoring`]: line-clear points, levels and gravity periods
//! - [`game_state`]: the state machine driven by [`GameState::apply`]
//! - [`snapshot`]: read-only copy of the state for presentation
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::Command;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::Rotate);
//! game.apply(Command::HardDrop);
//!
//! assert!(game.board().occupied_count() > 0);
//! assert!(game.current().is_some());
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::{Board, ClearedRows};
pub use game_state::{GameState, LineClearEvent, Position};
pub use pieces::{Matrix, Piece};
pub use rng::ShapeGenerator;
pub use scoring::{gravity_interval_ms, level_for_lines, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot};

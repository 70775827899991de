//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! from the engine, the input layer and the terminal renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: (`BOARD_WIDTH / 2 - 1`, 0) = (4, 0)
//!
//! # Gravity by Level
//!
//! The gravity period shrinks by 50ms per level and bottoms out at 100ms:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 950ms |
//! | 5 | 800ms |
//! | 10 | 550ms |
//! | 19+ | 100ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X};
//!
//! let shape = ShapeKind::from_str("t").unwrap();
//! assert_eq!(shape, ShapeKind::T);
//!
//! let command = Command::from_str("hardDrop").unwrap();
//! assert_eq!(command, Command::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! assert_eq!(SPAWN_X, 4);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the top-left corner of a freshly spawned piece matrix.
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 1;

/// Row of the top-left corner of a freshly spawned piece matrix.
pub const SPAWN_Y: i8 = 0;

/// Gravity period at level 1 (1000ms = 1 second per row)
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity speed-up per level above 1
pub const GRAVITY_STEP_MS: u32 = 50;

/// Fastest gravity period
pub const GRAVITY_FLOOR_MS: u32 = 100;

/// Cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Frame interval for rendering and input polling (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Lifetime of a line-clear flash in the presentation layer
pub const LINE_CLEAR_FLASH_MS: u32 = 500;

/// Line clear scoring table, indexed by number of rows cleared.
///
/// Points are multiplied by the current level:
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// The seven piece shapes
///
/// Each shape has a distinct color in the renderer:
/// - **I**: Cyan, 1x4 bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple
/// - **S**: Green
/// - **Z**: Red
/// - **J**: Blue
/// - **L**: Orange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Every shape, in catalog order.
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    /// Uppercase letter, as shown in the side panel
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::O => "O",
            ShapeKind::T => "T",
            ShapeKind::S => "S",
            ShapeKind::Z => "Z",
            ShapeKind::J => "J",
            ShapeKind::L => "L",
        }
    }

    /// Non-zero grid code used in snapshots (0 means empty).
    pub fn code(&self) -> u8 {
        match self {
            ShapeKind::I => 1,
            ShapeKind::O => 2,
            ShapeKind::T => 3,
            ShapeKind::S => 4,
            ShapeKind::Z => 5,
            ShapeKind::J => 6,
            ShapeKind::L => 7,
        }
    }

    /// Inverse of [`ShapeKind::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }
}

/// Logical commands accepted by the engine
///
/// These are produced by the input layer (key presses) and by the gravity
/// timer (`Tick`). Device bindings live outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// One gravity step right now
    SoftDrop,
    /// Drop to the ghost position and lock
    HardDrop,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// Flip the paused flag
    TogglePause,
    /// Gravity step driven by the engine timer
    Tick,
    /// Start over with an empty board
    Reset,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::HardDrop,
        Command::Rotate,
        Command::TogglePause,
        Command::Tick,
        Command::Reset,
    ];

    /// Parse a command from its name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("TOGGLEPAUSE"), Some(Command::TogglePause));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotate" => Some(Command::Rotate),
            "togglepause" => Some(Command::TogglePause),
            "tick" => Some(Command::Tick),
            "reset" => Some(Command::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Rotate => "rotate",
            Command::TogglePause => "togglePause",
            Command::Tick => "tick",
            Command::Reset => "reset",
        }
    }

    /// Commands that need an active, running piece.
    pub fn moves_piece(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft
                | Command::MoveRight
                | Command::SoftDrop
                | Command::HardDrop
                | Command::Rotate
        )
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(ShapeKind)`: Cell filled by a locked block of that shape
pub type Cell = Option<ShapeKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_column_is_left_of_center() {
        assert_eq!(SPAWN_X, 4);
        assert_eq!(SPAWN_Y, 0);
    }

    #[test]
    fn gravity_defaults() {
        assert_eq!(BASE_GRAVITY_MS, 1000);
        assert_eq!(GRAVITY_STEP_MS, 50);
        assert_eq!(GRAVITY_FLOOR_MS, 100);
        assert_eq!(LINES_PER_LEVEL, 10);
    }

    #[test]
    fn shape_codes_are_stable() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, i + 1);
            assert_eq!(ShapeKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ShapeKind::from_code(0), None);
        assert_eq!(ShapeKind::from_code(8), None);
    }

    #[test]
    fn command_names_parse_back() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_str(cmd.as_str()), Some(cmd));
        }
        assert_eq!(Command::from_str("hold"), None);
    }
}

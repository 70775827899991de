use crate::pieces::Piece;
use crate::types::{ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, BASE_GRAVITY_MS};

/// Falling piece as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute board cells covered by the piece at row `y`.
    pub fn cells_at(&self, y: i8) -> impl Iterator<Item = (i8, i8)> + '_ {
        let x = self.x;
        self.piece.matrix.cells().map(move |(r, c)| (x + c, y + r))
    }

    /// Absolute board cells covered by the piece where it is now.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.cells_at(self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<Piece>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub paused: bool,
    pub game_over: bool,
    pub gravity_ms: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.current = None;
        self.ghost_y = None;
        self.next = None;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.paused = false;
        self.game_over = false;
        self.gravity_ms = BASE_GRAVITY_MS;
    }

    /// Locked cell at (x, y), if any.
    pub fn cell(&self, x: usize, y: usize) -> Option<ShapeKind> {
        self.board
            .get(y)
            .and_then(|row| row.get(x))
            .and_then(|&code| ShapeKind::from_code(code))
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            ghost_y: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            paused: false,
            game_over: false,
            gravity_ms: BASE_GRAVITY_MS,
        };
        s.clear();
        s
    }
}

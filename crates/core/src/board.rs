//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is either empty or tagged with
//! the shape that locked into it. Storage is a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Piece matrices may hang above row 0 (negative y).

use arrayvec::ArrayVec;

use crate::pieces::Matrix;
use crate::types::{Cell, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by one compaction, bottom to top.
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Collision test for a matrix whose top-left corner sits at (x, y).
    ///
    /// A sub-cell collides when it is left of column 0, right of the last
    /// column, below the last row, or on an occupied board cell. Sub-cells
    /// above row 0 are never checked against board contents.
    pub fn collides(&self, matrix: &Matrix, x: i8, y: i8) -> bool {
        matrix.cells().any(|(r, c)| {
            let bx = x + c;
            let by = y + r;
            if bx < 0 || bx >= BOARD_WIDTH as i8 || by >= BOARD_HEIGHT as i8 {
                return true;
            }
            by >= 0 && self.is_occupied(bx, by)
        })
    }

    /// Write a matrix into the board, tagging cells with `kind`.
    ///
    /// Only sub-cells at board row >= 0 are written; anything still above the
    /// top edge is dropped. Returns how many sub-cells were dropped.
    pub fn merge(&mut self, matrix: &Matrix, x: i8, y: i8, kind: ShapeKind) -> usize {
        let mut dropped = 0;
        for (r, c) in matrix.cells() {
            let bx = x + c;
            let by = y + r;
            if by < 0 {
                dropped += 1;
                continue;
            }
            let written = self.set(bx, by, Some(kind));
            debug_assert!(written, "merge outside board at ({}, {})", bx, by);
        }
        dropped
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row and compact the rest downward.
    ///
    /// Fullness is decided for all rows before anything moves, then surviving
    /// rows are copied down in order with a two-pointer pass and the freed
    /// rows at the top are emptied. Returns the removed row indices (as they
    /// were before compaction), bottom to top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let height = BOARD_HEIGHT as usize;
        let width = BOARD_WIDTH as usize;

        let mut full = [false; BOARD_HEIGHT as usize];
        let mut cleared = ClearedRows::new();
        for y in (0..height).rev() {
            if self.is_row_full(y) {
                full[y] = true;
                cleared.push(y as u8);
            }
        }
        if cleared.is_empty() {
            return cleared;
        }

        let mut write_y = height;
        for read_y in (0..height).rev() {
            if full[read_y] {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Write the board as shape codes (0 = empty).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * BOARD_WIDTH as usize + x]
                    .map(|k| k.code())
                    .unwrap_or(0);
            }
        }
    }

    /// Build a board from text rows, top row first.
    ///
    /// `.` is empty; a shape letter (case-insensitive) fills the cell. Short
    /// input is aligned to the bottom of the board, which keeps test fixtures
    /// readable.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let offset = BOARD_HEIGHT as usize - rows.len().min(BOARD_HEIGHT as usize);
        for (i, line) in rows.iter().take(BOARD_HEIGHT as usize).enumerate() {
            for (x, ch) in line.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = ShapeKind::from_str(&ch.to_string());
                board.set(x as i8, (offset + i) as i8, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

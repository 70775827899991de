//! Pieces module - shape catalog and naive rotation
//!
//! Every shape is a small rectangular boolean matrix. A live piece carries its
//! own copy of the matrix; rotating produces a new matrix value and never
//! touches the catalog. There are no wall kicks and no stored rotation index,
//! so a piece that was rotated can only get back to its spawn orientation by
//! rotating all the way around.

use crate::types::ShapeKind;

/// Largest row or column span of any shape matrix.
pub const MAX_SPAN: usize = 4;

/// Base matrix rows for a shape, as spawned.
fn base_rows(kind: ShapeKind) -> &'static [&'static [u8]] {
    match kind {
        ShapeKind::I => &[&[1, 1, 1, 1]],
        ShapeKind::O => &[&[1, 1], &[1, 1]],
        ShapeKind::T => &[&[0, 1, 0], &[1, 1, 1]],
        ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
        ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
        ShapeKind::J => &[&[1, 0, 0], &[1, 1, 1]],
        ShapeKind::L => &[&[0, 0, 1], &[1, 1, 1]],
    }
}

/// Occupancy matrix of a piece (rows x cols, at most 4x4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SPAN]; MAX_SPAN],
}

impl Matrix {
    /// Build a matrix from 0/1 rows. All rows must have the same length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        debug_assert!(!rows.is_empty() && rows.len() <= MAX_SPAN);
        let cols = rows[0].len();
        debug_assert!(cols <= MAX_SPAN);

        let mut bits = [[false; MAX_SPAN]; MAX_SPAN];
        for (r, row) in rows.iter().enumerate() {
            debug_assert_eq!(row.len(), cols, "ragged matrix row {}", r);
            for (c, &v) in row.iter().enumerate() {
                bits[r][c] = v != 0;
            }
        }

        Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            bits,
        }
    }

    /// Spawn-orientation matrix of a shape
    pub fn base(kind: ShapeKind) -> Self {
        Self::from_rows(base_rows(kind))
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether sub-cell (row, col) is occupied. Out of range reads as empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows as usize && col < self.cols as usize && self.bits[row][col]
    }

    /// Occupied sub-cells as (row, col) offsets, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows as usize).flat_map(move |r| {
            (0..self.cols as usize)
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (r as i8, c as i8))
        })
    }

    pub fn block_count(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90° clockwise: transpose, then reverse each resulting row.
    ///
    /// `new[i][j] = old[rows - 1 - j][i]`, so a `rows x cols` matrix becomes
    /// `cols x rows`.
    pub fn rotate_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut bits = [[false; MAX_SPAN]; MAX_SPAN];
        for (i, out_row) in bits.iter_mut().enumerate().take(cols) {
            for (j, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.bits[rows - 1 - j][i];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }
}

/// A live piece: shape identity plus its current (possibly rotated) matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub matrix: Matrix,
}

impl Piece {
    /// Create a piece in its spawn orientation
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            matrix: Matrix::base(kind),
        }
    }

    /// The same piece turned 90° clockwise
    pub fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            matrix: self.matrix.rotate_cw(),
        }
    }
}

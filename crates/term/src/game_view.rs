//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Piece};
use crate::effects::ClearFlash;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const CONTROLS: [&str; 7] = [
    "←→  move",
    "↑   rotate",
    "↓   soft drop",
    "SPC hard drop",
    "P   pause",
    "R   restart",
    "Q   quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the board and side panel.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Where the board frame landed in the framebuffer.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        flash: &ClearFlash,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let w = board_px_w + 2;
        let h = board_px_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG),
        );
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        // Locked cells.
        for y in 0..BOARD_HEIGHT as u16 {
            for x in 0..BOARD_WIDTH as u16 {
                match snap.cell(x as usize, y as usize) {
                    Some(kind) => self.draw_block(fb, frame, x, y, kind),
                    None => self.draw_empty_cell(fb, frame, x, y),
                }
            }
        }

        if let Some(active) = snap.current {
            // Ghost only where it differs from the piece, and never over the stack.
            if let Some(ghost_y) = snap.ghost_y.filter(|&gy| gy != active.y) {
                let style = CellStyle::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
                for (x, y) in active.cells_at(ghost_y) {
                    if let Some((x, y)) = on_board(x, y) {
                        if snap.cell(x as usize, y as usize).is_none() {
                            self.fill_board_cell(fb, frame, x, y, '░', style);
                        }
                    }
                }
            }

            for (x, y) in active.cells() {
                if let Some((x, y)) = on_board(x, y) {
                    self.draw_block(fb, frame, x, y, active.piece.kind);
                }
            }
        }

        if flash.is_active() {
            let style = CellStyle::new(Rgb::new(250, 220, 80), PLAYFIELD_BG).bold();
            for y in 0..BOARD_HEIGHT as u16 {
                if flash.is_row_lit(y as usize) {
                    for x in 0..BOARD_WIDTH as u16 {
                        self.fill_board_cell(fb, frame, x, y, '✦', style);
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            draw_overlay(fb, frame, "GAME OVER", "R to restart");
        } else if snap.paused {
            draw_overlay(fb, frame, "PAUSED", "P to resume");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, flash: &ClearFlash, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, flash, viewport, &mut fb);
        fb
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        self.fill_board_cell(fb, frame, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, kind: ShapeKind) {
        let style = CellStyle::new(shape_color(kind), PLAYFIELD_BG).bold();
        self.fill_board_cell(fb, frame, x, y, '█', style);
    }

    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, v) in [("SCORE", snap.score), ("LINES", snap.lines), ("LEVEL", snap.level)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            self.draw_preview(fb, panel_x, y, next);
        }
        y = y.saturating_add(3);

        let hint = CellStyle::new(Rgb::new(150, 150, 160), PANEL_BG);
        for line in CONTROLS {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    /// Draw the preview piece's own matrix, one row per terminal row.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: Piece) {
        let style = CellStyle::new(shape_color(piece.kind), PANEL_BG).bold();
        for (r, c) in piece.matrix.cells() {
            let px = x.saturating_add(c as u16 * self.cell_w);
            let py = y.saturating_add(r as u16);
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
    }
}

fn on_board(x: i8, y: i8) -> Option<(u16, u16)> {
    if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
        return None;
    }
    Some((x as u16, y as u16))
}

fn shape_color(kind: ShapeKind) -> Rgb {
    match kind {
        ShapeKind::I => Rgb::new(80, 220, 220),
        ShapeKind::O => Rgb::new(240, 220, 80),
        ShapeKind::T => Rgb::new(200, 120, 220),
        ShapeKind::S => Rgb::new(100, 220, 120),
        ShapeKind::Z => Rgb::new(220, 80, 80),
        ShapeKind::J => Rgb::new(80, 120, 220),
        ShapeKind::L => Rgb::new(255, 165, 0),
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Dark band across the playfield with a title and a hint line.
fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, title: &str, hint: &str) {
    let band = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG);
    let mid_y = frame.y.saturating_add(frame.h / 2);
    let inner_x = frame.x + 1;
    let inner_w = frame.w.saturating_sub(2);

    fb.fill_rect(inner_x, mid_y.saturating_sub(1), inner_w, 3, ' ', band);
    fb.put_str_centered(inner_x, inner_w, mid_y.saturating_sub(1), title, band.bold());
    fb.put_str_centered(inner_x, inner_w, mid_y.saturating_add(1), hint, band.dim());
}

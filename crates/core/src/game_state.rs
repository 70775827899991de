//! Game state module - manages the complete game state
//!
//! This module ties together the board, the shape generator and scoring. It
//! owns the falling piece and the preview piece, and it is the only place
//! where state changes: every change goes through [`GameState::apply`].

use log::{debug, info};

use crate::board::{Board, ClearedRows};
use crate::pieces::{Matrix, Piece};
use crate::rng::ShapeGenerator;
use crate::scoring::{gravity_interval_ms, level_for_lines, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, BOARD_WIDTH, SPAWN_X, SPAWN_Y};

/// Board offset of a piece matrix's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Where every new piece appears
    pub fn spawn() -> Self {
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }
}

/// Rows removed by a lock, for presentation feedback.
///
/// Emitted at most once per lock that clears at least one row and consumed
/// through [`GameState::take_line_clear`]. It has no effect on later play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClearEvent {
    /// Board rows as they were before compaction, bottom to top.
    pub rows: ClearedRows,
    /// Points awarded for this clear.
    pub points: u32,
    /// Level after the clear.
    pub level: u32,
}

impl LineClearEvent {
    /// Every cleared (row, column) cell.
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.rows
            .iter()
            .flat_map(|&row| (0..BOARD_WIDTH).map(move |col| (row, col)))
    }

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }
}

/// Result of one step down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Fell,
    Locked,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    position: Position,
    next: Option<Piece>,
    generator: ShapeGenerator,
    score: u32,
    lines: u32,
    level: u32,
    paused: bool,
    game_over: bool,
    /// Last line clear (consumed by the presentation layer).
    last_clear: Option<LineClearEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self::with_generator(ShapeGenerator::new(seed))
    }

    fn with_generator(generator: ShapeGenerator) -> Self {
        Self {
            board: Board::new(),
            current: None,
            position: Position::spawn(),
            next: None,
            generator,
            score: 0,
            lines: 0,
            level: 1,
            paused: false,
            game_over: false,
            last_clear: None,
        }
    }

    /// Resume from a prepared board with chosen current and next pieces.
    ///
    /// The current piece is placed at the spawn position; if it does not fit
    /// the game starts out over. Used for puzzles, replays and tests.
    pub fn from_parts(seed: u64, board: Board, current: Piece, next: Piece) -> Self {
        let mut state = Self::new(seed);
        state.board = board;
        state.next = Some(next);
        state.install(current);
        state
    }

    /// Spawn the first piece if none is falling yet.
    pub fn start(&mut self) {
        if self.current.is_none() && !self.game_over {
            self.spawn_initial();
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Gravity applies and pieces respond to input.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    /// Gravity period for the current level
    pub fn gravity_interval_ms(&self) -> u32 {
        gravity_interval_ms(self.level)
    }

    /// Take and clear the last line-clear notification.
    pub fn take_line_clear(&mut self) -> Option<LineClearEvent> {
        self.last_clear.take()
    }

    /// Whether `matrix` may sit at `pos` on the current board.
    pub fn fits(&self, matrix: &Matrix, pos: Position) -> bool {
        !self.board.collides(matrix, pos.x, pos.y)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.current = self.current.map(|piece| ActiveSnapshot {
            piece,
            x: self.position.x,
            y: self.position.y,
        });
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.gravity_ms = self.gravity_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply a logical command.
    ///
    /// Returns `true` if the command was accepted and changed the state.
    /// Illegal or gated commands are silent no-ops returning `false`.
    pub fn apply(&mut self, command: Command) -> bool {
        if command.moves_piece() && (!self.is_running() || self.current.is_none()) {
            return false;
        }

        match command {
            Command::Reset => {
                self.reset();
                true
            }
            Command::TogglePause => {
                if self.game_over {
                    return false;
                }
                self.paused = !self.paused;
                debug!("paused={}", self.paused);
                true
            }
            Command::Tick => {
                if !self.is_running() {
                    return false;
                }
                if self.current.is_none() {
                    self.spawn_initial();
                    return true;
                }
                self.step_down();
                true
            }
            Command::MoveLeft => self.try_shift(-1),
            Command::MoveRight => self.try_shift(1),
            Command::SoftDrop => {
                self.step_down();
                true
            }
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => self.try_rotate(),
        }
    }

    /// Lowest legal row for the current piece, starting from where it is.
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.current?;
        let mut y = self.position.y;
        while !self.board.collides(&piece.matrix, self.position.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Start over: empty board, zero score, level 1, no piece yet.
    ///
    /// The shape generator keeps running so a new game is not a replay.
    fn reset(&mut self) {
        let generator = self.generator.clone();
        *self = Self::with_generator(generator);
        info!("game reset");
    }

    fn spawn_initial(&mut self) {
        let piece = self.generator.draw();
        self.next = Some(self.generator.draw());
        self.install(piece);
    }

    /// Current ← next, next ← fresh. Leaves `next` alone if the spawn fails.
    fn promote_next(&mut self) {
        let piece = match self.next {
            Some(piece) => piece,
            None => self.generator.draw(),
        };
        if self.install(piece) {
            self.next = Some(self.generator.draw());
        }
    }

    /// Place a piece at the spawn position, or end the game if it collides.
    fn install(&mut self, piece: Piece) -> bool {
        let spawn = Position::spawn();
        if self.board.collides(&piece.matrix, spawn.x, spawn.y) {
            self.current = None;
            self.game_over = true;
            info!(
                "game over: {} blocked at spawn (score={}, lines={}, level={})",
                piece.kind.as_str(),
                self.score,
                self.lines,
                self.level
            );
            return false;
        }
        self.current = Some(piece);
        self.position = spawn;
        debug!("spawned {}", piece.kind.as_str());
        true
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(piece) = self.current else {
            return false;
        };
        let x = self.position.x + dx;
        if self.board.collides(&piece.matrix, x, self.position.y) {
            return false;
        }
        self.position.x = x;
        true
    }

    fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.current else {
            return false;
        };
        let rotated = piece.rotated();
        if self
            .board
            .collides(&rotated.matrix, self.position.x, self.position.y)
        {
            return false;
        }
        self.current = Some(rotated);
        true
    }

    /// One row down, or lock if the row below is blocked.
    fn step_down(&mut self) -> Step {
        let Some(piece) = self.current else {
            return Step::Locked;
        };
        let y = self.position.y + 1;
        if self.board.collides(&piece.matrix, self.position.x, y) {
            self.lock_piece();
            return Step::Locked;
        }
        self.position.y = y;
        Step::Fell
    }

    fn hard_drop(&mut self) -> bool {
        let Some(ghost_y) = self.ghost_y() else {
            return false;
        };
        self.position.y = ghost_y;
        let step = self.step_down();
        debug_assert_eq!(step, Step::Locked);
        true
    }

    /// Merge the current piece, clear rows, score, then promote the next piece.
    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        let dropped = self
            .board
            .merge(&piece.matrix, self.position.x, self.position.y, piece.kind);
        debug!(
            "locked {} at ({}, {})",
            piece.kind.as_str(),
            self.position.x,
            self.position.y
        );
        if dropped > 0 {
            debug!("{} block(s) locked above the top edge were dropped", dropped);
        }

        let rows = self.board.clear_full_rows();
        let cleared = rows.len();
        if cleared > 0 {
            let points = line_clear_points(cleared, self.level);
            self.score = self.score.saturating_add(points);
            self.lines = self.lines.saturating_add(cleared as u32);

            let level = level_for_lines(self.lines);
            if level != self.level {
                info!("level up: {} -> {}", self.level, level);
            }
            self.level = level;

            info!(
                "cleared {} line(s) for {} points (score={}, lines={})",
                cleared, points, self.score, self.lines
            );
            self.last_clear = Some(LineClearEvent {
                rows,
                points,
                level,
            });
        }

        self.promote_next();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShapeKind, BOARD_HEIGHT};

    /// State with a chosen falling piece at spawn and an empty board.
    fn state_with(kind: ShapeKind) -> GameState {
        GameState::from_parts(12345, Board::new(), Piece::new(kind), Piece::new(ShapeKind::T))
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.game_over);
        assert!(!state.paused);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(state.current.is_none());
        assert!(state.next.is_none());
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = GameState::new(12345);

        assert!(state.apply(Command::Tick));
        assert!(state.current.is_some());
        assert!(state.next.is_some());
        assert_eq!(state.position, Position::new(4, 0));

        // The next tick is gravity.
        assert!(state.apply(Command::Tick));
        assert_eq!(state.position.y, 1);
    }

    #[test]
    fn test_start_spawns_once() {
        let mut state = GameState::new(12345);
        state.start();
        let first = state.current;
        let next = state.next;
        state.start();
        assert_eq!(state.current, first);
        assert_eq!(state.next, next);
    }

    #[test]
    fn test_moves_ignored_without_piece() {
        let mut state = GameState::new(12345);
        assert!(!state.apply(Command::MoveLeft));
        assert!(!state.apply(Command::Rotate));
        assert!(!state.apply(Command::HardDrop));
        assert!(!state.apply(Command::SoftDrop));
        assert!(state.current.is_none());
    }

    #[test]
    fn test_horizontal_moves_stop_at_walls() {
        let mut state = state_with(ShapeKind::O);

        let mut moved = 0;
        for _ in 0..10 {
            if state.apply(Command::MoveLeft) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(state.position.x, 0);

        let mut moved = 0;
        for _ in 0..20 {
            if state.apply(Command::MoveRight) {
                moved += 1;
            }
        }
        assert_eq!(moved, 8);
        assert_eq!(state.position.x, 8);
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut board = Board::new();
        board.set(3, 0, Some(ShapeKind::Z));
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::I));

        assert!(!state.apply(Command::MoveLeft));
        assert_eq!(state.position.x, 4);
        assert!(state.apply(Command::MoveRight));
    }

    #[test]
    fn test_rotate_accepted_in_open_space() {
        let mut state = state_with(ShapeKind::T);
        assert!(state.apply(Command::Rotate));
        assert_eq!(
            state.current.unwrap().matrix,
            Matrix::base(ShapeKind::T).rotate_cw()
        );
        assert_eq!(state.position, Position::spawn());
    }

    #[test]
    fn test_rotate_rejected_at_wall_keeps_matrix() {
        let mut state = state_with(ShapeKind::I);
        // Vertical I against the right wall: turning it back flat would poke out.
        state.current = Some(Piece::new(ShapeKind::I).rotated());
        state.position = Position::new(9, 5);
        let before = state.current.unwrap().matrix;

        assert!(!state.apply(Command::Rotate));
        assert_eq!(state.current.unwrap().matrix, before);
        assert_eq!(state.position, Position::new(9, 5));
    }

    #[test]
    fn test_rotate_rejected_by_stack_without_kick() {
        let mut board = Board::new();
        // Block the cell the rotated T would need at (4, 2).
        board.set(4, 2, Some(ShapeKind::L));
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::T), Piece::new(ShapeKind::I));

        let before = state.current.unwrap();
        assert!(!state.apply(Command::Rotate));
        assert_eq!(state.current.unwrap(), before);
    }

    #[test]
    fn test_ghost_y_on_empty_board() {
        let state = state_with(ShapeKind::I);
        assert_eq!(state.ghost_y(), Some(BOARD_HEIGHT as i8 - 1));

        let state = state_with(ShapeKind::O);
        assert_eq!(state.ghost_y(), Some(BOARD_HEIGHT as i8 - 2));
    }

    #[test]
    fn test_ghost_y_does_not_mutate() {
        let state = state_with(ShapeKind::S);
        let before = state.snapshot();
        let _ = state.ghost_y();
        let _ = state.ghost_y();
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_ghost_y_rests_on_stack() {
        let board = Board::from_ascii(&["....J.....", "....JJJ..."]);
        let state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::I));
        // O at x=4 covers columns 4-5; column 4 is filled from row 18.
        assert_eq!(state.ghost_y(), Some(16));
    }

    #[test]
    fn test_i_piece_drop_scenario() {
        let mut state = state_with(ShapeKind::I);
        assert!(state.apply(Command::MoveLeft));
        assert_eq!(state.position, Position::new(3, 0));

        for _ in 0..19 {
            assert!(state.apply(Command::SoftDrop));
        }
        assert_eq!(state.position.y, 19);
        assert_eq!(state.board.occupied_count(), 0);

        // Blocked below: this step locks.
        assert!(state.apply(Command::SoftDrop));
        for x in 3..=6 {
            assert_eq!(state.board.get(x, 19), Some(Some(ShapeKind::I)));
        }
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert!(state.take_line_clear().is_none());

        // Next piece promoted.
        assert_eq!(state.current.map(|p| p.kind), Some(ShapeKind::T));
        assert_eq!(state.position, Position::spawn());
    }

    #[test]
    fn test_o_piece_completes_row_scenario() {
        let board = Board::from_ascii(&["ZZZZ..ZZZZ"]);
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::L));

        assert!(state.apply(Command::HardDrop));

        assert_eq!(state.score, 100);
        assert_eq!(state.lines, 1);
        assert_eq!(state.level, 1);

        // Row 19 cleared; the O's upper half moved down from row 18.
        assert_eq!(state.board.get(4, 19), Some(Some(ShapeKind::O)));
        assert_eq!(state.board.get(5, 19), Some(Some(ShapeKind::O)));
        assert_eq!(state.board.occupied_count(), 2);

        let ev = state.take_line_clear().expect("line clear event");
        assert_eq!(ev.rows.as_slice(), &[19]);
        assert_eq!(ev.points, 100);
        assert_eq!(ev.cells().count(), 10);
        assert!(ev.cells().all(|(row, _)| row == 19));
        assert!(state.take_line_clear().is_none());
    }

    #[test]
    fn test_score_uses_level_before_clear() {
        let board = Board::from_ascii(&["IIII..IIII", "IIII..IIII"]);
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::T));
        state.lines = 20;
        state.level = 3;

        state.apply(Command::HardDrop);

        assert_eq!(state.score, 300 * 3);
        assert_eq!(state.lines, 22);
        assert_eq!(state.level, 3);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_level_up_on_tenth_line() {
        let board = Board::from_ascii(&["IIII..IIII"]);
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::T));
        state.lines = 9;

        state.apply(Command::HardDrop);

        assert_eq!(state.score, 100);
        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.gravity_interval_ms(), 950);
        assert_eq!(state.take_line_clear().map(|e| e.level), Some(2));
    }

    #[test]
    fn test_four_line_clear() {
        let board = Board::from_ascii(&[
            "ZZZZZZZZZ.",
            "ZZZZZZZZZ.",
            "ZZZZZZZZZ.",
            "ZZZZZZZZZ.",
        ]);
        let mut state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::I), Piece::new(ShapeKind::T));
        assert!(state.apply(Command::Rotate));
        // Vertical I sits in the matrix's column 0; walk it to the well.
        while state.apply(Command::MoveRight) {}
        assert_eq!(state.position.x, 9);

        state.apply(Command::HardDrop);
        assert_eq!(state.lines, 4);
        assert_eq!(state.score, 800);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_hard_drop_locks_at_ghost() {
        let mut state = state_with(ShapeKind::T);
        let ghost = state.ghost_y().unwrap();
        assert!(state.apply(Command::HardDrop));

        // T base matrix: top row is the nub, bottom row is the bar.
        assert_eq!(state.board.get(5, ghost), Some(Some(ShapeKind::T)));
        for x in 4..=6 {
            assert_eq!(state.board.get(x, ghost + 1), Some(Some(ShapeKind::T)));
        }
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.position, Position::spawn());
    }

    #[test]
    fn test_blocked_spawn_sets_game_over_without_touching_board() {
        let mut board = Board::new();
        for y in 0..2 {
            for x in 3..=7 {
                board.set(x, y, Some(ShapeKind::J));
            }
        }
        let mut state = GameState::new(1);
        state.board = board;
        state.current = Some(Piece::new(ShapeKind::I));
        state.position = Position::new(0, 19);
        state.next = Some(Piece::new(ShapeKind::S));

        assert!(state.apply(Command::SoftDrop));

        assert!(state.game_over);
        assert!(state.current.is_none());
        assert_eq!(state.next.map(|p| p.kind), Some(ShapeKind::S));

        // Only the locked I was added; the failed spawn left nothing behind.
        let mut expected = Board::new();
        for y in 0..2 {
            for x in 3..=7 {
                expected.set(x, y, Some(ShapeKind::J));
            }
        }
        for x in 0..4 {
            expected.set(x, 19, Some(ShapeKind::I));
        }
        assert_eq!(state.board, expected);
    }

    #[test]
    fn test_from_parts_with_blocked_spawn_is_over() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            board.set(4, y, Some(ShapeKind::O));
        }
        let state =
            GameState::from_parts(1, board, Piece::new(ShapeKind::O), Piece::new(ShapeKind::I));
        assert!(state.game_over);
        assert!(state.current.is_none());
    }

    #[test]
    fn test_pause_gates_movement_and_gravity() {
        let mut state = state_with(ShapeKind::L);
        assert!(state.apply(Command::TogglePause));
        assert!(state.paused);

        let before = state.snapshot();
        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::Rotate,
            Command::Tick,
        ] {
            assert!(!state.apply(cmd), "{:?} accepted while paused", cmd);
        }
        assert_eq!(state.snapshot(), before);

        assert!(state.apply(Command::TogglePause));
        assert!(state.apply(Command::Tick));
        assert_eq!(state.position.y, 1);
    }

    #[test]
    fn test_game_over_gates_everything_but_reset() {
        let mut state = state_with(ShapeKind::L);
        state.game_over = true;
        state.current = None;

        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::Rotate,
            Command::Tick,
            Command::TogglePause,
        ] {
            assert!(!state.apply(cmd), "{:?} accepted after game over", cmd);
        }

        assert!(state.apply(Command::Reset));
        assert!(!state.game_over);
        assert!(state.current.is_none());
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut state = state_with(ShapeKind::I);
        state.score = 1200;
        state.lines = 14;
        state.level = 2;
        state.paused = true;
        state.board.set(0, 19, Some(ShapeKind::Z));

        assert!(state.apply(Command::Reset));

        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.level, 1);
        assert!(!state.paused);
        assert!(!state.game_over);
        assert_eq!(state.board.occupied_count(), 0);
        assert!(state.current.is_none());
        assert!(state.next.is_none());
        assert_eq!(state.seed(), 12345);
    }

    #[test]
    fn test_promotion_uses_preview_piece() {
        let mut state = GameState::new(42);
        state.start();
        let preview = state.next.unwrap();

        state.apply(Command::HardDrop);

        assert_eq!(state.current.map(|p| p.kind), Some(preview.kind));
        assert_eq!(state.current.unwrap().matrix, Matrix::base(preview.kind));
        assert!(state.next.is_some());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = state_with(ShapeKind::J);
        state.apply(Command::MoveRight);
        let snap = state.snapshot();

        let active = snap.current.unwrap();
        assert_eq!(active.piece.kind, ShapeKind::J);
        assert_eq!((active.x, active.y), (5, 0));
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.next.map(|p| p.kind), Some(ShapeKind::T));
        assert_eq!(snap.level, 1);
        assert_eq!(snap.gravity_ms, 1000);
        assert!(snap.playable());
    }

    #[test]
    fn test_fits_matches_collision() {
        let state = state_with(ShapeKind::O);
        let o = Matrix::base(ShapeKind::O);
        assert!(state.fits(&o, Position::new(0, 0)));
        assert!(!state.fits(&o, Position::new(-1, 0)));
        assert!(!state.fits(&o, Position::new(0, 19)));
        assert!(state.fits(&o, Position::new(0, -1)));
    }
}

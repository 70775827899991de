//! Line-clear flash.
//!
//! Presentation-only feedback for rows removed by a lock. Every cleared row
//! lights up for `LINE_CLEAR_FLASH_MS`; a clear arriving while a flash is
//! still showing adds its rows and restarts the timer. The game never reads
//! this back.

use crate::core::LineClearEvent;
use crate::types::{BOARD_HEIGHT, LINE_CLEAR_FLASH_MS};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearFlash {
    rows: [bool; BOARD_HEIGHT as usize],
    remaining_ms: u32,
}

impl ClearFlash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &LineClearEvent) {
        for &row in &event.rows {
            if let Some(lit) = self.rows.get_mut(row as usize) {
                *lit = true;
            }
        }
        self.remaining_ms = LINE_CLEAR_FLASH_MS;
    }

    /// Advance the timer; the flash goes out all at once.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.remaining_ms == 0 {
            return;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.rows = [false; BOARD_HEIGHT as usize];
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn is_row_lit(&self, row: usize) -> bool {
        self.is_active() && self.rows.get(row).copied().unwrap_or(false)
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }
}

//! RNG module - uniform random shape generation
//!
//! Every draw picks one of the seven shapes with equal probability; there is
//! no bag, so repeats and droughts are possible. The generator is seeded so a
//! game can be replayed exactly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::pieces::Piece;
use crate::types::ShapeKind;

/// Seeded uniform shape generator
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: StdRng,
    seed: u64,
}

impl ShapeGenerator {
    /// Create a generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the next shape kind
    pub fn draw_kind(&mut self) -> ShapeKind {
        *ShapeKind::ALL
            .choose(&mut self.rng)
            .unwrap_or(&ShapeKind::I)
    }

    /// Draw a fresh piece in spawn orientation
    pub fn draw(&mut self) -> Piece {
        Piece::new(self.draw_kind())
    }
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

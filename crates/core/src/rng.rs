//! RNG module - uniform random piece selection
//!
//! Every draw picks one of the seven kinds with equal probability. There is no
//! bag and no anti-repeat rule, so the same kind may come up several times in
//! a row; that is intentional.
//!
//! Also provides a simple LCG so a seed reproduces a whole game, plus a
//! scripted mode that cycles through a fixed list for tests and benchmarks.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

#[derive(Debug, Clone)]
enum Source {
    Random(SimpleRng),
    Scripted { pieces: Vec<PieceKind>, index: usize },
}

/// Produces the next tetromino kind to spawn
#[derive(Debug, Clone)]
pub struct PieceSpawner {
    source: Source,
}

impl PieceSpawner {
    /// Uniform random spawner with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            source: Source::Random(SimpleRng::new(seed)),
        }
    }

    /// Spawner that cycles through `pieces` forever
    ///
    /// An empty list falls back to a seeded random spawner.
    pub fn scripted(pieces: Vec<PieceKind>) -> Self {
        if pieces.is_empty() {
            return Self::new(1);
        }
        Self {
            source: Source::Scripted { pieces, index: 0 },
        }
    }

    /// Select the next piece kind
    pub fn next_piece(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Random(rng) => PieceKind::ALL[rng.next_range(7) as usize],
            Source::Scripted { pieces, index } => {
                let kind = pieces[*index % pieces.len()];
                *index = (*index + 1) % pieces.len();
                kind
            }
        }
    }

    pub fn is_scripted(&self) -> bool {
        matches!(self.source, Source::Scripted { .. })
    }
}

impl Default for PieceSpawner {
    fn default() -> Self {
        Self::new(1)
    }
}

//! Deterministic draw source for scene generation.
//!
//! Randomness is a stateless function of `(seed, draw index)`. Nothing here
//! reads system entropy or the wall clock, so any implementation that hashes the
//! same bytes in the same order rebuilds the same scene.

use sha2::{Digest, Sha256};

/// Domain separator prefixed to every draw hash.
const DRAW_DOMAIN: &[u8] = b"ROPEDRAWv1";

/// Source of uniformly distributed 64-bit draws, addressed by index.
///
/// Implementations must be pure: the same index always yields the same value.
pub trait DrawSource {
    fn draw(&self, index: u32) -> u64;

    /// Uniform integer in `[min, max]` inclusive, by multiply-shift.
    fn range(&self, index: u32, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as u128;
        let offset = (self.draw(index) as u128 * span) >> 64;
        (min as i64 + offset as i64) as i32
    }
}

/// Production draw source: `SHA-256(domain || seed || index_le)`, first 8 bytes LE.
#[derive(Clone, Copy, Debug)]
pub struct SeedDraws<'a> {
    seed: &'a [u8],
}

impl<'a> SeedDraws<'a> {
    pub fn new(seed: &'a [u8]) -> Self {
        Self { seed }
    }
}

impl DrawSource for SeedDraws<'_> {
    fn draw(&self, index: u32) -> u64 {
        let mut h = Sha256::new();
        h.update(DRAW_DOMAIN);
        h.update(self.seed);
        h.update(index.to_le_bytes());
        let out = h.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&out[..8]);
        u64::from_le_bytes(word)
    }
}

/// Hands out consecutive draw indices from a source, starting at 0.
pub struct DrawCursor<'s, S: DrawSource + ?Sized> {
    source: &'s S,
    next: u32,
}

impl<'s, S: DrawSource + ?Sized> DrawCursor<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self { source, next: 0 }
    }

    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        let v = self.source.range(self.next, min, max);
        self.next += 1;
        v
    }

    /// Picks one entry of a non-empty pool; repeated entries weight the pick.
    pub fn pick<T: Copy>(&mut self, pool: &[T]) -> T {
        let idx = self.range(0, pool.len() as i32 - 1);
        pool[idx as usize]
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> u32 {
        self.next
    }
}

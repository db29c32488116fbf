use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::assign::SubPool;
use crate::color::RgbColor;

/// Number of distinct 24-bit colors.
pub const CUBE_SIZE: usize = 1 << 24;
/// Side of the square image that holds the whole cube.
pub const CUBE_SIDE: u32 = 4096;

/// Every 24-bit color, r outermost and b innermost.
pub fn all_colors() -> Vec<RgbColor> {
    let mut out = Vec::with_capacity(CUBE_SIZE);
    for r in 0..=255u8 {
        for g in 0..=255u8 {
            for b in 0..=255u8 {
                out.push(RgbColor::new(r, g, b));
            }
        }
    }
    out
}

/// The depletable supply of colors handed out to pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorPool {
    colors: Vec<RgbColor>,
}

impl ColorPool {
    pub fn full_cube() -> Self {
        Self { colors: all_colors() }
    }

    pub fn from_colors(colors: Vec<RgbColor>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[RgbColor] {
        &self.colors
    }

    /// Uniform shuffle so that a window at the front of any sub-pool is a
    /// random sample of what remains.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.colors.shuffle(rng);
    }

    /// Consume the pool into one sub-pool per range. Ranges must be
    /// contiguous, ascending and cover the pool exactly.
    pub fn split(self, bounds: &[Range<usize>]) -> Vec<SubPool> {
        debug_assert!(
            bounds.first().map_or(0, |r| r.start) == 0
                && bounds.last().map_or(0, |r| r.end) == self.colors.len()
                && bounds.windows(2).all(|w| w[0].end == w[1].start && w[0].start <= w[0].end),
            "split bounds {:?} do not tile 0..{}",
            bounds,
            self.colors.len()
        );
        let mut rest = self.colors;
        let mut pools = Vec::with_capacity(bounds.len());
        // Peel from the back so each split_off is a cheap tail copy.
        for range in bounds.iter().rev() {
            let tail = rest.split_off(range.start);
            pools.push(SubPool::from(tail));
        }
        pools.reverse();
        pools
    }
}

//! Windowed greedy assignment of colors to one partition of pixels.
//!
//! Each pixel looks at a bounded window at the front of its worker's private
//! sub-pool, takes the closest color and removes it. Because the pool is
//! shuffled beforehand, the window is a random sample of what remains, which
//! keeps the whole pass at O(pixels × window) instead of a full nearest
//! neighbor search over a shrinking 16M-color set.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};

use crate::color::RgbColor;
use crate::distance::{Distance, Target};
use crate::error::{RemapError, Result};
use crate::pixels::PixelRecord;

/// A worker's private, depleting slice of the color pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubPool {
    colors: VecDeque<RgbColor>,
}

impl From<Vec<RgbColor>> for SubPool {
    fn from(colors: Vec<RgbColor>) -> Self {
        Self { colors: colors.into() }
    }
}

impl SubPool {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colors a pixel would be compared against, front first.
    pub fn window(&self, k: usize) -> impl Iterator<Item = RgbColor> + '_ {
        self.colors.iter().copied().take(k)
    }

    /// Remove and return the closest color within the front `window`.
    pub fn take_best<D: Distance + ?Sized>(
        &mut self,
        target: &Target,
        window: usize,
        order: PoolOrder,
        metric: &D,
    ) -> Option<(RgbColor, Choice)> {
        let examined = self.colors.len().min(window.max(1));
        let choice = pick(self, target, window, metric)?;
        let color = self.colors.remove(choice.position)?;
        if order == PoolOrder::Rotate {
            // the rest of the window now sits at the front
            self.colors.rotate_left(examined - 1);
        }
        Some((color, choice))
    }
}

/// What happens to examined-but-rejected candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoolOrder {
    /// Leave them where they are; only the chosen color leaves the pool.
    #[default]
    Preserve,
    /// Send them to the back so the next pixel sees a fresh window.
    Rotate,
}

impl FromStr for PoolOrder {
    type Err = RemapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" | "stable" => Ok(Self::Preserve),
            "rotate" | "cycle" => Ok(Self::Rotate),
            _ => Err(RemapError::UnknownPoolOrder(s.to_string())),
        }
    }
}

impl fmt::Display for PoolOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Preserve => "preserve",
            Self::Rotate => "rotate",
        })
    }
}

/// Best candidate found in a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Choice {
    /// Offset from the front of the sub-pool.
    pub position: usize,
    pub distance: f64,
}

/// Scan up to `window` colors from the front of `pool` and return the
/// closest one. Ties keep the earliest candidate. `None` only for an empty
/// pool.
pub fn pick<D: Distance + ?Sized>(pool: &SubPool, target: &Target, window: usize, metric: &D) -> Option<Choice> {
    let mut candidates = pool.window(window.max(1));
    let first = candidates.next()?;
    let mut best = Choice { position: 0, distance: metric.distance(target, first) };
    for (i, color) in candidates.enumerate() {
        let d = metric.distance(target, color);
        if d < best.distance {
            best = Choice { position: i + 1, distance: d };
        }
    }
    Some(best)
}

/// Everything one worker produced: the slots it filled and how well.
#[derive(Clone, Debug, Default)]
pub struct WorkerOutput {
    pub worker: usize,
    pub writes: Vec<(usize, RgbColor)>,
    pub total_distance: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Assigner {
    pub window: usize,
    pub order: PoolOrder,
    /// Log progress every this many pixels; 0 disables it.
    pub progress_every: usize,
}

impl Assigner {
    pub fn new(window: usize, order: PoolOrder, progress_every: usize) -> Self {
        Self { window, order, progress_every }
    }

    /// Give every pixel in `pixels` one color from `pool`, draining it.
    ///
    /// `offset` is only used for logging. Fails if the pool runs dry before
    /// the pixels do, or still holds colors afterwards.
    pub fn assign_partition<D: Distance + ?Sized>(
        &self,
        worker: usize,
        offset: usize,
        pixels: &[PixelRecord],
        mut pool: SubPool,
        width: u32,
        metric: &D,
    ) -> Result<WorkerOutput> {
        let batch_size = pixels.len();
        info!("Worker {} has batch size {} and offset {}", worker, batch_size, offset);

        let mut writes = Vec::with_capacity(batch_size);
        let mut total_distance = 0.0;
        for (px, record) in pixels.iter().enumerate() {
            let target = metric.target(record.color);
            let (color, choice) = pool
                .take_best(&target, self.window, self.order, metric)
                .ok_or(RemapError::PoolExhausted { worker, pixel: px })?;

            writes.push((record.index(width), color));
            total_distance += choice.distance;

            if self.progress_every > 0 && px % self.progress_every == 0 {
                debug!("Worker {} finished {} of {} pixels", worker, px, batch_size);
            }
        }

        if !pool.is_empty() {
            return Err(RemapError::PoolNotDrained { worker, left: pool.len() });
        }
        info!("Worker {} done filling output", worker);
        Ok(WorkerOutput { worker, writes, total_distance })
    }
}

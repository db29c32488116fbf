use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use image::{ImageBuffer, Rgb, RgbImage};
use log::{info, warn};

use crate::assign::{Assigner, WorkerOutput};
use crate::color::RgbColor;
use crate::cube::ColorPool;
use crate::distance::Distance;
use crate::error::{RemapError, Result};
use crate::pixels::PixelRecord;

/// Where pixels go when the count does not divide by the worker count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// The last worker takes the leftover pixels and colors.
    #[default]
    LastWorker,
    /// Refuse to run.
    Strict,
}

impl FromStr for RemainderPolicy {
    type Err = RemapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "last" | "last_worker" | "last-worker" => Ok(Self::LastWorker),
            "strict" => Ok(Self::Strict),
            _ => Err(RemapError::UnknownRemainderPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastWorker => "last-worker",
            Self::Strict => "strict",
        })
    }
}

/// Contiguous batches of `total / workers` items, one per worker.
///
/// The same bounds are used to cut both the pixel list and the color pool,
/// which is what keeps every worker's pixels and colors the same size.
pub fn partition_bounds(total: usize, workers: usize, policy: RemainderPolicy) -> Result<Vec<Range<usize>>> {
    if workers == 0 {
        return Err(RemapError::NoWorkers);
    }
    let batch_size = total / workers;
    let remainder = total % workers;
    if remainder != 0 && policy == RemainderPolicy::Strict {
        return Err(RemapError::IndivisiblePartition { pixels: total, workers });
    }
    let mut bounds: Vec<Range<usize>> = (0..workers).map(|t| t * batch_size..(t + 1) * batch_size).collect();
    if let Some(last) = bounds.last_mut() {
        last.end = total;
    }
    Ok(bounds)
}

/// The assembled result: one color per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputBuffer {
    width: u32,
    height: u32,
    colors: Vec<RgbColor>,
}

impl OutputBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[RgbColor] {
        &self.colors
    }

    pub fn into_colors(self) -> Vec<RgbColor> {
        self.colors
    }

    pub fn get(&self, x: u32, y: u32) -> Option<RgbColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.colors.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(self.width, self.height);
        for (px, c) in img.pixels_mut().zip(&self.colors) {
            *px = Rgb((*c).into());
        }
        img
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RunStats {
    pub workers: usize,
    pub pixels: usize,
    pub total_distance: f64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn mean_distance(&self) -> f64 {
        if self.pixels == 0 { 0.0 } else { self.total_distance / self.pixels as f64 }
    }
}

#[derive(Clone, Debug)]
pub struct RunOutput {
    pub buffer: OutputBuffer,
    pub stats: RunStats,
}

/// Splits the work, runs one assigner per partition on its own thread and
/// stitches the results back together.
#[derive(Clone, Copy, Debug)]
pub struct Driver {
    pub workers: usize,
    pub assigner: Assigner,
    pub remainder: RemainderPolicy,
}

impl Driver {
    pub fn new(workers: usize, assigner: Assigner, remainder: RemainderPolicy) -> Self {
        Self { workers, assigner, remainder }
    }

    /// Assign every pixel a distinct color from `pool`.
    ///
    /// `pixels` are processed in the order given and `pool` is consumed
    /// front to back; shuffle both beforehand. All preconditions are checked
    /// before any thread starts, and no output is returned unless every slot
    /// was written exactly once.
    pub fn run<D: Distance + ?Sized>(
        &self,
        width: u32,
        height: u32,
        pixels: &[PixelRecord],
        pool: ColorPool,
        metric: &D,
    ) -> Result<RunOutput> {
        let start = Instant::now();
        let total = width as usize * height as usize;
        if self.workers == 0 {
            return Err(RemapError::NoWorkers);
        }
        if self.assigner.window == 0 {
            return Err(RemapError::EmptyWindow);
        }
        if pixels.len() != total {
            return Err(RemapError::DimensionMismatch { width, height, pixels: pixels.len() });
        }
        if pool.len() != total {
            return Err(RemapError::PoolSizeMismatch { pixels: total, colors: pool.len() });
        }
        if let Some(p) = pixels.iter().find(|p| p.x >= width || p.y >= height) {
            return Err(RemapError::PixelOutOfBounds { x: p.x, y: p.y, width, height });
        }

        let mut workers = self.workers;
        if workers > total.max(1) {
            warn!("Only {} pixels; reducing workers from {} to {}", total, workers, total.max(1));
            workers = total.max(1);
        }
        let bounds = partition_bounds(total, workers, self.remainder)?;
        if total % workers != 0 {
            warn!("Last worker takes {} extra pixels", total % workers);
        }
        let pools = pool.split(&bounds);

        let assigner = self.assigner;
        let joined: Vec<thread::Result<Result<WorkerOutput>>> = thread::scope(|s| {
            let handles: Vec<_> = bounds
                .iter()
                .zip(pools)
                .enumerate()
                .map(|(worker, (range, sub_pool))| {
                    let batch = &pixels[range.clone()];
                    let offset = range.start;
                    s.spawn(move || assigner.assign_partition(worker, offset, batch, sub_pool, width, metric))
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect()
        });
        info!("Workers joined");

        let mut outputs = Vec::with_capacity(joined.len());
        for (worker, result) in joined.into_iter().enumerate() {
            let output = result.map_err(|_| RemapError::WorkerPanicked { worker })??;
            outputs.push(output);
        }

        let mut slots: Vec<Option<RgbColor>> = vec![None; total];
        let mut total_distance = 0.0;
        for output in &outputs {
            total_distance += output.total_distance;
            for &(index, color) in &output.writes {
                let slot = &mut slots[index];
                if slot.is_some() {
                    return Err(RemapError::SlotWrittenTwice { index });
                }
                *slot = Some(color);
            }
        }
        let colors = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(RemapError::SlotUnfilled { index }))
            .collect::<Result<Vec<_>>>()?;

        let stats = RunStats { workers, pixels: total, total_distance, elapsed: start.elapsed() };
        Ok(RunOutput { buffer: OutputBuffer { width, height, colors }, stats })
    }
}

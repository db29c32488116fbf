use image::RgbImage;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::color::RgbColor;
use crate::error::{RemapError, Result};

/// A source pixel: where it sits and what color it had.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRecord {
    pub x: u32,
    pub y: u32,
    pub color: RgbColor,
}

impl PixelRecord {
    pub fn new(x: u32, y: u32, color: RgbColor) -> Self {
        Self { x, y, color }
    }

    /// Row-major slot of this pixel in an image `width` pixels wide.
    #[inline]
    pub fn index(&self, width: u32) -> usize {
        self.y as usize * width as usize + self.x as usize
    }
}

/// Flatten row-major RGBA bytes into pixel records. Alpha is ignored.
pub fn extract_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<PixelRecord>> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(RemapError::BufferLength { expected, actual: rgba.len() });
    }
    let w = width as usize;
    let out = rgba
        .chunks_exact(4)
        .enumerate()
        .map(|(i, px)| PixelRecord::new((i % w) as u32, (i / w) as u32, RgbColor::new(px[0], px[1], px[2])))
        .collect();
    Ok(out)
}

pub fn extract_rgb_image(img: &RgbImage) -> Vec<PixelRecord> {
    img.enumerate_pixels()
        .map(|(x, y, p)| PixelRecord::new(x, y, RgbColor::from(p.0)))
        .collect()
}

/// Randomize processing order so no worker gets a spatially coherent batch.
pub fn shuffle_pixels<R: Rng + ?Sized>(pixels: &mut [PixelRecord], rng: &mut R) {
    pixels.shuffle(rng);
}

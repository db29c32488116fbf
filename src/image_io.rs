use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, ImageReader, Rgba};

use crate::color::RgbColor;

/// Decoded source image as row-major RGBA bytes.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SourceImage {
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self { width, height, rgba: rgba.into_raw() }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

pub fn open<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(img)
}

pub fn decode<P: AsRef<Path>>(path: P) -> Result<SourceImage> {
    open(path).map(|img| SourceImage::from_dynamic(&img))
}

/// Serialize colors back to RGBA with full opacity.
pub fn to_rgba(colors: &[RgbColor]) -> Vec<u8> {
    let mut out = Vec::with_capacity(colors.len() * 4);
    for c in colors {
        out.extend_from_slice(&[c.r, c.g, c.b, 255]);
    }
    out
}

pub fn encode<P: AsRef<Path>>(path: P, width: u32, height: u32, colors: &[RgbColor]) -> Result<()> {
    let path = path.as_ref();
    let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, to_rgba(colors))
        .with_context(|| format!("{} colors do not fill a {}x{} image", colors.len(), width, height))?;
    img.save(path).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

//! sRGB → CIE XYZ → CIE L*a*b* (D65 illuminant, 2° observer).
//!
//! Constants follow the easyrgb.com formulation: four-digit sRGB matrix,
//! `0.008856` / `7.787` Lab knee. Candidate rankings depend on these exact
//! constants.

use std::sync::OnceLock;

/// An 8-bit sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XyzColor {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabColor {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Position of this color in r/g/b nested enumeration order.
    #[inline]
    pub const fn to_index(self) -> usize {
        ((self.r as usize) << 16) | ((self.g as usize) << 8) | self.b as usize
    }

    /// Inverse of [`RgbColor::to_index`]; bits above 24 are ignored.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self { r: (index >> 16) as u8, g: (index >> 8) as u8, b: index as u8 }
    }

    #[inline]
    pub fn to_lab(self) -> LabColor {
        to_lab(to_xyz(self))
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(c: RgbColor) -> Self {
        [c.r, c.g, c.b]
    }
}

// Inverse-companded channel (scaled to 0..100) for every byte value.
static LINEAR_LUT: OnceLock<[f64; 256]> = OnceLock::new();

fn linear_lut() -> &'static [f64; 256] {
    LINEAR_LUT.get_or_init(|| {
        let mut lut = [0.0; 256];
        for (byte, slot) in lut.iter_mut().enumerate() {
            *slot = expand_channel(byte as u8);
        }
        lut
    })
}

#[inline]
fn expand_channel(c: u8) -> f64 {
    let v = c as f64 / 255.0;
    let v = if v > 0.04045 { ((v + 0.055) / 1.055).powf(2.4) } else { v / 12.92 };
    v * 100.0
}

pub fn to_xyz(rgb: RgbColor) -> XyzColor {
    let lut = linear_lut();
    let r = lut[rgb.r as usize];
    let g = lut[rgb.g as usize];
    let b = lut[rgb.b as usize];
    XyzColor {
        x: r * 0.4124 + g * 0.3576 + b * 0.1805,
        y: r * 0.2126 + g * 0.7152 + b * 0.0722,
        z: r * 0.0193 + g * 0.1192 + b * 0.9505,
    }
}

const REF_X: f64 = 95.047;
const REF_Y: f64 = 100.000;
const REF_Z: f64 = 108.883;

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > 0.008856 { t.powf(1.0 / 3.0) } else { 7.787 * t + 16.0 / 116.0 }
}

pub fn to_lab(xyz: XyzColor) -> LabColor {
    let fx = lab_f(xyz.x / REF_X);
    let fy = lab_f(xyz.y / REF_Y);
    let fz = lab_f(xyz.z / REF_Z);
    LabColor { l: 116.0 * fy - 16.0, a: 500.0 * (fx - fy), b: 200.0 * (fy - fz) }
}

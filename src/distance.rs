use std::fmt;
use std::str::FromStr;

use crate::color::{LabColor, RgbColor};
use crate::error::RemapError;

/// A pixel's color prepared once for repeated comparison against candidates.
#[derive(Clone, Copy, Debug)]
pub struct Target {
    pub rgb: RgbColor,
    pub lab: LabColor,
    pub chroma: f64,
}

impl Target {
    pub fn new(rgb: RgbColor) -> Self {
        let lab = rgb.to_lab();
        Self { rgb, lab, chroma: chroma(&lab) }
    }
}

/// Pluggable dissimilarity between a prepared target and a candidate color.
///
/// Smaller is closer. Implementations only need to order candidates
/// consistently; the scale of the returned value is irrelevant to the
/// assigner.
pub trait Distance: Sync {
    fn target(&self, color: RgbColor) -> Target {
        Target::new(color)
    }

    fn distance(&self, target: &Target, candidate: RgbColor) -> f64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Squared Euclidean distance on raw sRGB channels.
    Rgb,
    /// Squared CIE76 ΔE.
    Cie76,
    /// CIE94 ΔE with graphic-arts weights.
    #[default]
    Cie94,
}

impl FromStr for Metric {
    type Err = RemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" | "rgb_euclidean" => Ok(Self::Rgb),
            "cie76" | "de76" | "deltae76" | "lab" => Ok(Self::Cie76),
            "cie94" | "de94" | "deltae94" => Ok(Self::Cie94),
            _ => Err(RemapError::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb => "rgb",
            Self::Cie76 => "cie76",
            Self::Cie94 => "cie94",
        };
        f.write_str(name)
    }
}

impl Distance for Metric {
    #[inline]
    fn distance(&self, target: &Target, candidate: RgbColor) -> f64 {
        match self {
            Self::Rgb => rgb_sq(target.rgb, candidate) as f64,
            Self::Cie76 => cie76(&target.lab, &candidate.to_lab()),
            Self::Cie94 => cie94_with_chroma(&target.lab, target.chroma, &candidate.to_lab()),
        }
    }
}

#[inline]
fn chroma(lab: &LabColor) -> f64 {
    (lab.a * lab.a + lab.b * lab.b).sqrt()
}

#[inline]
pub fn rgb_sq(a: RgbColor, b: RgbColor) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Squared ΔE76. The square root is skipped since only ordering is used.
#[inline]
pub fn cie76(a: &LabColor, b: &LabColor) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}

/// ΔE94 of `b` relative to the reference color `a`. Not symmetric: the
/// chroma weights come from `a` only.
pub fn cie94(a: &LabColor, b: &LabColor) -> f64 {
    cie94_with_chroma(a, chroma(a), b)
}

fn cie94_with_chroma(a: &LabColor, c1: f64, b: &LabColor) -> f64 {
    let c2 = chroma(b);
    let dl = b.l - a.l;
    let dc = c2 - c1;
    let de = cie76(a, b).sqrt();

    // ΔH² can only be trusted when ΔE clearly dominates ΔL and ΔC
    let dh = if de.sqrt() > dl.abs().sqrt() + dc.abs().sqrt() {
        (de * de - dl * dl - dc * dc).sqrt()
    } else {
        0.0
    };

    let sc = 1.0 + 0.045 * c1;
    let sh = 1.0 + 0.015 * c1;
    let dc = dc / sc;
    let dh = dh / sh;
    (dl * dl + dc * dc + dh * dh).sqrt()
}

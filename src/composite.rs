//! Host-side compositing of the mesh layer over the background color.
//!
//! The mesh buffer is always opaque; layer opacity and blend mode are applied
//! here, the way a browser applies them to the canvas element.

use clap::ValueEnum;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::RgbColor;
use crate::error::MeshError;

/// Separable CSS `mix-blend-mode` values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }

    /// Blend one channel, backdrop `cb` and source `cs` in `0..=1`.
    pub fn apply(&self, cb: f32, cs: f32) -> f32 {
        let v = match self {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cb * cs,
            BlendMode::Screen => cb + cs - cb * cs,
            BlendMode::Overlay => BlendMode::HardLight.apply(cs, cb),
            BlendMode::Darken => cb.min(cs),
            BlendMode::Lighten => cb.max(cs),
            BlendMode::ColorDodge => {
                if cb <= 0.0 {
                    0.0
                } else if cs >= 1.0 {
                    1.0
                } else {
                    (cb / (1.0 - cs)).min(1.0)
                }
            }
            BlendMode::ColorBurn => {
                if cb >= 1.0 {
                    1.0
                } else if cs <= 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - cb) / cs).min(1.0)
                }
            }
            BlendMode::HardLight => {
                if cs <= 0.5 {
                    cb * 2.0 * cs
                } else {
                    let s = 2.0 * cs - 1.0;
                    cb + s - cb * s
                }
            }
            BlendMode::SoftLight => {
                if cs <= 0.5 {
                    cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
                } else {
                    let d = if cb <= 0.25 {
                        ((16.0 * cb - 12.0) * cb + 4.0) * cb
                    } else {
                        cb.sqrt()
                    };
                    cb + (2.0 * cs - 1.0) * (d - cb)
                }
            }
            BlendMode::Difference => (cb - cs).abs(),
            BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        };
        v.clamp(0.0, 1.0)
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        BlendMode::all()
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| MeshError::UnknownBlendMode(s.to_string()))
    }
}

/// Composite one mesh pixel over the background.
#[inline]
pub fn composite_pixel(bg: RgbColor, mesh: (u8, u8, u8), blend: BlendMode, opacity: f32) -> RgbColor {
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |b: u8, s: u8| {
        let cb = b as f32 / 255.0;
        let blended = blend.apply(cb, s as f32 / 255.0);
        let out = cb + (blended - cb) * opacity;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };
    RgbColor::new(mix(bg.r, mesh.0), mix(bg.g, mesh.1), mix(bg.b, mesh.2))
}

/// Composite an upscaled mesh layer over `bg` in place. The result is opaque.
pub fn composite_over_background(layer: &mut RgbaImage, bg: RgbColor, blend: BlendMode, opacity: f32) {
    for px in layer.pixels_mut() {
        let [r, g, b, _] = px.0;
        let out = composite_pixel(bg, (r, g, b), blend, opacity);
        px.0 = [out.r, out.g, out.b, 255];
    }
}

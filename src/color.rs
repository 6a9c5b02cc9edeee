use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MeshError;
use crate::rng::{seeded_float, SeededRandom};

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000", "FF0000" or "#f00"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self { r, g, b })
            }
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self {
                    r: nibble(0)?,
                    g: nibble(1)?,
                    b: nibble(2)?,
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert HSL (hue in degrees, saturation/lightness in 0..=1) to RGB.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hsl = Hsl::new(hue.rem_euclid(360.0), saturation, lightness);
        let rgb: Srgb = hsl.into_color();
        Self {
            r: quantize(rgb.red),
            g: quantize(rgb.green),
            b: quantize(rgb.blue),
        }
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RgbColor::from_hex(s).ok_or_else(|| MeshError::InvalidColor(s.to_string()))
    }
}

impl Serialize for RgbColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RgbColor::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// How a palette turns random draws into colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteDefinition {
    /// Three draws per color: hue, saturation, lightness, each from its range.
    /// Hue ranges may run past 360 to wrap through red.
    Hues {
        hue: (f32, f32),
        saturation: (f32, f32),
        lightness: (f32, f32),
    },
    /// One draw per color, picking from the list without replacement
    /// until it is exhausted.
    Fixed(&'static [RgbColor]),
    /// One draw for the starting hue, then one jitter draw per color.
    /// Colors are spaced evenly around the wheel.
    Spread { saturation: f32, lightness: f32 },
}

pub struct NamedPalette {
    pub name: &'static str,
    pub definition: PaletteDefinition,
}

const PASTEL: &[RgbColor] = &[
    RgbColor::new(0xff, 0xb3, 0xba),
    RgbColor::new(0xff, 0xdf, 0xba),
    RgbColor::new(0xff, 0xff, 0xba),
    RgbColor::new(0xba, 0xff, 0xc9),
    RgbColor::new(0xba, 0xe1, 0xff),
    RgbColor::new(0xe0, 0xbb, 0xe4),
    RgbColor::new(0xfe, 0xc8, 0xd8),
    RgbColor::new(0xd5, 0xaa, 0xff),
];

const NEON: &[RgbColor] = &[
    RgbColor::new(0xff, 0x00, 0xff),
    RgbColor::new(0x00, 0xff, 0xff),
    RgbColor::new(0x39, 0xff, 0x14),
    RgbColor::new(0xff, 0x31, 0x31),
    RgbColor::new(0xff, 0xf0, 0x1f),
    RgbColor::new(0xbc, 0x13, 0xfe),
];

const CANDY: &[RgbColor] = &[
    RgbColor::new(0xff, 0x6f, 0xb5),
    RgbColor::new(0xff, 0xa6, 0xc9),
    RgbColor::new(0x8e, 0xd1, 0xfc),
    RgbColor::new(0xc3, 0xa6, 0xff),
    RgbColor::new(0xff, 0xd1, 0x66),
];

/// All built-in palettes, in display order.
pub static PALETTES: &[NamedPalette] = &[
    NamedPalette {
        name: "pastel",
        definition: PaletteDefinition::Fixed(PASTEL),
    },
    NamedPalette {
        name: "vibrant",
        definition: PaletteDefinition::Spread {
            saturation: 0.9,
            lightness: 0.55,
        },
    },
    NamedPalette {
        name: "sunset",
        definition: PaletteDefinition::Hues {
            hue: (330.0, 405.0),
            saturation: (0.75, 0.95),
            lightness: (0.5, 0.65),
        },
    },
    NamedPalette {
        name: "ocean",
        definition: PaletteDefinition::Hues {
            hue: (180.0, 240.0),
            saturation: (0.6, 0.9),
            lightness: (0.35, 0.6),
        },
    },
    NamedPalette {
        name: "forest",
        definition: PaletteDefinition::Hues {
            hue: (80.0, 160.0),
            saturation: (0.45, 0.75),
            lightness: (0.3, 0.5),
        },
    },
    NamedPalette {
        name: "neon",
        definition: PaletteDefinition::Fixed(NEON),
    },
    NamedPalette {
        name: "aurora",
        definition: PaletteDefinition::Hues {
            hue: (120.0, 300.0),
            saturation: (0.6, 0.9),
            lightness: (0.45, 0.65),
        },
    },
    NamedPalette {
        name: "candy",
        definition: PaletteDefinition::Fixed(CANDY),
    },
    NamedPalette {
        name: "ember",
        definition: PaletteDefinition::Hues {
            hue: (0.0, 45.0),
            saturation: (0.85, 1.0),
            lightness: (0.4, 0.55),
        },
    },
    NamedPalette {
        name: "mono",
        definition: PaletteDefinition::Hues {
            hue: (0.0, 0.0),
            saturation: (0.0, 0.0),
            lightness: (0.15, 0.85),
        },
    },
    NamedPalette {
        name: "rainbow",
        definition: PaletteDefinition::Spread {
            saturation: 0.85,
            lightness: 0.6,
        },
    },
];

/// Look up a built-in palette by (case-insensitive) name.
pub fn palette_by_name(name: &str) -> Option<&'static NamedPalette> {
    let name = name.trim();
    PALETTES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

pub fn palette_names() -> impl Iterator<Item = &'static str> {
    PALETTES.iter().map(|p| p.name)
}

/// Name of the palette following `name` in [`PALETTES`], wrapping around.
pub fn next_palette_name(name: &str) -> &'static str {
    let current = PALETTES
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .map(|i| i + 1)
        .unwrap_or(0);
    PALETTES[current % PALETTES.len()].name
}

/// Produce `count` colors from `definition`, consuming draws from `rng`
/// in the order documented on [`PaletteDefinition`].
pub fn generate_palette_colors(
    definition: &PaletteDefinition,
    count: usize,
    rng: &mut SeededRandom,
) -> Vec<RgbColor> {
    match *definition {
        PaletteDefinition::Hues {
            hue,
            saturation,
            lightness,
        } => (0..count)
            .map(|_| {
                let h = seeded_float(rng, hue.0 as f64, hue.1 as f64);
                let s = seeded_float(rng, saturation.0 as f64, saturation.1 as f64);
                let l = seeded_float(rng, lightness.0 as f64, lightness.1 as f64);
                RgbColor::from_hsl(h as f32, s as f32, l as f32)
            })
            .collect(),
        PaletteDefinition::Fixed(colors) => {
            if colors.is_empty() {
                return Vec::new();
            }
            // Partial Fisher-Yates: colors repeat only once the list is used up.
            let mut pool = colors.to_vec();
            let len = pool.len();
            (0..count)
                .map(|i| {
                    let k = i % len;
                    let offset = (rng.next_f64() * (len - k) as f64) as usize;
                    pool.swap(k, k + offset.min(len - k - 1));
                    pool[k]
                })
                .collect()
        }
        PaletteDefinition::Spread {
            saturation,
            lightness,
        } => {
            let start = seeded_float(rng, 0.0, 360.0);
            let step = 360.0 / count.max(1) as f64;
            (0..count)
                .map(|i| {
                    let jitter = seeded_float(rng, -15.0, 15.0);
                    let h = start + step * i as f64 + jitter;
                    RgbColor::from_hsl(h as f32, saturation, lightness)
                })
                .collect()
        }
    }
}

/// Generate colors for a palette by name.
///
/// An unknown name yields no colors at all; callers render an empty mesh
/// rather than falling back to some default palette.
pub fn generate_named_palette(name: &str, count: usize, rng: &mut SeededRandom) -> Vec<RgbColor> {
    match palette_by_name(name) {
        Some(palette) => generate_palette_colors(&palette.definition, count, rng),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn hex_parsing_accepts_long_and_short_forms() {
        assert_eq!(RgbColor::from_hex("#FF8000"), Some(RgbColor::new(255, 128, 0)));
        assert_eq!(RgbColor::from_hex("ff8000"), Some(RgbColor::new(255, 128, 0)));
        assert_eq!(RgbColor::from_hex("#f80"), Some(RgbColor::new(255, 136, 0)));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn hex_round_trips_through_display() {
        let c: RgbColor = "#0a0b0c".parse().unwrap();
        assert_eq!(c.to_string(), "#0a0b0c");
    }

    #[test]
    fn invalid_hex_is_a_typed_error() {
        let err = "nope".parse::<RgbColor>().unwrap_err();
        assert_eq!(err, MeshError::InvalidColor("nope".to_string()));
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(RgbColor::from_hsl(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hsl(120.0, 1.0, 0.5), RgbColor::new(0, 255, 0));
        assert_eq!(RgbColor::from_hsl(600.0, 1.0, 0.5), RgbColor::new(0, 0, 255));
    }

    #[test]
    fn every_palette_yields_requested_count() {
        for palette in PALETTES {
            for count in 2..=4 {
                let mut rng = SeededRandom::new(11);
                let colors = generate_palette_colors(&palette.definition, count, &mut rng);
                assert_eq!(colors.len(), count, "palette {}", palette.name);
            }
        }
    }

    #[test]
    fn draw_counts_are_fixed_per_kind() {
        let draws = |def: &PaletteDefinition, count: usize| {
            let mut rng = SeededRandom::new(3);
            generate_palette_colors(def, count, &mut rng);
            let next = rng.next_u32();
            let mut reference = SeededRandom::new(3);
            (1..=32).find(|_| reference.next_u32() == next).map(|n| n - 1)
        };
        let hues = palette_by_name("ocean").unwrap().definition;
        let fixed = palette_by_name("pastel").unwrap().definition;
        let spread = palette_by_name("vibrant").unwrap().definition;
        assert_eq!(draws(&hues, 3), Some(9));
        assert_eq!(draws(&fixed, 3), Some(3));
        assert_eq!(draws(&spread, 3), Some(4));
    }

    #[test]
    fn fixed_palettes_never_repeat_within_their_length() {
        for palette in PALETTES {
            let PaletteDefinition::Fixed(list) = palette.definition else {
                continue;
            };
            for seed in 1..500 {
                let mut rng = SeededRandom::new(seed);
                let colors = generate_palette_colors(&palette.definition, list.len(), &mut rng);
                let mut unique = colors.clone();
                unique.sort_by_key(|c| (c.r, c.g, c.b));
                unique.dedup();
                assert_eq!(unique.len(), list.len(), "{} seed {seed}", palette.name);
            }
        }
    }

    #[test]
    fn fixed_palette_cycles_past_its_length() {
        let mut rng = SeededRandom::new(9);
        let colors = generate_palette_colors(&PaletteDefinition::Fixed(CANDY), 7, &mut rng);
        assert_eq!(colors.len(), 7);
        assert!(colors.iter().all(|c| CANDY.contains(c)));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(palette_by_name("PASTEL").is_some());
        assert!(palette_by_name(" ocean ").is_some());
    }

    #[test]
    fn unknown_palette_produces_no_colors() {
        let mut rng = SeededRandom::new(1);
        assert!(generate_named_palette("plaid", 3, &mut rng).is_empty());
        // no draws consumed either
        assert_eq!(rng.next_u32(), SeededRandom::new(1).next_u32());
    }

    #[test]
    fn next_palette_wraps() {
        let last = PALETTES[PALETTES.len() - 1].name;
        assert_eq!(next_palette_name(last), PALETTES[0].name);
        assert_eq!(next_palette_name("pastel"), "vibrant");
        assert_eq!(next_palette_name("unknown"), PALETTES[0].name);
    }
}

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::cli::Args;
use crate::color::RgbColor;
use crate::composite::BlendMode;
use crate::display::DisplayMode;
use crate::error::MeshError;
use crate::mesh::AnimationMode;

pub const MIN_POINTS: usize = 2;
pub const MAX_POINTS: usize = 4;

/// Parameter bundle consumed by the mesh core. Read-only once handed over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshParams {
    pub seed: u32,
    pub points: usize,
    pub palette: String,
    pub animation: AnimationMode,
    /// Multiplier applied to elapsed seconds.
    pub speed: f64,
    /// Interpolation softness, 20 (sharp) to 200 (smooth).
    pub blur: f64,
    /// Spread of the control points around the center, typically 0.5 to 2.
    pub scale: f64,
    pub opacity: f32,
    pub blend: BlendMode,
    pub bg: RgbColor,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            seed: 42,
            points: 3,
            palette: "pastel".to_string(),
            animation: AnimationMode::Drift,
            speed: 1.0,
            blur: 100.0,
            scale: 1.0,
            opacity: 1.0,
            blend: BlendMode::Normal,
            bg: RgbColor::new(0x0f, 0x0f, 0x1a),
        }
    }
}

impl MeshParams {
    /// Clamp values into the ranges the core expects. The core itself does not
    /// reinterpret out-of-range point counts, so this is the only place they are fixed.
    pub fn validate(&mut self) {
        self.points = self.points.clamp(MIN_POINTS, MAX_POINTS);
        self.seed = self.seed.max(1);
        self.opacity = if self.opacity.is_finite() { self.opacity.clamp(0.0, 1.0) } else { 1.0 };
        self.speed = if self.speed.is_finite() { self.speed.max(0.0) } else { 1.0 };
        if !self.blur.is_finite() {
            self.blur = 100.0;
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            self.scale = 1.0;
        }
    }

    /// Whether switching from `self` to `other` requires new control points.
    pub fn needs_regeneration(&self, other: &MeshParams) -> bool {
        self.seed != other.seed
            || self.points != other.points
            || !self.palette.eq_ignore_ascii_case(&other.palette)
            || self.scale.to_bits() != other.scale.to_bits()
    }

    /// Whether switching to `other` changes the rasterized buffer itself.
    /// Opacity and blend are applied by the host when compositing.
    pub fn changes_buffer(&self, other: &MeshParams) -> bool {
        self.needs_regeneration(other)
            || self.animation != other.animation
            || self.blur.to_bits() != other.blur.to_bits()
            || self.bg != other.bg
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub fps: u32,
    /// Show the key/status line in the terminal preview
    pub show_status: bool,
    /// Headless run length in seconds (None = until ctrl-c)
    pub duration_secs: Option<f64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            fps: 60,
            show_status: true,
            duration_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Elapsed seconds (before the speed multiplier) to render
    pub time: f64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("mesh.png"),
            width: 1920,
            height: 1080,
            time: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mesh: MeshParams,
    pub display: DisplayConfig,
    pub snapshot: SnapshotConfig,
}

/// Parse size string like "1920x1080"
pub fn parse_size(s: &str) -> Result<(u32, u32), MeshError> {
    let invalid = || MeshError::InvalidSize(s.to_string());
    let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}

/// Fresh seed for the "randomize" action.
/// Only the configuration layer calls this; the mesh core is always explicitly seeded.
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(1..999_999)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.mesh.validate();
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/meshvibe/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("meshvibe").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Failed to parse config at {}: {}. Using defaults.", path.display(), e);
                None
            }
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r##"# Meshvibe Configuration
# This file is auto-generated. Edit as needed.

[mesh]
# Seed for colors, layout and motion (same seed = same mesh)
seed = 42
# Number of control points: 2, 3 or 4
points = 3
# Palette: pastel, vibrant, sunset, ocean, forest, neon, aurora, candy, ember, mono, rainbow
palette = "pastel"
# Animation: none, drift, orbit, breathe, wave
animation = "drift"
# Animation speed multiplier
speed = 1.0
# Blur 20 (distinct regions) to 200 (smooth blend)
blur = 100.0
# Point spread around the center (0.5-2.0)
scale = 1.0
# Layer opacity (0.0-1.0)
opacity = 1.0
# Blend mode: normal, multiply, screen, overlay, darken, lighten, color-dodge,
# color-burn, hard-light, soft-light, difference, exclusion
blend = "normal"
# Background color behind the mesh
bg = "#0f0f1a"

[display]
# Display mode: "terminal", "snapshot" or "headless"
mode = "terminal"
# Target frames per second
fps = 60
# Show the status line in terminal mode
show_status = true
# Headless run length in seconds (omit to run until ctrl-c)
# duration_secs = 10.0

[snapshot]
# PNG output path
output = "mesh.png"
# Output size in pixels
width = 1920
height = 1080
# Elapsed seconds to render
time = 0.0
"##
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &Args) -> Result<(), MeshError> {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps.max(1);
        }
        if args.no_status {
            self.display.show_status = false;
        }
        if let Some(duration) = args.duration {
            self.display.duration_secs = Some(duration);
        }

        let mesh = &mut self.mesh;
        if args.random_seed {
            mesh.seed = random_seed();
        } else if let Some(seed) = args.seed {
            mesh.seed = seed;
        }
        if let Some(points) = args.points {
            mesh.points = points;
        }
        if let Some(ref palette) = args.palette {
            mesh.palette = palette.clone();
        }
        if let Some(animation) = args.animation {
            mesh.animation = animation;
        }
        if let Some(speed) = args.speed {
            mesh.speed = speed;
        }
        if let Some(blur) = args.blur {
            mesh.blur = blur;
        }
        if let Some(scale) = args.scale {
            mesh.scale = scale;
        }
        if let Some(opacity) = args.opacity {
            mesh.opacity = opacity;
        }
        if let Some(blend) = args.blend {
            mesh.blend = blend;
        }
        if let Some(ref bg) = args.bg {
            mesh.bg = bg.parse()?;
        }
        mesh.validate();

        if let Some(ref output) = args.output {
            self.snapshot.output = output.clone();
        }
        if let Some(ref size) = args.size {
            let (w, h) = parse_size(size)?;
            self.snapshot.width = w;
            self.snapshot.height = h;
        }
        if let Some(time) = args.time {
            self.snapshot.time = time;
        }

        Ok(())
    }
}

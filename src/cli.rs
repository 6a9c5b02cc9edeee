use clap::Parser;
use std::path::PathBuf;

use crate::composite::BlendMode;
use crate::display::DisplayMode;
use crate::mesh::AnimationMode;

#[derive(Parser, Debug)]
#[command(name = "meshvibe")]
#[command(author, version, about = "Seeded mesh-gradient backgrounds for stream overlays")]
pub struct Args {
    /// Display mode: terminal, snapshot or headless
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Config file path (defaults to ~/.config/meshvibe/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// List built-in palettes and exit
    #[arg(long)]
    pub list_palettes: bool,

    /// Seed for colors, layout and motion
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// Pick a seed from the clock instead of --seed
    #[arg(long)]
    pub random_seed: bool,

    /// Number of control points (2-4)
    #[arg(short, long)]
    pub points: Option<usize>,

    /// Palette name
    #[arg(long)]
    pub palette: Option<String>,

    /// Animation mode
    #[arg(short, long)]
    pub animation: Option<AnimationMode>,

    /// Animation speed multiplier
    #[arg(long)]
    pub speed: Option<f64>,

    /// Blur, 20 (sharp) to 200 (smooth)
    #[arg(long)]
    pub blur: Option<f64>,

    /// Point spread around the center
    #[arg(long)]
    pub scale: Option<f64>,

    /// Layer opacity (0.0-1.0)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Blend mode of the mesh layer over the background
    #[arg(long)]
    pub blend: Option<BlendMode>,

    /// Background color as hex (#rrggbb or #rgb)
    #[arg(long)]
    pub bg: Option<String>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Hide the status line in terminal mode
    #[arg(long)]
    pub no_status: bool,

    /// Headless run length in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Snapshot output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Snapshot size as WIDTHxHEIGHT
    #[arg(long)]
    pub size: Option<String>,

    /// Snapshot time in seconds
    #[arg(short, long)]
    pub time: Option<f64>,
}

//! Seeded mesh-gradient backgrounds.
//!
//! A small integer seed fixes a handful of colored control points; an
//! animation model moves them over time and an inverse-distance-weighted
//! blend paints a 64x64 buffer that hosts upscale to full screen.

pub mod canvas;
pub mod cli;
pub mod color;
pub mod composite;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod rng;

pub use canvas::Canvas;
pub use color::RgbColor;
pub use config::{Config, MeshParams};
pub use error::MeshError;
pub use frame::{CancelHandle, FrameCallback, FrameDriver};
pub use mesh::{AnimationMode, ControlPoint, MeshInstance};
pub use rng::SeededRandom;

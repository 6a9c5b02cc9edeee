pub mod headless;
pub mod snapshot;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Live half-block preview in the terminal
    #[default]
    Terminal,
    /// Render one frame to a PNG file
    Snapshot,
    /// Drive the mesh without output and report frame timing
    Headless,
}

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::points::ControlPoint;
use crate::error::MeshError;

/// Motion model applied to every control point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Points stay at their base position; the mesh is rendered once.
    None,
    #[default]
    Drift,
    Orbit,
    Breathe,
    Wave,
}

impl AnimationMode {
    pub fn all() -> &'static [AnimationMode] {
        &[
            AnimationMode::None,
            AnimationMode::Drift,
            AnimationMode::Orbit,
            AnimationMode::Breathe,
            AnimationMode::Wave,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationMode::None => "none",
            AnimationMode::Drift => "drift",
            AnimationMode::Orbit => "orbit",
            AnimationMode::Breathe => "breathe",
            AnimationMode::Wave => "wave",
        }
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|m| m == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }

    pub fn is_static(&self) -> bool {
        matches!(self, AnimationMode::None)
    }

    /// Animated position of `point` at scaled time `t` (seconds x speed).
    ///
    /// Pure in `(point, t)`: replaying a sequence of `t` values replays the motion.
    pub fn position_at(&self, point: &ControlPoint, t: f64) -> (f64, f64) {
        match self {
            AnimationMode::None => (point.base_x, point.base_y),
            AnimationMode::Drift => (
                point.base_x + (t * point.drift_vx * 0.3 + point.angle).sin() * 0.15,
                point.base_y + (t * point.drift_vy * 0.3 + point.breathe_phase).cos() * 0.15,
            ),
            AnimationMode::Orbit => {
                let theta = t * point.orbit_speed + point.angle;
                (
                    0.5 + theta.cos() * point.radius,
                    0.5 + theta.sin() * point.radius,
                )
            }
            AnimationMode::Breathe => {
                let scale = 1.0 + 0.3 * (t * 0.5 + point.breathe_phase).sin();
                (
                    0.5 + (point.base_x - 0.5) * scale + (t * 0.2 + point.angle).sin() * 0.03,
                    0.5 + (point.base_y - 0.5) * scale + (t * 0.25 + point.angle).cos() * 0.03,
                )
            }
            AnimationMode::Wave => (
                point.base_x + (t * point.wave_freq + point.wave_phase).sin() * 0.12,
                point.base_y + (t * point.wave_freq * 0.7 + point.wave_phase).cos() * 0.08,
            ),
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "static" => Ok(Self::None),
            "drift" => Ok(Self::Drift),
            "orbit" => Ok(Self::Orbit),
            "breathe" => Ok(Self::Breathe),
            "wave" => Ok(Self::Wave),
            _ => Err(MeshError::UnknownAnimation(s.to_string())),
        }
    }
}

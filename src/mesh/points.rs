use std::f64::consts::TAU;

use crate::color::{generate_named_palette, RgbColor};
use crate::rng::{seeded_float, SeededRandom};

/// One gradient blob: a frozen base position, a color and the motion
/// parameters consumed by the animation models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub base_x: f64,
    pub base_y: f64,
    pub color: RgbColor,
    pub angle: f64,
    pub radius: f64,
    pub drift_vx: f64,
    pub drift_vy: f64,
    pub breathe_phase: f64,
    pub wave_freq: f64,
    pub wave_phase: f64,
    /// Signed angular speed in radians per second.
    pub orbit_speed: f64,
}

/// Radius of the ring the base positions are placed on.
#[inline]
pub fn spread_distance(scale: f64) -> f64 {
    0.15 + scale * 0.2
}

/// Build the control points for a seed in one ordered pass over a single RNG.
///
/// Draw order: palette colors, the base angle, then per point `dist` followed
/// by its motion parameters. An unknown palette produces an empty set.
pub fn generate_control_points(seed: u32, count: usize, palette: &str, scale: f64) -> Vec<ControlPoint> {
    let mut rng = SeededRandom::new(seed);

    let colors = generate_named_palette(palette, count, &mut rng);
    if colors.is_empty() {
        return Vec::new();
    }

    let angle_step = TAU / colors.len() as f64;
    let base_angle = seeded_float(&mut rng, 0.0, TAU);
    let spread = spread_distance(scale);

    colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| {
            let sector_angle = base_angle + angle_step * i as f64;
            let dist = seeded_float(&mut rng, 0.6 * spread, spread);

            let angle = seeded_float(&mut rng, 0.0, TAU);
            let radius = seeded_float(&mut rng, 0.08, 0.25);
            let drift_vx = seeded_float(&mut rng, -1.0, 1.0);
            let drift_vy = seeded_float(&mut rng, -1.0, 1.0);
            let breathe_phase = seeded_float(&mut rng, 0.0, TAU);
            let wave_freq = seeded_float(&mut rng, 0.2, 0.6);
            let wave_phase = seeded_float(&mut rng, 0.0, TAU);
            let orbit_speed = seeded_float(&mut rng, 0.3, 0.8);
            let orbit_speed = if rng.next_f64() < 0.5 { -orbit_speed } else { orbit_speed };

            ControlPoint {
                base_x: 0.5 + sector_angle.cos() * dist,
                base_y: 0.5 + sector_angle.sin() * dist,
                color,
                angle,
                radius,
                drift_vx,
                drift_vy,
                breathe_phase,
                wave_freq,
                wave_phase,
                orbit_speed,
            }
        })
        .collect()
}

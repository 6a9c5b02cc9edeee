//! Inverse-distance-weighted color field rasterizer.
//!
//! The field is evaluated on a small fixed grid; hosts upscale the result
//! with bilinear filtering, which is what makes 64x64 look smooth.

use super::points::ControlPoint;
use crate::canvas::Canvas;
use crate::color::RgbColor;

/// Side length of the square pixel buffer.
pub const MESH_RESOLUTION: usize = 64;

/// Blur range exposed to users. Values outside are clamped.
pub const BLUR_MIN: f64 = 20.0;
pub const BLUR_MAX: f64 = 200.0;

/// Interpolation exponent at [`BLUR_MIN`] and [`BLUR_MAX`].
pub const POWER_SHARP: f64 = 3.0;
pub const POWER_SOFT: f64 = 1.2;

/// Keeps weights finite when a pixel lands exactly on a point.
pub const WEIGHT_EPSILON: f64 = 1e-5;

/// Map user blur to the IDW exponent: linear, continuous, non-increasing.
pub fn blur_to_power(blur: f64) -> f64 {
    let blur = if blur.is_nan() { BLUR_MIN } else { blur.clamp(BLUR_MIN, BLUR_MAX) };
    POWER_SHARP - ((blur - BLUR_MIN) / (BLUR_MAX - BLUR_MIN)) * (POWER_SHARP - POWER_SOFT)
}

/// Weight of a sample at squared distance `dist_sq` for exponent `power`.
#[inline]
pub fn idw_weight(dist_sq: f64, power: f64) -> f64 {
    1.0 / (dist_sq.powf(power * 0.5) + WEIGHT_EPSILON)
}

/// Owns the pixel buffer and writes the blended field into it.
pub struct MeshRasterizer {
    canvas: Canvas,
    background: RgbColor,
    render_count: u64,
}

impl MeshRasterizer {
    pub fn new(background: RgbColor) -> Self {
        Self {
            canvas: Canvas::new(MESH_RESOLUTION, MESH_RESOLUTION),
            background,
            render_count: 0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn background(&self) -> RgbColor {
        self.background
    }

    pub fn set_background(&mut self, background: RgbColor) {
        self.background = background;
    }

    /// Number of times [`MeshRasterizer::render`] has run.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Blend `points` at the animated positions `xs`/`ys` into the buffer.
    ///
    /// Only the first `points.len()` entries of `xs`/`ys` are read. An empty
    /// point set, or any pixel whose blend is not finite, shows the background.
    pub fn render(&mut self, points: &[ControlPoint], xs: &[f64], ys: &[f64], blur: f64) {
        self.render_count += 1;

        let n = points.len().min(xs.len()).min(ys.len());
        if n == 0 {
            self.canvas.fill(self.background);
            return;
        }

        let power = blur_to_power(blur);
        let denom = (MESH_RESOLUTION - 1) as f64;
        let bg = self.background;

        for py in 0..MESH_RESOLUTION {
            let ny = py as f64 / denom;
            for px in 0..MESH_RESOLUTION {
                let nx = px as f64 / denom;

                let mut total = 0.0;
                let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);
                for i in 0..n {
                    let dx = nx - xs[i];
                    let dy = ny - ys[i];
                    let w = idw_weight(dx * dx + dy * dy, power);
                    let c = points[i].color;
                    total += w;
                    r += c.r as f64 * w;
                    g += c.g as f64 * w;
                    b += c.b as f64 * w;
                }

                match (channel(r, total), channel(g, total), channel(b, total)) {
                    (Some(r), Some(g), Some(b)) => self.canvas.put_pixel(px, py, r, g, b),
                    _ => self.canvas.put_pixel(px, py, bg.r, bg.g, bg.b),
                }
            }
        }
    }
}

#[inline]
fn channel(acc: f64, total: f64) -> Option<u8> {
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    let v = acc / total;
    v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
}

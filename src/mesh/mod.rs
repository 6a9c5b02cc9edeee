//! Procedural mesh-gradient engine.
//!
//! A [`MeshInstance`] turns a [`MeshParams`] bundle into control points once,
//! then on every frame resolves animated positions into a reusable scratch
//! arena and rasterizes them into its fixed 64x64 buffer.

mod animation;
mod points;
mod raster;
mod scratch;

pub use animation::AnimationMode;
pub use points::{generate_control_points, spread_distance, ControlPoint};
pub use raster::{
    blur_to_power, idw_weight, MeshRasterizer, BLUR_MAX, BLUR_MIN, MESH_RESOLUTION, WEIGHT_EPSILON,
};
pub use scratch::PositionScratch;

use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::color::palette_by_name;
use crate::config::MeshParams;
use crate::frame::FrameCallback;

pub struct MeshInstance {
    params: MeshParams,
    points: Vec<ControlPoint>,
    scratch: PositionScratch,
    rasterizer: MeshRasterizer,
    /// Host timestamp that `time_offset` was accumulated up to
    origin_ms: Option<f64>,
    /// Most recent host timestamp
    last_ms: Option<f64>,
    /// Scaled seconds elapsed before `origin_ms`, carried across speed changes
    time_offset: f64,
    /// A static mesh re-renders only while this is set
    dirty: bool,
}

impl MeshInstance {
    pub fn new(params: MeshParams) -> Self {
        let points = build_points(&params);
        let scratch = PositionScratch::with_len(points.len());
        let rasterizer = MeshRasterizer::new(params.bg);
        Self {
            params,
            points,
            scratch,
            rasterizer,
            origin_ms: None,
            last_ms: None,
            time_offset: 0.0,
            dirty: true,
        }
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn canvas(&self) -> &Canvas {
        self.rasterizer.canvas()
    }

    /// Animated positions from the most recent render.
    pub fn positions(&self) -> (&[f64], &[f64]) {
        (self.scratch.xs(), self.scratch.ys())
    }

    /// Rasterizer invocations since creation.
    pub fn render_count(&self) -> u64 {
        self.rasterizer.render_count()
    }

    /// Swap in new parameters. Seed, point count, palette or scale changes
    /// rebuild the control points; opacity and blend alone leave the buffer as is.
    pub fn update_params(&mut self, params: MeshParams) {
        let regenerate = self.params.needs_regeneration(&params);
        let repaint = self.params.changes_buffer(&params);
        self.rasterizer.set_background(params.bg);
        if params.speed.to_bits() != self.params.speed.to_bits() {
            self.rebase_time();
        }
        self.params = params;

        if regenerate {
            self.points = build_points(&self.params);
            if self.scratch.ensure_len(self.points.len()) {
                debug!("Position scratch grown to {}", self.points.len());
            }
            self.origin_ms = None;
            self.last_ms = None;
            self.time_offset = 0.0;
        }
        if repaint {
            self.dirty = true;
        }
    }

    /// Fold the time elapsed at the current speed into the offset so a new
    /// speed continues from the same position.
    fn rebase_time(&mut self) {
        if let (Some(origin), Some(last)) = (self.origin_ms, self.last_ms) {
            self.time_offset += (last - origin) / 1000.0 * self.params.speed;
            self.origin_ms = Some(last);
        }
    }

    /// Scaled animation time for a host timestamp.
    pub fn scaled_time(&self, timestamp_ms: f64) -> f64 {
        let origin = self.origin_ms.unwrap_or(timestamp_ms);
        self.time_offset + (timestamp_ms - origin) / 1000.0 * self.params.speed
    }

    /// Resolve positions at scaled time `t` and rasterize them.
    pub fn render_at(&mut self, t: f64) {
        let mode = self.params.animation;
        for (i, point) in self.points.iter().enumerate() {
            let (x, y) = mode.position_at(point, t);
            self.scratch.set(i, x, y);
        }
        self.rasterizer
            .render(&self.points, self.scratch.xs(), self.scratch.ys(), self.params.blur);
        self.dirty = false;
    }
}

impl FrameCallback for MeshInstance {
    fn on_frame(&mut self, timestamp_ms: f64) {
        if self.origin_ms.is_none() {
            self.origin_ms = Some(timestamp_ms);
        }
        self.last_ms = Some(timestamp_ms);
        if self.params.animation.is_static() && !self.dirty {
            return;
        }
        self.render_at(self.scaled_time(timestamp_ms));
    }
}

fn build_points(params: &MeshParams) -> Vec<ControlPoint> {
    if palette_by_name(&params.palette).is_none() {
        warn!("Unknown palette '{}', rendering background only", params.palette);
    }
    let points = generate_control_points(params.seed, params.points, &params.palette, params.scale);
    info!(
        "Generated {} control points (seed={}, palette={}, scale={})",
        points.len(),
        params.seed,
        params.palette,
        params.scale
    );
    points
}

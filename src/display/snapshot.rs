use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::info;

use crate::composite::composite_over_background;
use crate::config::{Config, MeshParams, SnapshotConfig};
use crate::mesh::MeshInstance;

/// Render the mesh at `snapshot.time` seconds, upscale it bilinearly to the
/// requested size and composite it over the background.
pub fn render_snapshot(params: &MeshParams, snapshot: &SnapshotConfig) -> RgbaImage {
    let mut mesh = MeshInstance::new(params.clone());
    mesh.render_at(snapshot.time * params.speed);

    let mut image = mesh.canvas().upscale(snapshot.width, snapshot.height);
    composite_over_background(&mut image, params.bg, params.blend, params.opacity);
    image
}

pub fn run(config: Config) -> Result<()> {
    let snapshot = &config.snapshot;
    info!(
        "Rendering {}x{} snapshot at t={}s to {}",
        snapshot.width,
        snapshot.height,
        snapshot.time,
        snapshot.output.display()
    );

    let image = render_snapshot(&config.mesh, snapshot);
    image
        .save(&snapshot.output)
        .with_context(|| format!("Failed to write snapshot to {}", snapshot.output.display()))?;

    info!("Snapshot written to {}", snapshot.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbColor;
    use crate::composite::BlendMode;
    use crate::mesh::AnimationMode;

    fn small() -> SnapshotConfig {
        SnapshotConfig {
            width: 96,
            height: 54,
            ..SnapshotConfig::default()
        }
    }

    #[test]
    fn snapshot_has_requested_size_and_is_opaque() {
        let image = render_snapshot(&MeshParams::default(), &small());
        assert_eq!(image.dimensions(), (96, 54));
        assert!(image.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn snapshot_is_deterministic() {
        let params = MeshParams {
            animation: AnimationMode::Breathe,
            ..MeshParams::default()
        };
        let snap = SnapshotConfig { time: 3.5, ..small() };
        assert_eq!(render_snapshot(&params, &snap), render_snapshot(&params, &snap));
    }

    #[test]
    fn zero_opacity_is_pure_background() {
        let params = MeshParams {
            opacity: 0.0,
            bg: RgbColor::new(5, 6, 7),
            blend: BlendMode::Overlay,
            ..MeshParams::default()
        };
        let image = render_snapshot(&params, &small());
        assert!(image.pixels().all(|p| p.0 == [5, 6, 7, 255]));
    }

    #[test]
    fn time_moves_animated_snapshot() {
        let params = MeshParams {
            animation: AnimationMode::Orbit,
            ..MeshParams::default()
        };
        let a = render_snapshot(&params, &small());
        let b = render_snapshot(&params, &SnapshotConfig { time: 2.0, ..small() });
        assert_ne!(a, b);
    }

    #[test]
    fn writes_png_file() {
        let path = std::env::temp_dir().join(format!("meshvibe-test-{}.png", std::process::id()));
        let config = Config {
            snapshot: SnapshotConfig {
                output: path.clone(),
                ..small()
            },
            ..Config::default()
        };
        run(config).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (96, 54));
        std::fs::remove_file(path).ok();
    }
}

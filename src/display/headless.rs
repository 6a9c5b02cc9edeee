use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::Config;
use crate::frame::{run_at_fps, FrameDriver};
use crate::mesh::MeshInstance;

/// Summary of a headless run.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessReport {
    pub frames: u64,
    pub renders: u64,
    pub elapsed: Duration,
    pub checksum: u64,
}

/// Drive the mesh at the configured fps with no output until the duration
/// elapses or ctrl-c is pressed.
pub async fn run(config: Config) -> Result<HeadlessReport> {
    let fps = config.display.fps.max(1);
    let mut driver = FrameDriver::register(MeshInstance::new(config.mesh.clone()));

    let handle = driver.handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        handle.cancel();
    });

    if let Some(secs) = config.display.duration_secs {
        let handle = driver.handle();
        let limit = Duration::from_secs_f64(secs.max(0.0));
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            handle.cancel();
        });
    }

    info!("Headless run at {} fps (ctrl-c to stop)", fps);
    let started = Instant::now();
    let frames = run_at_fps(&mut driver, fps).await;
    let elapsed = started.elapsed();

    let mesh = driver.callback();
    let report = HeadlessReport {
        frames,
        renders: mesh.render_count(),
        elapsed,
        checksum: mesh.canvas().checksum(),
    };

    info!(
        "{} frames, {} renders in {:.2}s ({:.1} fps), checksum {:016x}",
        report.frames,
        report.renders,
        elapsed.as_secs_f64(),
        report.frames as f64 / elapsed.as_secs_f64().max(1e-9),
        report.checksum
    );

    Ok(report)
}

//! Frame scheduling contract.
//!
//! A callback is registered with a [`FrameDriver`], receives a monotonically
//! increasing timestamp on every tick, and stops receiving ticks once the
//! driver is cancelled. Cancellation never interrupts a tick in progress; it
//! only prevents the next one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

/// Something that runs once per visual frame.
pub trait FrameCallback {
    fn on_frame(&mut self, timestamp_ms: f64);
}

impl<F: FnMut(f64)> FrameCallback for F {
    fn on_frame(&mut self, timestamp_ms: f64) {
        self(timestamp_ms)
    }
}

/// Shared cancellation flag. Cloneable so signal handlers and other tasks
/// can stop a driver they do not own.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds one registered callback and forwards ticks to it until cancelled.
pub struct FrameDriver<C> {
    callback: C,
    cancel: CancelHandle,
    frames: u64,
}

impl<C: FrameCallback> FrameDriver<C> {
    pub fn register(callback: C) -> Self {
        Self {
            callback,
            cancel: CancelHandle::default(),
            frames: 0,
        }
    }

    pub fn handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Deliver one frame. Returns `false` without invoking the callback once
    /// the driver has been cancelled.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.callback.on_frame(timestamp_ms);
        self.frames += 1;
        true
    }

    /// Ticks delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    pub fn into_inner(self) -> C {
        self.callback
    }
}

/// Drive `driver` from a tokio interval at `fps` until it is cancelled.
/// Late ticks are skipped rather than bunched up. Returns the frame count.
pub async fn run_at_fps<C: FrameCallback>(driver: &mut FrameDriver<C>, fps: u32) -> u64 {
    let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let origin = Instant::now();

    loop {
        ticker.tick().await;
        let timestamp_ms = origin.elapsed().as_secs_f64() * 1000.0;
        if !driver.tick(timestamp_ms) {
            break;
        }
    }

    debug!("Frame driver stopped after {} frames", driver.frames());
    driver.frames()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_reach_callback_until_cancelled() {
        let mut seen = Vec::new();
        {
            let mut driver = FrameDriver::register(|ts: f64| seen.push(ts));
            assert!(driver.tick(0.0));
            assert!(driver.tick(16.0));
            driver.cancel();
            assert!(!driver.tick(32.0));
            assert_eq!(driver.frames(), 2);
        }
        assert_eq!(seen, vec![0.0, 16.0]);
    }

    #[test]
    fn external_handle_cancels() {
        let mut count = 0;
        let mut driver = FrameDriver::register(|_: f64| count += 1);
        let handle = driver.handle();
        driver.tick(1.0);
        handle.cancel();
        assert!(driver.is_cancelled());
        driver.tick(2.0);
        drop(driver);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn interval_runner_stops_on_cancel() {
        let mut driver = FrameDriver::register(|_: f64| {});
        let handle = driver.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            handle.cancel();
        });
        let frames = run_at_fps(&mut driver, 200).await;
        assert!(frames >= 1);
        assert!(driver.is_cancelled());
    }

    #[tokio::test]
    async fn interval_timestamps_increase() {
        let mut stamps = Vec::new();
        let mut driver = FrameDriver::register(|ts: f64| stamps.push(ts));
        let handle = driver.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        });
        run_at_fps(&mut driver, 240).await;
        drop(driver);
        assert!(stamps.windows(2).all(|w| w[1] >= w[0]));
    }
}

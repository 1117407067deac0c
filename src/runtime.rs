//! Tokio frame driver for viewport animations
//!
//! A [`SharedViewport`] puts the state behind a mutex so an input thread and
//! the driver task can both reach it. The [`FrameDriver`] ticks the animations
//! at the configured frame rate while any are running and parks otherwise.

use crate::core::config::FrameTimingConfig;
use crate::core::viewport::{TransformSnapshot, ViewportState};
use crate::input::events::GestureEvent;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Viewport state shared between the input side and the frame driver
///
/// The state's listener is invoked while the lock is held. A listener that
/// calls back into the same `SharedViewport` deadlocks; hand snapshots off
/// through a channel instead.
#[derive(Clone)]
pub struct SharedViewport {
    state: Arc<Mutex<ViewportState>>,
    wake: Arc<Notify>,
}

impl SharedViewport {
    pub fn new(state: ViewportState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Runs `f` with exclusive access, waking the driver if animations are pending afterwards.
    pub fn with<R>(&self, f: impl FnOnce(&mut ViewportState) -> R) -> R {
        let (result, animating) = self.lock(|state| {
            let result = f(state);
            (result, state.is_animating())
        });
        if animating {
            self.wake.notify_one();
        }
        result
    }

    pub fn handle(&self, event: GestureEvent) {
        self.with(|state| state.handle(event));
    }

    pub fn snapshot(&self) -> TransformSnapshot {
        self.lock(|state| state.snapshot())
    }

    pub fn is_animating(&self) -> bool {
        self.lock(|state| state.is_animating())
    }

    /// Detaches the viewport and lets a parked driver exit.
    pub fn detach(&self) {
        self.lock(|state| state.detach());
        self.wake.notify_one();
    }

    fn lock<R>(&self, f: impl FnOnce(&mut ViewportState) -> R) -> R {
        // a panicking listener must not take the viewport down with it
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Spawns the animation loop onto the current tokio runtime
pub struct FrameDriver;

impl FrameDriver {
    pub fn spawn(shared: SharedViewport, timing: FrameTimingConfig) -> DriverHandle {
        let frame = timing.frame_duration();
        log::debug!("Spawning frame driver at {} fps", timing.target_fps);
        DriverHandle(tokio::spawn(run_frames(shared, frame)))
    }
}

async fn run_frames(shared: SharedViewport, frame: Duration) {
    loop {
        let (animating, detached) = shared.lock(|state| (state.is_animating(), state.is_detached()));
        if detached {
            break;
        }
        if !animating {
            shared.wake.notified().await;
            continue;
        }

        let mut ticker = tokio::time::interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;
        let mut last = Instant::now();

        loop {
            ticker.tick().await;
            let now = Instant::now();
            let delta = now - last;
            last = now;

            let running = shared.lock(|state| state.advance(delta));
            if !running {
                log::trace!("Animations settled, parking frame driver");
                break;
            }
        }
    }
    log::debug!("Frame driver stopped");
}

/// Handle to the spawned frame driver
pub struct DriverHandle(JoinHandle<()>);

impl DriverHandle {
    /// Waits for the driver to stop, which happens once the viewport is detached.
    pub async fn join(self) {
        if let Err(err) = self.0.await {
            if !err.is_cancelled() {
                log::warn!("Frame driver failed: {}", err);
            }
        }
    }
}

impl AsyncHandle for DriverHandle {
    fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    fn cancel(&self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{interpolation::EasingFunction, spec::AnimationSpec};
    use crate::core::builder::ViewportBuilder;
    use crate::core::geo::Size;

    fn shared() -> SharedViewport {
        let state = ViewportBuilder::new(1000, 1000)
            .with_layout_size(Size::new(500, 500))
            .build()
            .unwrap();
        SharedViewport::new(state)
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_animation_to_completion() {
        let shared = shared();
        let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());

        shared.with(|state| {
            state.smooth_scale_to(
                2.0,
                Some(AnimationSpec::tween(Duration::from_millis(100), EasingFunction::Linear)),
            )
        });
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(shared.snapshot().scale, 2.0);
        assert!(!shared.is_animating());
        assert!(!driver.is_finished());
        driver.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_forwards_frames_through_channel() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let state = ViewportBuilder::new(1000, 1000)
            .with_layout_size(Size::new(500, 500))
            .with_listener(move |snapshot: &TransformSnapshot| {
                let _ = tx.send(*snapshot);
            })
            .build()
            .unwrap();
        let shared = SharedViewport::new(state);
        while rx.try_recv().is_ok() {}
        let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());

        shared.with(|state| {
            state.smooth_scale_to(
                2.0,
                Some(AnimationSpec::tween(Duration::from_millis(100), EasingFunction::Linear)),
            )
        });
        tokio::time::sleep(Duration::from_millis(250)).await;

        // the receiving side may lock the viewport freely
        let mut last = None;
        while let Ok(snapshot) = rx.try_recv() {
            last = Some(snapshot);
        }
        assert_eq!(last, Some(shared.snapshot()));
        assert_eq!(shared.snapshot().scale, 2.0);
        driver.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_stops_after_detach() {
        let shared = shared();
        let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());

        shared.with(|state| state.smooth_scale_to(2.0, None));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(shared.is_animating());

        shared.detach();
        driver.join().await;
        assert!(!shared.is_animating());
    }
}

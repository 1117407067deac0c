//! Cooperative animation scheduler.
//!
//! The [`Animator`] never touches viewport state itself. Each call to
//! [`Animator::advance`] moves every active motion forward by the frame delta
//! and hands back the samples, in start order, for the owner to apply.

use crate::animation::motion::{Motion, MotionSample};
use std::time::Duration;

/// Handle returned when an animation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct ActiveAnimation {
    id: AnimationId,
    epoch: u64,
    motion: Motion,
    elapsed: Duration,
}

/// One sample produced by [`Animator::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub id: AnimationId,
    pub sample: MotionSample,
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct Animator {
    next_id: u64,
    active: Vec<ActiveAnimation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a motion under `epoch`. Its first sample is produced by the next `advance`.
    pub fn start(&mut self, motion: Motion, epoch: u64) -> AnimationId {
        self.next_id += 1;
        let id = AnimationId(self.next_id);
        log::debug!("Starting {} animation {:?} (epoch {})", motion.name(), id, epoch);
        self.active.push(ActiveAnimation {
            id,
            epoch,
            motion,
            elapsed: Duration::ZERO,
        });
        id
    }

    pub fn cancel(&mut self, id: AnimationId) -> bool {
        let before = self.active.len();
        self.active.retain(|animation| animation.id != id);
        let cancelled = self.active.len() != before;
        if cancelled {
            log::debug!("Cancelled animation {:?}", id);
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        if !self.active.is_empty() {
            log::debug!("Cancelling {} animation(s)", self.active.len());
        }
        self.active.clear();
    }

    /// Number of registered animations.
    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.active.iter().any(|animation| animation.id == id)
    }

    /// True while a fling started under `epoch` is still registered.
    pub fn has_fling(&self, epoch: u64) -> bool {
        self.active
            .iter()
            .any(|animation| animation.epoch == epoch && animation.motion.is_fling())
    }

    /// Advances all animations by `delta`.
    ///
    /// Animations whose epoch differs from `current_epoch` were superseded by a
    /// gesture: they are retired here and produce no frame.
    pub fn advance(&mut self, delta: Duration, current_epoch: u64) -> Vec<AnimationFrame> {
        let mut frames = Vec::with_capacity(self.active.len());

        self.active.retain_mut(|animation| {
            if animation.epoch != current_epoch {
                log::trace!("Retiring superseded animation {:?}", animation.id);
                return false;
            }
            animation.elapsed += delta;
            let (sample, finished) = animation.motion.sample(animation.elapsed);
            frames.push(AnimationFrame {
                id: animation.id,
                sample,
                finished,
            });
            !finished
        });

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{interpolation::EasingFunction, spec::AnimationSpec};

    fn tween_scale(to: f64) -> Motion {
        Motion::Scale {
            from: 1.0,
            to,
            spec: AnimationSpec::tween(Duration::from_millis(100), EasingFunction::Linear),
        }
    }

    #[test]
    fn test_advance_produces_frames_until_finished() {
        let mut animator = Animator::new();
        let id = animator.start(tween_scale(2.0), 0);

        let frames = animator.advance(Duration::from_millis(50), 0);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, id);
        assert!(!frames[0].finished);

        let frames = animator.advance(Duration::from_millis(50), 0);
        assert!(frames[0].finished);
        assert_eq!(frames[0].sample, MotionSample::Scale(2.0));
        assert!(animator.is_idle());
    }

    #[test]
    fn test_stale_epoch_is_retired_without_frames() {
        let mut animator = Animator::new();
        let stale = animator.start(tween_scale(2.0), 0);
        let current = animator.start(tween_scale(3.0), 1);

        let frames = animator.advance(Duration::from_millis(10), 1);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, current);
        assert!(!animator.is_running(stale));
        assert!(animator.is_running(current));
    }

    #[test]
    fn test_cancel_and_cancel_all() {
        let mut animator = Animator::new();
        let a = animator.start(tween_scale(2.0), 0);
        let b = animator.start(tween_scale(3.0), 0);

        assert!(animator.cancel(a));
        assert!(!animator.cancel(a));
        assert!(animator.is_running(b));

        animator.cancel_all();
        assert!(animator.is_idle());
        assert!(animator.advance(Duration::from_millis(16), 0).is_empty());
    }

    #[test]
    fn test_frames_keep_start_order() {
        let mut animator = Animator::new();
        let first = animator.start(tween_scale(2.0), 0);
        let second = animator.start(tween_scale(4.0), 0);
        let frames = animator.advance(Duration::from_millis(16), 0);
        let ids: Vec<_> = frames.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}

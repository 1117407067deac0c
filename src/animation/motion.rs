use crate::animation::{
    decay::ExponentialDecay,
    interpolation::Interpolatable,
    spec::AnimationSpec,
};
use crate::core::geo::{AngleDegree, Offset, Velocity};
use std::time::Duration;

/// What an animation drives on the viewport
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Scale only, scroll untouched
    Scale {
        from: f64,
        to: f64,
        spec: AnimationSpec,
    },
    /// Rotation only; interpolated linearly between the raw angles
    Rotation {
        from: AngleDegree,
        to: AngleDegree,
        spec: AnimationSpec,
    },
    /// Scale and scroll sharing one progress value
    ScaleAndScroll {
        from_scale: f64,
        to_scale: f64,
        from_scroll: Offset,
        to_scroll: Offset,
        spec: AnimationSpec,
    },
    /// Inertial scroll after a drag is released
    Fling {
        origin: Offset,
        velocity: Velocity,
        decay: ExponentialDecay,
    },
}

/// Value a motion produced for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSample {
    Scale(f64),
    Rotation(AngleDegree),
    ScaleAndScroll { scale: f64, scroll: Offset },
    Scroll(Offset),
}

impl Motion {
    /// Samples the motion `elapsed` after it started. The flag is true on the final frame.
    pub fn sample(&self, elapsed: Duration) -> (MotionSample, bool) {
        match self {
            Motion::Scale { from, to, spec } => {
                let (progress, finished) = spec.progress_at(elapsed);
                (MotionSample::Scale(from.lerp(to, progress)), finished)
            }
            Motion::Rotation { from, to, spec } => {
                let (progress, finished) = spec.progress_at(elapsed);
                (MotionSample::Rotation(from.lerp(to, progress)), finished)
            }
            Motion::ScaleAndScroll {
                from_scale,
                to_scale,
                from_scroll,
                to_scroll,
                spec,
            } => {
                let (progress, finished) = spec.progress_at(elapsed);
                let sample = MotionSample::ScaleAndScroll {
                    scale: from_scale.lerp(to_scale, progress),
                    scroll: from_scroll.lerp(to_scroll, progress),
                };
                (sample, finished)
            }
            Motion::Fling {
                origin,
                velocity,
                decay,
            } => {
                let (scroll, finished) = decay.offset_at(*origin, *velocity, elapsed);
                (MotionSample::Scroll(scroll), finished)
            }
        }
    }

    pub fn is_fling(&self) -> bool {
        matches!(self, Motion::Fling { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Motion::Scale { .. } => "scale",
            Motion::Rotation { .. } => "rotation",
            Motion::ScaleAndScroll { .. } => "scale+scroll",
            Motion::Fling { .. } => "fling",
        }
    }
}

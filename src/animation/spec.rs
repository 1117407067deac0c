//! Animation curves that drive a unit progress value from 0 to 1.
//!
//! Springs are evaluated with their closed-form solution, so sampling is
//! frame-rate independent: any `elapsed` can be queried directly.

use crate::animation::interpolation::EasingFunction;
use crate::core::constants::{
    DAMPING_RATIO_NO_BOUNCY, MAX_SPRING_DURATION_SECS, SPRING_VISIBILITY_THRESHOLD,
    STIFFNESS_HIGH, STIFFNESS_LOW, STIFFNESS_MEDIUM,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a progress value travels from 0 to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationSpec {
    /// Physics spring starting at rest
    Spring(SpringSpec),
    /// Fixed duration with an easing curve
    Tween(TweenSpec),
    /// Jump straight to the end on the first tick
    Snap,
}

impl AnimationSpec {
    pub fn spring(stiffness: f64) -> Self {
        Self::Spring(SpringSpec::new(DAMPING_RATIO_NO_BOUNCY, stiffness))
    }

    pub fn tween(duration: Duration, easing: EasingFunction) -> Self {
        Self::Tween(TweenSpec::new(duration, easing))
    }

    /// Samples progress after `elapsed`. The flag is true once the animation is over,
    /// in which case the value is exactly 1.
    pub fn progress_at(&self, elapsed: Duration) -> (f64, bool) {
        match self {
            AnimationSpec::Spring(spring) => spring.progress_at(elapsed),
            AnimationSpec::Tween(tween) => tween.progress_at(elapsed),
            AnimationSpec::Snap => (1.0, true),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            AnimationSpec::Spring(spring) => spring.is_valid(),
            AnimationSpec::Tween(_) | AnimationSpec::Snap => true,
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::spring(STIFFNESS_LOW)
    }
}

/// Damped harmonic oscillator with unit mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringSpec {
    /// 1.0 is critically damped, below oscillates, above is sluggish
    pub damping_ratio: f64,
    pub stiffness: f64,
}

impl SpringSpec {
    pub fn new(damping_ratio: f64, stiffness: f64) -> Self {
        Self {
            damping_ratio,
            stiffness,
        }
    }

    pub fn low() -> Self {
        Self::new(DAMPING_RATIO_NO_BOUNCY, STIFFNESS_LOW)
    }

    pub fn medium() -> Self {
        Self::new(DAMPING_RATIO_NO_BOUNCY, STIFFNESS_MEDIUM)
    }

    pub fn high() -> Self {
        Self::new(DAMPING_RATIO_NO_BOUNCY, STIFFNESS_HIGH)
    }

    pub fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.stiffness > 0.0
            && self.damping_ratio.is_finite()
            && self.damping_ratio >= 0.0
    }

    /// Displacement from the target and velocity at time `t` (seconds), for a
    /// spring released at rest one unit below its target.
    fn state_at(&self, t: f64) -> (f64, f64) {
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio.max(0.0);
        let initial = -1.0;

        if (zeta - 1.0).abs() < 1e-9 {
            let b = omega * initial;
            let decay = (-omega * t).exp();
            let displacement = (initial + b * t) * decay;
            let velocity = (b - omega * (initial + b * t)) * decay;
            (displacement, velocity)
        } else if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let b = zeta * omega * initial / damped;
            let decay = (-zeta * omega * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let shape = initial * cos + b * sin;
            let displacement = decay * shape;
            let velocity =
                decay * (-zeta * omega * shape + damped * (-initial * sin + b * cos));
            (displacement, velocity)
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c2 = -r1 * initial / (r2 - r1);
            let c1 = initial - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }

    pub fn progress_at(&self, elapsed: Duration) -> (f64, bool) {
        if !self.is_valid() {
            return (1.0, true);
        }
        let t = elapsed.as_secs_f64();
        if t >= MAX_SPRING_DURATION_SECS {
            return (1.0, true);
        }
        let (displacement, velocity) = self.state_at(t);
        if displacement.abs() < SPRING_VISIBILITY_THRESHOLD
            && velocity.abs() < SPRING_VISIBILITY_THRESHOLD
        {
            (1.0, true)
        } else {
            (1.0 + displacement, false)
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::low()
    }
}

/// Duration based animation, stored at millisecond granularity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingFunction,
}

impl TweenSpec {
    /// Sub-millisecond durations round down to zero, which snaps to the end value.
    pub fn new(duration: Duration, easing: EasingFunction) -> Self {
        Self {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            easing,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn progress_at(&self, elapsed: Duration) -> (f64, bool) {
        let duration = self.duration();
        if elapsed >= duration {
            return (1.0, true);
        }
        let t = elapsed.as_secs_f64() / duration.as_secs_f64();
        (self.easing.apply(t), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(spec: AnimationSpec) -> (Vec<f64>, Duration) {
        let frame = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        let mut values = Vec::new();
        loop {
            elapsed += frame;
            let (value, finished) = spec.progress_at(elapsed);
            values.push(value);
            if finished {
                return (values, elapsed);
            }
        }
    }

    #[test]
    fn test_critically_damped_spring_is_monotonic() {
        let (values, elapsed) = run_to_end(AnimationSpec::spring(STIFFNESS_LOW));
        assert_eq!(*values.last().unwrap(), 1.0);
        assert!(values.windows(2).all(|w| w[1] >= w[0] - 1e-12));
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    }

    #[test]
    fn test_stiffer_spring_settles_sooner() {
        let (_, low) = run_to_end(AnimationSpec::spring(STIFFNESS_LOW));
        let (_, medium) = run_to_end(AnimationSpec::spring(STIFFNESS_MEDIUM));
        assert!(medium < low);
    }

    #[test]
    fn test_bouncy_spring_overshoots_then_settles() {
        let spec = AnimationSpec::Spring(SpringSpec::new(0.3, STIFFNESS_MEDIUM));
        let (values, _) = run_to_end(spec);
        assert!(values.iter().any(|v| *v > 1.0));
        assert_eq!(*values.last().unwrap(), 1.0);
    }

    #[test]
    fn test_overdamped_spring_settles() {
        let spec = AnimationSpec::Spring(SpringSpec::new(2.0, STIFFNESS_MEDIUM));
        let (values, _) = run_to_end(spec);
        assert!(values.iter().all(|v| *v <= 1.0 + 1e-12));
        assert_eq!(*values.last().unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_spring_snaps() {
        let spec = AnimationSpec::Spring(SpringSpec::new(1.0, 0.0));
        assert_eq!(spec.progress_at(Duration::ZERO), (1.0, true));
    }

    #[test]
    fn test_tween_follows_duration() {
        let spec = AnimationSpec::tween(Duration::from_millis(100), EasingFunction::Linear);
        let (value, finished) = spec.progress_at(Duration::from_millis(50));
        assert!((value - 0.5).abs() < 1e-9);
        assert!(!finished);
        assert_eq!(spec.progress_at(Duration::from_millis(100)), (1.0, true));
    }

    #[test]
    fn test_tween_duration_in_whole_millis() {
        let sub_milli = TweenSpec::new(Duration::from_micros(900), EasingFunction::Linear);
        assert_eq!(sub_milli.duration_ms, 0);
        assert_eq!(AnimationSpec::Tween(sub_milli).progress_at(Duration::ZERO), (1.0, true));

        let huge = TweenSpec::new(Duration::MAX, EasingFunction::Linear);
        assert_eq!(huge.duration_ms, u64::MAX);
    }

    #[test]
    fn test_spec_json_shape() {
        let spec: AnimationSpec =
            serde_json::from_str(r#"{"type":"spring","damping_ratio":1.0,"stiffness":1500.0}"#)
                .unwrap();
        assert_eq!(spec, AnimationSpec::Spring(SpringSpec::medium()));

        let tween: AnimationSpec =
            serde_json::from_str(r#"{"type":"tween","duration_ms":300}"#).unwrap();
        assert_eq!(
            tween,
            AnimationSpec::tween(Duration::from_millis(300), EasingFunction::EaseOutCubic)
        );
    }
}

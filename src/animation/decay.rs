use crate::core::constants::{DECAY_BASE_FRICTION, DECAY_VELOCITY_THRESHOLD};
use crate::core::geo::{Offset, Velocity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential velocity decay used for flings.
///
/// Velocity falls off as `v0 * e^(friction * t)`; position is its integral.
/// The animation ends once the speed drops under `velocity_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExponentialDecay {
    /// Scales the base friction; larger values stop sooner
    pub friction_multiplier: f64,
    /// Speed (px/s) under which the motion is considered over
    pub velocity_threshold: f64,
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self {
            friction_multiplier: 1.0,
            velocity_threshold: DECAY_VELOCITY_THRESHOLD,
        }
    }
}

impl ExponentialDecay {
    pub fn new(friction_multiplier: f64, velocity_threshold: f64) -> Self {
        Self {
            friction_multiplier,
            velocity_threshold,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.friction_multiplier.is_finite()
            && self.friction_multiplier > 0.0
            && self.velocity_threshold.is_finite()
            && self.velocity_threshold > 0.0
    }

    fn friction(&self) -> f64 {
        DECAY_BASE_FRICTION * self.friction_multiplier
    }

    /// Time for `initial_velocity` to decay below the threshold.
    ///
    /// Saturates at `Duration::MAX` when the friction is too weak for the
    /// decay to end in representable time.
    pub fn duration(&self, initial_velocity: f64) -> Duration {
        if !self.is_valid() || initial_velocity.abs() <= self.velocity_threshold {
            return Duration::ZERO;
        }
        let secs = (self.velocity_threshold / initial_velocity.abs()).ln() / self.friction();
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    pub fn value_at(&self, initial_value: f64, initial_velocity: f64, elapsed: Duration) -> f64 {
        if !self.is_valid() {
            return initial_value;
        }
        let t = elapsed.min(self.duration(initial_velocity)).as_secs_f64();
        let friction = self.friction();
        initial_value + initial_velocity / friction * (friction * t).exp_m1()
    }

    pub fn velocity_at(&self, initial_velocity: f64, elapsed: Duration) -> f64 {
        if elapsed >= self.duration(initial_velocity) {
            return 0.0;
        }
        initial_velocity * (self.friction() * elapsed.as_secs_f64()).exp()
    }

    /// Resting position for an unbounded decay.
    pub fn target(&self, initial_value: f64, initial_velocity: f64) -> f64 {
        self.value_at(initial_value, initial_velocity, self.duration(initial_velocity))
    }

    /// Decays both axes independently; finished once both are.
    pub fn offset_at(&self, origin: Offset, velocity: Velocity, elapsed: Duration) -> (Offset, bool) {
        let value = Offset::new(
            self.value_at(origin.x, velocity.x, elapsed),
            self.value_at(origin.y, velocity.y, elapsed),
        );
        let finished =
            elapsed >= self.duration(velocity.x) && elapsed >= self.duration(velocity.y);
        (value, finished)
    }
}

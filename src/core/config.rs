//! Configuration for viewport limits, animation curves and frame timing.
//!
//! Every struct here deserializes with defaults for missing fields, so a
//! config file only needs to mention what it overrides.

use crate::animation::{decay::ExponentialDecay, spec::AnimationSpec};
use crate::core::constants::{DEFAULT_MAX_SCALE, DEFAULT_TARGET_FPS, STIFFNESS_MEDIUM};
use crate::core::geo::{AngleDegree, Offset};
use crate::{Result, ViewportError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy for deriving the smallest allowed scale from layout and image size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumScaleMode {
    /// Whole image visible, may letterbox
    #[default]
    Fit,
    /// Image covers the whole viewport, may crop
    Fill,
    /// Literal minimum scale
    Forced(f64),
}

impl MinimumScaleMode {
    /// Computes the minimum scale for a layout. Zero-sized layouts yield zero for
    /// `Fit` and `Fill`, which the scale floor then takes over.
    pub fn min_scale(&self, layout_width: f64, layout_height: f64, full_width: f64, full_height: f64) -> f64 {
        let min_scale_x = layout_width / full_width;
        let min_scale_y = layout_height / full_height;
        match self {
            MinimumScaleMode::Fit => min_scale_x.min(min_scale_y),
            MinimumScaleMode::Fill => min_scale_x.max(min_scale_y),
            MinimumScaleMode::Forced(scale) => *scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub minimum_scale_mode: MinimumScaleMode,
    pub max_scale: f64,
    /// Double-tap past `max_scale` wraps back to the minimum scale
    pub should_loop_scale: bool,
    /// Applied at construction; `0.0` means "as far out as allowed"
    pub initial_scale: Option<f64>,
    /// Normalized image point to center on once the layout is known
    pub initial_centroid: Option<Offset>,
    pub initial_rotation: AngleDegree,
    pub animation: AnimationConfig,
    pub frame: FrameTimingConfig,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            minimum_scale_mode: MinimumScaleMode::Fit,
            max_scale: DEFAULT_MAX_SCALE,
            should_loop_scale: false,
            initial_scale: None,
            initial_centroid: None,
            initial_rotation: 0.0,
            animation: AnimationConfig::default(),
            frame: FrameTimingConfig::default(),
        }
    }
}

impl ViewportConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values no clamping could make sense of.
    pub fn validate(&self) -> Result<()> {
        if !self.max_scale.is_finite() || self.max_scale <= 0.0 {
            return Err(ViewportError::InvalidScale(self.max_scale));
        }
        if let MinimumScaleMode::Forced(scale) = self.minimum_scale_mode {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ViewportError::InvalidScale(scale));
            }
        }
        if let Some(scale) = self.initial_scale {
            if scale.is_nan() {
                return Err(ViewportError::InvalidConfig("initial_scale is NaN".into()));
            }
        }
        if let Some(centroid) = self.initial_centroid {
            if !centroid.is_finite() {
                return Err(ViewportError::InvalidConfig(format!(
                    "initial_centroid must be finite, got {centroid:?}"
                )));
            }
        }
        if !self.initial_rotation.is_finite() {
            return Err(ViewportError::InvalidConfig(
                "initial_rotation must be finite".into(),
            ));
        }
        self.animation.validate()?;
        self.frame.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Curve for smooth operations that don't pass one explicitly
    pub default_spec: AnimationSpec,
    pub double_tap_spec: AnimationSpec,
    pub fling: ExponentialDecay,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_spec: AnimationSpec::default(),
            double_tap_spec: AnimationSpec::spring(STIFFNESS_MEDIUM),
            fling: ExponentialDecay::default(),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.default_spec.is_valid() {
            return Err(ViewportError::InvalidConfig(format!(
                "invalid default animation spec {:?}",
                self.default_spec
            )));
        }
        if !self.double_tap_spec.is_valid() {
            return Err(ViewportError::InvalidConfig(format!(
                "invalid double-tap animation spec {:?}",
                self.double_tap_spec
            )));
        }
        if !self.fling.is_valid() {
            return Err(ViewportError::InvalidConfig(format!(
                "invalid fling decay {:?}",
                self.fling
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTimingConfig {
    pub target_fps: u32,
}

impl Default for FrameTimingConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl FrameTimingConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(ViewportError::InvalidConfig("target_fps must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::spec::SpringSpec;

    #[test]
    fn test_minimum_scale_modes() {
        // 400x300 layout over a 1600x600 image
        assert_eq!(MinimumScaleMode::Fit.min_scale(400.0, 300.0, 1600.0, 600.0), 0.25);
        assert_eq!(MinimumScaleMode::Fill.min_scale(400.0, 300.0, 1600.0, 600.0), 0.5);
        assert_eq!(MinimumScaleMode::Forced(0.1).min_scale(400.0, 300.0, 1600.0, 600.0), 0.1);
    }

    #[test]
    fn test_defaults() {
        let config = ViewportConfig::default();
        assert_eq!(config.max_scale, 2.0);
        assert_eq!(config.minimum_scale_mode, MinimumScaleMode::Fit);
        assert_eq!(config.animation.double_tap_spec, AnimationSpec::Spring(SpringSpec::medium()));
        assert_eq!(config.frame.target_fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewportConfig::from_json(
            r#"{ "max_scale": 40.0, "minimum_scale_mode": { "forced": 0.5 }, "initial_centroid": { "x": 0.5, "y": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.max_scale, 40.0);
        assert_eq!(config.minimum_scale_mode, MinimumScaleMode::Forced(0.5));
        assert_eq!(config.initial_centroid, Some(Offset::new(0.5, 0.5)));
        assert!(!config.should_loop_scale);
    }

    #[test]
    fn test_json_round_trip_keeps_mode() {
        let config = ViewportConfig {
            minimum_scale_mode: MinimumScaleMode::Fill,
            ..Default::default()
        };
        let parsed = ViewportConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ViewportConfig::from_json(r#"{ "max_scale": 0.0 }"#),
            Err(ViewportError::InvalidScale(_))
        ));
        assert!(matches!(
            ViewportConfig::from_json(r#"{ "minimum_scale_mode": { "forced": -1.0 } }"#),
            Err(ViewportError::InvalidScale(_))
        ));
        assert!(matches!(
            ViewportConfig::from_json(r#"{ "frame": { "target_fps": 0 } }"#),
            Err(ViewportError::InvalidConfig(_))
        ));
        assert!(matches!(
            ViewportConfig::from_json("not json"),
            Err(ViewportError::Serialization(_))
        ));
    }
}

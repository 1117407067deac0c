//! Viewport builder for fluent configuration
//!
//! Collects limits, initial transform and animation curves into a
//! [`ViewportConfig`] and validates it once, at [`ViewportBuilder::build`].

use crate::{
    animation::{decay::ExponentialDecay, spec::AnimationSpec},
    core::{
        config::{FrameTimingConfig, MinimumScaleMode, ViewportConfig},
        geo::{AngleDegree, Offset, Size},
        viewport::{TransformSnapshot, ViewportState},
    },
    traits::{LayoutSizeChangeListener, NoopListener, StateChangeListener},
    Result,
};

/// Builder for creating and configuring [`ViewportState`] instances
pub struct ViewportBuilder {
    full_width: u32,
    full_height: u32,
    config: ViewportConfig,
    layout_size: Option<Size>,
    listener: Box<dyn StateChangeListener>,
}

impl ViewportBuilder {
    /// Start a builder for a `full_width` × `full_height` image
    pub fn new(full_width: u32, full_height: u32) -> Self {
        Self {
            full_width,
            full_height,
            config: ViewportConfig::default(),
            layout_size: None,
            listener: Box::new(NoopListener),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ViewportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_minimum_scale_mode(mut self, mode: MinimumScaleMode) -> Self {
        self.config.minimum_scale_mode = mode;
        self
    }

    pub fn with_max_scale(mut self, max_scale: f64) -> Self {
        self.config.max_scale = max_scale;
        self
    }

    /// Double-tap past the maximum wraps back to the minimum scale
    pub fn with_loop_scale(mut self, should_loop_scale: bool) -> Self {
        self.config.should_loop_scale = should_loop_scale;
        self
    }

    /// Initial scale. `0.0` starts as far out as the layout allows.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.config.initial_scale = Some(scale);
        self
    }

    /// Normalized image point to center once the layout is known
    pub fn with_centroid(mut self, x: f64, y: f64) -> Self {
        self.config.initial_centroid = Some(Offset::new(x, y));
        self
    }

    pub fn with_rotation(mut self, rotation: AngleDegree) -> Self {
        self.config.initial_rotation = rotation;
        self
    }

    pub fn with_default_animation(mut self, spec: AnimationSpec) -> Self {
        self.config.animation.default_spec = spec;
        self
    }

    pub fn with_double_tap_animation(mut self, spec: AnimationSpec) -> Self {
        self.config.animation.double_tap_spec = spec;
        self
    }

    pub fn with_fling_decay(mut self, decay: ExponentialDecay) -> Self {
        self.config.animation.fling = decay;
        self
    }

    pub fn with_frame_timing(mut self, frame: FrameTimingConfig) -> Self {
        self.config.frame = frame;
        self
    }

    /// Apply a layout size right after construction
    pub fn with_layout_size(mut self, size: Size) -> Self {
        self.layout_size = Some(size);
        self
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: StateChangeListener + 'static,
    {
        self.listener = Box::new(listener);
        self
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Build the viewport, validating the configuration
    pub fn build(self) -> Result<ViewportState> {
        let mut state = ViewportState::new(
            self.full_width,
            self.full_height,
            self.config,
            BoxedListener(self.listener),
        )?;
        if let Some(size) = self.layout_size {
            state.on_size_changed(size);
        }
        Ok(state)
    }
}

struct BoxedListener(Box<dyn StateChangeListener>);

impl StateChangeListener for BoxedListener {
    fn on_state_changed(&mut self, snapshot: &TransformSnapshot) {
        self.0.on_state_changed(snapshot);
    }
}

use crate::animation::{
    motion::{Motion, MotionSample},
    scheduler::{AnimationId, Animator},
    spec::AnimationSpec,
};
use crate::core::config::{AnimationConfig, MinimumScaleMode, ViewportConfig};
use crate::core::constants::SCALE_FLOOR;
use crate::core::geo::{modulo_degrees, to_radians, AngleDegree, Offset, Size, Velocity};
use crate::input::events::GestureEvent;
use crate::traits::{GestureListener, LayoutSizeChangeListener, StateChangeListener};
use crate::{Result, ViewportError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Everything the renderer reads after a notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformSnapshot {
    pub scale: f64,
    pub rotation: AngleDegree,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub layout_size: Size,
    pub full_width: u32,
    pub full_height: u32,
}

/// Scale, scroll and rotation of a viewport over a full-resolution image.
///
/// The transform is only ever mutated through the constraint-enforcing setters
/// ([`set_scale`](Self::set_scale), [`set_scroll`](Self::set_scroll),
/// [`set_rotation`](Self::set_rotation)). Each setter recomputes the derived
/// padding and centroid and fires exactly one notification.
///
/// Animations are owned by the state and move forward only when
/// [`advance`](Self::advance) is called, so gesture callbacks and animation
/// ticks always run on the same timeline.
pub struct ViewportState {
    full_width: u32,
    full_height: u32,

    minimum_scale_mode: MinimumScaleMode,
    /// Raw minimum derived from the mode; see `scale_bounds` for the applied one
    min_scale: f64,
    max_scale: f64,
    should_loop_scale: bool,

    scale: f64,
    rotation: AngleDegree,
    scroll_x: f64,
    scroll_y: f64,

    centroid_x: f64,
    centroid_y: f64,
    padding_x: f64,
    padding_y: f64,
    layout_size: Size,

    pending_centroid: Option<Offset>,
    animation: AnimationConfig,
    animator: Animator,
    /// Bumped by every gesture; animations from older epochs are retired
    epoch: u64,
    detached: bool,
    listener: Box<dyn StateChangeListener>,
}

impl fmt::Debug for ViewportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportState")
            .field("full_width", &self.full_width)
            .field("full_height", &self.full_height)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("scroll_x", &self.scroll_x)
            .field("scroll_y", &self.scroll_y)
            .field("layout_size", &self.layout_size)
            .field("min_scale", &self.min_scale())
            .field("max_scale", &self.max_scale)
            .field("animations", &self.animator.len())
            .finish_non_exhaustive()
    }
}

impl ViewportState {
    /// Creates the state for a `full_width` × `full_height` image.
    ///
    /// The transform starts at scale 1, no scroll and no rotation unless the
    /// config says otherwise. The layout is empty until the first
    /// [`on_size_changed`](LayoutSizeChangeListener::on_size_changed).
    pub fn new<L>(full_width: u32, full_height: u32, config: ViewportConfig, listener: L) -> Result<Self>
    where
        L: StateChangeListener + 'static,
    {
        if full_width == 0 || full_height == 0 {
            return Err(ViewportError::InvalidDimensions {
                width: full_width,
                height: full_height,
            });
        }
        config.validate()?;

        let mut state = Self {
            full_width,
            full_height,
            minimum_scale_mode: config.minimum_scale_mode,
            min_scale: 0.0,
            max_scale: config.max_scale,
            should_loop_scale: config.should_loop_scale,
            scale: 1.0,
            rotation: modulo_degrees(config.initial_rotation),
            scroll_x: 0.0,
            scroll_y: 0.0,
            centroid_x: 0.0,
            centroid_y: 0.0,
            padding_x: 0.0,
            padding_y: 0.0,
            layout_size: Size::default(),
            pending_centroid: config.initial_centroid,
            animation: config.animation,
            animator: Animator::new(),
            epoch: 0,
            detached: false,
            listener: Box::new(listener),
        };

        state.recalculate_min_scale();
        if let Some(scale) = config.initial_scale {
            state.scale = state.constrain_scale(scale);
        } else {
            state.scale = state.constrain_scale(state.scale);
        }
        state.update_padding();
        state.update_centroid();

        log::debug!(
            "Created viewport over {}x{} image (scale {}, max {})",
            full_width,
            full_height,
            state.scale,
            state.max_scale
        );
        Ok(state)
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> AngleDegree {
        self.rotation
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn scroll(&self) -> Offset {
        Offset::new(self.scroll_x, self.scroll_y)
    }

    pub fn centroid_x(&self) -> f64 {
        self.centroid_x
    }

    pub fn centroid_y(&self) -> f64 {
        self.centroid_y
    }

    /// Normalized image point currently at the viewport center.
    pub fn centroid(&self) -> Offset {
        Offset::new(self.centroid_x, self.centroid_y)
    }

    pub fn padding_x(&self) -> f64 {
        self.padding_x
    }

    pub fn padding_y(&self) -> f64 {
        self.padding_y
    }

    pub fn layout_size(&self) -> Size {
        self.layout_size
    }

    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    pub fn full_height(&self) -> u32 {
        self.full_height
    }

    /// Lowest scale the setters will accept.
    pub fn min_scale(&self) -> f64 {
        self.scale_bounds().0
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn minimum_scale_mode(&self) -> MinimumScaleMode {
        self.minimum_scale_mode
    }

    pub fn should_loop_scale(&self) -> bool {
        self.should_loop_scale
    }

    pub fn animation_config(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Largest scroll allowed on each axis at the current scale.
    pub fn max_scroll(&self) -> Offset {
        Offset::new(
            (self.full_width as f64 * self.scale - self.layout_size.width as f64).max(0.0),
            (self.full_height as f64 * self.scale - self.layout_size.height as f64).max(0.0),
        )
    }

    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            scale: self.scale,
            rotation: self.rotation,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            centroid_x: self.centroid_x,
            centroid_y: self.centroid_y,
            padding_x: self.padding_x,
            padding_y: self.padding_y,
            layout_size: self.layout_size,
            full_width: self.full_width,
            full_height: self.full_height,
        }
    }

    // ---------------------------------------------------------------------
    // Constrained setters
    // ---------------------------------------------------------------------

    /// Sets the scale, clamped into `[min_scale, max_scale]`.
    ///
    /// The scroll is re-clamped against the bounds of the new scale.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = self.constrain_scale(scale);
        self.scroll_x = self.constrain_scroll_x(self.scroll_x);
        self.scroll_y = self.constrain_scroll_y(self.scroll_y);
        self.update_padding();
        self.update_centroid();
        self.notify();
    }

    /// Sets the scroll, each axis clamped into `[0, max(0, full * scale - layout)]`.
    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.scroll_x = self.constrain_scroll_x(scroll_x);
        self.scroll_y = self.constrain_scroll_y(scroll_y);
        self.update_centroid();
        self.notify();
    }

    /// Sets the rotation, wrapped into `[0, 360)`. Non-finite angles are ignored.
    pub fn set_rotation(&mut self, angle: AngleDegree) {
        if angle.is_finite() {
            self.rotation = modulo_degrees(angle);
        }
        self.update_centroid();
        self.notify();
    }

    /// Scrolls so that the normalized image point (`x`, `y`) sits at the viewport center.
    pub fn set_centroid(&mut self, x: f64, y: f64) {
        let (scroll_x, scroll_y) = self.scroll_centering(x, y, self.scale);
        self.set_scroll(scroll_x, scroll_y);
    }

    pub fn set_min_scale_mode(&mut self, mode: MinimumScaleMode) {
        self.minimum_scale_mode = mode;
        self.recalculate_min_scale();
        self.set_scale(self.scale);
    }

    /// Changes the upper scale limit. Non-positive or NaN values are ignored.
    pub fn set_max_scale(&mut self, max_scale: f64) {
        if max_scale.is_nan() || max_scale <= 0.0 {
            log::warn!("Ignoring invalid max scale {}", max_scale);
            return;
        }
        self.max_scale = max_scale;
        self.set_scale(self.scale);
    }

    pub fn set_loop_scale(&mut self, should_loop_scale: bool) {
        self.should_loop_scale = should_loop_scale;
    }

    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: StateChangeListener + 'static,
    {
        self.listener = Box::new(listener);
    }

    // ---------------------------------------------------------------------
    // Animated operations
    // ---------------------------------------------------------------------

    /// Animates the scale to `scale` without maintaining the scroll position.
    ///
    /// `None` uses the configured default curve.
    pub fn smooth_scale_to(&mut self, scale: f64, spec: Option<AnimationSpec>) -> Option<AnimationId> {
        let current = self.scale;
        if self.detached || current <= 0.0 {
            return None;
        }
        let spec = spec.unwrap_or(self.animation.default_spec);
        Some(self.animator.start(
            Motion::Scale {
                from: current,
                to: scale,
                spec,
            },
            self.epoch,
        ))
    }

    pub fn smooth_rotate_to(&mut self, angle: AngleDegree, spec: Option<AnimationSpec>) -> Option<AnimationId> {
        if self.detached || !angle.is_finite() {
            return None;
        }
        let spec = spec.unwrap_or(self.animation.default_spec);
        Some(self.animator.start(
            Motion::Rotation {
                from: self.rotation,
                to: angle,
                spec,
            },
            self.epoch,
        ))
    }

    /// Animates to `dest_scale` while centering the viewport on the scroll
    /// position (`scroll_x`, `scroll_y`), expressed at the destination scale.
    pub fn slide_to_and_center_with_scale(
        &mut self,
        scroll_x: f64,
        scroll_y: f64,
        dest_scale: f64,
        spec: Option<AnimationSpec>,
    ) -> Option<AnimationId> {
        if self.detached {
            return None;
        }
        let to_scroll = Offset::new(
            scroll_x - self.layout_size.half_width(),
            scroll_y - self.layout_size.half_height(),
        );
        self.start_scale_and_scroll(dest_scale, to_scroll, spec)
    }

    /// Animates to `dest_scale` keeping the layout point (`focus_x`, `focus_y`) fixed.
    ///
    /// The destination is clamped into the scale limits first, so the focal
    /// point holds even when the request overshoots them.
    pub fn smooth_scale_with_focal_point(
        &mut self,
        focus_x: f64,
        focus_y: f64,
        dest_scale: f64,
        spec: Option<AnimationSpec>,
    ) -> Option<AnimationId> {
        if self.detached {
            return None;
        }
        let dest_scale = self.constrain_scale(dest_scale);
        let ratio = dest_scale / self.scale;
        let to_scroll = Offset::new(
            scroll_at_offset_and_scale(self.scroll_x, focus_x, ratio),
            scroll_at_offset_and_scale(self.scroll_y, focus_y, ratio),
        );
        self.start_scale_and_scroll(dest_scale, to_scroll, spec)
    }

    /// Animates so the normalized image point (`x`, `y`) ends up centered at `dest_scale`.
    pub fn smooth_scroll_to(
        &mut self,
        x: f64,
        y: f64,
        dest_scale: f64,
        spec: Option<AnimationSpec>,
    ) -> Option<AnimationId> {
        let dest_scale = self.constrain_scale(dest_scale);
        let scroll_x = x * self.full_width as f64 * dest_scale;
        let scroll_y = y * self.full_height as f64 * dest_scale;
        self.slide_to_and_center_with_scale(scroll_x, scroll_y, dest_scale, spec)
    }

    fn start_scale_and_scroll(
        &mut self,
        dest_scale: f64,
        to_scroll: Offset,
        spec: Option<AnimationSpec>,
    ) -> Option<AnimationId> {
        let spec = spec.unwrap_or(self.animation.default_spec);
        Some(self.animator.start(
            Motion::ScaleAndScroll {
                from_scale: self.scale,
                to_scale: dest_scale,
                from_scroll: self.scroll(),
                to_scroll,
                spec,
            },
            self.epoch,
        ))
    }

    /// Moves every animation forward by `delta` and applies the results.
    ///
    /// Returns whether animations are still running afterwards.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.animator.is_idle() {
            return false;
        }
        for frame in self.animator.advance(delta, self.epoch) {
            log::trace!("Animation {:?} tick: {:?}", frame.id, frame.sample);
            self.apply_sample(frame.sample);
        }
        !self.animator.is_idle()
    }

    fn apply_sample(&mut self, sample: MotionSample) {
        match sample {
            MotionSample::Scale(scale) => self.set_scale(scale),
            MotionSample::Rotation(angle) => self.set_rotation(angle),
            MotionSample::ScaleAndScroll { scale, scroll } => {
                // scroll bounds depend on the scale, so it goes first
                self.set_scale(scale);
                self.set_scroll(scroll.x, scroll.y);
            }
            MotionSample::Scroll(scroll) => self.set_scroll(scroll.x, scroll.y),
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    pub fn is_animation_running(&self, id: AnimationId) -> bool {
        self.animator.is_running(id)
    }

    /// True while a fling is in flight and no gesture has superseded it.
    pub fn is_flinging(&self) -> bool {
        self.animator.has_fling(self.epoch)
    }

    pub fn cancel_animation(&mut self, id: AnimationId) -> bool {
        self.animator.cancel(id)
    }

    pub fn cancel_all_animations(&mut self) {
        self.animator.cancel_all();
    }

    /// Stops accepting gesture and layout events and drops in-flight animations.
    pub fn detach(&mut self) {
        if !self.detached {
            log::debug!("Detaching viewport");
        }
        self.detached = true;
        self.animator.cancel_all();
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Forwards an input event to the matching callback.
    pub fn handle(&mut self, event: GestureEvent) {
        event.dispatch(self);
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Supersedes every running animation's visible effect.
    fn interrupt(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.listener.on_state_changed(&snapshot);
    }

    fn scale_bounds(&self) -> (f64, f64) {
        let upper = self.max_scale.max(SCALE_FLOOR);
        let lower = self.min_scale.max(SCALE_FLOOR).min(upper);
        (lower, upper)
    }

    fn constrain_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.scale;
        }
        let (lower, upper) = self.scale_bounds();
        scale.clamp(lower, upper)
    }

    fn constrain_scroll_x(&self, scroll_x: f64) -> f64 {
        if scroll_x.is_nan() {
            return self.scroll_x;
        }
        scroll_x.clamp(0.0, self.max_scroll().x)
    }

    fn constrain_scroll_y(&self, scroll_y: f64) -> f64 {
        if scroll_y.is_nan() {
            return self.scroll_y;
        }
        scroll_y.clamp(0.0, self.max_scroll().y)
    }

    fn scroll_centering(&self, x: f64, y: f64, scale: f64) -> (f64, f64) {
        (
            x * self.full_width as f64 * scale - self.layout_size.half_width(),
            y * self.full_height as f64 * scale - self.layout_size.half_height(),
        )
    }

    fn update_centroid(&mut self) {
        let scaled_width = self.full_width as f64 * self.scale;
        let scaled_height = self.full_height as f64 * self.scale;
        self.centroid_x = (self.scroll_x
            + self.layout_size.half_width().min(scaled_width / 2.0))
            / scaled_width;
        self.centroid_y = (self.scroll_y
            + self.layout_size.half_height().min(scaled_height / 2.0))
            / scaled_height;
    }

    fn update_padding(&mut self) {
        let scaled_width = self.full_width as f64 * self.scale;
        let scaled_height = self.full_height as f64 * self.scale;
        let layout_width = self.layout_size.width as f64;
        let layout_height = self.layout_size.height as f64;

        self.padding_x = if scaled_width >= layout_width {
            0.0
        } else {
            (layout_width - scaled_width) / 2.0
        };
        self.padding_y = if scaled_height >= layout_height {
            0.0
        } else {
            (layout_height - scaled_height) / 2.0
        };
    }

    fn recalculate_min_scale(&mut self) {
        let min_scale = self.minimum_scale_mode.min_scale(
            self.layout_size.width as f64,
            self.layout_size.height as f64,
            self.full_width as f64,
            self.full_height as f64,
        );
        if !min_scale.is_finite() || min_scale < 0.0 {
            log::warn!(
                "Minimum scale mode {:?} produced {}, falling back to the scale floor",
                self.minimum_scale_mode,
                min_scale
            );
            self.min_scale = 0.0;
        } else {
            self.min_scale = min_scale;
        }
        log::debug!(
            "Minimum scale for layout {}x{} is {} ({:?})",
            self.layout_size.width,
            self.layout_size.height,
            self.min_scale(),
            self.minimum_scale_mode
        );
    }
}

/// Scroll that keeps the layout point `offset` fixed across a scale change of `scale_ratio`.
fn scroll_at_offset_and_scale(scroll: f64, offset: f64, scale_ratio: f64) -> f64 {
    (scroll + offset) * scale_ratio - offset
}

impl GestureListener for ViewportState {
    fn on_scale_ratio(&mut self, scale_ratio: f64, centroid: Offset) {
        if self.detached {
            return;
        }
        self.interrupt();
        log::trace!("Pinch ratio {} around {:?}", scale_ratio, centroid);

        let former_scale = self.scale;
        let former_scroll = self.scroll();
        self.set_scale(self.scale * scale_ratio);

        // the clamped scale, not the raw ratio, decides where the focal point lands
        let effective_ratio = self.scale / former_scale;
        self.set_scroll(
            scroll_at_offset_and_scale(former_scroll.x, centroid.x, effective_ratio),
            scroll_at_offset_and_scale(former_scroll.y, centroid.y, effective_ratio),
        );
    }

    fn on_rotation_delta(&mut self, rotation_delta: f64) {
        if self.detached {
            return;
        }
        self.interrupt();
        self.set_rotation(self.rotation + rotation_delta);
    }

    fn on_scroll_delta(&mut self, scroll_delta: Offset) {
        if self.detached {
            return;
        }
        self.interrupt();

        let delta = scroll_delta.rotate(-to_radians(self.rotation));
        self.set_scroll(self.scroll_x - delta.x, self.scroll_y - delta.y);
    }

    fn on_fling(&mut self, velocity: Velocity) {
        if self.detached {
            return;
        }
        self.interrupt();
        if !velocity.is_finite() {
            return;
        }

        let velocity = velocity.rotate(-to_radians(self.rotation));
        log::trace!("Fling with map-space velocity {:?}", velocity);
        self.animator.start(
            Motion::Fling {
                origin: self.scroll(),
                velocity: velocity.negate(),
                decay: self.animation.fling,
            },
            self.epoch,
        );
    }

    fn on_tap(&mut self) {
        if self.detached {
            return;
        }
        self.interrupt();
    }

    fn on_double_tap(&mut self, offset: Offset) {
        if self.detached {
            return;
        }
        self.interrupt();

        let mut dest_scale = 2f64.powf((self.scale * 2.0).log2().floor());
        if self.should_loop_scale && dest_scale > self.max_scale {
            dest_scale = self.min_scale();
        }

        let angle_rad = -to_radians(self.rotation);
        let half_width = self.layout_size.half_width();
        let half_height = self.layout_size.half_height();
        let focus = if angle_rad == 0.0 {
            offset
        } else {
            // rotate the tap around the viewport center into the unrotated frame
            let (sin, cos) = angle_rad.sin_cos();
            Offset::new(
                half_height * sin + half_width * (1.0 - cos) + offset.x * cos - offset.y * sin,
                half_height * (1.0 - cos) - half_width * sin + offset.x * sin + offset.y * cos,
            )
        };

        let spec = self.animation.double_tap_spec;
        self.smooth_scale_with_focal_point(focus.x, focus.y, dest_scale, Some(spec));
    }
}

impl LayoutSizeChangeListener for ViewportState {
    fn on_size_changed(&mut self, size: Size) {
        if self.detached {
            return;
        }
        log::debug!("Layout size changed to {}x{}", size.width, size.height);
        self.layout_size = size;
        self.recalculate_min_scale();
        self.set_scale(self.scale);

        if !size.is_empty() {
            if let Some(centroid) = self.pending_centroid.take() {
                self.set_centroid(centroid.x, centroid.y);
            }
        }
    }
}

//! Seams between the viewport and its collaborators.
//!
//! The input layer drives a [`GestureListener`] and a [`LayoutSizeChangeListener`];
//! the renderer is told about changes through a single [`StateChangeListener`].

use crate::core::geo::{Offset, Size, Velocity};
use crate::core::viewport::TransformSnapshot;

/// Receives one notification per transform mutation, synchronously.
///
/// Behind a `SharedViewport` the listener runs with the state lock held, so it
/// must not call back into that viewport. Forward the snapshot instead.
pub trait StateChangeListener: Send {
    fn on_state_changed(&mut self, snapshot: &TransformSnapshot);
}

impl<F> StateChangeListener for F
where
    F: FnMut(&TransformSnapshot) + Send,
{
    fn on_state_changed(&mut self, snapshot: &TransformSnapshot) {
        self(snapshot)
    }
}

/// Listener that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl StateChangeListener for NoopListener {
    fn on_state_changed(&mut self, _snapshot: &TransformSnapshot) {}
}

/// Gesture callbacks, invoked in order on the viewport's timeline
pub trait GestureListener {
    /// Pinch: multiply the scale by `scale_ratio` around `centroid` (layout coordinates).
    fn on_scale_ratio(&mut self, scale_ratio: f64, centroid: Offset);

    fn on_rotation_delta(&mut self, rotation_delta: f64);

    /// Drag by `scroll_delta`, expressed in screen space.
    fn on_scroll_delta(&mut self, scroll_delta: Offset);

    fn on_fling(&mut self, velocity: Velocity);

    fn on_tap(&mut self);

    fn on_double_tap(&mut self, offset: Offset);
}

pub trait LayoutSizeChangeListener {
    fn on_size_changed(&mut self, size: Size);
}

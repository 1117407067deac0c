use crate::core::geo::{Offset, Size, Velocity};
use crate::traits::{GestureListener, LayoutSizeChangeListener};
use serde::{Deserialize, Serialize};

/// Input events recognized by a gesture detector, in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Pinch step around a focal point
    Pinch { scale_ratio: f64, centroid: Offset },
    /// Two-finger rotation step, in degrees
    Rotate { rotation_delta: f64 },
    /// Drag step, screen space
    Drag { delta: Offset },
    /// Drag released with velocity (pixels per second)
    Fling { velocity: Velocity },
    Tap,
    DoubleTap { position: Offset },
    /// Layout resized
    Resize { size: Size },
}

impl GestureEvent {
    /// Invoke the matching callback on `target`.
    pub fn dispatch<T>(self, target: &mut T)
    where
        T: GestureListener + LayoutSizeChangeListener + ?Sized,
    {
        match self {
            GestureEvent::Pinch {
                scale_ratio,
                centroid,
            } => target.on_scale_ratio(scale_ratio, centroid),
            GestureEvent::Rotate { rotation_delta } => target.on_rotation_delta(rotation_delta),
            GestureEvent::Drag { delta } => target.on_scroll_delta(delta),
            GestureEvent::Fling { velocity } => target.on_fling(velocity),
            GestureEvent::Tap => target.on_tap(),
            GestureEvent::DoubleTap { position } => target.on_double_tap(position),
            GestureEvent::Resize { size } => target.on_size_changed(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl GestureListener for Recorder {
        fn on_scale_ratio(&mut self, scale_ratio: f64, _centroid: Offset) {
            self.calls.push(format!("scale {scale_ratio}"));
        }
        fn on_rotation_delta(&mut self, rotation_delta: f64) {
            self.calls.push(format!("rotate {rotation_delta}"));
        }
        fn on_scroll_delta(&mut self, _scroll_delta: Offset) {
            self.calls.push("scroll".into());
        }
        fn on_fling(&mut self, _velocity: Velocity) {
            self.calls.push("fling".into());
        }
        fn on_tap(&mut self) {
            self.calls.push("tap".into());
        }
        fn on_double_tap(&mut self, _offset: Offset) {
            self.calls.push("double_tap".into());
        }
    }

    impl LayoutSizeChangeListener for Recorder {
        fn on_size_changed(&mut self, size: Size) {
            self.calls.push(format!("size {}x{}", size.width, size.height));
        }
    }

    #[test]
    fn test_dispatch_routes_to_callbacks() {
        let mut recorder = Recorder::default();
        let events = [
            GestureEvent::Resize {
                size: Size::new(10, 20),
            },
            GestureEvent::Pinch {
                scale_ratio: 2.0,
                centroid: Offset::ZERO,
            },
            GestureEvent::Rotate {
                rotation_delta: 15.0,
            },
            GestureEvent::Drag {
                delta: Offset::new(1.0, 1.0),
            },
            GestureEvent::Fling {
                velocity: Offset::new(100.0, 0.0),
            },
            GestureEvent::Tap,
            GestureEvent::DoubleTap {
                position: Offset::ZERO,
            },
        ];
        for event in events {
            event.dispatch(&mut recorder);
        }

        assert_eq!(
            recorder.calls,
            vec!["size 10x20", "scale 2", "rotate 15", "scroll", "fling", "tap", "double_tap"]
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event: GestureEvent =
            serde_json::from_str(r#"{ "type": "drag", "delta": { "x": 3.0, "y": -4.0 } }"#).unwrap();
        assert_eq!(
            event,
            GestureEvent::Drag {
                delta: Offset::new(3.0, -4.0)
            }
        );
    }
}

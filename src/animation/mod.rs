pub mod decay;
pub mod interpolation;
pub mod motion;
pub mod scheduler;
pub mod spec;

// Re-export commonly used types and functions for convenience
pub use decay::ExponentialDecay;
pub use interpolation::{lerp, EasingFunction, Interpolatable};
pub use motion::{Motion, MotionSample};
pub use scheduler::{AnimationFrame, AnimationId, Animator};
pub use spec::{AnimationSpec, SpringSpec, TweenSpec};

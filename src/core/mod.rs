pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

pub use builder::ViewportBuilder;
pub use config::{AnimationConfig, FrameTimingConfig, MinimumScaleMode, ViewportConfig};
pub use geo::{AngleDegree, Offset, Size, Velocity};
pub use viewport::{TransformSnapshot, ViewportState};

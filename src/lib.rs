//! # mapview
//!
//! Pan, zoom and rotate a bounded viewport over a very large tiled image.
//!
//! [`ViewportState`] owns the transform (scale, scroll, rotation) and keeps it
//! inside its limits whatever the input. Gestures arrive through
//! [`GestureListener`], layout changes through [`LayoutSizeChangeListener`],
//! and every change is reported to a [`StateChangeListener`] so the renderer
//! can work out which tiles to draw.
//!
//! Animations are driven by calling [`ViewportState::advance`] once per
//! frame, or by the tokio [`runtime::FrameDriver`].

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::ViewportBuilder,
    config::{MinimumScaleMode, ViewportConfig},
    geo::{Offset, Size, Velocity},
    viewport::{TransformSnapshot, ViewportState},
};

pub use animation::{AnimationId, AnimationSpec, EasingFunction, ExponentialDecay};

pub use input::events::GestureEvent;

pub use tiles::{TileCoord, TileStreamProvider, VisibleTiles, VisibleTilesResolver};

pub use traits::{GestureListener, LayoutSizeChangeListener, StateChangeListener};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ViewportError>;

/// Errors raised while building a viewport or loading its configuration.
///
/// Transform operations themselves never fail; out-of-range input is clamped.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = ViewportError;

/// Installs `env_logger`, honouring `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

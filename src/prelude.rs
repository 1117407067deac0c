//! Prelude module for common mapview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapview::prelude::*;`

pub use crate::core::{
    builder::ViewportBuilder,
    config::{AnimationConfig, FrameTimingConfig, MinimumScaleMode, ViewportConfig},
    geo::{AngleDegree, Offset, Size, Velocity},
    viewport::{TransformSnapshot, ViewportState},
};

pub use crate::animation::{
    AnimationId, AnimationSpec, EasingFunction, ExponentialDecay, SpringSpec, TweenSpec,
};

pub use crate::input::events::GestureEvent;

pub use crate::tiles::{
    fetch_tiles, FnTileProvider, TileCoord, TileStreamProvider, VisibleTiles, VisibleTilesResolver,
};

pub use crate::traits::{
    GestureListener, LayoutSizeChangeListener, NoopListener, StateChangeListener,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{AsyncHandle, DriverHandle, FrameDriver, SharedViewport};

pub use crate::{Error as ViewportError, Result};

pub use std::time::Duration;

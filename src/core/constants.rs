//! Engine-wide numeric defaults.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Smallest scale ever applied. Keeps `full_width * scale` strictly positive.
pub const SCALE_FLOOR: f64 = 1e-6;

/// Default upper scale limit (2× the full-resolution image).
pub const DEFAULT_MAX_SCALE: f64 = 2.0;

/// Spring stiffness used by programmatic smooth operations.
pub const STIFFNESS_LOW: f64 = 200.0;

/// Spring stiffness used by double-tap zoom.
pub const STIFFNESS_MEDIUM: f64 = 1500.0;

/// Spring stiffness for snappy UI feedback.
pub const STIFFNESS_HIGH: f64 = 10_000.0;

/// Damping ratio of a spring without overshoot.
pub const DAMPING_RATIO_NO_BOUNCY: f64 = 1.0;

/// Progress distance under which a spring counts as settled.
pub const SPRING_VISIBILITY_THRESHOLD: f64 = 1e-3;

/// Springs never run longer than this, even if badly configured.
pub const MAX_SPRING_DURATION_SECS: f64 = 10.0;

/// Base friction of the exponential fling decay, per second.
pub const DECAY_BASE_FRICTION: f64 = -4.2;

/// Fling stops once its velocity drops below this, in px/s.
pub const DECAY_VELOCITY_THRESHOLD: f64 = 0.1;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Default frame rate of the animation driver.
pub const DEFAULT_TARGET_FPS: u32 = 60;

use serde::{Deserialize, Serialize};

/// Angle expressed in degrees.
pub type AngleDegree = f64;

/// Represents a point or a vector in layout (screen) or scaled-map pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Gesture velocity in pixels per second.
pub type Velocity = Offset;

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Offset) -> Offset {
        Offset::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Offset) -> Offset {
        Offset::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Offset {
        Offset::new(self.x * scalar, self.y * scalar)
    }

    pub fn negate(&self) -> Offset {
        Offset::new(-self.x, -self.y)
    }

    pub fn distance_to(&self, other: &Offset) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotates this vector by `angle_rad` around the origin.
    ///
    /// An angle of exactly zero returns the vector untouched so that repeated
    /// unrotated drags never pick up trigonometric noise.
    pub fn rotate(&self, angle_rad: f64) -> Offset {
        if angle_rad == 0.0 {
            return *self;
        }
        let (sin, cos) = angle_rad.sin_cos();
        Offset::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Size of the visible window, in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f64 {
        self.width as f64 / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height as f64 / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Wraps an angle into `[0, 360)`.
pub fn modulo_degrees(angle: AngleDegree) -> AngleDegree {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn to_radians(angle: AngleDegree) -> f64 {
    angle.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo_degrees() {
        assert_eq!(modulo_degrees(370.0), 10.0);
        assert_eq!(modulo_degrees(-10.0), 350.0);
        assert_eq!(modulo_degrees(360.0), 0.0);
        assert_eq!(modulo_degrees(-1e-20), 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Offset::new(1.0, 0.0).rotate(std::f64::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let v = Offset::new(3.5, -2.25);
        assert_eq!(v.rotate(0.0), v);
    }
}

use fd_core::Real;
use serde::Deserialize;
use serde::Serialize;

/// Continuous position in world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: Real,
    pub y: Real,
}

impl Point2 {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
    pub fn translated(self, v: Vec2, dt: Real) -> Self {
        Self {
            x: self.x + v.x * dt,
            y: self.y + v.y * dt,
        }
    }
}

impl From<(Real, Real)> for Point2 {
    fn from((x, y): (Real, Real)) -> Self {
        Self { x, y }
    }
}

/// Velocity vector. Either zero or axis-aligned in this game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: Real,
    pub y: Real,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
    /// Zero vertical component means horizontal motion.
    pub fn is_horizontal(&self) -> bool {
        self.y == 0.0
    }
}

/// Normalized axis-aligned rectangle: `left <= right`, `top <= bottom`.
/// The y axis grows downward, matching the map grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect2 {
    pub left: Real,
    pub top: Real,
    pub right: Real,
    pub bottom: Real,
}

impl Rect2 {
    pub fn new(left: Real, top: Real, right: Real, bottom: Real) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
    /// Taller than wide.
    pub fn is_vertical(&self) -> bool {
        (self.bottom - self.top).abs() > (self.right - self.left).abs()
    }
    /// Wider than tall.
    pub fn is_horizontal(&self) -> bool {
        (self.bottom - self.top).abs() < (self.right - self.left).abs()
    }
}

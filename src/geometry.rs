//! 2-D position/vector primitives and the line-intersection helper the
//! off-screen remapper needs.

use std::ops::{Add, Mul, Neg, Sub};

/// A point (or direction) in chart logical space. Plays the role the
/// original planner gave to Python's `complex`, but as a real 2-D vector so
/// arithmetic never drifts into complex-number semantics nobody wants here.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Direction vectors share the same representation as positions.
pub type Vector = Vec2;
/// Points on screen share the same representation as directions.
pub type Position = Vec2;

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Magnitude (`|v|`).
    pub fn abs(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// `atan2(y, x)`, the angle this vector points at.
    pub fn argument(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn conjugate(self) -> Vec2 {
        Vec2::new(self.x, -self.y)
    }

    /// Rotate by `angle` radians, equivalent to multiplying by `e^{i*angle}`.
    pub fn rotate(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (a - b).abs()
}

/// Elementwise product of two vectors' components.
pub fn unit_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x, a.y * b.y)
}

/// The z-component of the 2-D cross product. Positive when `b` is
/// counter-clockwise from `a`.
pub fn det(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersection of two infinite lines, each given as a pair of distinct
/// points it passes through. `None` for parallel (or coincident) lines.
pub fn intersect(line1: (Vec2, Vec2), line2: (Vec2, Vec2)) -> Option<Vec2> {
    let dl1 = line1.0 - line1.1;
    let dl2 = line2.0 - line2.1;
    let xd = Vec2::new(dl1.x, dl2.x);
    let yd = Vec2::new(dl1.y, dl2.y);
    let di = det(xd, yd);
    if di == 0.0 {
        return None;
    }
    let d = Vec2::new(det(line1.0, line1.1), det(line2.0, line2.1));
    Some(Vec2::new(det(d, xd) / di, det(d, yd) / di))
}

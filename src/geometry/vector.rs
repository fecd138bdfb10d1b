//! 2D vector types
//!
//! `Vector2I` holds native board coordinates, `Vector2D` is the floating point
//! companion used for derived quantities (arc centers, projected points).
//! Angles are plain `f64` degrees, positive counter-clockwise.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

use super::extended::{narrow, round_to_coord, square, widen, Coord, SquaredCoord};

/// A point or displacement in native board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector2I {
    pub x: Coord,
    pub y: Coord,
}

/// A point or displacement in floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2I {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Squared length, exact for any native vector
    pub fn squared_norm(self) -> SquaredCoord {
        square(widen(self.x)) + square(widen(self.y))
    }

    pub fn norm(self) -> f64 {
        (self.squared_norm() as f64).sqrt()
    }

    /// Cross product (z component)
    pub fn cross(self, other: Vector2I) -> SquaredCoord {
        wide(self.x) * wide(other.y) - wide(self.y) * wide(other.x)
    }

    pub fn dot(self, other: Vector2I) -> SquaredCoord {
        wide(self.x) * wide(other.x) + wide(self.y) * wide(other.y)
    }

    pub fn to_f64(self) -> Vector2D {
        Vector2D::new(self.x as f64, self.y as f64)
    }

    pub fn distance(self, other: Vector2I) -> f64 {
        self.to_f64().distance(other.to_f64())
    }

    /// Squared distance; the per-axis gap is taken before squaring so it
    /// never wraps
    pub fn squared_distance(self, other: Vector2I) -> SquaredCoord {
        square(widen(self.x) - widen(other.x)) + square(widen(self.y) - widen(other.y))
    }
}

fn wide(v: Coord) -> SquaredCoord {
    SquaredCoord::from(v)
}

impl Vector2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn squared_norm(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn dot(self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn distance(self, other: Vector2D) -> f64 {
        (other - self).norm()
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(self) -> Vector2D {
        let n = self.norm();
        if n == 0.0 {
            Vector2D::default()
        } else {
            Vector2D::new(self.x / n, self.y / n)
        }
    }

    /// Vector rotated by +90 degrees
    pub fn perpendicular(self) -> Vector2D {
        Vector2D::new(-self.y, self.x)
    }

    /// Direction of this vector in degrees, in [0, 360)
    pub fn angle_deg(self) -> f64 {
        normalize_deg(self.y.atan2(self.x).to_degrees())
    }

    /// Rotate counter-clockwise around `center`
    pub fn rotated_around(self, center: Vector2D, angle_deg: f64) -> Vector2D {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let d = self - center;
        center + Vector2D::new(d.x * c - d.y * s, d.x * s + d.y * c)
    }

    /// Round to the nearest native point
    pub fn round(self) -> Vector2I {
        Vector2I::new(round_to_coord(self.x), round_to_coord(self.y))
    }

    pub fn lerp(self, other: Vector2D, t: f64) -> Vector2D {
        self + (other - self) * t
    }
}

impl From<Vector2I> for Vector2D {
    fn from(v: Vector2I) -> Self {
        v.to_f64()
    }
}

/// Panics with a coordinate overflow when the result leaves the native range
impl Add for Vector2I {
    type Output = Vector2I;
    #[track_caller]
    fn add(self, rhs: Vector2I) -> Vector2I {
        Vector2I::new(narrow(widen(self.x) + widen(rhs.x)), narrow(widen(self.y) + widen(rhs.y)))
    }
}

/// Panics with a coordinate overflow when the result leaves the native range
impl Sub for Vector2I {
    type Output = Vector2I;
    #[track_caller]
    fn sub(self, rhs: Vector2I) -> Vector2I {
        Vector2I::new(narrow(widen(self.x) - widen(rhs.x)), narrow(widen(self.y) - widen(rhs.y)))
    }
}

impl Neg for Vector2I {
    type Output = Vector2I;
    #[track_caller]
    fn neg(self) -> Vector2I {
        Vector2I::new(narrow(-widen(self.x)), narrow(-widen(self.y)))
    }
}

impl Add for Vector2D {
    type Output = Vector2D;
    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;
    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;
    fn mul(self, rhs: f64) -> Vector2D {
        Vector2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;
    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

/// Normalize an angle in degrees to [0, 360)
pub fn normalize_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Midpoint of two points
pub fn midpoint(a: Vector2D, b: Vector2D) -> Vector2D {
    Vector2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_products_do_not_overflow() {
        let v = Vector2I::new(Coord::MIN, Coord::MIN);
        assert_eq!(v.squared_norm(), 1i128 << 63);
        assert_eq!(v.dot(v), 1i128 << 63);
        assert_eq!(v.cross(Vector2I::new(Coord::MIN, Coord::MAX)), wide(Coord::MIN) * wide(Coord::MAX) - (1i128 << 62));
    }

    #[test]
    fn test_squared_distance_across_full_range() {
        let lo = Vector2I::new(Coord::MIN, Coord::MIN);
        let hi = Vector2I::new(Coord::MAX, Coord::MAX);
        let gap = (1i128 << 32) - 1;
        assert_eq!(lo.squared_distance(hi), 2 * gap * gap);
        assert_eq!(hi.squared_distance(lo), 2 * gap * gap);
        assert!((lo.distance(hi) - (2.0f64).sqrt() * gap as f64).abs() < 1.0);
    }

    #[test]
    #[should_panic(expected = "coordinate overflow")]
    fn test_sub_out_of_range_panics() {
        let _ = Vector2I::new(Coord::MIN, 0) - Vector2I::new(1, 0);
    }

    #[test]
    fn test_angle_deg() {
        assert!((Vector2D::new(0.0, 1.0).angle_deg() - 90.0).abs() < 1e-9);
        assert!((Vector2D::new(0.0, -1.0).angle_deg() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_around() {
        let p = Vector2D::new(10.0, 0.0).rotated_around(Vector2D::default(), 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_deg() {
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
    }
}

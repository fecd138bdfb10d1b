//! Idealized circle used by the arc math
//!
//! A `Circle` is the zero-width supporting curve of an arc or the boundary of
//! a round pad. All intersection queries return points on the curve itself.

use super::seg::Seg;
use super::vector::{Vector2D, Vector2I};

/// Relative tolerance for tangency decisions
const TANGENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vector2D,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vector2D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Nearest point on the circle to `p`.
    ///
    /// The center itself is equidistant from every point; the point at angle
    /// zero is returned in that case.
    pub fn nearest_point(&self, p: Vector2D) -> Vector2D {
        let d = p - self.center;
        if d.squared_norm() == 0.0 {
            return self.center + Vector2D::new(self.radius, 0.0);
        }
        self.center + d.normalized() * self.radius
    }

    /// Intersections with the infinite line through `a` and `b`
    pub fn intersect_line(&self, a: Vector2D, b: Vector2D) -> Vec<Vector2D> {
        let dir = b - a;
        let len2 = dir.squared_norm();
        if len2 == 0.0 {
            return Vec::new();
        }

        // Foot of perpendicular from the center
        let t0 = (self.center - a).dot(dir) / len2;
        let foot = a + dir * t0;
        let h2 = (foot - self.center).squared_norm();
        let r2 = self.radius * self.radius;

        if h2 > r2 * (1.0 + TANGENT_EPSILON) {
            return Vec::new();
        }

        let half_chord = (r2 - h2).max(0.0).sqrt();
        if half_chord <= self.radius * TANGENT_EPSILON {
            return vec![foot];
        }

        let step = dir * (half_chord / len2.sqrt());
        vec![foot - step, foot + step]
    }

    /// Intersections with a segment (endpoints included)
    pub fn intersect_segment(&self, seg: &Seg) -> Vec<Vector2D> {
        let a = seg.a.to_f64();
        let b = seg.b.to_f64();
        let dir = b - a;
        let len2 = dir.squared_norm();

        if len2 == 0.0 {
            let on_curve = (a.distance(self.center) - self.radius).abs() <= 0.5;
            return if on_curve { vec![a] } else { Vec::new() };
        }

        let tol = 1e-9;
        self.intersect_line(a, b)
            .into_iter()
            .filter(|p| {
                let t = (*p - a).dot(dir) / len2;
                (-tol..=1.0 + tol).contains(&t)
            })
            .collect()
    }

    /// Intersections with another circle
    pub fn intersect_circle(&self, other: &Circle) -> Vec<Vector2D> {
        let d_vec = other.center - self.center;
        let d = d_vec.norm();

        // Concentric circles either coincide or never meet; no finite set
        if d == 0.0 {
            return Vec::new();
        }

        let r0 = self.radius;
        let r1 = other.radius;
        let tol = (r0 + r1) * TANGENT_EPSILON;

        if d > r0 + r1 + tol || d < (r0 - r1).abs() - tol {
            return Vec::new();
        }

        let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
        let h = (r0 * r0 - a * a).max(0.0).sqrt();
        let unit = d_vec * (1.0 / d);
        let base = self.center + unit * a;

        if h <= tol {
            return vec![base];
        }

        let offset = unit.perpendicular() * h;
        vec![base + offset, base - offset]
    }

    /// True when `p` is inside or on the circle
    pub fn contains(&self, p: Vector2I) -> bool {
        p.to_f64().distance(self.center) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_through_circle() {
        let c = Circle::new(Vector2D::default(), 10.0);
        let seg = Seg::new(Vector2I::new(-20, 0), Vector2I::new(20, 0));
        let pts = c.intersect_segment(&seg);
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| (p.x + 10.0).abs() < 1e-9));
        assert!(pts.iter().any(|p| (p.x - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_segment_stops_short_of_circle() {
        let c = Circle::new(Vector2D::default(), 10.0);
        let seg = Seg::new(Vector2I::new(-5, 0), Vector2I::new(5, 0));
        assert!(c.intersect_segment(&seg).is_empty());
    }

    #[test]
    fn test_tangent_circles_meet_once() {
        let a = Circle::new(Vector2D::default(), 5.0);
        let b = Circle::new(Vector2D::new(10.0, 0.0), 5.0);
        let pts = a.intersect_circle(&b);
        assert_eq!(pts.len(), 1);
        assert!((pts[0].x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_point_from_center() {
        let c = Circle::new(Vector2D::new(1.0, 1.0), 2.0);
        let p = c.nearest_point(Vector2D::new(1.0, 1.0));
        assert!((p.distance(c.center) - 2.0).abs() < 1e-12);
    }
}

//! Line segment helper
//!
//! `Seg` is a zero-width segment between two native points. Orientation tests
//! use exact 128-bit integer arithmetic, distance queries use `f64`.

use serde::{Deserialize, Serialize};

use super::vector::{Vector2D, Vector2I};

/// A zero-width line segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Seg {
    pub a: Vector2I,
    pub b: Vector2I,
}

/// Sign of the cross product (b - a) x (c - a), computed exactly
pub fn orientation(a: Vector2I, b: Vector2I, c: Vector2I) -> i32 {
    let abx = i128::from(b.x) - i128::from(a.x);
    let aby = i128::from(b.y) - i128::from(a.y);
    let acx = i128::from(c.x) - i128::from(a.x);
    let acy = i128::from(c.y) - i128::from(a.y);
    match (abx * acy - aby * acx).signum() {
        1 => 1,
        -1 => -1,
        _ => 0,
    }
}

fn within_span(a: Vector2I, b: Vector2I, p: Vector2I) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

impl Seg {
    pub const fn new(a: Vector2I, b: Vector2I) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }

    pub fn center(&self) -> Vector2D {
        super::vector::midpoint(self.a.to_f64(), self.b.to_f64())
    }

    /// True when the two segments share at least one point (touching counts)
    pub fn intersects(&self, other: &Seg) -> bool {
        let d1 = orientation(other.a, other.b, self.a);
        let d2 = orientation(other.a, other.b, self.b);
        let d3 = orientation(self.a, self.b, other.a);
        let d4 = orientation(self.a, self.b, other.b);

        if d1 * d2 < 0 && d3 * d4 < 0 {
            return true;
        }

        (d1 == 0 && within_span(other.a, other.b, self.a))
            || (d2 == 0 && within_span(other.a, other.b, self.b))
            || (d3 == 0 && within_span(self.a, self.b, other.a))
            || (d4 == 0 && within_span(self.a, self.b, other.b))
    }

    /// Intersection point of two segments.
    ///
    /// Collinear overlapping segments return the first shared endpoint found.
    pub fn intersect(&self, other: &Seg) -> Option<Vector2D> {
        if !self.intersects(other) {
            return None;
        }

        let p = self.a.to_f64();
        let r = self.b.to_f64() - p;
        let q = other.a.to_f64();
        let s = other.b.to_f64() - q;
        let denom = r.cross(s);

        if denom == 0.0 {
            // Collinear (or degenerate): pick a shared endpoint
            for cand in [other.a, other.b] {
                if orientation(self.a, self.b, cand) == 0 && within_span(self.a, self.b, cand) {
                    return Some(cand.to_f64());
                }
            }
            for cand in [self.a, self.b] {
                if orientation(other.a, other.b, cand) == 0 && within_span(other.a, other.b, cand) {
                    return Some(cand.to_f64());
                }
            }
            return None;
        }

        let t = ((q - p).cross(s) / denom).clamp(0.0, 1.0);
        Some(p + r * t)
    }

    /// Nearest point on the segment to `p`
    pub fn nearest_point_d(&self, p: Vector2D) -> Vector2D {
        let a = self.a.to_f64();
        let ab = self.b.to_f64() - a;
        let len2 = ab.squared_norm();

        if len2 == 0.0 {
            return a;
        }

        let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
        a + ab * t
    }

    /// Nearest point on the segment to `p`, rounded to native coordinates
    pub fn nearest_point(&self, p: Vector2I) -> Vector2I {
        self.nearest_point_d(p.to_f64()).round()
    }

    pub fn distance_d(&self, p: Vector2D) -> f64 {
        self.nearest_point_d(p).distance(p)
    }

    pub fn distance(&self, p: Vector2I) -> f64 {
        self.distance_d(p.to_f64())
    }

    /// Foot of the perpendicular from `p` on the infinite supporting line
    pub fn line_project(&self, p: Vector2D) -> Vector2D {
        let a = self.a.to_f64();
        let ab = self.b.to_f64() - a;
        let len2 = ab.squared_norm();

        if len2 == 0.0 {
            return a;
        }

        a + ab * ((p - a).dot(ab) / len2)
    }

    /// Closest pair of points between two segments, `(on_self, on_other)`.
    ///
    /// Intersecting segments yield the intersection point on both sides.
    pub fn nearest_points(&self, other: &Seg) -> (Vector2D, Vector2D) {
        if let Some(p) = self.intersect(other) {
            return (p, p);
        }

        let mut best = (self.a.to_f64(), other.nearest_point_d(self.a.to_f64()));
        let mut best_d = best.0.distance(best.1);

        let mut consider = |pa: Vector2D, pb: Vector2D| {
            let d = pa.distance(pb);
            if d < best_d {
                best_d = d;
                best = (pa, pb);
            }
        };

        let b = self.b.to_f64();
        consider(b, other.nearest_point_d(b));

        let oa = other.a.to_f64();
        consider(self.nearest_point_d(oa), oa);

        let ob = other.b.to_f64();
        consider(self.nearest_point_d(ob), ob);

        best
    }

    /// True when both segments lie on the same infinite line
    pub fn collinear(&self, other: &Seg) -> bool {
        orientation(self.a, self.b, other.a) == 0 && orientation(self.a, self.b, other.b) == 0
    }

    pub fn reversed(&self) -> Seg {
        Seg::new(self.b, self.a)
    }
}

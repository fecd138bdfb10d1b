//! Axis-aligned bounding box
//!
//! `Box2I` is an `(origin, size)` rectangle in native coordinates. Any value
//! derived from `origin + size` is computed in extended precision and narrowed
//! on return. Sizes may be negative until [`Box2I::normalize`] is called;
//! predicates work on normalized copies so callers never have to.
//!
//! The y axis follows board coordinates: `top()` is the smaller y.

use serde::{Deserialize, Serialize};

use super::extended::{narrow, round_to_coord, square, widen, Coord, ExtCoord, SquaredCoord};
use super::seg::Seg;
use super::vector::{Vector2D, Vector2I};

/// Angle tolerance (degrees) for treating a rotation as axis aligned
const ROT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Box2I {
    origin: Vector2I,
    size: Vector2I,
    #[serde(default = "initialized_default")]
    initialized: bool,
}

fn initialized_default() -> bool {
    true
}

impl Box2I {
    pub fn new(origin: Vector2I, size: Vector2I) -> Self {
        Self {
            origin,
            size,
            initialized: true,
        }
    }

    /// The empty box: identity element for [`Box2I::merge`]
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Normalized box spanning two corners
    pub fn from_corners(a: Vector2I, b: Vector2I) -> Self {
        let mut bbox = Self::new(
            a,
            Vector2I::new(narrow(widen(b.x) - widen(a.x)), narrow(widen(b.y) - widen(a.y))),
        );
        bbox.normalize();
        bbox
    }

    /// Smallest box holding every point, or an uninitialized box for no points
    pub fn from_points<I: IntoIterator<Item = Vector2I>>(points: I) -> Self {
        let mut bbox = Self::uninitialized();
        for p in points {
            bbox.merge_point(p);
        }
        bbox
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn origin(&self) -> Vector2I {
        self.origin
    }

    pub fn size(&self) -> Vector2I {
        self.size
    }

    pub fn x(&self) -> Coord {
        self.origin.x
    }

    pub fn y(&self) -> Coord {
        self.origin.y
    }

    pub fn width(&self) -> Coord {
        self.size.x
    }

    pub fn height(&self) -> Coord {
        self.size.y
    }

    pub fn left(&self) -> Coord {
        self.origin.x
    }

    pub fn top(&self) -> Coord {
        self.origin.y
    }

    pub fn right(&self) -> Coord {
        narrow(widen(self.origin.x) + widen(self.size.x))
    }

    pub fn bottom(&self) -> Coord {
        narrow(widen(self.origin.y) + widen(self.size.y))
    }

    /// Corner opposite the origin
    pub fn end(&self) -> Vector2I {
        Vector2I::new(self.right(), self.bottom())
    }

    pub fn centre(&self) -> Vector2I {
        Vector2I::new(
            narrow(widen(self.origin.x) + widen(self.size.x) / 2),
            narrow(widen(self.origin.y) + widen(self.size.y) / 2),
        )
    }

    pub fn set_origin(&mut self, origin: Vector2I) -> &mut Self {
        self.origin = origin;
        self.initialized = true;
        self
    }

    pub fn set_size(&mut self, size: Vector2I) -> &mut Self {
        self.size = size;
        self.initialized = true;
        self
    }

    /// Move the far corner, keeping the origin
    pub fn set_end(&mut self, end: Vector2I) -> &mut Self {
        self.size = Vector2I::new(
            narrow(widen(end.x) - widen(self.origin.x)),
            narrow(widen(end.y) - widen(self.origin.y)),
        );
        self.initialized = true;
        self
    }

    pub fn offset(&mut self, delta: Vector2I) -> &mut Self {
        self.origin = Vector2I::new(
            narrow(widen(self.origin.x) + widen(delta.x)),
            narrow(widen(self.origin.y) + widen(delta.y)),
        );
        self
    }

    /// Make both size components non-negative, moving the origin to the
    /// smaller corner. Idempotent.
    pub fn normalize(&mut self) -> &mut Self {
        if self.size.y < 0 {
            self.origin.y = narrow(widen(self.origin.y) + widen(self.size.y));
            self.size.y = narrow(-widen(self.size.y));
        }
        if self.size.x < 0 {
            self.origin.x = narrow(widen(self.origin.x) + widen(self.size.x));
            self.size.x = narrow(-widen(self.size.x));
        }
        self
    }

    pub fn normalized(&self) -> Self {
        let mut b = *self;
        b.normalize();
        b
    }

    pub fn area(&self) -> ExtCoord {
        (widen(self.size.x) * widen(self.size.y)).abs()
    }

    pub fn diagonal(&self) -> f64 {
        self.size.norm()
    }

    /// Closed-box containment; boundary points are inside
    pub fn contains_point(&self, p: Vector2I) -> bool {
        if !self.initialized {
            return false;
        }

        let mut rel_x = widen(p.x) - widen(self.origin.x);
        let mut rel_y = widen(p.y) - widen(self.origin.y);
        let mut w = widen(self.size.x);
        let mut h = widen(self.size.y);

        if w < 0 {
            w = -w;
            rel_x += w;
        }
        if h < 0 {
            h = -h;
            rel_y += h;
        }

        rel_x >= 0 && rel_y >= 0 && rel_x <= w && rel_y <= h
    }

    /// True when both corners of `other` are inside; shared edges count
    pub fn contains_box(&self, other: &Box2I) -> bool {
        if !other.initialized {
            return false;
        }
        let o = other.normalized();
        self.contains_point(o.origin) && self.contains_point(o.end())
    }

    fn extents(&self) -> (ExtCoord, ExtCoord, ExtCoord, ExtCoord) {
        let n = self.normalized();
        (
            widen(n.origin.x),
            widen(n.origin.y),
            widen(n.origin.x) + widen(n.size.x),
            widen(n.origin.y) + widen(n.size.y),
        )
    }

    /// Overlap test; touching edges count as intersecting
    pub fn intersects(&self, other: &Box2I) -> bool {
        if !self.initialized || !other.initialized {
            return false;
        }

        let (l1, t1, r1, b1) = self.extents();
        let (l2, t2, r2, b2) = other.extents();

        let left = l1.max(l2);
        let right = r1.min(r2);
        let top = t1.max(t2);
        let bottom = b1.min(b2);

        left <= right && top <= bottom
    }

    /// Overlap region. Boxes that only touch (or miss) yield the zero box.
    pub fn intersect(&self, other: &Box2I) -> Box2I {
        let zero = Box2I::new(Vector2I::default(), Vector2I::default());
        if !self.initialized || !other.initialized {
            return zero;
        }

        let (l1, t1, r1, b1) = self.extents();
        let (l2, t2, r2, b2) = other.extents();

        let left = l1.max(l2);
        let right = r1.min(r2);
        let top = t1.max(t2);
        let bottom = b1.min(b2);

        if left < right && top < bottom {
            Box2I::new(
                Vector2I::new(narrow(left), narrow(top)),
                Vector2I::new(narrow(right - left), narrow(bottom - top)),
            )
        } else {
            zero
        }
    }

    /// Segment-versus-box test
    pub fn intersects_segment(&self, p1: Vector2I, p2: Vector2I) -> bool {
        if !self.initialized {
            return false;
        }
        if self.contains_point(p1) || self.contains_point(p2) {
            return true;
        }

        let n = self.normalized();
        let origin = n.origin;
        let end = n.end();
        let corner2 = Vector2I::new(end.x, origin.y);
        let corner4 = Vector2I::new(origin.x, end.y);
        let seg = Seg::new(p1, p2);

        // A line entering the box from outside crosses at least one of any
        // three sides, since it cannot enter and leave through the same side
        seg.intersects(&Seg::new(origin, corner2))
            || seg.intersects(&Seg::new(corner2, end))
            || seg.intersects(&Seg::new(end, corner4))
    }

    /// Intersection with `other` rotated by `rotation_deg` around its centre
    pub fn intersects_rotated(&self, other: &Box2I, rotation_deg: f64) -> bool {
        if !self.initialized || !other.initialized {
            return false;
        }

        let rotation = super::vector::normalize_deg(rotation_deg);

        if [0.0, 180.0, 360.0]
            .iter()
            .any(|r| (rotation - r).abs() < ROT_EPSILON)
        {
            return self.intersects(other);
        }

        let other_n = other.normalized();
        let r_centre = other_n.centre();

        if [90.0, 270.0].iter().any(|r| (rotation - r).abs() < ROT_EPSILON) {
            // Quarter turn: swap width and height around the centre
            let mut rot = Box2I::new(r_centre, Vector2I::default());
            rot.inflate(other_n.height() / 2, other_n.width() / 2);
            return self.intersects(&rot);
        }

        let me = self.normalized();
        let centre = r_centre.to_f64();

        // A: a corner of this box lies inside the rotated box
        for corner in me.corners() {
            let local = corner.to_f64().rotated_around(centre, -rotation);
            if other_n.contains_point(local.round()) {
                return true;
            }
        }

        // B: a corner of the rotated box lies inside this box
        let hw = other_n.width() as f64 / 2.0;
        let hh = other_n.height() as f64 / 2.0;
        let rotated: Vec<Vector2I> = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .iter()
            .map(|&(x, y)| {
                (centre + Vector2D::new(x, y))
                    .rotated_around(centre, rotation)
                    .round()
            })
            .collect();

        if rotated.iter().any(|c| me.contains_point(*c)) {
            return true;
        }

        // C: an edge of the rotated box crosses this box
        (0..4).any(|i| me.intersects_segment(rotated[i], rotated[(i + 1) % 4]))
    }

    /// True when the solid disc touches the box
    pub fn intersects_circle(&self, center: Vector2I, radius: Coord) -> bool {
        if !self.initialized {
            return false;
        }

        let closest = self.nearest_point(center);
        let dx = center.x as f64 - closest.x as f64;
        let dy = center.y as f64 - closest.y as f64;
        let r = radius as f64;

        dx * dx + dy * dy <= r * r
    }

    /// True when the box touches the annulus of a circle stroked with
    /// `edge_width`: it reaches the outer circle and is not entirely inside
    /// the inner one.
    pub fn intersects_circle_edge(&self, center: Vector2I, radius: Coord, edge_width: Coord) -> bool {
        if !self.initialized {
            return false;
        }

        if !self.intersects_circle(center, narrow(widen(radius) + widen(edge_width) / 2)) {
            return false;
        }

        let far = self.farthest_point(center);
        let fx = far.x as f64 - center.x as f64;
        let fy = far.y as f64 - center.y as f64;
        let r = radius as f64 - edge_width as f64 / 2.0;

        fx * fx + fy * fy > r * r
    }

    /// Grow each side by `dx`/`dy` (shrink when negative). Shrinking past
    /// zero collapses the axis to its midpoint instead of inverting it.
    pub fn inflate(&mut self, dx: Coord, dy: Coord) -> &mut Self {
        let (ox, sx) = inflate_axis(self.origin.x, self.size.x, dx);
        let (oy, sy) = inflate_axis(self.origin.y, self.size.y, dy);
        self.origin = Vector2I::new(ox, oy);
        self.size = Vector2I::new(sx, sy);
        self
    }

    pub fn inflate_all(&mut self, d: Coord) -> &mut Self {
        self.inflate(d, d)
    }

    pub fn get_inflated(&self, dx: Coord, dy: Coord) -> Box2I {
        let mut b = *self;
        b.inflate(dx, dy);
        b
    }

    /// Union with `other`; an uninitialized side acts as the identity
    pub fn merge(&mut self, other: &Box2I) -> &mut Self {
        if !other.initialized {
            return self;
        }
        if !self.initialized {
            *self = *other;
            self.initialized = true;
            return self;
        }

        self.normalize();
        let o = other.normalized();

        let left = self.origin.x.min(o.origin.x);
        let top = self.origin.y.min(o.origin.y);
        let right = widen(self.origin.x) + widen(self.size.x);
        let right = right.max(widen(o.origin.x) + widen(o.size.x));
        let bottom = widen(self.origin.y) + widen(self.size.y);
        let bottom = bottom.max(widen(o.origin.y) + widen(o.size.y));

        self.origin = Vector2I::new(left, top);
        self.size = Vector2I::new(narrow(right - widen(left)), narrow(bottom - widen(top)));
        self
    }

    /// Grow to include `p`; an uninitialized box becomes the point itself
    pub fn merge_point(&mut self, p: Vector2I) -> &mut Self {
        if !self.initialized {
            self.origin = p;
            self.size = Vector2I::default();
            self.initialized = true;
            return self;
        }
        self.merge(&Box2I::new(p, Vector2I::default()))
    }

    pub fn corners(&self) -> [Vector2I; 4] {
        let n = self.normalized();
        let o = n.origin;
        let e = n.end();
        [o, Vector2I::new(e.x, o.y), e, Vector2I::new(o.x, e.y)]
    }

    /// Per-axis clamp of `p` into the box
    pub fn nearest_point(&self, p: Vector2I) -> Vector2I {
        let n = self.normalized();
        let e = n.end();
        Vector2I::new(p.x.clamp(n.origin.x, e.x), p.y.clamp(n.origin.y, e.y))
    }

    /// Corner farthest from `p`, chosen per axis against the box centre
    pub fn farthest_point(&self, p: Vector2I) -> Vector2I {
        let n = self.normalized();
        let c = n.centre();
        let e = n.end();
        Vector2I::new(
            if p.x < c.x { e.x } else { n.origin.x },
            if p.y < c.y { e.y } else { n.origin.y },
        )
    }

    /// Squared distance from `p`, zero when inside
    pub fn squared_distance(&self, p: Vector2I) -> SquaredCoord {
        let (l, t, r, b) = self.extents();
        let px = widen(p.x);
        let py = widen(p.y);

        let dx = if px < l { l - px } else { (px - r).max(0) };
        let dy = if py < t { t - py } else { (py - b).max(0) };

        square(dx) + square(dy)
    }

    /// Squared gap between two boxes, zero when they overlap or touch
    pub fn squared_distance_box(&self, other: &Box2I) -> SquaredCoord {
        let (l1, t1, r1, b1) = self.extents();
        let (l2, t2, r2, b2) = other.extents();

        let dx = if r2 < l1 {
            l1 - r2
        } else if l2 > r1 {
            l2 - r1
        } else {
            0
        };
        let dy = if b2 < t1 {
            t1 - b2
        } else if t2 > b1 {
            t2 - b1
        } else {
            0
        };

        square(dx) + square(dy)
    }

    pub fn distance(&self, p: Vector2I) -> f64 {
        (self.squared_distance(p) as f64).sqrt()
    }

    pub fn distance_box(&self, other: &Box2I) -> f64 {
        (self.squared_distance_box(other) as f64).sqrt()
    }
}

fn inflate_axis(origin: Coord, size: Coord, d: Coord) -> (Coord, Coord) {
    let (o, s, d) = (widen(origin), widen(size), widen(d));

    if s >= 0 {
        if s < -2 * d {
            (narrow(o + s / 2), 0)
        } else {
            (narrow(o - d), narrow(s + 2 * d))
        }
    } else if s > 2 * d {
        (narrow(o - s / 2), 0)
    } else {
        (narrow(o + d), narrow(s - 2 * d))
    }
}

/// Bounding box of floating point points, rounded outward
pub fn bbox_of_points_d(points: &[Vector2D]) -> Box2I {
    let mut bbox = Box2I::uninitialized();
    for p in points {
        bbox.merge_point(Vector2I::new(round_to_coord(p.x.floor()), round_to_coord(p.y.floor())));
        bbox.merge_point(Vector2I::new(round_to_coord(p.x.ceil()), round_to_coord(p.y.ceil())));
    }
    bbox
}

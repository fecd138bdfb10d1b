//! Circular arc primitive
//!
//! A `ShapeArc` is defined by three native points (start, mid, end) and a
//! stroke width. The mid point picks which of the two arcs through start and
//! end is meant, so it is never optional. Center, radius, central angle and
//! bounding box are derived once at construction; every transform returns a
//! new arc, so a value can never be observed with stale derived state.
//!
//! Conventions:
//! - angles are degrees, positive counter-clockwise
//! - `start == end` is a full 360 degree circle, not a zero-length arc
//! - three collinear points with the mid between the ends form an
//!   "effective line": it behaves as the straight segment start..end and
//!   reports an infinite radius

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};

use super::box2::{bbox_of_points_d, Box2I};
use super::circle::Circle;
use super::collide::Collision;
use super::extended::{narrow, widen, Coord, SquaredCoord};
use super::nearest::NearestPair;
use super::seg::Seg;
use super::shapes::{ShapeCircle, ShapeLineChain, ShapeRect, ShapeSegment};
use super::tessellation::{arc_to_segment_count, circle_to_end_segment_delta_radius};
use super::vector::{midpoint, normalize_deg, Vector2D, Vector2I};

/// Angular slack (degrees) when testing whether a point lies in the sweep
const ANGLE_EPSILON: f64 = 1e-6;

/// Axis used by [`ShapeArc::mirrored`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    /// Mirror x around a vertical axis
    LeftRight,
    /// Mirror y around a horizontal axis
    TopBottom,
}

/// Serialized form: only the defining points travel, derived state is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcPoints {
    pub start: Vector2I,
    pub mid: Vector2I,
    pub end: Vector2I,
    #[serde(default)]
    pub width: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArcPoints", into = "ArcPoints")]
pub struct ShapeArc {
    start: Vector2I,
    mid: Vector2I,
    end: Vector2I,
    width: Coord,

    center: Vector2D,
    radius: f64,
    central_angle: f64,
    line: bool,
    bbox: Box2I,
}

impl TryFrom<ArcPoints> for ShapeArc {
    type Error = GeometryError;

    fn try_from(p: ArcPoints) -> GeometryResult<Self> {
        ShapeArc::try_new(p.start, p.mid, p.end, p.width)
    }
}

impl From<ShapeArc> for ArcPoints {
    fn from(arc: ShapeArc) -> Self {
        ArcPoints {
            start: arc.start,
            mid: arc.mid,
            end: arc.end,
            width: arc.width,
        }
    }
}

/// Circumcenter of three non-collinear points
fn circumcenter(a: Vector2I, b: Vector2I, c: Vector2I) -> Vector2D {
    let origin = a.to_f64();
    let bb = b.to_f64() - origin;
    let cc = c.to_f64() - origin;
    let d = 2.0 * bb.cross(cc);
    let b2 = bb.squared_norm();
    let c2 = cc.squared_norm();

    origin + Vector2D::new((cc.y * b2 - bb.y * c2) / d, (bb.x * c2 - cc.x * b2) / d)
}

/// Exact relation between the chords start->mid and mid->end: whether they
/// are collinear, and their dot product. Differences are taken in extended
/// precision so extreme coordinates never wrap.
fn chord_relation(start: Vector2I, mid: Vector2I, end: Vector2I) -> (bool, SquaredCoord) {
    let c1 = (widen(mid.x) - widen(start.x), widen(mid.y) - widen(start.y));
    let c2 = (widen(end.x) - widen(mid.x), widen(end.y) - widen(mid.y));
    let (c1x, c1y) = (SquaredCoord::from(c1.0), SquaredCoord::from(c1.1));
    let (c2x, c2y) = (SquaredCoord::from(c2.0), SquaredCoord::from(c2.1));

    (c1x * c2y == c1y * c2x, c1x * c2x + c1y * c2y)
}

impl ShapeArc {
    /// Three-point arc.
    ///
    /// # Panics
    /// Panics when the points do not define an arc (see [`ShapeArc::try_new`]).
    #[track_caller]
    pub fn new(start: Vector2I, mid: Vector2I, end: Vector2I, width: Coord) -> Self {
        match Self::try_new(start, mid, end, width) {
            Ok(arc) => arc,
            Err(e) => panic!("{e}"),
        }
    }

    /// Three-point arc, rejecting input that defines no circle.
    ///
    /// Accepted: any non-collinear triple, `start == end` with a distinct
    /// `mid` (full circle through `mid`), and collinear points with `mid`
    /// strictly between the ends (effective line). Rejected: all three points
    /// equal, `mid` coinciding with one end only, or collinear points with
    /// `mid` outside the ends.
    pub fn try_new(start: Vector2I, mid: Vector2I, end: Vector2I, width: Coord) -> GeometryResult<Self> {
        let degenerate = if start == end {
            mid == start
        } else {
            let (collinear, dot) = chord_relation(start, mid, end);
            collinear && dot <= 0
        };
        if degenerate {
            return Err(GeometryError::DegenerateArc { start, mid, end });
        }

        Ok(Self::derive(start, mid, end, width))
    }

    /// Arc around `center` starting at `start` and sweeping `angle_deg`.
    /// Sweeps of 360 degrees or more produce a full circle.
    pub fn from_center_angle(
        center: Vector2I,
        start: Vector2I,
        angle_deg: f64,
        width: Coord,
    ) -> GeometryResult<Self> {
        let c = center.to_f64();
        let s = start.to_f64();
        let sweep = angle_deg.clamp(-360.0, 360.0);

        let mid = s.rotated_around(c, sweep / 2.0).round();
        let end = if sweep.abs() >= 360.0 {
            start
        } else {
            s.rotated_around(c, sweep).round()
        };

        Self::try_new(start, mid, end, width)
    }

    /// Arc from `start` to `end` around `center` in the given direction.
    /// The radius is taken from `start`; `end` is kept as given.
    pub fn from_start_end_center(
        start: Vector2I,
        end: Vector2I,
        center: Vector2I,
        clockwise: bool,
        width: Coord,
    ) -> GeometryResult<Self> {
        let c = center.to_f64();
        let r = start.to_f64().distance(c);
        let sa = (start.to_f64() - c).angle_deg();
        let ea = (end.to_f64() - c).angle_deg();

        let mut sweep = normalize_deg(ea - sa);
        if sweep == 0.0 {
            sweep = 360.0;
        }
        if clockwise {
            sweep -= 360.0;
        }

        let half = (sa + sweep / 2.0).to_radians();
        let mid = (c + Vector2D::new(half.cos(), half.sin()) * r).round();

        Self::try_new(start, mid, end, width)
    }

    /// Arc of `radius` tangent to the (extended) lines of both segments,
    /// running from the tangent point on `seg_a` to the one on `seg_b`.
    ///
    /// Parallel or zero-length segments have no such arc and are rejected
    /// rather than replaced with a guessed shape.
    pub fn from_tangent_segments(seg_a: &Seg, seg_b: &Seg, radius: f64, width: Coord) -> GeometryResult<Self> {
        if seg_a.is_degenerate() || seg_b.is_degenerate() {
            return Err(GeometryError::ZeroLengthSegment);
        }
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius { radius });
        }

        let da = (widen(seg_a.b.x) - widen(seg_a.a.x), widen(seg_a.b.y) - widen(seg_a.a.y));
        let db = (widen(seg_b.b.x) - widen(seg_b.a.x), widen(seg_b.b.y) - widen(seg_b.a.y));
        if SquaredCoord::from(da.0) * SquaredCoord::from(db.1) == SquaredCoord::from(da.1) * SquaredCoord::from(db.0) {
            return Err(GeometryError::ParallelTangentSegments);
        }

        // Intersection of the two supporting lines
        let pa = seg_a.a.to_f64();
        let ra = Vector2D::new(da.0 as f64, da.1 as f64);
        let pb = seg_b.a.to_f64();
        let rb = Vector2D::new(db.0 as f64, db.1 as f64);
        let t = (pb - pa).cross(rb) / ra.cross(rb);
        let p = pa + ra * t;

        // Directions from the corner toward each segment's far end
        let far_a = if seg_a.b.to_f64().distance(p) > seg_a.a.to_f64().distance(p) {
            seg_a.b
        } else {
            seg_a.a
        };
        let far_b = if seg_b.b.to_f64().distance(p) > seg_b.a.to_f64().distance(p) {
            seg_b.b
        } else {
            seg_b.a
        };
        let ua = (far_a.to_f64() - p).normalized();
        let ub = (far_b.to_f64() - p).normalized();

        let bisector = (ua + ub).normalized();
        let half_angle = ua.dot(ub).clamp(-1.0, 1.0).acos() / 2.0;
        if bisector.squared_norm() == 0.0 || half_angle.sin() == 0.0 {
            return Err(GeometryError::ParallelTangentSegments);
        }

        let center = p + bisector * (radius / half_angle.sin());
        let start = seg_a.line_project(center);
        let end = seg_b.line_project(center);
        let mid = center + (p - center).normalized() * radius;

        Self::try_new(start.round(), mid.round(), end.round(), width)
    }

    /// Derive center, radius, angle and bbox. Total: input that defines no
    /// circle is treated as the segment start..end.
    fn derive(start: Vector2I, mid: Vector2I, end: Vector2I, width: Coord) -> Self {
        let mut arc = ShapeArc {
            start,
            mid,
            end,
            width,
            center: Vector2D::default(),
            radius: 0.0,
            central_angle: 0.0,
            line: false,
            bbox: Box2I::uninitialized(),
        };

        if start == end {
            arc.center = midpoint(start.to_f64(), mid.to_f64());
            arc.radius = start.to_f64().distance(arc.center);
            arc.central_angle = 360.0;
        } else {
            let (collinear, _) = chord_relation(start, mid, end);

            if collinear {
                arc.line = true;
                arc.center = midpoint(start.to_f64(), end.to_f64());
                arc.radius = f64::INFINITY;
                arc.central_angle = 0.0;
            } else {
                arc.center = circumcenter(start, mid, end);
                arc.radius = start.to_f64().distance(arc.center);
                arc.central_angle = arc.sweep_from_points();
            }
        }

        arc.bbox = arc.compute_bbox();
        arc
    }

    /// Signed sweep resolved from the mid point's angular position
    fn sweep_from_points(&self) -> f64 {
        let sa = (self.start.to_f64() - self.center).angle_deg();
        let ma = (self.mid.to_f64() - self.center).angle_deg();
        let ea = (self.end.to_f64() - self.center).angle_deg();

        let ccw_to_end = normalize_deg(ea - sa);
        let ccw_to_mid = normalize_deg(ma - sa);

        if ccw_to_mid <= ccw_to_end {
            ccw_to_end
        } else {
            ccw_to_end - 360.0
        }
    }

    fn compute_bbox(&self) -> Box2I {
        let mut points = vec![self.start.to_f64(), self.end.to_f64()];

        if self.line {
            points.push(self.mid.to_f64());
        } else {
            let sa = self.start_angle();
            let ea = sa + self.central_angle;
            let (lo, hi) = if sa <= ea { (sa, ea) } else { (ea, sa) };

            let first = (lo / 90.0).ceil() as i64;
            let last = (hi / 90.0).floor() as i64;
            for q in first..=last {
                let dir = match q.rem_euclid(4) {
                    0 => Vector2D::new(1.0, 0.0),
                    1 => Vector2D::new(0.0, 1.0),
                    2 => Vector2D::new(-1.0, 0.0),
                    _ => Vector2D::new(0.0, -1.0),
                };
                points.push(self.center + dir * self.radius);
            }
        }

        let mut bbox = bbox_of_points_d(&points);
        let half = (self.width + 1) / 2;
        bbox.inflate(half, half);
        bbox
    }

    pub fn start(&self) -> Vector2I {
        self.start
    }

    pub fn mid(&self) -> Vector2I {
        self.mid
    }

    pub fn end(&self) -> Vector2I {
        self.end
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn center(&self) -> Vector2D {
        self.center
    }

    /// Radius of the supporting circle; infinite for an effective line
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed sweep in (-360, 360], positive counter-clockwise
    pub fn central_angle(&self) -> f64 {
        self.central_angle
    }

    /// Direction of `start` from the center, in [0, 360)
    pub fn start_angle(&self) -> f64 {
        if self.line {
            return (self.end.to_f64() - self.start.to_f64()).angle_deg();
        }
        (self.start.to_f64() - self.center).angle_deg()
    }

    /// Direction of `end` from the center, in [0, 360)
    pub fn end_angle(&self) -> f64 {
        normalize_deg(self.start_angle() + self.central_angle)
    }

    pub fn is_clockwise(&self) -> bool {
        self.central_angle < 0.0
    }

    pub fn is_full_circle(&self) -> bool {
        self.start == self.end
    }

    pub fn is_effective_line(&self) -> bool {
        self.line
    }

    /// Bounding box including the stroke
    pub fn bbox(&self) -> Box2I {
        self.bbox
    }

    /// Bounding box including the stroke, grown by `clearance`
    pub fn bbox_with_clearance(&self, clearance: Coord) -> Box2I {
        self.bbox.get_inflated(clearance, clearance)
    }

    pub fn chord(&self) -> Seg {
        Seg::new(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        if self.line {
            return self.start.distance(self.end);
        }
        self.central_angle.abs().to_radians() * self.radius
    }

    /// Point halfway along the sweep (not necessarily the defining mid)
    pub fn arc_mid(&self) -> Vector2D {
        if self.line {
            return midpoint(self.start.to_f64(), self.end.to_f64());
        }
        let a = (self.start_angle() + self.central_angle / 2.0).to_radians();
        self.center + Vector2D::new(a.cos(), a.sin()) * self.radius
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Translate by `delta`. Translation keeps the three points' relation, so
    /// the result is valid whenever `self` is. Panics with a coordinate
    /// overflow when a point leaves the native range.
    #[track_caller]
    pub fn moved(&self, delta: Vector2I) -> ShapeArc {
        Self::derive(self.start + delta, self.mid + delta, self.end + delta, self.width)
    }

    /// Rotate counter-clockwise around `about`. The rotated points are
    /// rounded to the grid, which can collapse a tiny arc into a degenerate
    /// triple, so the result goes back through [`ShapeArc::try_new`].
    pub fn rotated(&self, angle_deg: f64, about: Vector2I) -> GeometryResult<ShapeArc> {
        let c = about.to_f64();
        let rot = |p: Vector2I| p.to_f64().rotated_around(c, angle_deg).round();
        Self::try_new(rot(self.start), rot(self.mid), rot(self.end), self.width)
    }

    /// Mirror around an axis through `about`. The winding flips. Reflection
    /// is exact on the grid, so validity carries over; panics with a
    /// coordinate overflow when a point leaves the native range.
    #[track_caller]
    pub fn mirrored(&self, direction: FlipDirection, about: Vector2I) -> ShapeArc {
        let reflect = |axis: Coord, v: Coord| narrow(2 * widen(axis) - widen(v));
        let flip = |p: Vector2I| match direction {
            FlipDirection::LeftRight => Vector2I::new(reflect(about.x, p.x), p.y),
            FlipDirection::TopBottom => Vector2I::new(p.x, reflect(about.y, p.y)),
        };
        Self::derive(flip(self.start), flip(self.mid), flip(self.end), self.width)
    }

    /// Same curve traversed from end to start
    pub fn reversed(&self) -> ShapeArc {
        Self::derive(self.end, self.mid, self.start, self.width)
    }

    pub fn with_width(&self, width: Coord) -> ShapeArc {
        Self::derive(self.start, self.mid, self.end, width)
    }

    /// True when `p`, taken as a direction from the center, falls within the
    /// swept angular range (in the arc's own winding direction).
    pub fn slice_contains_point(&self, p: Vector2D) -> bool {
        if self.line {
            let chord = self.chord();
            return chord.nearest_point_d(p).distance(p) <= 0.5;
        }
        if self.is_full_circle() {
            return true;
        }

        let d = p - self.center;
        if d.squared_norm() == 0.0 {
            return false;
        }

        let sa = self.start_angle();
        let phi = d.angle_deg();
        let rel = if self.central_angle >= 0.0 {
            normalize_deg(phi - sa)
        } else {
            normalize_deg(sa - phi)
        };

        rel <= self.central_angle.abs() + ANGLE_EPSILON || rel >= 360.0 - ANGLE_EPSILON
    }

    /// Nearest point on the arc's centerline to `p`
    pub fn nearest_point(&self, p: Vector2D) -> Vector2D {
        if self.line {
            return self.chord().nearest_point_d(p);
        }

        let on_circle = self.circle().nearest_point(p);
        if self.slice_contains_point(on_circle) {
            return on_circle;
        }

        let s = self.start.to_f64();
        let e = self.end.to_f64();
        if s.distance(p) <= e.distance(p) {
            s
        } else {
            e
        }
    }

    /// Point-versus-stroke collision. Reports when the gap between `p` and
    /// the stroke edge is zero or less than `clearance`.
    pub fn collide_point(&self, p: Vector2I, clearance: Coord) -> Option<Collision> {
        if !self.bbox_with_clearance(clearance).contains_point(p) {
            return None;
        }

        let near = self.nearest_point(p.to_f64());
        let dist = near.distance(p.to_f64()) - self.width as f64 / 2.0;

        Collision::check(dist.max(0.0), clearance, near.round())
    }

    /// Zero-width segment versus stroke collision, keeping the smallest gap
    pub fn collide_segment(&self, seg: &Seg, clearance: Coord) -> Option<Collision> {
        if self.line {
            let (pa, pb) = self.chord().nearest_points(seg);
            let dist = pa.distance(pb) - self.width as f64 / 2.0;
            return Collision::check(dist.max(0.0), clearance, pa.round());
        }

        let mut candidates: Vec<Vector2D> = self.circle().intersect_segment(seg);
        candidates.push(seg.nearest_point_d(self.center));
        candidates.push(seg.nearest_point_d(self.start.to_f64()));
        candidates.push(seg.nearest_point_d(self.end.to_f64()));
        candidates.push(seg.a.to_f64());
        candidates.push(seg.b.to_f64());

        let mut best: Option<Collision> = None;
        for cand in candidates {
            if let Some(hit) = self.collide_point(cand.round(), clearance) {
                if best.map_or(true, |b| hit.actual < b.actual) {
                    best = Some(hit);
                }
                if hit.actual == 0 {
                    break;
                }
            }
        }

        best
    }

    /// Intersections with the infinite line through `seg`
    pub fn intersect_line(&self, seg: &Seg) -> Vec<Vector2D> {
        if self.line {
            let (a, b) = (seg.a.to_f64(), seg.b.to_f64());
            let chord = self.chord();
            let (ca, cb) = (chord.a.to_f64(), chord.b.to_f64());
            let denom = (cb - ca).cross(b - a);
            if denom == 0.0 {
                return Vec::new();
            }
            let t = (a - ca).cross(b - a) / denom;
            return if (0.0..=1.0).contains(&t) {
                vec![ca + (cb - ca) * t]
            } else {
                Vec::new()
            };
        }

        self.circle()
            .intersect_line(seg.a.to_f64(), seg.b.to_f64())
            .into_iter()
            .filter(|p| self.slice_contains_point(*p))
            .collect()
    }

    /// Intersections with a segment
    pub fn intersect_segment(&self, seg: &Seg) -> Vec<Vector2D> {
        if self.line {
            return self.chord().intersect(seg).into_iter().collect();
        }

        self.circle()
            .intersect_segment(seg)
            .into_iter()
            .filter(|p| self.slice_contains_point(*p))
            .collect()
    }

    /// Intersections with an idealized circle
    pub fn intersect_circle(&self, circle: &Circle) -> Vec<Vector2D> {
        if self.line {
            return circle.intersect_segment(&self.chord());
        }

        self.circle()
            .intersect_circle(circle)
            .into_iter()
            .filter(|p| self.slice_contains_point(*p))
            .collect()
    }

    /// Intersections with another arc's centerline
    pub fn intersect_arc(&self, other: &ShapeArc) -> Vec<Vector2D> {
        if self.line {
            return other.intersect_segment(&self.chord());
        }
        if other.line {
            return self.intersect_segment(&other.chord());
        }

        let same_circle = self.center.distance(other.center) < 1e-6
            && (self.radius - other.radius).abs() < 1e-6;

        if same_circle {
            // Overlapping pieces of one circle: report shared extremities
            let mut pts = Vec::new();
            for p in [other.start, other.end] {
                if self.slice_contains_point(p.to_f64()) {
                    pts.push(p.to_f64());
                }
            }
            for p in [self.start, self.end] {
                if other.slice_contains_point(p.to_f64()) {
                    pts.push(p.to_f64());
                }
            }
            return pts;
        }

        self.circle()
            .intersect_circle(&other.circle())
            .into_iter()
            .filter(|p| self.slice_contains_point(*p) && other.slice_contains_point(*p))
            .collect()
    }

    /// Closest centerline points `(on_self, on_seg)` to a zero-width segment
    pub(crate) fn centerline_nearest_segment(&self, seg: &Seg) -> (Vector2D, Vector2D) {
        if self.line {
            return self.chord().nearest_points(seg);
        }

        if let Some(p) = self.intersect_segment(seg).first() {
            return (*p, *p);
        }

        let mut candidates = Vec::with_capacity(8);
        for p in [self.start.to_f64(), self.end.to_f64()] {
            candidates.push((p, seg.nearest_point_d(p)));
        }
        for q in [seg.a.to_f64(), seg.b.to_f64()] {
            candidates.push((self.nearest_point(q), q));
        }

        // Radial pair: the common normal passes through the center
        let foot = seg.nearest_point_d(self.center);
        let mut dir = (foot - self.center).normalized();
        if dir.squared_norm() == 0.0 {
            dir = (seg.b.to_f64() - seg.a.to_f64()).perpendicular().normalized();
        }
        for sign in [1.0, -1.0] {
            let on_arc = self.center + dir * (self.radius * sign);
            if self.slice_contains_point(on_arc) {
                candidates.push((on_arc, seg.nearest_point_d(on_arc)));
            }
        }

        closest_candidate(&candidates)
    }

    /// Closest centerline points `(on_self, on_other)` between two arcs
    pub(crate) fn centerline_nearest_arc(&self, other: &ShapeArc) -> (Vector2D, Vector2D) {
        if self.line {
            let (on_other, on_self) = other.centerline_nearest_segment(&self.chord());
            return (on_self, on_other);
        }
        if other.line {
            return self.centerline_nearest_segment(&other.chord());
        }

        if let Some(p) = self.intersect_arc(other).first() {
            return (*p, *p);
        }

        let mut candidates = Vec::with_capacity(12);
        for p in [self.start.to_f64(), self.end.to_f64()] {
            candidates.push((p, other.nearest_point(p)));
        }
        for q in [other.start.to_f64(), other.end.to_f64()] {
            candidates.push((self.nearest_point(q), q));
        }

        // Interior pairs lie on the line through both centers
        let axis = (other.center - self.center).normalized();
        if axis.squared_norm() > 0.0 {
            for sign in [1.0, -1.0] {
                let on_self = self.center + axis * (self.radius * sign);
                if self.slice_contains_point(on_self) {
                    candidates.push((on_self, other.nearest_point(on_self)));
                }
                let on_other = other.center + axis * (other.radius * sign);
                if other.slice_contains_point(on_other) {
                    candidates.push((self.nearest_point(on_other), on_other));
                }
            }
        }

        closest_candidate(&candidates)
    }

    pub fn nearest_points_circle(&self, circle: &ShapeCircle) -> NearestPair {
        let c = circle.center.to_f64();
        NearestPair::between_centerlines(
            self.nearest_point(c),
            c,
            self.width as f64 / 2.0,
            circle.radius as f64,
        )
    }

    pub fn nearest_points_segment(&self, seg: &ShapeSegment) -> NearestPair {
        let (pa, pb) = self.centerline_nearest_segment(&seg.seg);
        NearestPair::between_centerlines(pa, pb, self.width as f64 / 2.0, seg.width as f64 / 2.0)
    }

    /// Nearest points to the rectangle outline
    pub fn nearest_points_rect(&self, rect: &ShapeRect) -> NearestPair {
        let candidates: Vec<(Vector2D, Vector2D)> = rect
            .outline()
            .iter()
            .map(|edge| self.centerline_nearest_segment(edge))
            .collect();
        let (pa, pb) = closest_candidate(&candidates);
        NearestPair::between_centerlines(pa, pb, self.width as f64 / 2.0, 0.0)
    }

    pub fn nearest_points_arc(&self, other: &ShapeArc) -> NearestPair {
        let (pa, pb) = self.centerline_nearest_arc(other);
        NearestPair::between_centerlines(pa, pb, self.width as f64 / 2.0, other.width as f64 / 2.0)
    }

    /// Approximate the centerline with a polyline whose vertices stay within
    /// `max_error` of the true curve. The first and last vertices are the
    /// exact start and end.
    pub fn convert_to_polyline(&self, max_error: Coord) -> ShapeLineChain {
        let mut points = vec![self.start];

        if !self.line {
            let max_error = max_error.max(1) as f64;
            let half_accuracy = (max_error / 2.0).max(1.0);
            let external_radius = self.radius + self.width as f64 / 2.0;
            let sagitta = self.chord().distance_d(self.arc_mid());

            let (n, effective_error) = if external_radius < half_accuracy || sagitta < half_accuracy {
                (0u32, external_radius)
            } else {
                let n = arc_to_segment_count(external_radius, max_error, self.central_angle);
                let seg360 = (n as f64 * 360.0 / self.central_angle.abs()) as u32;
                (n, circle_to_end_segment_delta_radius(external_radius, seg360))
            };

            // Vertices sit half the error band outside the arc; doubling the
            // count and taking odd steps keeps the end segments shorter so the
            // exact endpoints stay inside the band
            let r = self.radius + effective_error / 2.0;
            let n = n * 2;
            let sa = self.start_angle();
            let mut i = 1;
            while i < n {
                let a = (sa + self.central_angle * i as f64 / n as f64).to_radians();
                points.push((self.center + Vector2D::new(a.cos(), a.sin()) * r).round());
                i += 2;
            }
        }

        points.push(self.end);
        ShapeLineChain::new(points, false, self.width)
    }
}

/// Pick the pair with the smallest separation
pub(crate) fn closest_candidate(candidates: &[(Vector2D, Vector2D)]) -> (Vector2D, Vector2D) {
    let mut best = candidates[0];
    let mut best_d = best.0.distance(best.1);
    for &(a, b) in &candidates[1..] {
        let d = a.distance(b);
        if d < best_d {
            best_d = d;
            best = (a, b);
        }
    }
    best
}

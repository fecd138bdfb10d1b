//! The closed set of shape kinds
//!
//! [`Shape`] is a sum type over every primitive the clearance engine knows.
//! Pairwise algorithms match on it exhaustively (see [`super::nearest`]), so
//! adding a kind is a compile error until every pair is handled.
//!
//! Solid kinds (rect, circle, closed line chain, poly set) have an interior;
//! stroked kinds (segment, arc, open line chain) are their centerline grown by
//! half the stroke width.

use serde::{Deserialize, Serialize};

use super::arc::ShapeArc;
use super::box2::Box2I;
use super::extended::Coord;
use super::seg::{orientation, Seg};
use super::vector::Vector2I;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rect,
    Circle,
    Segment,
    Arc,
    LineChain,
    Compound,
    PolySet,
}

/// Axis-aligned filled rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRect {
    pub origin: Vector2I,
    pub size: Vector2I,
}

impl ShapeRect {
    pub fn new(origin: Vector2I, size: Vector2I) -> Self {
        Self { origin, size }
    }

    pub fn from_box(bbox: &Box2I) -> Self {
        let b = bbox.normalized();
        Self::new(b.origin(), b.size())
    }

    pub fn bbox(&self) -> Box2I {
        Box2I::new(self.origin, self.size).normalized()
    }

    /// Four outline edges, counter-clockwise in board coordinates
    pub fn outline(&self) -> [Seg; 4] {
        let [a, b, c, d] = self.bbox().corners();
        [Seg::new(a, b), Seg::new(b, c), Seg::new(c, d), Seg::new(d, a)]
    }
}

/// Filled disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCircle {
    pub center: Vector2I,
    pub radius: Coord,
}

impl ShapeCircle {
    pub fn new(center: Vector2I, radius: Coord) -> Self {
        Self { center, radius }
    }

    pub fn bbox(&self) -> Box2I {
        let r = Vector2I::new(self.radius, self.radius);
        Box2I::from_corners(self.center - r, self.center + r)
    }
}

/// Straight stroke with round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSegment {
    pub seg: Seg,
    #[serde(default)]
    pub width: Coord,
}

impl ShapeSegment {
    pub fn new(a: Vector2I, b: Vector2I, width: Coord) -> Self {
        Self {
            seg: Seg::new(a, b),
            width,
        }
    }

    pub fn bbox(&self) -> Box2I {
        let mut b = Box2I::from_corners(self.seg.a, self.seg.b);
        let half = (self.width + 1) / 2;
        b.inflate(half, half);
        b
    }
}

/// Polyline, optionally closed. A closed chain encloses a filled simple
/// polygon; an open chain is a stroke of `width`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeLineChain {
    points: Vec<Vector2I>,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    width: Coord,
}

impl ShapeLineChain {
    pub fn new(points: Vec<Vector2I>, closed: bool, width: Coord) -> Self {
        Self { points, closed, width }
    }

    pub fn closed_polygon(points: Vec<Vector2I>) -> Self {
        Self::new(points, true, 0)
    }

    pub fn points(&self) -> &[Vector2I] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed && self.points[0] != self.points[n - 1] => n,
            n => n - 1,
        }
    }

    pub fn segment(&self, index: usize) -> Seg {
        let n = self.points.len();
        Seg::new(self.points[index], self.points[(index + 1) % n])
    }

    pub fn segments(&self) -> impl Iterator<Item = Seg> + '_ {
        (0..self.segment_count()).map(move |i| self.segment(i))
    }

    pub fn bbox(&self) -> Box2I {
        let mut b = Box2I::from_points(self.points.iter().copied());
        if b.is_initialized() {
            let half = (self.width + 1) / 2;
            b.inflate(half, half);
        }
        b
    }

    /// Winding-number test against the enclosed polygon; boundary points are
    /// inside. Open chains enclose nothing.
    pub fn point_inside(&self, p: Vector2I) -> bool {
        if !self.closed || self.points.len() < 3 {
            return false;
        }

        let mut winding = 0i32;
        for seg in self.segments() {
            if orientation(seg.a, seg.b, p) == 0 && seg.distance(p) == 0.0 {
                return true;
            }

            if seg.a.y <= p.y {
                if seg.b.y > p.y && orientation(seg.a, seg.b, p) > 0 {
                    winding += 1;
                }
            } else if seg.b.y <= p.y && orientation(seg.a, seg.b, p) < 0 {
                winding -= 1;
            }
        }

        winding != 0
    }

    pub fn moved(&self, delta: Vector2I) -> ShapeLineChain {
        Self::new(self.points.iter().map(|p| *p + delta).collect(), self.closed, self.width)
    }
}

/// Group of shapes that owns its elements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeCompound {
    shapes: Vec<Shape>,
}

impl ShapeCompound {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}

/// One polygon of a [`ShapePolySet`]: an outline followed by its holes
pub type Polygon = Vec<ShapeLineChain>;

/// Filled polygons with holes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapePolySet {
    polygons: Vec<Polygon>,
}

impl ShapePolySet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Start a new polygon; returns its index
    pub fn add_outline(&mut self, outline: ShapeLineChain) -> usize {
        self.polygons.push(vec![outline]);
        self.polygons.len() - 1
    }

    /// Add a hole to polygon `index`
    pub fn add_hole(&mut self, index: usize, hole: ShapeLineChain) {
        if let Some(poly) = self.polygons.get_mut(index) {
            poly.push(hole);
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn outline(&self, index: usize) -> Option<&ShapeLineChain> {
        self.polygons.get(index).and_then(|p| p.first())
    }

    pub fn outline_count(&self) -> usize {
        self.polygons.len()
    }

    /// Every edge of every outline and hole
    pub fn segments(&self) -> impl Iterator<Item = Seg> + '_ {
        self.polygons.iter().flatten().flat_map(|chain| chain.segments())
    }

    /// Every vertex of every outline and hole
    pub fn vertices(&self) -> impl Iterator<Item = Vector2I> + '_ {
        self.polygons.iter().flatten().flat_map(|chain| chain.points().iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(|p| p.first().map_or(true, |o| o.is_empty()))
    }

    pub fn bbox(&self) -> Box2I {
        let mut b = Box2I::uninitialized();
        for poly in &self.polygons {
            if let Some(outline) = poly.first() {
                b.merge(&outline.bbox());
            }
        }
        b
    }

    /// Inside some outline and not strictly inside one of its holes
    pub fn contains_point(&self, p: Vector2I) -> bool {
        self.polygons.iter().any(|poly| {
            let Some((outline, holes)) = poly.split_first() else {
                return false;
            };
            if !closed(outline).point_inside(p) {
                return false;
            }
            !holes.iter().any(|hole| {
                let hole = closed(hole);
                hole.point_inside(p) && !hole.segments().any(|s| s.distance(p) == 0.0)
            })
        })
    }

    pub fn moved(&self, delta: Vector2I) -> ShapePolySet {
        Self::new(
            self.polygons
                .iter()
                .map(|poly| poly.iter().map(|chain| chain.moved(delta)).collect())
                .collect(),
        )
    }
}

/// Poly set rings are closed whether or not the flag was set
fn closed(chain: &ShapeLineChain) -> std::borrow::Cow<'_, ShapeLineChain> {
    if chain.is_closed() {
        std::borrow::Cow::Borrowed(chain)
    } else {
        std::borrow::Cow::Owned(ShapeLineChain::new(chain.points.clone(), true, chain.width))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect(ShapeRect),
    Circle(ShapeCircle),
    Segment(ShapeSegment),
    Arc(ShapeArc),
    LineChain(ShapeLineChain),
    Compound(ShapeCompound),
    PolySet(ShapePolySet),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Segment(_) => ShapeKind::Segment,
            Shape::Arc(_) => ShapeKind::Arc,
            Shape::LineChain(_) => ShapeKind::LineChain,
            Shape::Compound(_) => ShapeKind::Compound,
            Shape::PolySet(_) => ShapeKind::PolySet,
        }
    }

    /// Bounding box including strokes, grown by `clearance`
    pub fn bbox(&self, clearance: Coord) -> Box2I {
        let mut b = match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Circle(c) => c.bbox(),
            Shape::Segment(s) => s.bbox(),
            Shape::Arc(a) => a.bbox(),
            Shape::LineChain(l) => l.bbox(),
            Shape::Compound(c) => {
                let mut b = Box2I::uninitialized();
                for s in c.shapes() {
                    b.merge(&s.bbox(0));
                }
                b
            }
            Shape::PolySet(p) => p.bbox(),
        };

        if clearance != 0 && b.is_initialized() {
            b.inflate(clearance, clearance);
        }
        b
    }

    /// True when the shape holds no points at all
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::LineChain(l) => l.is_empty(),
            Shape::Compound(c) => c.shapes().iter().all(Shape::is_empty),
            Shape::PolySet(p) => p.is_empty(),
            Shape::Rect(_) | Shape::Circle(_) | Shape::Segment(_) | Shape::Arc(_) => false,
        }
    }

    /// True for kinds with a filled interior
    pub fn is_solid(&self) -> bool {
        match self {
            Shape::Rect(_) | Shape::Circle(_) | Shape::PolySet(_) => true,
            Shape::LineChain(l) => l.is_closed(),
            Shape::Segment(_) | Shape::Arc(_) | Shape::Compound(_) => false,
        }
    }

    /// Membership with filled semantics for solid kinds and stroke
    /// semantics for the others
    pub fn contains_point(&self, p: Vector2I) -> bool {
        match self {
            Shape::Rect(r) => r.bbox().contains_point(p),
            Shape::Circle(c) => {
                p.squared_distance(c.center) <= i128::from(c.radius) * i128::from(c.radius)
            }
            Shape::Segment(s) => s.seg.distance(p) <= s.width as f64 / 2.0,
            Shape::Arc(a) => {
                a.nearest_point(p.to_f64()).distance(p.to_f64()) <= a.width() as f64 / 2.0
            }
            Shape::LineChain(l) if l.is_closed() => l.point_inside(p),
            Shape::LineChain(l) => {
                let half = l.width() as f64 / 2.0;
                match l.point_count() {
                    0 => false,
                    1 => l.points()[0].distance(p) <= half,
                    _ => l.segments().any(|s| s.distance(p) <= half),
                }
            }
            Shape::Compound(c) => c.shapes().iter().any(|s| s.contains_point(p)),
            Shape::PolySet(ps) => ps.contains_point(p),
        }
    }

    /// Some point that belongs to the shape, used for containment tests
    pub fn representative_point(&self) -> Option<Vector2I> {
        match self {
            Shape::Rect(r) => Some(r.origin),
            Shape::Circle(c) => Some(c.center),
            Shape::Segment(s) => Some(s.seg.a),
            Shape::Arc(a) => Some(a.start()),
            Shape::LineChain(l) => l.points().first().copied(),
            Shape::Compound(c) => c.shapes().iter().find_map(Shape::representative_point),
            Shape::PolySet(p) => p.vertices().next(),
        }
    }

    pub fn moved(&self, delta: Vector2I) -> Shape {
        match self {
            Shape::Rect(r) => Shape::Rect(ShapeRect::new(r.origin + delta, r.size)),
            Shape::Circle(c) => Shape::Circle(ShapeCircle::new(c.center + delta, c.radius)),
            Shape::Segment(s) => Shape::Segment(ShapeSegment::new(s.seg.a + delta, s.seg.b + delta, s.width)),
            Shape::Arc(a) => Shape::Arc(a.moved(delta)),
            Shape::LineChain(l) => Shape::LineChain(l.moved(delta)),
            Shape::Compound(c) => Shape::Compound(ShapeCompound::new(
                c.shapes().iter().map(|s| s.moved(delta)).collect(),
            )),
            Shape::PolySet(p) => Shape::PolySet(p.moved(delta)),
        }
    }
}

impl From<ShapeRect> for Shape {
    fn from(s: ShapeRect) -> Self {
        Shape::Rect(s)
    }
}

impl From<ShapeCircle> for Shape {
    fn from(s: ShapeCircle) -> Self {
        Shape::Circle(s)
    }
}

impl From<ShapeSegment> for Shape {
    fn from(s: ShapeSegment) -> Self {
        Shape::Segment(s)
    }
}

impl From<ShapeArc> for Shape {
    fn from(s: ShapeArc) -> Self {
        Shape::Arc(s)
    }
}

impl From<ShapeLineChain> for Shape {
    fn from(s: ShapeLineChain) -> Self {
        Shape::LineChain(s)
    }
}

impl From<ShapeCompound> for Shape {
    fn from(s: ShapeCompound) -> Self {
        Shape::Compound(s)
    }
}

impl From<ShapePolySet> for Shape {
    fn from(s: ShapePolySet) -> Self {
        Shape::PolySet(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vector2I {
        Vector2I::new(x, y)
    }

    fn square(x: i32, y: i32, s: i32) -> ShapeLineChain {
        ShapeLineChain::closed_polygon(vec![v(x, y), v(x + s, y), v(x + s, y + s), v(x, y + s)])
    }

    #[test]
    fn test_closed_chain_segment_count() {
        let chain = square(0, 0, 10);
        assert_eq!(chain.segment_count(), 4);
        assert_eq!(chain.segment(3), Seg::new(v(0, 10), v(0, 0)));

        let open = ShapeLineChain::new(vec![v(0, 0), v(10, 0), v(10, 10)], false, 2);
        assert_eq!(open.segment_count(), 2);
    }

    #[test]
    fn test_point_inside_closed_chain() {
        let chain = square(0, 0, 10);
        assert!(chain.point_inside(v(5, 5)));
        assert!(chain.point_inside(v(0, 5)));
        assert!(chain.point_inside(v(10, 10)));
        assert!(!chain.point_inside(v(11, 5)));
        assert!(!chain.point_inside(v(-1, -1)));
    }

    #[test]
    fn test_polyset_hole_excludes_interior() {
        let mut set = ShapePolySet::default();
        let idx = set.add_outline(square(0, 0, 100));
        set.add_hole(idx, square(40, 40, 20));

        assert!(set.contains_point(v(10, 10)));
        assert!(!set.contains_point(v(50, 50)));
        assert!(set.contains_point(v(40, 50)));
        assert!(!set.contains_point(v(150, 50)));
    }

    #[test]
    fn test_shape_bbox_includes_stroke_and_clearance() {
        let seg: Shape = ShapeSegment::new(v(0, 0), v(100, 0), 10).into();
        let b = seg.bbox(20);
        assert_eq!(b.left(), -25);
        assert_eq!(b.right(), 125);
        assert_eq!(b.top(), -25);
        assert_eq!(b.bottom(), 25);
    }

    #[test]
    fn test_solid_and_empty_kinds() {
        assert!(Shape::from(ShapeRect::new(v(0, 0), v(5, 5))).is_solid());
        assert!(Shape::from(square(0, 0, 5)).is_solid());
        assert!(!Shape::from(ShapeSegment::new(v(0, 0), v(5, 0), 1)).is_solid());

        assert!(Shape::from(ShapeCompound::default()).is_empty());
        assert!(Shape::from(ShapeLineChain::default()).is_empty());
        assert!(!Shape::from(ShapeCircle::new(v(0, 0), 0)).is_empty());
    }

    #[test]
    fn test_contains_point_by_kind() {
        let circle: Shape = ShapeCircle::new(v(0, 0), 10).into();
        assert!(circle.contains_point(v(6, 8)));
        assert!(!circle.contains_point(v(8, 8)));

        let seg: Shape = ShapeSegment::new(v(0, 0), v(100, 0), 10).into();
        assert!(seg.contains_point(v(50, 5)));
        assert!(!seg.contains_point(v(50, 6)));
    }

    #[test]
    fn test_moved_compound() {
        let c: Shape = ShapeCompound::new(vec![
            ShapeCircle::new(v(0, 0), 5).into(),
            ShapeRect::new(v(10, 10), v(5, 5)).into(),
        ])
        .into();
        let m = c.moved(v(100, 0));
        assert_eq!(m.bbox(0), Box2I::from_corners(v(95, -5), v(115, 15)));
    }

    #[test]
    fn test_shape_json_tagged() {
        let json = r#"{"type":"circle","center":{"x":1,"y":2},"radius":3}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape, Shape::Circle(ShapeCircle::new(v(1, 2), 3)));
        assert_eq!(shape.kind(), ShapeKind::Circle);
    }
}

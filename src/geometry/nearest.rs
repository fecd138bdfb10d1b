//! Nearest points between any two shapes
//!
//! [`nearest_points`] is a double dispatch over `(kind A, kind B)`. Curved
//! pairs go to the specialized circle/segment/arc routines; rects, line
//! chains and poly sets are reduced to their outline edges; compounds recurse
//! element by element and keep the global minimum. The match lists every
//! pair without a wildcard arm, so a new shape kind cannot compile until it
//! is routed.
//!
//! Every routine works on zero-width centerlines first and then applies the
//! stroke widths through [`NearestPair::between_centerlines`].

use super::arc::ShapeArc;
use super::seg::Seg;
use super::shapes::{Shape, ShapeCircle, ShapeSegment};
use super::vector::{midpoint, Vector2D, Vector2I};

/// Closest pair between two shapes, after stroke adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPair {
    /// Point on the boundary of the first shape
    pub a: Vector2D,
    /// Point on the boundary of the second shape
    pub b: Vector2D,
    /// Gap between the boundaries; 0 when they touch or overlap
    pub distance: f64,
}

impl NearestPair {
    /// Build the pair from centerline points `pa`, `pb` and the half widths
    /// `ha`, `hb` of the two strokes.
    ///
    /// Each point moves toward the other by its own half width. When the
    /// strokes overlap both points collapse onto the contact point
    /// `pa + (pb - pa) * ha / (ha + hb)` and the distance is exactly zero.
    pub fn between_centerlines(pa: Vector2D, pb: Vector2D, ha: f64, hb: f64) -> Self {
        let d = pa.distance(pb);
        let reach = ha + hb;

        if d <= reach {
            let contact = if reach > 0.0 { pa + (pb - pa) * (ha / reach) } else { pa };
            return NearestPair {
                a: contact,
                b: contact,
                distance: 0.0,
            };
        }

        let dir = (pb - pa) * (1.0 / d);
        NearestPair {
            a: pa + dir * ha,
            b: pb - dir * hb,
            distance: d - reach,
        }
    }

    pub fn swapped(self) -> Self {
        NearestPair {
            a: self.b,
            b: self.a,
            distance: self.distance,
        }
    }

    pub fn rounded(&self) -> (Vector2I, Vector2I) {
        (self.a.round(), self.b.round())
    }

    pub fn midpoint(&self) -> Vector2D {
        midpoint(self.a, self.b)
    }
}

/// Nearest points `(on a, on b)` between two shapes, or `None` when either
/// shape is empty.
pub fn nearest_points(a: &Shape, b: &Shape) -> Option<NearestPair> {
    use Shape::*;

    match (a, b) {
        (Compound(ca), _) => closest(ca.shapes().iter().filter_map(|s| nearest_points(s, b))),
        (_, Compound(cb)) => closest(cb.shapes().iter().filter_map(|s| nearest_points(a, s))),

        (Circle(ca), Circle(cb)) => Some(circle_circle(ca, cb)),
        (Circle(c), Segment(s)) => Some(circle_segment(c, s)),
        (Segment(s), Circle(c)) => Some(circle_segment(c, s).swapped()),
        (Segment(sa), Segment(sb)) => Some(segment_segment(sa, sb)),

        (Arc(arc), Circle(c)) => Some(arc.nearest_points_circle(c)),
        (Circle(c), Arc(arc)) => Some(arc.nearest_points_circle(c).swapped()),
        (Arc(arc), Segment(s)) => Some(arc.nearest_points_segment(s)),
        (Segment(s), Arc(arc)) => Some(arc.nearest_points_segment(s).swapped()),
        (Arc(arc), Rect(r)) => Some(arc.nearest_points_rect(r)),
        (Rect(r), Arc(arc)) => Some(arc.nearest_points_rect(r).swapped()),
        (Arc(x), Arc(y)) => Some(x.nearest_points_arc(y)),

        // Outline reduction
        (Rect(_) | LineChain(_) | PolySet(_), _) | (_, Rect(_) | LineChain(_) | PolySet(_)) => {
            by_primitives(a, b)
        }
    }
}

fn circle_circle(a: &ShapeCircle, b: &ShapeCircle) -> NearestPair {
    NearestPair::between_centerlines(
        a.center.to_f64(),
        b.center.to_f64(),
        a.radius as f64,
        b.radius as f64,
    )
}

fn circle_segment(c: &ShapeCircle, s: &ShapeSegment) -> NearestPair {
    let center = c.center.to_f64();
    let on_seg = s.seg.nearest_point_d(center);
    NearestPair::between_centerlines(center, on_seg, c.radius as f64, s.width as f64 / 2.0)
}

fn segment_segment(a: &ShapeSegment, b: &ShapeSegment) -> NearestPair {
    let (pa, pb) = a.seg.nearest_points(&b.seg);
    NearestPair::between_centerlines(pa, pb, a.width as f64 / 2.0, b.width as f64 / 2.0)
}

/// Smallest distance wins; ties keep the earliest
fn closest<I: IntoIterator<Item = NearestPair>>(pairs: I) -> Option<NearestPair> {
    pairs.into_iter().fold(None, |best, pair| match best {
        Some(b) if b.distance <= pair.distance => Some(b),
        _ => Some(pair),
    })
}

/// Zero-width building block with a stroke half width
#[derive(Debug, Clone, Copy)]
enum Primitive<'a> {
    Point(Vector2D, f64),
    Edge(Seg, f64),
    Arc(&'a ShapeArc),
}

fn primitives(shape: &Shape) -> Vec<Primitive<'_>> {
    let mut out = Vec::new();
    collect_primitives(shape, &mut out);
    out
}

fn collect_primitives<'a>(shape: &'a Shape, out: &mut Vec<Primitive<'a>>) {
    match shape {
        Shape::Rect(r) => out.extend(r.outline().into_iter().map(|s| Primitive::Edge(s, 0.0))),
        Shape::Circle(c) => out.push(Primitive::Point(c.center.to_f64(), c.radius as f64)),
        Shape::Segment(s) => out.push(Primitive::Edge(s.seg, s.width as f64 / 2.0)),
        Shape::Arc(a) => out.push(Primitive::Arc(a)),
        Shape::LineChain(l) => {
            let half = l.width() as f64 / 2.0;
            if l.point_count() == 1 {
                out.push(Primitive::Point(l.points()[0].to_f64(), half));
            } else {
                out.extend(l.segments().map(|s| Primitive::Edge(s, half)));
            }
        }
        Shape::Compound(c) => {
            for s in c.shapes() {
                collect_primitives(s, out);
            }
        }
        Shape::PolySet(p) => out.extend(p.segments().map(|s| Primitive::Edge(s, 0.0))),
    }
}

fn primitive_pair(a: &Primitive<'_>, b: &Primitive<'_>) -> NearestPair {
    match (a, b) {
        (Primitive::Point(p, ha), Primitive::Point(q, hb)) => NearestPair::between_centerlines(*p, *q, *ha, *hb),
        (Primitive::Point(p, ha), Primitive::Edge(s, hb)) => {
            NearestPair::between_centerlines(*p, s.nearest_point_d(*p), *ha, *hb)
        }
        (Primitive::Edge(..), Primitive::Point(..)) => primitive_pair(b, a).swapped(),
        (Primitive::Point(p, ha), Primitive::Arc(arc)) => {
            NearestPair::between_centerlines(*p, arc.nearest_point(*p), *ha, arc.width() as f64 / 2.0)
        }
        (Primitive::Arc(_), Primitive::Point(..)) => primitive_pair(b, a).swapped(),
        (Primitive::Edge(sa, ha), Primitive::Edge(sb, hb)) => {
            let (pa, pb) = sa.nearest_points(sb);
            NearestPair::between_centerlines(pa, pb, *ha, *hb)
        }
        (Primitive::Edge(s, hs), Primitive::Arc(arc)) => {
            let (on_arc, on_seg) = arc.centerline_nearest_segment(s);
            NearestPair::between_centerlines(on_seg, on_arc, *hs, arc.width() as f64 / 2.0)
        }
        (Primitive::Arc(_), Primitive::Edge(..)) => primitive_pair(b, a).swapped(),
        (Primitive::Arc(x), Primitive::Arc(y)) => {
            let (pa, pb) = x.centerline_nearest_arc(y);
            NearestPair::between_centerlines(pa, pb, x.width() as f64 / 2.0, y.width() as f64 / 2.0)
        }
    }
}

fn by_primitives(a: &Shape, b: &Shape) -> Option<NearestPair> {
    let pa = primitives(a);
    let pb = primitives(b);

    let mut best: Option<NearestPair> = None;
    for x in &pa {
        for y in &pb {
            let pair = primitive_pair(x, y);
            if best.map_or(true, |b| pair.distance < b.distance) {
                best = Some(pair);
                if pair.distance == 0.0 {
                    return best;
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::{ShapeCompound, ShapeLineChain, ShapePolySet, ShapeRect};

    fn v(x: i32, y: i32) -> Vector2I {
        Vector2I::new(x, y)
    }

    #[test]
    fn test_between_centerlines_applies_half_widths() {
        let pair = NearestPair::between_centerlines(
            Vector2D::new(0.0, 0.0),
            Vector2D::new(100.0, 0.0),
            5.0,
            10.0,
        );
        assert_eq!(pair.a, Vector2D::new(5.0, 0.0));
        assert_eq!(pair.b, Vector2D::new(90.0, 0.0));
        assert_eq!(pair.distance, 85.0);
    }

    #[test]
    fn test_between_centerlines_overlap_contact() {
        let pair = NearestPair::between_centerlines(
            Vector2D::new(0.0, 0.0),
            Vector2D::new(10.0, 0.0),
            10.0,
            30.0,
        );
        assert_eq!(pair.distance, 0.0);
        assert_eq!(pair.a, pair.b);
        assert!((pair.a.x - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_tracks() {
        let a: Shape = ShapeSegment::new(v(0, 0), v(1000, 0), 10).into();
        let b: Shape = ShapeSegment::new(v(0, 100), v(1000, 100), 10).into();
        let pair = nearest_points(&a, &b).unwrap();
        assert!((pair.distance - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_rect_outline() {
        let c: Shape = ShapeCircle::new(v(0, 0), 10).into();
        let r: Shape = ShapeRect::new(v(30, -5), v(10, 10)).into();
        let pair = nearest_points(&c, &r).unwrap();
        assert!((pair.distance - 20.0).abs() < 1e-9);
        assert_eq!(pair.rounded(), (v(10, 0), v(30, 0)));

        let back = nearest_points(&r, &c).unwrap();
        assert_eq!(back.rounded(), (v(30, 0), v(10, 0)));
    }

    #[test]
    fn test_compound_keeps_global_minimum() {
        let compound: Shape = ShapeCompound::new(vec![
            ShapeCircle::new(v(500, 0), 5).into(),
            ShapeCircle::new(v(50, 0), 5).into(),
        ])
        .into();
        let target: Shape = ShapeCircle::new(v(0, 0), 5).into();
        let pair = nearest_points(&compound, &target).unwrap();
        assert!((pair.distance - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_shapes_have_no_pair() {
        let empty: Shape = ShapeCompound::default().into();
        let target: Shape = ShapeCircle::new(v(0, 0), 5).into();
        assert!(nearest_points(&empty, &target).is_none());
        assert!(nearest_points(&target, &Shape::from(ShapePolySet::default())).is_none());
    }

    #[test]
    fn test_chain_crossing_segment_is_zero() {
        let chain: Shape = ShapeLineChain::new(vec![v(0, 0), v(100, 0), v(100, 100)], false, 0).into();
        let seg: Shape = ShapeSegment::new(v(50, -50), v(50, 50), 0).into();
        let pair = nearest_points(&chain, &seg).unwrap();
        assert_eq!(pair.distance, 0.0);
        assert_eq!(pair.rounded().0, v(50, 0));
    }

    #[test]
    fn test_arc_segment_dispatch_is_swapped() {
        let arc: Shape = ShapeArc::new(v(100, 0), v(0, 100), v(-100, 0), 10).into();
        let seg: Shape = ShapeSegment::new(v(-50, 200), v(50, 200), 20).into();
        let ab = nearest_points(&arc, &seg).unwrap();
        let ba = nearest_points(&seg, &arc).unwrap();
        assert!((ab.distance - 85.0).abs() < 1e-9);
        assert_eq!(ab.a, ba.b);
        assert_eq!(ab.b, ba.a);
    }
}

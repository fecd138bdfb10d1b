//! Clearance collision between shapes
//!
//! `collide` answers "are these two shapes closer than `clearance`?" and
//! returns the measured gap in the same pass, so callers never compute the
//! distance twice.

use serde::{Deserialize, Serialize};

use super::extended::{round_to_coord, Coord};
use super::nearest::nearest_points;
use super::shapes::Shape;
use super::vector::Vector2I;

/// Result of a positive collision test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Measured gap between the shape boundaries, 0 on contact or overlap
    pub actual: Coord,
    /// Where the two shapes come closest
    pub location: Vector2I,
}

impl Collision {
    /// A collision exists when the shapes touch or the exact `distance` is
    /// under the required clearance. The comparison happens before rounding,
    /// so a gap of 49.6 still violates a clearance of 50.
    ///
    /// The reported `actual` is the rounded gap, held strictly below
    /// `clearance` whenever the gap itself is.
    pub fn check(distance: f64, clearance: Coord, location: Vector2I) -> Option<Collision> {
        if distance == 0.0 {
            return Some(Collision { actual: 0, location });
        }
        if distance >= f64::from(clearance) {
            return None;
        }

        let actual = round_to_coord(distance).min(clearance - 1).max(0);
        Some(Collision { actual, location })
    }
}

/// A point of `inner` lying inside a solid part of `outer`, if any
fn enclosed_point(outer: &Shape, inner: &Shape) -> Option<Vector2I> {
    match (outer, inner) {
        (Shape::Compound(c), _) => c.shapes().iter().find_map(|s| enclosed_point(s, inner)),
        (_, Shape::Compound(c)) => c.shapes().iter().find_map(|s| enclosed_point(outer, s)),
        _ if outer.is_solid() => inner.representative_point().filter(|p| outer.contains_point(*p)),
        _ => None,
    }
}

/// Test two shapes against a required `clearance`.
///
/// The gap is the boundary-to-boundary distance, or zero when one shape lies
/// inside a solid part of the other. Empty shapes never collide.
pub fn collide(a: &Shape, b: &Shape, clearance: Coord) -> Option<Collision> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if !a.bbox(clearance).intersects(&b.bbox(0)) {
        return None;
    }

    if let Some(p) = enclosed_point(a, b).or_else(|| enclosed_point(b, a)) {
        return Collision::check(0.0, clearance, p);
    }

    let pair = nearest_points(a, b)?;
    Collision::check(pair.distance, clearance, pair.midpoint().round())
}

impl Shape {
    /// See [`collide`]
    pub fn collide(&self, other: &Shape, clearance: Coord) -> Option<Collision> {
        collide(self, other, clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::{ShapeCircle, ShapeLineChain, ShapeRect, ShapeSegment};

    fn v(x: i32, y: i32) -> Vector2I {
        Vector2I::new(x, y)
    }

    #[test]
    fn test_check_thresholds() {
        assert!(Collision::check(0.0, 0, v(0, 0)).is_some());
        assert!(Collision::check(49.0, 50, v(0, 0)).is_some());
        assert!(Collision::check(50.0, 50, v(0, 0)).is_none());
        assert!(Collision::check(0.4, 0, v(0, 0)).is_none());
    }

    #[test]
    fn test_fractional_gap_compared_before_rounding() {
        let hit = Collision::check(49.66, 50, v(0, 0)).unwrap();
        assert_eq!(hit.actual, 49);
        assert_eq!(Collision::check(12.4, 50, v(0, 0)).unwrap().actual, 12);
        assert!(Collision::check(50.2, 50, v(0, 0)).is_none());
    }

    #[test]
    fn test_points_just_inside_clearance_collide() {
        // Gap is sqrt(21^2 + 45^2) ~ 49.66
        let a: Shape = ShapeCircle::new(v(0, 0), 0).into();
        let b: Shape = ShapeCircle::new(v(21, 45), 0).into();
        let hit = a.collide(&b, 50).expect("gap under clearance");
        assert!(hit.actual <= 49, "got {}", hit.actual);
        assert!(a.collide(&b, 49).is_none());
    }

    #[test]
    fn test_track_end_just_inside_clearance_collides() {
        // End of the second track sits ~44.66 from the first track's edge
        let a: Shape = ShapeSegment::new(v(0, 0), v(1000, 0), 10).into();
        let b: Shape = ShapeSegment::new(v(1021, 45), v(2000, 45), 0).into();
        let hit = a.collide(&b, 45).expect("gap under clearance");
        assert_eq!(hit.actual, 44);
        assert!(b.collide(&a, 45).is_some());
    }

    #[test]
    fn test_segments_within_clearance() {
        let a: Shape = ShapeSegment::new(v(0, 0), v(1000, 0), 10).into();
        let b: Shape = ShapeSegment::new(v(0, 50), v(1000, 50), 10).into();
        let hit = a.collide(&b, 50).unwrap();
        assert_eq!(hit.actual, 40);
        assert_eq!(hit.location.y, 25);
        assert!(a.collide(&b, 40).is_none());
    }

    #[test]
    fn test_far_shapes_rejected_by_bbox() {
        let a: Shape = ShapeCircle::new(v(0, 0), 10).into();
        let b: Shape = ShapeCircle::new(v(10_000, 0), 10).into();
        assert!(a.collide(&b, 100).is_none());
    }

    #[test]
    fn test_contained_shape_reports_zero() {
        let zone: Shape = ShapeLineChain::closed_polygon(vec![v(0, 0), v(1000, 0), v(1000, 1000), v(0, 1000)]).into();
        let pad: Shape = ShapeRect::new(v(400, 400), v(50, 50)).into();
        let hit = zone.collide(&pad, 10).unwrap();
        assert_eq!(hit.actual, 0);
        assert_eq!(hit.location, v(400, 400));

        let back = pad.collide(&zone, 10).unwrap();
        assert_eq!(back.actual, 0);
    }

    #[test]
    fn test_open_chain_does_not_enclose() {
        let chain: Shape = ShapeLineChain::new(vec![v(0, 0), v(1000, 0), v(1000, 1000), v(0, 1000)], false, 0).into();
        let pad: Shape = ShapeCircle::new(v(500, 500), 10).into();
        assert!(chain.collide(&pad, 100).is_none());
    }
}

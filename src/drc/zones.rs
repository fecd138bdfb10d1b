//! Zone outlines and the zone-to-zone test
//!
//! Zone corners can be chamfered or filleted. Smoothed outlines are built
//! once per run (in parallel) and shared by every phase that touches zones.
//!
//! Zone pairs are tested in two steps: a corner of one zone inside the other
//! is reported immediately as an intersection; otherwise every edge pair is
//! scanned and close approaches are reported once per contact point.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DrcResult;
use crate::geometry::{Collision, Coord, Shape, ShapeArc, ShapeLineChain, ShapePolySet, Vector2D, Vector2I};

use super::board::{CopperItem, ItemId, Zone};
use super::rules::RuleResolver;
use super::settings::DrcSettings;
use super::types::{Violation, ViolationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSmoothing {
    #[default]
    None,
    Chamfer,
    Fillet,
}

/// Corner geometry shared by chamfer and fillet: unit vectors toward the
/// neighbours and the longest cut that keeps both edges at least half intact
struct Corner {
    prev: Vector2I,
    at: Vector2I,
    next: Vector2I,
    to_prev: Vector2D,
    to_next: Vector2D,
    max_cut: f64,
}

fn corner(points: &[Vector2I], i: usize) -> Option<Corner> {
    let n = points.len();
    let prev = points[(i + n - 1) % n];
    let at = points[i];
    let next = points[(i + 1) % n];

    let d_prev = prev.to_f64() - at.to_f64();
    let d_next = next.to_f64() - at.to_f64();
    let (len_prev, len_next) = (d_prev.norm(), d_next.norm());
    if len_prev == 0.0 || len_next == 0.0 {
        return None;
    }

    let to_prev = d_prev.normalized();
    let to_next = d_next.normalized();

    // Straight-through vertices have nothing to smooth
    if to_prev.cross(to_next).abs() < 1e-9 {
        return None;
    }

    Some(Corner {
        prev,
        at,
        next,
        to_prev,
        to_next,
        max_cut: len_prev.min(len_next) / 2.0,
    })
}

/// Cut every corner at `distance` along both edges
pub fn chamfer(chain: &ShapeLineChain, distance: Coord) -> ShapeLineChain {
    let points = chain.points();
    if distance <= 0 || points.len() < 3 {
        return chain.clone();
    }

    let mut out = Vec::with_capacity(points.len() * 2);
    for i in 0..points.len() {
        match corner(points, i) {
            Some(c) => {
                let cut = (distance as f64).min(c.max_cut);
                let at = c.at.to_f64();
                out.push((at + c.to_prev * cut).round());
                out.push((at + c.to_next * cut).round());
            }
            None => out.push(points[i]),
        }
    }
    out.dedup();

    ShapeLineChain::new(out, true, chain.width())
}

/// Round every corner with a tangent arc of `radius`, tessellated within
/// `max_error`. The radius shrinks where an edge is too short for it.
pub fn fillet(chain: &ShapeLineChain, radius: Coord, max_error: Coord) -> ShapeLineChain {
    let points = chain.points();
    if radius <= 0 || points.len() < 3 {
        return chain.clone();
    }

    let mut out = Vec::with_capacity(points.len() * 4);
    for i in 0..points.len() {
        let Some(c) = corner(points, i) else {
            out.push(points[i]);
            continue;
        };

        // Tangent distance from the corner is r / tan(theta / 2)
        let half = c.to_prev.dot(c.to_next).clamp(-1.0, 1.0).acos() / 2.0;
        let r = (radius as f64).min(c.max_cut * half.tan());
        if r < 1.0 {
            out.push(points[i]);
            continue;
        }

        let seg_in = crate::geometry::Seg::new(c.prev, c.at);
        let seg_out = crate::geometry::Seg::new(c.at, c.next);
        match ShapeArc::from_tangent_segments(&seg_in, &seg_out, r, 0) {
            Ok(arc) => out.extend_from_slice(arc.convert_to_polyline(max_error).points()),
            Err(_) => out.push(points[i]),
        }
    }
    out.dedup();

    ShapeLineChain::new(out, true, chain.width())
}

/// Outline with the zone's smoothing applied to every ring
pub fn smoothed_outline(zone: &Zone, max_error: Coord) -> ShapePolySet {
    let smooth = |ring: &ShapeLineChain| match zone.smoothing {
        ZoneSmoothing::None => ring.clone(),
        ZoneSmoothing::Chamfer => chamfer(ring, zone.smoothing_radius),
        ZoneSmoothing::Fillet => fillet(ring, zone.smoothing_radius, max_error),
    };

    ShapePolySet::new(
        zone.outline
            .polygons()
            .iter()
            .map(|poly| poly.iter().map(smooth).collect())
            .collect(),
    )
}

/// Smoothed outlines for one run, keyed by zone id
#[derive(Debug, Default)]
pub struct ZoneOutlineCache {
    outlines: HashMap<ItemId, Shape>,
}

impl ZoneOutlineCache {
    pub fn build(zones: &[Zone], max_error: Coord) -> Self {
        let outlines: HashMap<ItemId, Shape> = zones
            .par_iter()
            .map(|zone| (zone.id, Shape::PolySet(smoothed_outline(zone, max_error))))
            .collect();

        debug!(zones = outlines.len(), "smoothed zone outlines");
        Self { outlines }
    }

    pub fn get(&self, id: ItemId) -> Option<&Shape> {
        self.outlines.get(&id)
    }

    /// Checker views of every zone that has an outline
    pub fn items<'a>(&'a self, zones: &'a [Zone]) -> Vec<CopperItem<'a>> {
        zones
            .iter()
            .filter_map(|zone| self.get(zone.id).map(|outline| CopperItem::from_zone(zone, outline)))
            .collect()
    }
}

fn polyset(shape: &Shape) -> Option<&ShapePolySet> {
    match shape {
        Shape::PolySet(p) => Some(p),
        _ => None,
    }
}

/// Test two zones on every layer they share.
///
/// Returns violations for the first violating layer, or for every violating
/// layer when `report_all_layers` is set.
pub fn check_zone_pair(
    a: &CopperItem<'_>,
    b: &CopperItem<'_>,
    rules: &dyn RuleResolver,
    settings: &DrcSettings,
) -> DrcResult<Vec<Violation>> {
    let mut violations = Vec::new();
    let (Some(poly_a), Some(poly_b)) = (polyset(a.shape), polyset(b.shape)) else {
        return Ok(violations);
    };

    for layer in a.shared_layers(b) {
        let resolved = rules.resolve(a, b, layer)?;
        let clearance = resolved.value;

        if !a.bbox.get_inflated(clearance, clearance).intersects(&b.bbox) {
            continue;
        }

        let before = violations.len();

        // Containment: a corner of one zone inside the other
        let inside = poly_a
            .vertices()
            .find(|p| poly_b.contains_point(*p))
            .or_else(|| poly_b.vertices().find(|p| poly_a.contains_point(*p)));

        if let Some(p) = inside {
            violations.push(Violation::new(
                ViolationKind::ZonesIntersect,
                (a.id, b.id),
                layer,
                p,
                clearance,
                0,
                &resolved.rule_name,
            ));
        } else {
            let mut conflicts: BTreeMap<Vector2I, f64> = BTreeMap::new();
            for seg_a in poly_a.segments() {
                for seg_b in poly_b.segments() {
                    let (pa, pb) = seg_a.nearest_points(&seg_b);
                    let distance = pa.distance(pb);
                    if distance == 0.0 || distance < f64::from(clearance) {
                        let at = crate::geometry::vector::midpoint(pa, pb).round();
                        conflicts
                            .entry(at)
                            .and_modify(|d| *d = d.min(distance))
                            .or_insert(distance);
                    }
                }
            }

            for (at, distance) in conflicts {
                let Some(hit) = Collision::check(distance, clearance, at) else {
                    continue;
                };
                let kind = if distance == 0.0 {
                    ViolationKind::ZonesIntersect
                } else {
                    ViolationKind::Clearance
                };
                violations.push(Violation::new(
                    kind,
                    (a.id, b.id),
                    layer,
                    hit.location,
                    clearance,
                    hit.actual,
                    &resolved.rule_name,
                ));
            }
        }

        if violations.len() > before && !settings.report_all_layers {
            break;
        }
    }

    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::rules::DesignRules;

    fn v(x: i32, y: i32) -> Vector2I {
        Vector2I::new(x, y)
    }

    fn square(x: i32, y: i32, s: i32) -> ShapeLineChain {
        ShapeLineChain::closed_polygon(vec![v(x, y), v(x + s, y), v(x + s, y + s), v(x, y + s)])
    }

    fn zone(id: ItemId, net: i32, ring: ShapeLineChain) -> Zone {
        let mut outline = ShapePolySet::default();
        outline.add_outline(ring);
        Zone {
            id,
            net,
            layers: vec!["F.Cu".into()],
            outline,
            smoothing: ZoneSmoothing::None,
            smoothing_radius: 0,
        }
    }

    #[test]
    fn test_chamfer_square() {
        let out = chamfer(&square(0, 0, 100), 10);
        assert_eq!(out.point_count(), 8);
        assert_eq!(out.points()[0], v(0, 10));
        assert_eq!(out.points()[1], v(10, 0));
    }

    #[test]
    fn test_chamfer_clamped_to_half_edge() {
        let out = chamfer(&square(0, 0, 100), 80);
        // Cuts meet at the edge midpoints and collapse into a diamond
        assert!(out.points().contains(&v(50, 0)));
        assert!(out.points().iter().all(|p| p.x >= 0 && p.y >= 0 && p.x <= 100 && p.y <= 100));
    }

    #[test]
    fn test_fillet_stays_inside_corner_band() {
        let out = fillet(&square(0, 0, 1000), 100, 5);
        assert!(out.point_count() > 8);
        assert!(!out.points().contains(&v(0, 0)));
        for p in out.points() {
            assert!(p.x >= 0 && p.y >= 0 && p.x <= 1000 && p.y <= 1000);
        }
        assert!(out.points().contains(&v(0, 100)));
        assert!(out.points().contains(&v(100, 0)));
    }

    #[test]
    fn test_cache_applies_smoothing() {
        let mut z = zone(1, 1, square(0, 0, 100));
        z.smoothing = ZoneSmoothing::Chamfer;
        z.smoothing_radius = 10;
        let cache = ZoneOutlineCache::build(&[z], 5_000);
        let Some(Shape::PolySet(p)) = cache.get(1) else {
            panic!("missing outline");
        };
        assert_eq!(p.outline(0).map(|o| o.point_count()), Some(8));
    }

    #[test]
    fn test_nested_zone_reports_intersection() {
        let zones = [zone(1, 1, square(0, 0, 1000)), zone(2, 2, square(200, 200, 100))];
        let cache = ZoneOutlineCache::build(&zones, 5_000);
        let items = cache.items(&zones);
        let rules = DesignRules::with_clearance(50);
        let found = check_zone_pair(&items[0], &items[1], &rules, &DrcSettings::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::ZonesIntersect);
        assert_eq!(found[0].location, v(200, 200));
    }

    #[test]
    fn test_close_zones_dedupe_contact_points() {
        let zones = [zone(1, 1, square(0, 0, 100)), zone(2, 2, square(130, 0, 100))];
        let cache = ZoneOutlineCache::build(&zones, 5_000);
        let items = cache.items(&zones);
        let rules = DesignRules::with_clearance(50);
        let found = check_zone_pair(&items[0], &items[1], &rules, &DrcSettings::default()).unwrap();
        assert!(!found.is_empty());
        assert!(found.iter().all(|f| f.kind == ViolationKind::Clearance && f.actual == 30));

        let mut locations: Vec<Vector2I> = found.iter().map(|f| f.location).collect();
        locations.dedup();
        assert_eq!(locations.len(), found.len());
    }

    #[test]
    fn test_diagonal_corner_gap_under_clearance_is_reported() {
        // Facing corners sit sqrt(21^2 + 45^2) ~ 49.66 apart
        let zones = [zone(1, 1, square(0, 0, 100)), zone(2, 2, square(121, 145, 100))];
        let cache = ZoneOutlineCache::build(&zones, 5_000);
        let items = cache.items(&zones);

        let found = check_zone_pair(&items[0], &items[1], &DesignRules::with_clearance(50), &DrcSettings::default()).unwrap();
        assert_eq!(found.len(), 1, "{:?}", found);
        assert_eq!(found[0].kind, ViolationKind::Clearance);
        assert_eq!(found[0].actual, 49);

        let relaxed = check_zone_pair(&items[0], &items[1], &DesignRules::with_clearance(49), &DrcSettings::default()).unwrap();
        assert!(relaxed.is_empty());
    }
}

//! Per-pair clearance protocol
//!
//! For each candidate pair: skip same-net and net-tie pairs, then for each
//! shared copper layer resolve the pair's clearance, reject by inflated
//! bounding box, and run the exact shape test. Crossing tracks are reported
//! as their own kind rather than as a zero clearance.

use std::collections::HashMap;

use crate::error::DrcResult;
use crate::geometry::{Shape, Vector2D};

use super::board::{CopperItem, Footprint, FootprintId};
use super::rules::RuleResolver;
use super::settings::DrcSettings;
use super::types::{Violation, ViolationKind};

/// Shared, read-only inputs of the pair test
#[derive(Clone, Copy)]
pub struct PairContext<'a> {
    pub rules: &'a dyn RuleResolver,
    pub settings: &'a DrcSettings,
    pub footprints: &'a HashMap<FootprintId, &'a Footprint>,
}

/// Check if two items should be clearance-checked against each other
pub fn should_check_pair(a: &CopperItem<'_>, b: &CopperItem<'_>, footprints: &HashMap<FootprintId, &Footprint>) -> bool {
    if a.id == b.id {
        return false;
    }

    // Same net - skip
    if a.net != 0 && a.net == b.net {
        return false;
    }

    // Net-tie footprints may short the nets they tie
    if let (Some(fa), Some(fb)) = (a.footprint, b.footprint) {
        if fa == fb && footprints.get(&fa).map_or(false, |fp| fp.is_net_tie(a.net, b.net)) {
            return false;
        }
    }

    true
}

/// Centerline crossing point of two tracks, if they are segments or arcs
pub fn track_crossing(a: &Shape, b: &Shape) -> Option<Vector2D> {
    match (a, b) {
        (Shape::Segment(sa), Shape::Segment(sb)) => sa.seg.intersect(&sb.seg),
        (Shape::Segment(s), Shape::Arc(arc)) | (Shape::Arc(arc), Shape::Segment(s)) => {
            arc.intersect_segment(&s.seg).into_iter().next()
        }
        (Shape::Arc(x), Shape::Arc(y)) => x.intersect_arc(y).into_iter().next(),
        _ => None,
    }
}

/// Run the protocol for one pair. Returns violations for the first
/// violating layer, or all of them with `report_all_layers`.
pub fn check_pair(a: &CopperItem<'_>, b: &CopperItem<'_>, ctx: &PairContext<'_>) -> DrcResult<Vec<Violation>> {
    let mut violations = Vec::new();
    if !should_check_pair(a, b, ctx.footprints) {
        return Ok(violations);
    }

    let both_tracks = a.kind.is_track() && b.kind.is_track();

    for layer in a.shared_layers(b) {
        let resolved = ctx.rules.resolve(a, b, layer)?;
        let clearance = resolved.value;

        if !a.bbox.get_inflated(clearance, clearance).intersects(&b.bbox) {
            continue;
        }

        if both_tracks {
            if let Some(p) = track_crossing(a.shape, b.shape) {
                violations.push(Violation::new(
                    ViolationKind::TracksCrossing,
                    (a.id, b.id),
                    layer,
                    p.round(),
                    clearance,
                    0,
                    &resolved.rule_name,
                ));
                if !ctx.settings.report_all_layers {
                    break;
                }
                continue;
            }
        }

        if let Some(hit) = a.shape.collide(b.shape, clearance) {
            violations.push(Violation::new(
                ViolationKind::Clearance,
                (a.id, b.id),
                layer,
                hit.location,
                clearance,
                hit.actual,
                &resolved.rule_name,
            ));
            if !ctx.settings.report_all_layers {
                break;
            }
        }
    }

    Ok(violations)
}

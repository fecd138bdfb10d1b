//! Arc approximation helpers
//!
//! Chord-count and chord-error math shared by arc tessellation and zone
//! fillet smoothing.

/// Fewest segments ever used to approximate a full circle
pub const MIN_SEGCOUNT_FOR_CIRCLE: u32 = 8;

/// Segment count needed to approximate an arc of `radius` sweeping
/// `arc_angle_deg` while keeping the chord error below `max_error`.
pub fn arc_to_segment_count(radius: f64, max_error: f64, arc_angle_deg: f64) -> u32 {
    let radius = radius.max(1.0);
    let max_error = max_error.max(1.0);

    let rel_error = (max_error / radius).min(1.0);
    let increment = (1.0 - rel_error).acos().to_degrees() * 2.0;
    let increment = increment.min(360.0 / MIN_SEGCOUNT_FOR_CIRCLE as f64);

    let count = (arc_angle_deg.abs() / increment).round() as u32;
    count.max(2)
}

/// Distance between a circle of `radius` and the vertices of a regular
/// polygon of `seg_count` sides whose edges are tangent to that circle.
pub fn circle_to_end_segment_delta_radius(radius: f64, seg_count: u32) -> f64 {
    let seg_count = seg_count.max(3);
    let alpha = std::f64::consts::PI / seg_count as f64;
    (radius * (1.0 / alpha.cos() - 1.0)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_grows_with_radius() {
        let small = arc_to_segment_count(1_000.0, 10.0, 360.0);
        let large = arc_to_segment_count(1_000_000.0, 10.0, 360.0);
        assert!(small >= MIN_SEGCOUNT_FOR_CIRCLE);
        assert!(large > small);
    }

    #[test]
    fn test_segment_count_at_least_two() {
        assert_eq!(arc_to_segment_count(100.0, 50.0, 1.0), 2);
    }

    #[test]
    fn test_delta_radius_bounded_by_error() {
        let n = arc_to_segment_count(100_000.0, 100.0, 360.0);
        let delta = circle_to_end_segment_delta_radius(100_000.0, n);
        assert!(delta <= 110.0);
    }
}
